//! Crawler module for session negotiation, pagination and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with the site's default headers
//! - Search-session negotiation (`_ssn` id, display token, customize form)
//! - Facet enumeration through the refine endpoint
//! - Listing page parsing into records
//! - The per-facet pagination walk
//! - Overall crawl coordination

mod coordinator;
mod facets;
mod fetcher;
mod parser;
mod session;
mod walker;

pub use coordinator::{find_facet, run_crawl, Coordinator, CrawlMode};
pub use facets::{enumerate, parse_refine_response, Facet};
pub use fetcher::{build_http_client, HttpTransport, Transport};
pub use parser::{normalize_price, parse_listing, Extraction, ExtractedItem, ParsedListing};
pub use session::{negotiate, Session};
pub use walker::walk;

pub use crate::storage::Record;

/// One fetched response: the final URL after redirects and the body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub resolved_url: String,
    pub body: String,
}
