//! URL handling module for Facet-Sweep
//!
//! This module provides the URL-level pieces of the marketplace protocol:
//! reading the session id off redirected search URLs, building per-facet
//! search URLs, resolving relative pagination links, and pulling listing ids
//! out of product links.

mod item_id;
mod query;

pub use item_id::extract_item_id;
pub use query::{facet_url, resolve_link, session_id_from_url, CONDITION_PARAM, SESSION_PARAM};
