//! Storage module for persisting extracted listings
//!
//! Every record is stored as its own artifact, addressed only by the listing's
//! item id, so re-crawling an item replaces what was written before.

mod json_file;
mod traits;

pub use json_file::{ensure_output_dir, JsonFileSink};
pub use traits::{RecordSink, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// One normalized listing extracted from a search results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Listing title, if the item had a heading element
    pub title: Option<String>,

    /// Display label of the facet the item was crawled under
    pub condition: String,

    /// Price text reduced to digits and decimal points
    pub price: String,

    pub product_link: String,
}
