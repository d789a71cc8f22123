//! Output module for reporting crawl results
//!
//! Records themselves are written by the storage sink; this module covers
//! the run-level statistics shown when a crawl ends.

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
