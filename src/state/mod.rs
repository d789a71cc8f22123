//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: what happened to an individual listing page during a facet walk

mod page_outcome;

pub use page_outcome::PageOutcome;
