//! Per-page outcome definitions for a facet walk
//!
//! Page-level failures are contained: they are logged and counted, and end the
//! walk of the current facet without aborting sibling facets.

use std::fmt;

/// Result of processing one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Items were found in the results container
    Scraped,

    /// The fetch for this page failed (network error or timeout)
    FetchFailed,

    /// The page has no results container; assumed to be the end of the chain
    ContainerMissing,

    /// The results container is present but holds no item elements
    ExtractionEmpty,
}

impl PageOutcome {
    /// Returns true if this page yielded items
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Scraped)
    }

    /// Returns true if the page shape did not match the expected layout
    pub fn is_shape_drift(&self) -> bool {
        matches!(self, Self::ContainerMissing | Self::ExtractionEmpty)
    }

    /// Returns true if pagination may continue from a page with this outcome
    ///
    /// A page without a results container is treated as terminal, and a
    /// failed fetch leaves no page to look for a next link on.
    pub fn allows_pagination(&self) -> bool {
        matches!(self, Self::Scraped | Self::ExtractionEmpty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scraped => "scraped",
            Self::FetchFailed => "fetch_failed",
            Self::ContainerMissing => "container_missing",
            Self::ExtractionEmpty => "extraction_empty",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
