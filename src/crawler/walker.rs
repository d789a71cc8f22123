//! Facet walker - pagination and extraction loop
//!
//! Walks the chain of listing pages of one facet:
//!
//! ```text
//! Start -> Fetching -> Extracting -> Paginating -> Fetching -> ... -> Done
//! ```
//!
//! When a prefetched page is supplied, `Start` goes straight to `Extracting`.
//!
//! Pages are processed strictly one after another. A failed fetch or a page
//! without a results container ends the walk; records already persisted stay
//! persisted. Sink failures are fatal and propagate to the caller.

use crate::crawler::parser::{parse_listing, Extraction};
use crate::crawler::{Page, Transport};
use crate::output::CrawlStatistics;
use crate::state::PageOutcome;
use crate::storage::RecordSink;
use crate::Result;

/// Position of a walk in the pagination chain
#[derive(Debug)]
enum WalkState {
    Start,
    Fetching { url: String },
    Extracting { page: Page },
    Paginating { next: Option<String> },
    Done,
}

/// Walks every listing page of one facet
///
/// # Arguments
///
/// * `transport` - Transport of the session the facet was negotiated on
/// * `sink` - Where extracted records go
/// * `start_url` - URL of the first page, fetched only when `first_page` is None
/// * `condition` - Facet label stamped onto every record
/// * `first_page` - Page already fetched during negotiation, consumed without a request
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Counters for this facet; page-level failures are counted, not returned
/// * `Err(SweepError::Storage)` - The sink failed to persist a record
pub async fn walk<T, S>(
    transport: &T,
    sink: &S,
    start_url: &str,
    condition: &str,
    first_page: Option<Page>,
) -> Result<CrawlStatistics>
where
    T: Transport + ?Sized,
    S: RecordSink + ?Sized,
{
    let mut stats = CrawlStatistics::new();
    stats.facets_crawled.push(condition.to_string());

    let mut first_page = first_page;
    let mut state = WalkState::Start;

    loop {
        state = match state {
            WalkState::Start => match first_page.take() {
                Some(page) => WalkState::Extracting { page },
                None => WalkState::Fetching {
                    url: start_url.to_string(),
                },
            },

            WalkState::Fetching { url } => match transport.get(&url, &[]).await {
                Ok(page) => WalkState::Extracting { page },
                Err(e) => {
                    tracing::error!("Failed to fetch {}: {}", url, e);
                    stats.record_page(PageOutcome::FetchFailed);
                    WalkState::Done
                }
            },

            WalkState::Extracting { page } => {
                let parsed = parse_listing(&page.body, &page.resolved_url, condition);

                let outcome = match parsed.extraction {
                    Extraction::ContainerMissing => {
                        tracing::warn!("Failed to extract -> {}", page.resolved_url);
                        PageOutcome::ContainerMissing
                    }
                    Extraction::Items { matched: 0, .. } => {
                        tracing::warn!("Failed to extract items on --> {}", page.resolved_url);
                        PageOutcome::ExtractionEmpty
                    }
                    Extraction::Items { items, dropped, .. } => {
                        for item in &items {
                            sink.persist(&item.record, &item.item_id).await?;
                            stats.records_persisted += 1;
                        }
                        stats.items_dropped += dropped as u64;
                        tracing::info!("Scraped --> {}", page.resolved_url);
                        PageOutcome::Scraped
                    }
                };
                stats.record_page(outcome);

                if !outcome.allows_pagination() {
                    WalkState::Done
                } else {
                    match parsed.next_page {
                        Some(next) if next == page.resolved_url => {
                            tracing::warn!("Next link of {} points to itself", page.resolved_url);
                            WalkState::Paginating { next: None }
                        }
                        next => WalkState::Paginating { next },
                    }
                }
            }

            WalkState::Paginating { next } => match next {
                Some(url) => WalkState::Fetching { url },
                None => WalkState::Done,
            },

            WalkState::Done => break,
        };
    }

    tracing::debug!(
        "Facet '{}' done: {} pages, {} records",
        condition,
        stats.total_pages(),
        stats.records_persisted
    );
    stats.finish();
    Ok(stats)
}
