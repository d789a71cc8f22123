//! Run statistics
//!
//! Counters collected while walking facets, aggregated across the sweep and
//! printed when the run finishes.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics for one facet walk or a whole sweep
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Count of pages by outcome
    pub pages_by_outcome: HashMap<PageOutcome, u64>,

    /// Records handed to the sink
    pub records_persisted: u64,

    /// Item elements dropped because their link carried no item id
    pub items_dropped: u64,

    /// Labels of the facets walked, in walk order
    pub facets_crawled: Vec<String>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_by_outcome: HashMap::new(),
            records_persisted: 0,
            items_dropped: 0,
            facets_crawled: Vec::new(),
        }
    }

    pub fn record_page(&mut self, outcome: PageOutcome) {
        *self.pages_by_outcome.entry(outcome).or_insert(0) += 1;
    }

    pub fn pages(&self, outcome: PageOutcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total_pages(&self) -> u64 {
        self.pages_by_outcome.values().sum()
    }

    /// Pages whose outcome satisfies `predicate`
    pub fn pages_where(&self, predicate: impl Fn(PageOutcome) -> bool) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(outcome, _)| predicate(**outcome))
            .map(|(_, count)| count)
            .sum()
    }

    /// Folds the counters of a finished facet walk into this one
    pub fn merge(&mut self, other: &CrawlStatistics) {
        for (outcome, count) in &other.pages_by_outcome {
            *self.pages_by_outcome.entry(*outcome).or_insert(0) += count;
        }
        self.records_persisted += other.records_persisted;
        self.items_dropped += other.items_dropped;
        self.facets_crawled.extend(other.facets_crawled.iter().cloned());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, if the run has finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Facets ({}):", stats.facets_crawled.len());
    for facet in &stats.facets_crawled {
        println!("  - {}", facet);
    }
    println!();

    println!("Pages by Outcome:");
    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1));
    for (outcome, count) in outcome_counts {
        println!("  {}: {}", outcome, count);
    }
    println!(
        "  Scraped: {}/{}",
        stats.pages_where(|outcome| outcome.is_success()),
        stats.total_pages()
    );
    let drift = stats.pages_where(|outcome| outcome.is_shape_drift());
    if drift > 0 {
        println!("  Layout drift suspected on {} pages", drift);
    }
    println!();

    println!("Records persisted: {}", stats.records_persisted);
    println!("Items without an item id: {}", stats.items_dropped);
}
