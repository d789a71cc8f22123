//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run:
//! - Opening a discovery session on the seed URL to learn the facets
//! - Selecting one facet (targeted mode) or all of them (full sweep)
//! - Giving every facet walk its own freshly negotiated session
//! - Closing every session once its step is over, on success and failure alike
//!
//! Facets are walked one after another, never concurrently.

use crate::config::Config;
use crate::crawler::facets::{enumerate, Facet};
use crate::crawler::fetcher::HttpTransport;
use crate::crawler::session::negotiate;
use crate::crawler::walker::walk;
use crate::output::CrawlStatistics;
use crate::storage::JsonFileSink;
use crate::{Result, SweepError};

/// Which facets a run walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlMode {
    /// Walk only the facet whose label matches, ignoring case
    Targeted(String),

    /// Walk every facet in the order the site lists them
    FullSweep,
}

impl CrawlMode {
    /// Targeted when a facet name was requested, full sweep otherwise
    pub fn from_requested(requested: Option<String>) -> Self {
        match requested {
            Some(name) => Self::Targeted(name),
            None => Self::FullSweep,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    sink: JsonFileSink,
}

impl Coordinator {
    /// Creates a new coordinator, creating the output directory if missing
    pub fn new(config: Config) -> Result<Self> {
        let sink = JsonFileSink::new(&config.output.directory)?;
        Ok(Self { config, sink })
    }

    pub fn sink(&self) -> &JsonFileSink {
        &self.sink
    }

    /// Opens a discovery session on the seed URL and lists its facets
    ///
    /// The discovery session is closed before returning.
    pub async fn discover(&self) -> Result<Vec<Facet>> {
        let transport = HttpTransport::new(&self.config)?;
        let result = self.discover_with(&transport).await;
        transport.close();
        result
    }

    async fn discover_with(&self, transport: &HttpTransport) -> Result<Vec<Facet>> {
        let site = &self.config.site;
        let (first_page, session) = negotiate(transport, site, &site.seed_url).await?;
        enumerate(
            transport,
            &site.refine_endpoint(),
            &site.facet_name,
            &session,
            &first_page.resolved_url,
        )
        .await
    }

    /// Runs the crawl in the given mode
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - Aggregated counters of every facet walked
    /// * `Err(SweepError::FacetNotFound)` - Targeted name matched no facet; nothing was crawled
    /// * `Err(SweepError)` - Discovery failed, the targeted facet failed, or the sink failed
    pub async fn run(&self, mode: &CrawlMode) -> Result<CrawlStatistics> {
        let facets = self.discover().await?;
        tracing::info!(
            "Discovered {} facets: {}",
            facets.len(),
            facet_names(&facets).join(", ")
        );

        let mut stats = CrawlStatistics::new();

        match mode {
            CrawlMode::Targeted(requested) => {
                let facet = find_facet(&facets, requested).ok_or_else(|| {
                    SweepError::FacetNotFound {
                        requested: requested.clone(),
                        available: facet_names(&facets),
                    }
                })?;
                stats.merge(&self.crawl_facet(facet).await?);
            }

            CrawlMode::FullSweep => {
                for facet in &facets {
                    match self.crawl_facet(facet).await {
                        Ok(facet_stats) => stats.merge(&facet_stats),
                        Err(SweepError::Storage(e)) => return Err(SweepError::Storage(e)),
                        Err(e) => tracing::error!("Facet '{}' aborted: {}", facet.name, e),
                    }
                }
            }
        }

        stats.finish();
        Ok(stats)
    }

    /// Walks one facet on its own freshly negotiated session
    pub async fn crawl_facet(&self, facet: &Facet) -> Result<CrawlStatistics> {
        tracing::info!("Crawling facet '{}'", facet.name);

        let transport = HttpTransport::new(&self.config)?;
        let result = self.crawl_facet_with(&transport, facet).await;
        transport.close();
        result
    }

    async fn crawl_facet_with(
        &self,
        transport: &HttpTransport,
        facet: &Facet,
    ) -> Result<CrawlStatistics> {
        let (first_page, session) =
            negotiate(transport, &self.config.site, &facet.base_url).await?;
        tracing::debug!("Facet '{}' on session {}", facet.name, session.session_id);

        walk(
            transport,
            &self.sink,
            &facet.base_url,
            &facet.name,
            Some(first_page),
        )
        .await
    }
}

/// Finds a facet by display label, ignoring case
pub fn find_facet<'a>(facets: &'a [Facet], requested: &str) -> Option<&'a Facet> {
    let requested = requested.to_lowercase();
    facets
        .iter()
        .find(|facet| facet.name.to_lowercase() == requested)
}

fn facet_names(facets: &[Facet]) -> Vec<String> {
    facets.iter().map(|facet| facet.name.clone()).collect()
}

/// Runs a complete crawl
///
/// # Example
///
/// ```no_run
/// use facet_sweep::config::Config;
/// use facet_sweep::crawler::{run_crawl, CrawlMode};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_crawl(Config::default(), &CrawlMode::Targeted("used".into())).await?;
/// println!("{} records", stats.records_persisted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, mode: &CrawlMode) -> Result<CrawlStatistics> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(mode).await
}
