//! Crawl coordinator - drives the category → listing → resolver pipeline
//!
//! A pass walks every category, enumerates its listing pages, resolves each
//! page with the identity cache's existence check as the dedup predicate,
//! and batches the resulting feed records into the cache. Daemon mode
//! repeats passes until a stop is requested; listing enumeration is
//! re-derived from scratch every pass, and only identifier-level dedup
//! keeps repeat passes cheap.

use crate::config::Config;
use crate::crawler::categories::{categories_from_config, Category};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::{enumerate_listing_pages, ListingPageRef};
use crate::crawler::resolver::resolve_listing_page;
use crate::storage::{open_storage, FeedStore, SqliteStore};
use crate::{Result, ScoutError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    config_hash: String,
    store: SqliteStore,
    fetcher: Fetcher,
    categories: Vec<Category>,
    stop: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a new coordinator: opens the identity cache and builds the
    /// rate-limited fetcher
    pub fn new(config: Config, config_hash: String) -> Result<Self> {
        let store = open_storage(Path::new(&config.output.database_path))?;
        let fetcher = Fetcher::new(&config.crawler)?;
        let categories = categories_from_config(&config.categories);

        Ok(Self {
            config,
            config_hash,
            store,
            fetcher,
            categories,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for requesting a stop; checked once per full pass
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the crawl: one pass, or passes forever in daemon mode
    pub async fn run(&mut self, daemon: bool) -> Result<()> {
        loop {
            self.run_pass().await?;

            if !daemon {
                break;
            }

            if self.stop.load(Ordering::Relaxed) {
                tracing::info!("stop requested, leaving daemon loop");
                break;
            }
        }

        Ok(())
    }

    /// Runs a single crawl pass over all categories
    pub async fn run_pass(&mut self) -> Result<()> {
        let run_id = self.store.create_run(&self.config_hash)?;
        let start = std::time::Instant::now();

        tracing::info!("Starting crawl pass (run {})", run_id);

        match self.crawl_categories(run_id).await {
            Ok(()) => {
                let new_feeds = self.store.count_feeds_for_run(run_id)?;
                let total = self.store.count_feeds()?;
                self.store.complete_run(run_id)?;

                tracing::info!(
                    "Pass complete: {} new feeds in {:?}, {} total cached",
                    new_feeds,
                    start.elapsed(),
                    total
                );
                Ok(())
            }
            Err(e) => {
                self.store.fail_run(run_id)?;
                Err(e)
            }
        }
    }

    async fn crawl_categories(&mut self, run_id: i64) -> Result<()> {
        for category in self.categories.clone() {
            tracing::info!("Crawling category: {}", category.name);

            let pages = enumerate_listing_pages(&mut self.fetcher, &category).await?;
            tracing::info!("category {}: {} listing page(s)", category.name, pages.len());

            for page in pages {
                match self.resolve_page(&page, run_id).await {
                    Ok(inserted) => {
                        if inserted > 0 {
                            tracing::debug!(
                                "{} letter {} page {}: {} new feed(s)",
                                page.category,
                                page.letter,
                                page.page,
                                inserted
                            );
                        }
                    }
                    // Structural failures mean the site layout no longer
                    // matches the parser; surface them loudly but keep
                    // walking the remaining pages.
                    Err(e) if e.is_structural() => {
                        tracing::error!("structural failure on {}: {}", page.url, e);
                    }
                    // Storage problems are not per-page conditions; abort
                    // the pass.
                    Err(e @ ScoutError::Storage(_)) | Err(e @ ScoutError::Database(_)) => {
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!("skipping listing page {}: {}", page.url, e);
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolves one listing page and persists its new records as a batch
    async fn resolve_page(&mut self, page: &ListingPageRef, run_id: i64) -> Result<usize> {
        let store = &self.store;

        let records = resolve_listing_page(
            &mut self.fetcher,
            &self.config.lookup.base_url,
            &page.url,
            |id| store.exists(id),
        )
        .await?;

        if records.is_empty() {
            return Ok(0);
        }

        let inserted = self.store.put_batch(&records, run_id)?;
        Ok(inserted)
    }
}

/// Runs the crawl: single pass, or looping forever in daemon mode
pub async fn run_crawl(config: Config, config_hash: String, daemon: bool) -> Result<()> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run(daemon).await
}
