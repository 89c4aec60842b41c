//! Crawler module: the category → listing → resolver pipeline
//!
//! This module contains the core crawling logic, including:
//! - The rate-limited HTTP fetcher
//! - Listing page enumeration per category letter section
//! - Podcast identifier resolution against the metadata lookup API
//! - Overall crawl coordination and daemon mode

mod categories;
mod coordinator;
mod fetcher;
mod listing;
mod resolver;

pub use categories::{builtin_categories, categories_from_config, listing_page_url, Category};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{FetchOutcome, Fetcher};
pub use listing::{enumerate_listing_pages, page_count, ListingPageRef};
pub use resolver::{extract_podcast_id, resolve_listing_page};
