//! Listing crawler: letter and page enumeration for one category
//!
//! For each index letter A-Z, the first listing page is fetched and its
//! pagination control inspected to learn how many pages that letter section
//! has. A letter whose index page cannot be fetched is skipped with a
//! warning; partial category coverage is acceptable and never aborts the
//! crawl.

use crate::crawler::categories::{listing_page_url, Category};
use crate::crawler::fetcher::Fetcher;
use crate::Result;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PAGINATE_LI: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul.paginate li").expect("valid paginate selector"));

/// A fully formed reference to one listing page
///
/// Ephemeral: produced here, consumed once by the resolver, never persisted.
#[derive(Debug, Clone)]
pub struct ListingPageRef {
    pub category: String,
    pub letter: char,
    pub page: u32,
    pub url: String,
}

/// Enumerates all listing pages of a category
///
/// Returns a finite sequence ordered by letter, then page number.
pub async fn enumerate_listing_pages(
    fetcher: &mut Fetcher,
    category: &Category,
) -> Result<Vec<ListingPageRef>> {
    let mut pages = Vec::new();

    for letter in 'A'..='Z' {
        let index_url = listing_page_url(&category.url, letter, 1);

        let outcome = match fetcher.get(&index_url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("fetch failed for {}: {}", index_url, e);
                continue;
            }
        };

        if outcome.status != 200 {
            tracing::warn!("status code {} from {}", outcome.status, index_url);
            continue;
        }

        let count = page_count(&outcome.body);
        tracing::debug!(
            "category {} letter {}: {} page(s)",
            category.name,
            letter,
            count
        );

        for page in 1..=count {
            pages.push(ListingPageRef {
                category: category.name.clone(),
                letter,
                page,
                url: listing_page_url(&category.url, letter, page),
            });
        }
    }

    Ok(pages)
}

/// Derives the page count from a listing page's pagination control
///
/// The control is an unordered list with class `paginate` whose entries
/// include one boundary element, so `n` entries mean `n - 1` pages. A page
/// without the control has exactly one page.
pub fn page_count(html: &str) -> u32 {
    let document = Html::parse_document(html);
    let entries = document.select(&PAGINATE_LI).count();

    match entries {
        0 => 1,
        n => n as u32 - 1,
    }
}
