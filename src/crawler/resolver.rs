//! Podcast resolver: identifier extraction and metadata lookup
//!
//! One pass over a listing page: every anchor inside the content container
//! is examined for a trailing numeric identifier; identifiers already in the
//! identity cache are skipped without any network call; the rest are
//! resolved against the metadata lookup API and turned into feed records.
//!
//! A missing content container is a structural failure: it signals that the
//! directory site's markup no longer matches this parser, which likely
//! affects every subsequent page, so it propagates instead of being
//! swallowed like a transient fetch error.

use crate::crawler::fetcher::Fetcher;
use crate::storage::{FeedRecord, StorageResult};
use crate::{Result, ScoutError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

static CONTENT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#selectedcontent").expect("valid container selector"));

static ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static PODCAST_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"id(\d+)$").expect("valid identifier pattern"));

/// Metadata lookup response body
///
/// Both fields are required; a body missing either is malformed and the
/// identifier is skipped.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "resultCount")]
    result_count: i64,
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(rename = "feedUrl")]
    feed_url: Option<String>,
}

/// Resolves one listing page into feed records
///
/// `is_known` is the identity cache's existence predicate: identifiers it
/// answers `true` for are skipped before any lookup request is issued.
///
/// Errors: a non-200 listing page is [`ScoutError::ListingUnavailable`]
/// (transient); a missing content container is
/// [`ScoutError::StructuralParse`] (fatal for this page). Per-identifier
/// lookup failures are warnings, never errors.
pub async fn resolve_listing_page<F>(
    fetcher: &mut Fetcher,
    lookup_base: &str,
    page_url: &str,
    mut is_known: F,
) -> Result<Vec<FeedRecord>>
where
    F: FnMut(&str) -> StorageResult<bool>,
{
    let outcome = fetcher.get(page_url).await?;

    if outcome.status != 200 {
        return Err(ScoutError::ListingUnavailable {
            url: page_url.to_string(),
            status: outcome.status,
        });
    }

    let identifiers = extract_identifiers(&outcome.body, page_url)?;

    let mut records = Vec::new();

    for podcast_id in identifiers {
        if is_known(&podcast_id)? {
            tracing::debug!("identifier {} already cached, skipping lookup", podcast_id);
            continue;
        }

        if let Some(record) = lookup_feed(fetcher, lookup_base, &podcast_id).await {
            records.push(record);
        }
    }

    Ok(records)
}

/// Extracts podcast identifiers from the anchors inside the content container
///
/// Anchor order on the page is preserved. Anchors whose href does not end in
/// `id<digits>` are skipped with a warning.
fn extract_identifiers(html: &str, page_url: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let container = document
        .select(&CONTENT_CONTAINER)
        .next()
        .ok_or_else(|| ScoutError::StructuralParse {
            url: page_url.to_string(),
            message: "content container #selectedcontent not found".to_string(),
        })?;

    let mut identifiers = Vec::new();

    for anchor in container.select(&ANCHORS) {
        let href = anchor.value().attr("href").unwrap_or_default();

        match extract_podcast_id(href) {
            Some(id) => identifiers.push(id.to_string()),
            None => tracing::warn!("unable to parse identifier from {}", href),
        }
    }

    Ok(identifiers)
}

/// Parses the trailing `id<digits>` suffix from an anchor href
pub fn extract_podcast_id(href: &str) -> Option<&str> {
    PODCAST_ID
        .captures(href)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Resolves a single identifier via the metadata lookup API
///
/// Every failure mode here is per-identifier and non-fatal: transient fetch
/// errors, non-200 responses, malformed bodies, and result sets without a
/// feed URL all log a warning and yield `None`.
async fn lookup_feed(
    fetcher: &mut Fetcher,
    lookup_base: &str,
    podcast_id: &str,
) -> Option<FeedRecord> {
    let lookup_url = format!("{}?id={}", lookup_base, podcast_id);

    let outcome = match fetcher.get(&lookup_url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("lookup fetch failed for {}: {}", lookup_url, e);
            return None;
        }
    };

    if outcome.status != 200 {
        tracing::warn!("status code {} from {}", outcome.status, lookup_url);
        return None;
    }

    let response: LookupResponse = match serde_json::from_str(&outcome.body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("malformed lookup response from {}: {}", lookup_url, e);
            return None;
        }
    };

    if response.result_count != 1 {
        tracing::warn!(
            "expected exactly 1 result for identifier {}, got {}",
            podcast_id,
            response.result_count
        );
    }

    match first_feed_url(response.results) {
        Some(feed_url) => Some(FeedRecord {
            podcast_id: podcast_id.to_string(),
            feed_url,
        }),
        None => {
            tracing::warn!("no result with a feed URL for identifier {}", podcast_id);
            None
        }
    }
}

/// Selection policy: the first result bearing a feed URL wins, and no
/// further results are examined after a hit. At most one record per
/// identifier.
fn first_feed_url(results: Vec<LookupResult>) -> Option<String> {
    results.into_iter().find_map(|result| result.feed_url)
}
