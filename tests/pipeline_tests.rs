//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to stand in for the directory site and the
//! metadata lookup API, and exercise the full crawl cycle end-to-end.

use podscout::config::{CategoryEntry, Config, CrawlerConfig, LookupConfig, OutputConfig};
use podscout::crawler::{
    enumerate_listing_pages, resolve_listing_page, Category, Coordinator, Fetcher,
};
use podscout::storage::{FeedStore, SqliteStore};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at a mock server
fn create_test_config(base_url: &str, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_delay_ms: 0, // No pacing in tests
            request_timeout_secs: 5,
            user_agent: "TestScout/1.0".to_string(),
        },
        lookup: LookupConfig {
            base_url: format!("{}/lookup", base_url),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
        categories: vec![CategoryEntry {
            name: "comedy".to_string(),
            url: format!("{}/genre/comedy?", base_url),
        }],
    }
}

fn test_crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        request_delay_ms: 0,
        request_timeout_secs: 5,
        user_agent: "TestScout/1.0".to_string(),
    }
}

fn listing_body(anchors: &str) -> String {
    format!(
        r#"<html><body><div id="selectedcontent">{}</div></body></html>"#,
        anchors
    )
}

#[tokio::test]
async fn test_end_to_end_discovery_and_dedup_across_restarts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every letter section serves the same single anchor; no pagination
    // control, so each letter has exactly one page.
    Mock::given(method("GET"))
        .and(path("/genre/comedy"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_body(r#"<a href="/id123456">A Show</a>"#)),
        )
        .mount(&mock_server)
        .await;

    // The identifier must be looked up exactly once across BOTH passes:
    // the second pass finds it in the cache and never calls the API.
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "123456"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultCount":1,"results":[{"feedUrl":"http://example.com/feed.xml"}]}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");
    let db_path_str = db_path.to_str().unwrap();

    // First pass
    {
        let config = create_test_config(&base_url, db_path_str);
        let mut coordinator = Coordinator::new(config, "hash-1".to_string()).unwrap();
        coordinator.run(false).await.expect("first pass failed");
    }

    // Second pass with a fresh process-equivalent (new coordinator, same DB)
    {
        let config = create_test_config(&base_url, db_path_str);
        let mut coordinator = Coordinator::new(config, "hash-1".to_string()).unwrap();
        coordinator.run(false).await.expect("second pass failed");
    }

    let store = SqliteStore::new(&db_path).expect("failed to reopen store");
    assert_eq!(store.count_feeds().unwrap(), 1);

    let record = store.get_feed("123456").unwrap().expect("record missing");
    assert_eq!(record.feed_url, "http://example.com/feed.xml");

    // Lookup expect(1) is verified when mock_server drops
}

#[tokio::test]
async fn test_server_error_skips_letters_without_aborting() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/genre/comedy"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // No listing page should ever lead to a lookup call
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"resultCount":0,"results":[]}"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");

    let config = create_test_config(&base_url, db_path.to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "hash".to_string()).unwrap();

    // Every letter fails with 500; the pass still completes cleanly
    coordinator.run(false).await.expect("pass should not abort");

    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.count_feeds().unwrap(), 0);
}

#[tokio::test]
async fn test_missing_content_container_is_surfaced_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Listing pages load fine but the expected container is gone, as after
    // a directory site redesign
    Mock::given(method("GET"))
        .and(path("/genre/comedy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><div id="redesigned"></div></body></html>"#),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"resultCount":0,"results":[]}"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");

    let config = create_test_config(&base_url, db_path.to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "hash".to_string()).unwrap();

    // Structural failures are logged as errors per page; the process itself
    // does not crash
    coordinator.run(false).await.expect("pass should not abort");

    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(store.count_feeds().unwrap(), 0);
}

#[tokio::test]
async fn test_enumerate_emits_page_count_refs_per_letter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Pagination control with 4 entries: 3 pages per letter
    Mock::given(method("GET"))
        .and(path("/genre/comedy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <ul class="paginate"><li>1</li><li>2</li><li>3</li><li>Next</li></ul>
            <div id="selectedcontent"></div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let mut fetcher = Fetcher::new(&test_crawler_config()).unwrap();
    let category = Category {
        name: "comedy".to_string(),
        url: format!("{}/genre/comedy?", base_url),
    };

    let pages = enumerate_listing_pages(&mut fetcher, &category)
        .await
        .unwrap();

    assert_eq!(pages.len(), 26 * 3);

    // First letter's refs are pages 1..=3 in order
    assert_eq!(pages[0].letter, 'A');
    assert_eq!(pages[0].page, 1);
    assert_eq!(pages[1].page, 2);
    assert_eq!(pages[2].page, 3);
    assert!(pages[0].url.ends_with("&letter=A&page=1"));
}

#[tokio::test]
async fn test_resolver_selection_policy_first_feed_url_bearing_result() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_body(r#"<a href="/id777">Show</a>"#)),
        )
        .mount(&mock_server)
        .await;

    // Two results reported; only the second carries a feed URL
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "777"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultCount":2,"results":[{},{"feedUrl":"http://example.com/second.xml"}]}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut fetcher = Fetcher::new(&test_crawler_config()).unwrap();

    let records = resolve_listing_page(
        &mut fetcher,
        &format!("{}/lookup", base_url),
        &format!("{}/page", base_url),
        |_| Ok(false),
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].podcast_id, "777");
    assert_eq!(records[0].feed_url, "http://example.com/second.xml");
}

#[tokio::test]
async fn test_known_identifiers_issue_no_lookup_calls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_body(
                r#"<a href="/id111">One</a><a href="/id222">Two</a>"#,
            )),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"resultCount":0,"results":[]}"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut fetcher = Fetcher::new(&test_crawler_config()).unwrap();

    let records = resolve_listing_page(
        &mut fetcher,
        &format!("{}/lookup", base_url),
        &format!("{}/page", base_url),
        |_| Ok(true), // Everything is already cached
    )
    .await
    .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_malformed_lookup_response_skips_identifier() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_body(
                r#"<a href="/id111">One</a><a href="/id222">Two</a>"#,
            )),
        )
        .mount(&mock_server)
        .await;

    // First identifier: body missing the required fields
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "111"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": true}"#))
        .mount(&mock_server)
        .await;

    // Second identifier resolves normally
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "222"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultCount":1,"results":[{"feedUrl":"http://example.com/two.xml"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let mut fetcher = Fetcher::new(&test_crawler_config()).unwrap();

    let records = resolve_listing_page(
        &mut fetcher,
        &format!("{}/lookup", base_url),
        &format!("{}/page", base_url),
        |_| Ok(false),
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].podcast_id, "222");
}

#[tokio::test]
async fn test_put_batch_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");

    {
        let mut store = SqliteStore::new(Path::new(&db_path)).unwrap();
        let run_id = store.create_run("hash").unwrap();
        store
            .put_batch(
                &[podscout::storage::FeedRecord {
                    podcast_id: "42".to_string(),
                    feed_url: "http://example.com/feed.xml".to_string(),
                }],
                run_id,
            )
            .unwrap();
        store.complete_run(run_id).unwrap();
    }

    let store = SqliteStore::new(Path::new(&db_path)).unwrap();
    assert!(store.exists("42").unwrap());
    assert_eq!(store.count_feeds().unwrap(), 1);
}
