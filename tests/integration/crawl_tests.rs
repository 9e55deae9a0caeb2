//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the Share origin and run the
//! full bootstrap and fan-out cycle against a temporary cache directory.

use share_ratings::config::Config;
use share_ratings::crawler::{run_crawl, Coordinator, LinkMultiplicity};
use share_ratings::storage::CacheStore;
use share_ratings::ShareError;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const INDEX_PATH: &str = "/category/all";

/// Creates a test configuration pointed at the mock server
fn create_test_config(origin: &str, root: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.origin = origin.to_string();
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.cache.root = root.to_path_buf();
    config
}

/// Builds an index page with one marker node per slug
fn index_html(slugs: &[String]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><div class="nameWrap"><a href="/app/{slug}">{slug}</a></div></li>"#
            )
        })
        .collect();
    format!(
        "<html><head><title>All Apps</title></head><body><ul>{}</ul></body></html>",
        items
    )
}

fn slugs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Answers `/apps-url-map/<slug>` with a small record naming the slug
struct RecordResponder {
    delay: Option<Duration>,
}

impl Respond for RecordResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let slug = request.url.path().trim_start_matches("/apps-url-map/");
        let template = ResponseTemplate::new(200)
            .set_body_string(format!(r#"{{"name":"{slug}","votes":1}}"#));
        match self.delay {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

async fn mount_index(server: &MockServer, slugs: &[String]) {
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_html(slugs)))
        .mount(server)
        .await;
}

async fn mount_records(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/apps-url-map/[^/]+$"))
        .respond_with(RecordResponder { delay: None })
        .mount(server)
        .await;
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_caches_index_and_records() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_html(&slugs(&[
            "titans-of-space",
            "tuscany",
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_records(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let report = run_crawl(&config).await.expect("crawl failed");

    assert!(report.index_fetched);
    assert_eq!(report.links_found, 2);
    assert_eq!(report.fetched, 2);
    assert!(report.is_complete());

    let store = CacheStore::new(dir.path());
    assert!(store.exists("share_homepage.html"));
    assert_eq!(
        store.read("tuscany.json").unwrap(),
        br#"{"name":"tuscany","votes":1}"#
    );
    assert_eq!(
        store.list(".json").unwrap(),
        vec!["titans-of-space.json", "tuscany.json"]
    );
}

#[tokio::test]
async fn test_detail_paths_are_rewritten_and_index_is_not() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["foo"])).await;
    mount_records(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    run_crawl(&config).await.expect("crawl failed");

    let mut paths = request_paths(&mock_server).await;
    paths.sort();
    assert_eq!(paths, vec!["/apps-url-map/foo", INDEX_PATH]);
}

#[tokio::test]
async fn test_second_crawl_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["a", "b", "c"])).await;
    mount_records(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    run_crawl(&config).await.expect("first crawl failed");
    let after_first = request_paths(&mock_server).await.len();
    assert_eq!(after_first, 4);

    let report = run_crawl(&config).await.expect("second crawl failed");

    assert_eq!(request_paths(&mock_server).await.len(), after_first);
    assert!(!report.index_fetched);
    assert_eq!(report.cached, 3);
    assert_eq!(report.fetched, 0);
}

#[tokio::test]
async fn test_failed_fetch_is_contained() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["first", "second", "third"])).await;

    // The second record answers after the client has given up. Mocks are
    // matched in mount order, so this one shadows the generic responder.
    Mock::given(method("GET"))
        .and(path("/apps-url-map/second"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;
    mount_records(&mock_server).await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.crawler.request_timeout_secs = 1;

    let report = run_crawl(&config).await.expect("crawl should still return");

    let store = CacheStore::new(dir.path());
    assert!(store.exists("first.json"));
    assert!(!store.exists("second.json"));
    assert!(store.exists("third.json"));

    assert_eq!(report.fetched, 2);
    assert_eq!(report.failed_apps(), vec!["second"]);
    assert!(report.failures[0].error.is_transport());
}

#[tokio::test]
async fn test_failed_write_is_contained() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["first", "second", "third"])).await;
    mount_records(&mock_server).await;

    // A directory where the record should go is not a cache hit, and the
    // rename onto it fails.
    std::fs::create_dir(dir.path().join("second.json")).unwrap();

    let config = create_test_config(&mock_server.uri(), dir.path());
    let report = run_crawl(&config).await.expect("crawl should still return");

    assert_eq!(report.fetched, 2);
    assert_eq!(report.failed_apps(), vec!["second"]);
    assert!(matches!(
        report.failures[0].error,
        ShareError::Storage(_)
    ));
    assert!(!dir.path().join("second.json.part").exists());
}

#[tokio::test]
async fn test_index_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(index_html(&slugs(&["foo"])))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/apps-url-map/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.crawler.request_timeout_secs = 1;

    let err = run_crawl(&config).await.unwrap_err();

    assert!(err.is_transport());
    assert!(!dir.path().join("share_homepage.html").exists());
}

#[tokio::test]
async fn test_many_concurrent_records_are_byte_exact() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..64).map(|i| format!("app-{i:02}")).collect();
    mount_index(&mock_server, &names).await;
    mount_records(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let report = run_crawl(&config).await.expect("crawl failed");

    assert_eq!(report.fetched, names.len());
    let store = CacheStore::new(dir.path());
    for name in &names {
        let expected = format!(r#"{{"name":"{name}","votes":1}}"#);
        assert_eq!(
            store.read(&format!("{name}.json")).unwrap(),
            expected.as_bytes(),
            "content mismatch for {name}"
        );
    }
    assert_eq!(store.list(".part").unwrap(), Vec::<String>::new());
}

#[tokio::test]
async fn test_capped_concurrency_still_fetches_everything() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..10).map(|i| format!("app-{i}")).collect();
    mount_index(&mock_server, &names).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/apps-url-map/[^/]+$"))
        .respond_with(RecordResponder {
            delay: Some(Duration::from_millis(200)),
        })
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.crawler.max_concurrent_fetches = Some(2);

    let start = Instant::now();
    let report = run_crawl(&config).await.expect("crawl failed");

    assert_eq!(report.fetched, 10);
    // Ten delayed responses, two at a time, take at least five rounds.
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test]
async fn test_forced_refresh_refetches_cached_entries() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["foo"])).await;
    mount_records(&mock_server).await;

    let store = CacheStore::new(dir.path());
    store
        .write("share_homepage.html", index_html(&slugs(&["stale"])).as_bytes())
        .unwrap();
    store.write("foo.json", b"old").unwrap();

    let config = create_test_config(&mock_server.uri(), dir.path());
    let report = Coordinator::new(&config)
        .unwrap()
        .with_force_refresh(true)
        .run()
        .await
        .expect("crawl failed");

    assert!(report.index_fetched);
    assert_eq!(report.fetched, 1);
    assert_eq!(store.read("foo.json").unwrap(), br#"{"name":"foo","votes":1}"#);
    assert!(!store.exists("stale.json"));
}

#[tokio::test]
async fn test_per_child_multiplicity_fetches_each_app_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="nameWrap"><a href="/app/foo">Foo</a><span>by</span><em>x</em></div>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apps-url-map/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.extraction.link_multiplicity = LinkMultiplicity::PerChild;

    let report = run_crawl(&config).await.expect("crawl failed");

    assert_eq!(report.links_found, 3);
    assert_eq!(report.duplicates, 2);
    assert_eq!(report.fetched, 1);
}

#[tokio::test]
async fn test_non_success_body_is_cached() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_index(&mock_server, &slugs(&["gone"])).await;
    Mock::given(method("GET"))
        .and(path("/apps-url-map/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let report = run_crawl(&config).await.expect("crawl failed");

    assert!(report.is_complete());
    assert_eq!(
        CacheStore::new(dir.path()).read("gone.json").unwrap(),
        b"not found"
    );
}
