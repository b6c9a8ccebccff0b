//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use std::sync::Arc;
use sumi_crawl::config::{Config, OutputFormat};
use sumi_crawl::crawler::{crawl, Scheduler};
use sumi_crawl::output::Termination;
use sumi_crawl::state::PageState;
use sumi_crawl::storage::{MemorySink, PageSink, SqliteSink};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(max_pages: usize, workers: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.worker_count = workers;
    config.crawler.crawl_timeout_secs = 30;
    config.crawler.fetch_timeout_secs = 5;
    config.crawler.robots_timeout_secs = 5;
    config.crawler.idle_backoff_ms = 20;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.contact_url = "https://example.com/contact".to_string();
    config
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn html_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/",
        html_with_links(&["/page1.html", "/docs/", "/image.png", "mailto:a@b.c"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1.html",
        html_with_links(&["/", "/docs/"]),
    )
    .await;
    mount_page(&mock_server, "/docs/", html_with_links(&["/missing.html"])).await;
    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::with_http(&create_test_config(100, 3), sink.clone())
        .expect("Failed to build scheduler");

    let seed = format!("{}/", base_url);
    let report = scheduler.run(&seed).await;

    assert_eq!(report.termination, Termination::Exhausted);
    assert_eq!(report.admitted, 4);
    assert_eq!(report.completed, 4);
    assert_eq!(report.stored, 3);
    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.unclaimed, 0);
    assert_eq!(report.hosts_checked, 1);

    let failure = &report.failures[0];
    assert_eq!(failure.url, format!("{}/missing.html", base_url));
    assert_eq!(failure.state, PageState::FetchFailed);

    let mut stored = sink.urls();
    stored.sort();
    let mut expected = vec![
        format!("{}/", base_url),
        format!("{}/docs/", base_url),
        format!("{}/page1.html", base_url),
    ];
    expected.sort();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_robots_disallow_all_skips_host() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("never fetched"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::with_http(&create_test_config(10, 2), sink.clone())
        .expect("Failed to build scheduler");

    let report = scheduler.run(&format!("{}/", mock_server.uri())).await;

    assert_eq!(report.termination, Termination::Exhausted);
    assert_eq!(report.admitted, 1);
    assert_eq!(report.disallowed, 1);
    assert_eq!(report.stored, 0);
    assert!(sink.urls().is_empty());
}

#[tokio::test]
async fn test_robots_group_for_our_agent() {
    let mock_server = MockServer::start().await;

    mount_robots(
        &mock_server,
        "User-agent: OtherBot\nDisallow:\n\nUser-agent: TestBot\nDisallow: /\n",
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::with_http(&create_test_config(10, 1), sink.clone())
        .expect("Failed to build scheduler");

    let report = scheduler.run(&format!("{}/", mock_server.uri())).await;

    assert_eq!(report.disallowed, 1);
    assert!(sink.urls().is_empty());
}

#[tokio::test]
async fn test_partial_disallow_does_not_exclude_host() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/").await;
    mount_page(&mock_server, "/", html_with_links(&["/private/page.html"])).await;
    mount_page(&mock_server, "/private/page.html", "private".to_string()).await;

    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::with_http(&create_test_config(10, 2), sink.clone())
        .expect("Failed to build scheduler");

    let report = scheduler.run(&format!("{}/", mock_server.uri())).await;

    assert_eq!(report.stored, 2);
    assert_eq!(report.disallowed, 0);
}

#[tokio::test]
async fn test_missing_robots_allows_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "<html>no links</html>".to_string()).await;

    let sink = Arc::new(MemorySink::new());
    let scheduler = Scheduler::with_http(&create_test_config(10, 1), sink.clone())
        .expect("Failed to build scheduler");

    let report = scheduler.run(&format!("{}/", mock_server.uri())).await;

    assert_eq!(report.stored, 1);
    assert_eq!(report.disallowed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_budget_bounds_sqlite_output() {
    let mock_server = MockServer::start().await;

    let children: Vec<String> = (0..10).map(|i| format!("/p{}.html", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", html_with_links(&child_refs)).await;
    for child in &children {
        mount_page(&mock_server, child, html_with_links(&["/"])).await;
    }

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("pages.db");
    let sink = Arc::new(SqliteSink::new(&db_path).expect("Failed to open sqlite sink"));

    let scheduler = Scheduler::with_http(&create_test_config(4, 4), sink.clone())
        .expect("Failed to build scheduler");
    let report = scheduler.run(&format!("{}/", mock_server.uri())).await;

    assert_eq!(report.admitted, 4);
    assert!(report.budget_exhausted());
    assert_eq!(report.stored, 4);
    assert_eq!(sink.count_pages().expect("Failed to count pages"), 4);
}

#[tokio::test]
async fn test_crawl_entry_point_writes_text_file() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_with_links(&["/about.html"])).await;
    mount_page(&mock_server, "/about.html", "About us".to_string()).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out_path = dir.path().join("crawled_pages.txt");

    let mut config = create_test_config(10, 2);
    config.output.format = OutputFormat::Text;
    config.output.path = out_path.to_string_lossy().into_owned();

    let report = crawl(&config, &format!("{}/", mock_server.uri()))
        .await
        .expect("Crawl failed");
    assert_eq!(report.stored, 2);

    let content = std::fs::read_to_string(Path::new(&out_path)).expect("Failed to read output");
    assert!(content.contains(&format!("URL: {}/about.html\nAbout us\n\n", mock_server.uri())));
    assert_eq!(content.matches("URL: ").count(), 2);
}

#[tokio::test]
async fn test_crawl_rejects_bad_seed() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = create_test_config(10, 1);
    config.output.path = dir.path().join("out.txt").to_string_lossy().into_owned();

    assert!(crawl(&config, "ftp://example.com/").await.is_err());
}

#[test]
fn test_sink_trait_object_is_shareable() {
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}
    assert_send_sync::<dyn PageSink>();
}
