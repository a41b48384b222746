//! Integration tests for the archiver
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl, persistence and update cycle end-to-end against a temp directory.

use chrono::Utc;
use kete::config::Config;
use kete::crawler::{build_archiver, HttpArchiver};
use kete::state::{LastRun, RunKind};
use kete::update::HttpUpdater;
use kete::{ArchiveStore, CrawlTarget, KeteError, ScopeRule, UpdateOutcome};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at a mock server
fn create_test_config(base_url: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.archive.output_dir = output.display().to_string();
    config.archive.start_url = format!("{}/", base_url);
    config.crawler.request_delay_ms = 0; // No politeness delay in tests
    config.crawler.request_timeout_secs = 5;
    config
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

fn pdf(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes.to_vec())
        .insert_header("content-type", "application/pdf")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn test_archiver(config: &Config) -> HttpArchiver {
    let store = ArchiveStore::open(&config.archive.output_dir).expect("Failed to open store");
    build_archiver(config, store).expect("Failed to build archiver")
}

#[tokio::test]
async fn test_end_to_end_archive() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html(r#"<html><body><a href="/a.html">A</a><a href="/b.pdf">B</a></body></html>"#),
    )
    .await;
    mount_page(&mock_server, "/a.html", html("<html><body>A</body></html>")).await;
    mount_page(&mock_server, "/b.pdf", pdf(b"%PDF-fake")).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let updater = HttpUpdater::from_config(config).expect("Failed to build updater");

    let outcome = updater.run_update(true).await.expect("Update failed");

    let UpdateOutcome::Updated {
        crawl, extraction, ..
    } = outcome
    else {
        panic!("expected an update, got {:?}", outcome);
    };
    assert_eq!(crawl.visited, 3);
    assert_eq!(crawl.html_saved, 2);
    assert_eq!(crawl.pdfs_saved, 1);
    assert_eq!(extraction.extracted, 1);

    assert!(dir.path().join("html/index.html").exists());
    assert!(dir.path().join("html/a.html").exists());
    assert_eq!(
        std::fs::read(dir.path().join("pdfs/b.pdf")).unwrap(),
        b"%PDF-fake"
    );
    // The fake PDF yields no text, but the text file is still written
    assert!(dir.path().join("pdf_text/b.txt").exists());

    let stamp: i64 = std::fs::read_to_string(dir.path().join("last_scrape.txt"))
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert!((Utc::now().timestamp() - stamp).abs() < 5);
}

#[tokio::test]
async fn test_pdf_not_rewritten_on_second_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html(r#"<a href="/form.pdf">Form</a>"#)).await;
    mount_page(&mock_server, "/form.pdf", pdf(b"%PDF-first")).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&config.archive.start_url).unwrap();
    let scope = ScopeRule::same_domain(&start);

    let first = archiver.run(start.clone(), &scope).await.unwrap();
    let pdf_path = dir.path().join("pdfs/form.pdf");
    let mtime = std::fs::metadata(&pdf_path).unwrap().modified().unwrap();

    let second = archiver.run(start, &scope).await.unwrap();

    assert_eq!(first.pdfs_saved, 1);
    assert_eq!(second.pdfs_saved, 0);
    assert_eq!(second.pdfs_skipped, 1);
    assert_eq!(
        std::fs::metadata(&pdf_path).unwrap().modified().unwrap(),
        mtime
    );
}

#[tokio::test]
async fn test_breadth_first_order() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/a.html",
        html(r#"<a href="b.html">B</a><a href="c.html">C</a>"#),
    )
    .await;
    mount_page(&mock_server, "/b.html", html(r#"<a href="d.html">D</a>"#)).await;
    mount_page(&mock_server, "/c.html", html("C")).await;
    mount_page(&mock_server, "/d.html", html("D")).await;

    let config = create_test_config(&base, dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&format!("{}/a.html", base)).unwrap();
    let scope = ScopeRule::same_domain(&start);

    let report = archiver.run(start, &scope).await.unwrap();

    let expected: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|page| format!("{}/{}.html", base, page))
        .collect();
    assert_eq!(report.visited_urls, expected);
}

#[tokio::test]
async fn test_external_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html(format!(
            r#"<a href="{}/elsewhere.html">Elsewhere</a>"#,
            external_server.uri()
        )),
    )
    .await;

    // Verified when the server is dropped
    Mock::given(method("GET"))
        .respond_with(html("external"))
        .expect(0)
        .mount(&external_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&config.archive.start_url).unwrap();
    let scope = ScopeRule::same_domain(&start);

    let report = archiver.run(start, &scope).await.unwrap();
    assert_eq!(report.visited, 1);
}

#[tokio::test]
async fn test_category_scope_excludes_sibling_category() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/map/card-services/index.html",
        html(
            r#"<a href="/map/card-services/eligibility.html">In</a>
               <a href="/map/deskfile/index.html">Out</a>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/map/card-services/eligibility.html"))
        .respond_with(html("eligibility"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/map/deskfile/index.html"))
        .respond_with(html("deskfile"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base, dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&format!("{}/map/card-services/index.html", base)).unwrap();
    let scope = ScopeRule::category(&start);

    archiver.run(start, &scope).await.unwrap();

    assert!(dir
        .path()
        .join("html/map/card-services/eligibility.html")
        .exists());
    assert!(!dir.path().join("html/map/deskfile").exists());
}

#[tokio::test]
async fn test_fragment_variants_fetched_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/a.html#intro">A</a><a href="/a.html#details">A</a><a href="/a.html">A</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.html"))
        .respond_with(html("A"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&config.archive.start_url).unwrap();
    let scope = ScopeRule::same_domain(&start);

    let report = archiver.run(start, &scope).await.unwrap();
    assert_eq!(report.visited, 2);
}

#[tokio::test]
async fn test_http_errors_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/gone.html">Gone</a><a href="/broken.html">Broken</a><a href="/ok.html">OK</a>"#),
    )
    .await;
    mount_page(&mock_server, "/gone.html", ResponseTemplate::new(404)).await;
    mount_page(&mock_server, "/broken.html", ResponseTemplate::new(500)).await;
    mount_page(&mock_server, "/ok.html", html("fine")).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let archiver = test_archiver(&config);
    let start = CrawlTarget::parse(&config.archive.start_url).unwrap();
    let scope = ScopeRule::same_domain(&start);

    let report = archiver.run(start, &scope).await.unwrap();

    assert_eq!(report.visited, 4);
    assert_eq!(report.failures, 2);
    assert!(dir.path().join("html/ok.html").exists());
    assert!(!dir.path().join("html/gone.html").exists());
}

#[tokio::test]
async fn test_current_archive_is_not_crawled() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(html("home"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let updater = HttpUpdater::from_config(config).unwrap();
    updater.last_run(RunKind::FullSite).record_now().unwrap();

    let outcome = updater.run_update(false).await.unwrap();
    assert_eq!(outcome, UpdateOutcome::AlreadyCurrent);
}

#[tokio::test]
async fn test_category_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/map/index.html",
        html(
            r#"<a href="/map/income-support/index.html">Income support</a>
               <a href="/map/card-services/index.html">Card services</a>
               <a href="/map/index.html">Home</a>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/map/card-services/index.html",
        html(r#"<a href="/map/card-services/form.pdf">Form</a>"#),
    )
    .await;
    mount_page(&mock_server, "/map/card-services/form.pdf", pdf(b"%PDF-card")).await;
    mount_page(&mock_server, "/map/income-support/index.html", html("income")).await;

    let mut config = create_test_config(&base, dir.path());
    config.archive.start_url = format!("{}/map/index.html", base);
    let updater = HttpUpdater::from_config(config).unwrap();

    let outcome = updater.run_categories().await.unwrap();

    let UpdateOutcome::Updated {
        kind, categories, crawl, ..
    } = outcome
    else {
        panic!("expected an update, got {:?}", outcome);
    };
    assert_eq!(kind, RunKind::Category);
    assert_eq!(
        categories,
        vec![
            format!("{}/map/card-services/index.html", base),
            format!("{}/map/income-support/index.html", base),
        ]
    );
    assert_eq!(crawl.pdfs_saved, 1);
    assert!(dir.path().join("pdfs/form.pdf").exists());
    assert!(dir.path().join("html/map/income-support/index.html").exists());
    assert!(LastRun::for_kind(dir.path(), RunKind::Category).read().is_some());
    assert!(LastRun::for_kind(dir.path(), RunKind::FullSite).read().is_none());
}

#[tokio::test]
async fn test_category_crawl_fails_without_navigation_page() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/map/index.html", ResponseTemplate::new(500)).await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.archive.start_url = format!("{}/map/index.html", mock_server.uri());
    let updater = HttpUpdater::from_config(config).unwrap();

    let result = updater.run_categories().await;

    assert!(matches!(result, Err(KeteError::Navigation { .. })));
    assert!(!dir.path().join("last_nav_scrape.txt").exists());
}

#[tokio::test]
async fn test_shared_page_fetched_once_per_category() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/map/index.html",
        html(r#"<a href="/map/a.html">A</a><a href="/map/b.html">B</a>"#),
    )
    .await;
    mount_page(&mock_server, "/map/a.html", html(r#"<a href="/map/shared.html">S</a>"#)).await;
    mount_page(&mock_server, "/map/b.html", html(r#"<a href="/map/shared.html">S</a>"#)).await;

    // Each category keeps its own visited-set
    Mock::given(method("GET"))
        .and(path("/map/shared.html"))
        .respond_with(html("shared"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base, dir.path());
    config.archive.start_url = format!("{}/map/index.html", base);
    let updater = HttpUpdater::from_config(config).unwrap();

    let outcome = updater.run_categories().await.unwrap();

    let UpdateOutcome::Updated {
        categories, crawl, ..
    } = outcome
    else {
        panic!("expected an update, got {:?}", outcome);
    };
    assert_eq!(categories.len(), 2);
    assert_eq!(crawl.visited, 4);
    assert!(dir.path().join("html/map/shared.html").exists());
}

#[tokio::test]
async fn test_extensionless_page_with_children() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html(r#"<a href="/about">About</a>"#)).await;
    mount_page(
        &mock_server,
        "/about",
        html(r#"<a href="/about/team.html">Team</a><a href="/z.html">Z</a>"#),
    )
    .await;
    mount_page(&mock_server, "/about/team.html", html("team")).await;
    mount_page(&mock_server, "/z.html", html("z")).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let updater = HttpUpdater::from_config(config).unwrap();

    let outcome = updater.run_update(true).await.expect("Update failed");

    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    let html_root = dir.path().join("html");
    assert!(html_root.join("about/index.html").is_file());
    assert!(html_root.join("about/team.html").is_file());
    assert!(html_root.join("z.html").is_file());
    assert!(LastRun::for_kind(dir.path(), RunKind::FullSite).read().is_some());
}
