//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small documentation site and run the
//! full crawl cycle end-to-end, writing into temporary directories.

use course_mirror::config::Config;
use course_mirror::crawler::{crawl, Coordinator};
use course_mirror::output::{export_results, REPORT_FILE_NAME};
use course_mirror::state::{CrawlState, PageState};
use course_mirror::url::CanonicalUrl;
use std::path::{Path, PathBuf};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at `{base}{start_path}`
fn create_test_config(base: &str, start_path: &str, output: &Path) -> Config {
    let mut config = Config::for_start(format!("{}{}", base, start_path));
    config.output.directory = output.display().to_string();
    config.crawler.timeout_secs = 5;
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>t</title></head><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn url(s: &str) -> CanonicalUrl {
    CanonicalUrl::parse(s).unwrap()
}

/// Directory the mirror uses for the mock server's host
fn host_dir(output: &Path, base: &str) -> PathBuf {
    let base = url(base);
    output.join(format!("{}-{}", base.scheme(), base.authority()))
}

async fn run(config: Config) -> CrawlState {
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");
    coordinator.into_state()
}

#[tokio::test]
async fn test_crawl_follows_in_scope_links_and_lists_external() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="/a/b">B</a>
                <a href="https://other.test/c">C</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(html_page(r#"<article class="content">leaf page</article>"#))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = run(create_test_config(&base, "/a/", dir.path())).await;

    let start = url(&format!("{}/a/", base));
    let leaf = url(&format!("{}/a/b", base));

    assert_eq!(state.link_count(), 2);
    assert_eq!(state.visited().len(), 2);
    assert_eq!(state.state_of(&start), Some(PageState::Visited));
    assert_eq!(state.state_of(&leaf), Some(PageState::Visited));
    assert_eq!(
        state.external().iter().map(|u| u.to_string()).collect::<Vec<_>>(),
        vec!["https://other.test/c".to_string()]
    );
    assert!(state.broken().is_empty());
    assert!(state.failed().is_empty());

    let hosts = host_dir(dir.path(), &base);
    assert_eq!(state.visited()[&start].path, hosts.join("a").join("index.html"));
    assert_eq!(state.visited()[&leaf].path, hosts.join("a").join("b.html"));
}

#[tokio::test]
async fn test_stored_page_is_main_content_only() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<header>site chrome</header>
               <article class="content"><p>lecture notes</p></article>
               <footer>footer chrome</footer>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let stats = crawl(create_test_config(&base, "/a/", dir.path()))
        .await
        .unwrap();
    assert_eq!(stats.downloaded, 1);
    assert_eq!(stats.mirror.written, 1);

    let stored = std::fs::read_to_string(host_dir(dir.path(), &base).join("a/index.html")).unwrap();
    assert!(stored.starts_with("<html><body>"));
    assert!(stored.ends_with("</body></html>"));
    assert!(stored.contains("lecture notes"));
    assert!(!stored.contains("site chrome"));
    assert!(!stored.contains("footer chrome"));
}

#[tokio::test]
async fn test_pdf_and_binary_stored_verbatim() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="notes.pdf">Notes</a>
                <a href="data">Data</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/notes.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 body".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let stats = crawl(create_test_config(&base, "/a/", dir.path()))
        .await
        .unwrap();
    assert_eq!(stats.downloaded, 3);

    let hosts = host_dir(dir.path(), &base);
    assert_eq!(
        std::fs::read(hosts.join("a/notes.pdf")).unwrap(),
        b"%PDF-1.4 body"
    );
    assert_eq!(std::fs::read(hosts.join("a/data.bin")).unwrap(), vec![0u8, 1, 2, 3]);
}

#[tokio::test]
async fn test_page_without_main_content_is_broken_but_followed() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<nav class="sidebar"><a href="/a/next">Next</a></nav>
               <div>no article here</div>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/next"))
        .respond_with(html_page(r#"<article class="content">next</article>"#))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = run(create_test_config(&base, "/a/", dir.path())).await;

    let start = url(&format!("{}/a/", base));
    let next = url(&format!("{}/a/next", base));

    assert_eq!(state.state_of(&start), Some(PageState::Broken));
    assert!(!state.visited().contains_key(&start));
    assert_eq!(state.state_of(&next), Some(PageState::Visited));
}

#[tokio::test]
async fn test_http_error_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="/a/missing">Missing</a>
                <a href="/a/ok">OK</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/ok"))
        .respond_with(html_page(r#"<article class="content">ok</article>"#))
        .mount(&mock_server)
        .await;

    // Unmatched requests get a 404 from the mock server.
    let dir = tempfile::tempdir().unwrap();
    let state = run(create_test_config(&base, "/a/", dir.path())).await;

    let missing = url(&format!("{}/a/missing", base));
    assert_eq!(state.state_of(&missing), Some(PageState::Failed));
    assert_eq!(state.failed().get(&missing).map(String::as_str), Some("HTTP 404"));
    assert_eq!(state.visited().len(), 2);
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .and(header("cookie", "userlang=en"))
        .respond_with(html_page(r#"<article class="content">english</article>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = run(create_test_config(&base, "/a/", dir.path())).await;

    assert_eq!(state.visited().len(), 1);
    assert!(state.failed().is_empty());
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<nav class="sidebar"><a href="/a/b">B</a><a href="/a/">Home</a></nav>
               <article class="content">
                <a href="b">B again</a>
                <a href="/a/b#section">B section</a>
                <a href="/a/b;jsessionid=1">B params</a>
            </article>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(html_page(
            r#"<nav class="sidebar"><a href="/a/">Home</a><a href="/a/b">Self</a></nav>
               <article class="content">b</article>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&base, "/a/", dir.path());
    config.crawler.max_concurrent_requests = 8;

    let state = run(config).await;

    assert_eq!(state.visited().len(), 2);
    assert_eq!(state.link_count(), 7);
    assert!(state.external().is_empty());
}

#[tokio::test]
async fn test_query_strings_map_to_distinct_files() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="page?week=1">Week 1</a>
                <a href="page?week=2">Week 2</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    for week in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/a/page"))
            .and(query_param("week", week))
            .respond_with(html_page(&format!(
                r#"<article class="content">week {}</article>"#,
                week
            )))
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let state = run(create_test_config(&base, "/a/", dir.path())).await;

    let week1 = url(&format!("{}/a/page?week=1", base));
    let week2 = url(&format!("{}/a/page?week=2", base));
    let path1 = state.visited()[&week1].path.clone();
    let path2 = state.visited()[&week2].path.clone();

    assert_ne!(path1, path2);
    assert!(state.collisions().is_empty());

    export_results(&state, dir.path()).unwrap();
    assert!(std::fs::read_to_string(path1).unwrap().contains("week 1"));
    assert!(std::fs::read_to_string(path2).unwrap().contains("week 2"));
}

#[tokio::test]
async fn test_scope_prefixes_limit_crawl() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/course/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="/course/lecture">Lecture</a>
                <a href="/admin/">Admin</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/course/lecture"))
        .respond_with(html_page(r#"<article class="content">lecture</article>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(html_page(r#"<article class="content">admin</article>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&base, "/course/", dir.path());
    config.scope.prefixes = vec![format!("{}/course", base)];

    let state = run(config).await;

    assert_eq!(state.visited().len(), 2);
    assert!(state.external().contains(&url(&format!("{}/admin/", base))));
}

#[tokio::test]
async fn test_max_pages_budget() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content"><a href="/a/b">B</a><a href="/a/c">C</a></article>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&base, "/a/", dir.path());
    config.crawler.max_pages = Some(1);

    let state = run(config).await;

    assert_eq!(state.visited().len(), 1);
    assert_eq!(state.pending_len(), 2);
}

#[tokio::test]
async fn test_report_written() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html_page(
            r#"<article class="content">
                <a href="/a/b">B</a>
                <a href="https://other.test/c">C</a>
            </article>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(html_page(r#"<article class="content">b</article>"#))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    crawl(create_test_config(&base, "/a/", dir.path()))
        .await
        .unwrap();

    let report = std::fs::read_to_string(dir.path().join(REPORT_FILE_NAME)).unwrap();
    let expected = format!(
        "The crawler found 2 links and downloaded 2 pages.\n\
         The following pages were downloaded and scanned:\n\
         \t{base}/a/\n\
         \t{base}/a/b\n\
         The following external pages were not downloaded or scanned:\n\
         \thttps://other.test/c\n\
         No broken local pages were found.\n\
         No pages failed to download.\n",
        base = base
    );
    assert_eq!(report, expected);
}
