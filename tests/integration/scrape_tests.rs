use page_scribe::config::{Config, DomainConfig, RuleConfig};
use page_scribe::{run_scrape, PageReport};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GUIDE: &str = r#"<html><head><title>Setup Guide</title></head><body>
<nav><a href="/nav-only">Menu</a></nav>
<article>
  <h1>Setup Guide</h1>
  <p>Install the tool first.</p>
  <pre><code class="language-sh">
    cargo install page-scribe
  </code></pre>
  <a href="/next">Next step</a>
  <a href="/admin/panel">Admin</a>
  <a href="https://elsewhere.org/">Elsewhere</a>
</article>
</body></html>"#;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

/// Creates a test configuration writing into `output`
fn create_test_config(output: &Path, seeds: Vec<String>) -> Config {
    let mut config = Config::default();
    config.crawler.seeds = seeds;
    config.crawler.parallel = 4;
    config.crawler.timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.directory = output.to_string_lossy().into_owned();
    config
}

fn host_of(uri: &str) -> String {
    url::Url::parse(uri)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

#[tokio::test]
async fn test_scrape_writes_artifact_and_reports_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(GUIDE))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let url = format!("{}/guide", server.uri());
    let config = create_test_config(out.path(), vec![url.clone()]);

    let reports = run_scrape(&config).await.unwrap();
    assert_eq!(reports.len(), 1);

    let PageReport::Saved { path, links, .. } = &reports[0] else {
        panic!("expected saved report, got {:?}", reports[0]);
    };
    assert_eq!(
        path,
        &out.path().join(host_of(&server.uri())).join("setup-guide.md")
    );
    assert_eq!(links, &vec![format!("{}/next", server.uri())]);

    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with(&format!("# Setup Guide\n\n## Metadata\n- URL: {}\n- Scraped: ", url)));
    assert!(content.contains("## Content\n# Setup Guide\n\nInstall the tool first.\n\n```sh\ncargo install page-scribe\n```"));
    assert!(content.contains("## Links\n\n[Next step](/next)\n[Admin](/admin/panel)\n[Elsewhere](https://elsewhere.org/)"));
    assert!(!content.contains("Menu"));
    assert_eq!(content.matches("# Setup Guide").count(), 2);
}

#[tokio::test]
async fn test_second_run_skips_until_forced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(GUIDE))
        .expect(2)
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let url = format!("{}/guide", server.uri());
    let mut config = create_test_config(out.path(), vec![url.clone()]);

    let first = run_scrape(&config).await.unwrap();
    assert!(first[0].is_saved());

    let second = run_scrape(&config).await.unwrap();
    assert_eq!(second, vec![PageReport::Skipped { url: url.clone() }]);

    config.output.force = true;
    let forced = run_scrape(&config).await.unwrap();
    assert!(forced[0].is_saved());
}

#[tokio::test]
async fn test_duplicate_seeds_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(GUIDE))
        .expect(1)
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let url = format!("{}/guide", server.uri());
    let config = create_test_config(
        out.path(),
        vec![url.clone(), format!("{}/guide/#intro", server.uri())],
    );

    let reports = run_scrape(&config).await.unwrap();
    let saved = reports.iter().filter(|r| r.is_saved()).count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r, PageReport::Skipped { .. }))
        .count();
    assert_eq!((saved, skipped), (1, 1));
}

#[tokio::test]
async fn test_failures_are_reported_per_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<html><head><title>Fine</title></head><body><p>ok</p></body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "application/pdf"))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let seeds = ["/ok", "/gone", "/file.pdf"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    let config = create_test_config(out.path(), seeds);

    let reports = run_scrape(&config).await.unwrap();
    assert!(reports[0].is_saved());
    assert!(matches!(&reports[1], PageReport::Failed { error, .. } if error.contains("404")));
    assert!(matches!(&reports[2], PageReport::Failed { error, .. } if error.contains("application/pdf")));
}

#[tokio::test]
async fn test_rules_and_domain_headers_applied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api-doc"))
        .and(header("x-token", "secret"))
        .and(header("cookie", "session=abc"))
        .respond_with(html(
            r#"<html><body><div class="doc-title">Reference</div><section class="body">Only this</section><p>noise</p></body></html>"#,
        ))
        .mount(&server)
        .await;

    let host = host_of(&server.uri());
    let out = TempDir::new().unwrap();
    let mut config = create_test_config(out.path(), vec![format!("{}/api-doc", server.uri())]);
    config.rules.insert(
        host.clone(),
        RuleConfig {
            title_pattern: Some(r#"<div class="doc-title">(.*?)</div>"#.to_string()),
            content_patterns: vec![r#"<section class="body">.*?</section>"#.to_string()],
            exclude_patterns: vec![],
        },
    );
    config.domains.insert(
        host.clone(),
        DomainConfig {
            headers: HashMap::from([("X-Token".to_string(), "secret".to_string())]),
            cookies: HashMap::from([("session".to_string(), "abc".to_string())]),
        },
    );

    let reports = run_scrape(&config).await.unwrap();
    let PageReport::Saved { path, .. } = &reports[0] else {
        panic!("expected saved report, got {:?}", reports[0]);
    };
    assert_eq!(path, &out.path().join(&host).join("reference.md"));

    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.ends_with("## Content\n<section class=\"body\">Only this</section>\n"));
}
