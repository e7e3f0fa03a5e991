//! Full runs: adapters, fetcher and JSON output together

use crate::common::{source, test_config};
use espectro_crawler::config::AdapterKind;
use espectro_crawler::crawler;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const G1_HOMEPAGE: &str = r#"
<html><body>
  <div class="feed-post">
    <img class="bstn-fd-picture-image" src="/img/1.jpg">
    <div class="feed-post-body">
      <a class="feed-post-link" href="/politica/primeira.ghtml">Primeira notícia do dia</a>
      <div class="feed-post-body-resumo">Resumo da primeira.</div>
    </div>
  </div>
  <div class="feed-post">
    <div class="feed-post-body">
      <a class="feed-post-link" href="/economia/segunda.ghtml">Segunda notícia do dia</a>
    </div>
  </div>
</body></html>
"#;

const G1_ARTICLE: &str = r#"
<html><body>
  <h1 class="content-head__title">Primeira notícia do dia, atualizada</h1>
  <h2 class="content-head__subtitle">Subtítulo completo.</h2>
  <p class="content-publication-data__from">Por Redação</p>
  <time datetime="2026-01-05T10:00:00Z">05/01/2026</time>
  <div class="mc-article-body"><p>Corpo da matéria.</p></div>
</body></html>
"#;

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_run_writes_listing_articles() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", G1_HOMEPAGE).await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 3, output_dir.path().to_str().unwrap());
    config.sources = vec![source("g1", &mock_server.uri(), AdapterKind::G1)];

    let summary = crawler::run(&config, "testhash", None).await.unwrap();

    assert_eq!(summary.sources.len(), 1);
    assert_eq!(summary.total_articles(), 2);
    assert_eq!(summary.fetch.fetched, 1);

    let path = summary.sources[0].output_path.as_ref().expect("file written");
    let written = read_json(path);
    assert_eq!(written["source"], "G1");
    assert_eq!(written["article_count"], 2);
    assert_eq!(written["config_hash"], "testhash");
    assert_eq!(written["data_lite_mode"], true);

    let first = &written["articles"][0];
    assert_eq!(first["title"], "Primeira notícia do dia");
    assert_eq!(
        first["url"],
        format!("{}/politica/primeira.ghtml", mock_server.uri())
    );
    assert_eq!(first["snippet"], "Resumo da primeira.");
    // Data-lite drops the image found on the homepage
    assert!(first["image_url"].is_null());
    assert!(first["full_text"].is_null());
}

#[tokio::test]
async fn test_run_with_details_and_images() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", G1_HOMEPAGE).await;
    mount_page(&mock_server, "/politica/primeira.ghtml", G1_ARTICLE).await;

    // The second article page fails every attempt and keeps its listing data
    Mock::given(method("GET"))
        .and(path("/economia/segunda.ghtml"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 2, output_dir.path().to_str().unwrap());
    config.crawler.fetch_details = true;
    config.output.data_lite = false;
    config.sources = vec![source("g1", &mock_server.uri(), AdapterKind::G1)];

    let summary = crawler::run(&config, "testhash", None).await.unwrap();

    assert_eq!(summary.total_articles(), 2);
    assert_eq!(summary.fetch.fetched, 2);
    assert_eq!(summary.fetch.exhausted, 1);

    let written = read_json(summary.sources[0].output_path.as_ref().unwrap());
    let first = &written["articles"][0];
    assert_eq!(first["title"], "Primeira notícia do dia, atualizada");
    assert_eq!(first["snippet"], "Subtítulo completo.");
    assert_eq!(first["author"], "Por Redação");
    assert_eq!(first["full_text"], "Corpo da matéria.");
    assert_eq!(first["published_at"], "2026-01-05T10:00:00Z");
    assert_eq!(
        first["image_url"],
        format!("{}/img/1.jpg", mock_server.uri())
    );

    let second = &written["articles"][1];
    assert_eq!(second["title"], "Segunda notícia do dia");
    assert!(second["full_text"].is_null());
}

#[tokio::test]
async fn test_denied_homepage_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: TestBot\nDisallow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(G1_HOMEPAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 3, output_dir.path().to_str().unwrap());
    config.sources = vec![source("g1", &mock_server.uri(), AdapterKind::G1)];

    let summary = crawler::run(&config, "testhash", None).await.unwrap();

    assert_eq!(summary.total_articles(), 0);
    assert_eq!(summary.fetch.denied, 1);
    assert_eq!(summary.empty_sources(), vec!["g1"]);
    assert!(summary.sources[0].output_path.is_none());
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unreachable_source_does_not_stop_the_run() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", G1_HOMEPAGE).await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 2, output_dir.path().to_str().unwrap());
    config.sources = vec![
        source("dead", "http://127.0.0.1:1", AdapterKind::Folha),
        source("g1", &mock_server.uri(), AdapterKind::G1),
    ];

    let summary = crawler::run(&config, "testhash", None).await.unwrap();

    assert_eq!(summary.sources[0].articles, 0);
    assert_eq!(summary.sources[1].articles, 2);
    assert_eq!(summary.fetch.exhausted, 1);
    assert_eq!(summary.fetch.attempts, 3);
}

#[tokio::test]
async fn test_single_source_selection() {
    let g1_server = MockServer::start().await;
    mount_robots(&g1_server, "User-agent: *\nAllow: /").await;
    mount_page(&g1_server, "/", G1_HOMEPAGE).await;

    let other_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 3, output_dir.path().to_str().unwrap());
    config.sources = vec![
        source("folha", &other_server.uri(), AdapterKind::Folha),
        source("g1", &g1_server.uri(), AdapterKind::G1),
    ];

    let summary = crawler::run(&config, "testhash", Some("G1")).await.unwrap();

    assert_eq!(summary.sources.len(), 1);
    assert_eq!(summary.sources[0].key, "g1");
}

#[tokio::test]
async fn test_parallel_sources() {
    let folha = MockServer::start().await;
    mount_robots(&folha, "User-agent: *\nAllow: /").await;
    mount_page(
        &folha,
        "/",
        r#"<div class="c-headline"><a class="c-headline__url" href="/poder/x.shtml"><h2>Manchete da Folha</h2></a></div>"#,
    )
    .await;

    let estadao = MockServer::start().await;
    mount_robots(&estadao, "User-agent: *\nAllow: /").await;
    mount_page(
        &estadao,
        "/",
        r#"<div class="noticia"><a href="/politica/y/"><h3>Manchete longa do Estadão de hoje</h3></a></div>"#,
    )
    .await;

    let output_dir = TempDir::new().unwrap();
    let mut config = test_config(0.0, 3, output_dir.path().to_str().unwrap());
    config.crawler.parallel_sources = true;
    config.sources = vec![
        source("folha", &folha.uri(), AdapterKind::Folha),
        source("estadao", &estadao.uri(), AdapterKind::Estadao),
    ];

    let summary = crawler::run(&config, "testhash", None).await.unwrap();

    let keys: Vec<&str> = summary.sources.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["folha", "estadao"]);
    assert_eq!(summary.total_articles(), 2);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 2);
}
