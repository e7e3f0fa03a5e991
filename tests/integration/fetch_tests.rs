//! Resilient fetcher behavior: denial, retries, rate limiting

use crate::common::test_config;
use espectro_crawler::crawler::{FailureKind, FetchOutcome, ResilientFetcher};
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn url(server: &MockServer, page: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), page)).unwrap()
}

#[tokio::test]
async fn test_disallowed_path_is_never_requested() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/").await;

    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();

    let outcome = fetcher.fetch_outcome(&url(&mock_server, "/private/page")).await;

    assert!(outcome.is_denied());
    let stats = fetcher.stats();
    assert_eq!(stats.denied, 1);
    assert_eq!(stats.attempts, 0);
    assert_eq!(stats.exhausted, 0);
}

#[tokio::test]
async fn test_connection_error_uses_exactly_max_retries() {
    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();
    let target = Url::parse("http://127.0.0.1:1/page").unwrap();

    let outcome = fetcher.fetch_outcome(&target).await;

    match outcome {
        FetchOutcome::Exhausted {
            attempts,
            last_failure,
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(last_failure, FailureKind::Connect);
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
    assert_eq!(fetcher.stats().attempts, 3);
    assert_eq!(fetcher.stats().exhausted, 1);
    assert!(fetcher.fetch(&target).await.is_none());
}

#[tokio::test]
async fn test_success_on_second_attempt() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // First matching mock wins until it is used up
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();

    let document = fetcher
        .fetch(&url(&mock_server, "/flaky"))
        .await
        .expect("second attempt should succeed");

    assert_eq!(document.body(), "<html>ok</html>");
    assert_eq!(document.status(), 200);
    assert_eq!(fetcher.stats().attempts, 2);
    assert_eq!(fetcher.stats().fetched, 1);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();

    let outcome = fetcher.fetch_outcome(&url(&mock_server, "/down")).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Exhausted {
            attempts: 3,
            last_failure: FailureKind::Status(503)
        }
    ));
}

#[tokio::test]
async fn test_not_found_is_retried_like_other_statuses() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 2, "./unused")).unwrap();

    assert!(fetcher.fetch(&url(&mock_server, "/gone")).await.is_none());
    assert_eq!(fetcher.stats().attempts, 2);
}

#[tokio::test]
async fn test_undecodable_body_is_retried() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Claims gzip but sends plain text, so reading the body fails
    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_string("definitely not gzip"),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();

    let outcome = fetcher.fetch_outcome(&url(&mock_server, "/garbled")).await;

    match outcome {
        FetchOutcome::Exhausted {
            attempts,
            last_failure: FailureKind::Body(reason),
        } => {
            assert_eq!(attempts, 3);
            assert!(!reason.is_empty());
        }
        other => panic!("expected body failures to exhaust retries, got {:?}", other),
    }
    assert_eq!(fetcher.stats().fetched, 0);
    assert_eq!(fetcher.stats().exhausted, 1);
}

#[tokio::test]
async fn test_retries_do_not_wait_for_rate_limit() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    // A long floor: any wait between attempts would blow the time budget below
    let fetcher = ResilientFetcher::new(&test_config(5.0, 3, "./unused")).unwrap();
    let started = Instant::now();

    fetcher.fetch_outcome(&url(&mock_server, "/down")).await;

    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_same_domain_fetches_respect_floor() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page"))
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.3, 3, "./unused")).unwrap();
    let started = Instant::now();

    assert!(fetcher.fetch(&url(&mock_server, "/a")).await.is_some());
    assert!(fetcher.fetch(&url(&mock_server, "/b")).await.is_some());

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_declared_crawl_delay_above_floor() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 1").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page"))
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.1, 3, "./unused")).unwrap();
    let started = Instant::now();

    fetcher.fetch(&url(&mock_server, "/a")).await;
    fetcher.fetch(&url(&mock_server, "/b")).await;

    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_different_domains_are_not_delayed() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        mount_robots(server, "User-agent: *\nAllow: /").await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("page"))
            .mount(server)
            .await;
    }

    let fetcher = ResilientFetcher::new(&test_config(5.0, 3, "./unused")).unwrap();
    let started = Instant::now();

    assert!(fetcher.fetch(&url(&first, "/a")).await.is_some());
    assert!(fetcher.fetch(&url(&second, "/a")).await.is_some());

    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_document_carries_final_url_after_redirect() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    let location = format!("{}/new", mock_server.uri());
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .mount(&mock_server)
        .await;

    let fetcher = ResilientFetcher::new(&test_config(0.0, 3, "./unused")).unwrap();

    let document = fetcher.fetch(&url(&mock_server, "/old")).await.unwrap();

    assert_eq!(document.url().path(), "/new");
    assert_eq!(document.body(), "moved here");
}
