//! Integration tests for the fetch pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! submit → fetch → aggregate → write cycle end-to-end.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use webpulse::config::{Config, ScraperConfig};
use webpulse::crawler::{
    parse_html, run_pipeline, Coordinator, DocumentExtractor, ExtractedPage, Fetcher, Sleeper,
};
use webpulse::output::write_reports;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REFERENCE_PAGE: &str =
    r#"<title>T</title><h1>H</h1><h2>S</h2><meta name="description" content="D">"#;

/// Skips backoff delays entirely
struct InstantSleeper;

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Creates a scraper configuration suited to a local mock server
fn test_scraper_config(concurrency: usize) -> ScraperConfig {
    ScraperConfig {
        concurrency,
        request_timeout_secs: 5,
        ..ScraperConfig::default()
    }
}

/// Coordinator whose fetcher never waits between attempts
fn instant_coordinator(config: &ScraperConfig) -> Coordinator {
    let fetcher = Fetcher::from_config(config)
        .expect("Failed to build fetcher")
        .with_sleeper(Arc::new(InstantSleeper));
    Coordinator::with_fetcher(Arc::new(fetcher), config.concurrency)
}

#[tokio::test]
async fn test_reference_page_is_extracted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REFERENCE_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_scraper_config(20);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let target = mock_server.uri();

    let report = coordinator
        .run(vec![target.clone()], CancellationToken::new())
        .await;

    assert_eq!(report.total_count, 1);
    assert_eq!(report.failure_count, 0);
    let info = &report.results[&target];
    assert_eq!(info.title, "T");
    assert_eq!(info.h1, "H");
    assert_eq!(info.all_headers, vec!["H", "S"]);
    assert_eq!(info.description, "D");
}

#[tokio::test]
async fn test_mixed_targets_account_for_every_job() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Up</h1>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = test_scraper_config(2);
    let coordinator = instant_coordinator(&config);
    let targets = vec![
        format!("{}/up", base_url),
        format!("{}/down", base_url),
        format!("{}/gone", base_url),
    ];

    let report = coordinator.run(targets, CancellationToken::new()).await;

    assert_eq!(report.total_count, 1);
    assert_eq!(report.failure_count, 2);
    assert_eq!(report.processed_count(), 3);
    assert!(report.results.contains_key(&format!("{}/up", base_url)));
}

#[tokio::test]
async fn test_flaky_target_recovers_within_budget() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Recovered</h1>"))
        .mount(&mock_server)
        .await;

    let config = test_scraper_config(1);
    let report = instant_coordinator(&config)
        .run(vec![mock_server.uri()], CancellationToken::new())
        .await;

    assert_eq!(report.total_count, 1);
    assert_eq!(report.results[&mock_server.uri()].h1, "Recovered");
}

#[tokio::test]
async fn test_unresolvable_bare_host_fails_cleanly() {
    let config = test_scraper_config(1);
    let report = instant_coordinator(&config)
        .run(vec!["badhost.invalid"], CancellationToken::new())
        .await;

    assert_eq!(report.total_count, 0);
    assert_eq!(report.failure_count, 1);
    assert!(!report.results.contains_key("https://badhost.invalid"));
}

#[tokio::test]
async fn test_hundred_targets_twenty_workers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/page/\d+$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<title>Page</title><h1>Numbered</h1>")
                .set_delay(Duration::from_millis(20)),
        )
        .expect(100)
        .mount(&mock_server)
        .await;

    let config = test_scraper_config(20);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let targets: Vec<String> = (0..100)
        .map(|i| format!("{}/page/{}", mock_server.uri(), i))
        .collect();

    let report = tokio::time::timeout(
        Duration::from_secs(30),
        coordinator.run(targets, CancellationToken::new()),
    )
    .await
    .expect("Pipeline should terminate without deadlock");

    assert_eq!(report.total_count, 100);
    assert_eq!(report.results.len(), 100);
    assert_eq!(report.failure_count, 0);
}

#[tokio::test]
async fn test_pre_cancelled_pipeline_fetches_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REFERENCE_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let config = test_scraper_config(5);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let targets: Vec<String> = (0..10)
        .map(|i| format!("{}/p{}", mock_server.uri(), i))
        .collect();

    let report = coordinator.run(targets, token).await;

    assert_eq!(report.total_count, 0);
    assert_eq!(report.failure_count, 10);
}

#[tokio::test]
async fn test_deadline_cancels_slow_targets() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.scraper = ScraperConfig {
        concurrency: 4,
        request_timeout_secs: 60,
        deadline_secs: 1,
        ..ScraperConfig::default()
    };
    config.targets.urls = (0..8)
        .map(|i| format!("{}/slow/{}", mock_server.uri(), i))
        .collect();

    let start = Instant::now();
    let report = run_pipeline(&config, CancellationToken::new())
        .await
        .expect("Pipeline failed");

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(report.total_count, 0);
    assert_eq!(report.failure_count, 8);
}

#[tokio::test]
async fn test_full_run_writes_reports() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REFERENCE_PAGE))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.scraper = test_scraper_config(4);
    config.scraper.max_attempts = 1;
    config.targets.urls = vec![
        format!("{}/home", mock_server.uri()),
        format!("{}/missing", mock_server.uri()),
    ];
    config.output.results_path = dir.path().join("results.json");
    config.output.summary_path = dir.path().join("reports/summary.txt");

    let report = run_pipeline(&config, CancellationToken::new())
        .await
        .expect("Pipeline failed");
    write_reports(&report, &config.output).expect("Failed to write reports");

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&config.output.results_path).expect("Missing results.json"),
    )
    .expect("results.json is not valid JSON");
    let home = format!("{}/home", mock_server.uri());
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["results"][&home]["h1"], "H");
    assert_eq!(
        json["results"][&home]["all_sub_headers"],
        serde_json::json!(["H", "S"])
    );

    let summary =
        std::fs::read_to_string(&config.output.summary_path).expect("Missing summary.txt");
    assert!(summary.starts_with("Scraper Summary Report\n"));
    assert!(summary.contains("Total Successful Scrapes: 1\n"));
    assert!(summary.contains(&format!("- {}: H\n", home)));
    assert!(!summary.contains("/missing"));
}

/// Extractor that panics on one particular body
struct FragileExtractor;

impl DocumentExtractor for FragileExtractor {
    fn extract(&self, body: &str) -> ExtractedPage {
        if body == "boom" {
            panic!("extractor cannot handle this page");
        }
        parse_html(body)
    }
}

#[tokio::test]
async fn test_extractor_panic_is_reported_as_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(200).set_body_string("boom"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REFERENCE_PAGE))
        .mount(&mock_server)
        .await;

    let config = test_scraper_config(2);
    let fetcher = Fetcher::from_config(&config)
        .expect("Failed to build fetcher")
        .with_sleeper(Arc::new(InstantSleeper))
        .with_extractor(Arc::new(FragileExtractor));
    let coordinator = Coordinator::with_fetcher(Arc::new(fetcher), config.concurrency);

    let base_url = mock_server.uri();
    let report = tokio::time::timeout(
        Duration::from_secs(10),
        coordinator.run(
            vec![format!("{}/boom", base_url), format!("{}/ok", base_url)],
            CancellationToken::new(),
        ),
    )
    .await
    .expect("pipeline should finish despite the panic");

    assert_eq!(report.processed_count(), 2);
    assert_eq!(report.total_count, 1);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.results[&format!("{}/ok", base_url)].h1, "H");
}
