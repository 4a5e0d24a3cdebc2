//! Integration tests for a full scrape run
//!
//! These tests use wiremock to stand in for the scraping proxy and drive
//! a run from the input CSV to the output database and exports.

use serde_json::json;
use shelfwatch::config::{
    load_config_with_hash, BatchConfig, Config, InputConfig, OutputConfig, ProxyConfig,
    RetryConfig,
};
use shelfwatch::report::NullReporter;
use shelfwatch::storage::{Highlight, ResultSheet, RunStatus, SqliteStorage, Storage};
use shelfwatch::{InputError, ShelfError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IN_STOCK_PAGE: &str = r#"<html><body>
<div id="ppd"><div class="col"><div>
<span class="a-price-whole">1,299<span class="a-price-decimal">.</span></span>
</div></div></div>
<div id="averageCustomerReviews"><div>
<span class="a-icon-alt">4.3 out of 5 stars</span>
<span id="acrCustomerReviewText" class="a-size-base">2,451 ratings</span>
</div></div>
<ul><li>#1,024 in Electronics (See Top 100)</li></ul>
</body></html>"#;

const OUT_OF_STOCK_PAGE: &str = r#"<html><body>
<div id="outOfStock"><span>Currently unavailable.</span></div>
</body></html>"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_input(&self, content: &str) -> PathBuf {
        let path = self.path("input.csv");
        std::fs::write(&path, content).expect("Failed to write input");
        path
    }

    fn config(&self, endpoint: &str, max_attempts: u32) -> Config {
        Config {
            proxy: ProxyConfig {
                endpoint: endpoint.to_string(),
                auth_token: Some("dGVzdDp0ZXN0".to_string()),
                timeout_secs: 5,
            },
            retry: RetryConfig {
                max_attempts,
                retry_delay_ms: 0,
            },
            batch: BatchConfig::default(),
            input: InputConfig {
                path: self.path("input.csv").display().to_string(),
            },
            output: OutputConfig {
                database_path: self.path("shelfwatch.db").display().to_string(),
                csv_path: Some(self.path("output.csv").display().to_string()),
                summary_path: Some(self.path("summary.md").display().to_string()),
            },
        }
    }

    fn open_database(&self) -> SqliteStorage {
        SqliteStorage::new(&self.path("shelfwatch.db")).expect("Failed to open database")
    }
}

fn proxy_body(content: &str) -> serde_json::Value {
    json!({ "results": [{ "content": content, "status_code": 200 }] })
}

async fn mount_page(server: &MockServer, target: &str, page: &str) {
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .and(body_json(json!({ "url": target })))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_body(page)))
        .mount(server)
        .await;
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/v2/scrape", server.uri())
}

fn requested_urls(requests: &[wiremock::Request]) -> Vec<String> {
    requests
        .iter()
        .map(|request| {
            let body: serde_json::Value =
                serde_json::from_slice(&request.body).expect("Request body is not JSON");
            body["url"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_full_run_writes_rows_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, "https://www.amazon.in/dp/A1", IN_STOCK_PAGE).await;
    mount_page(&server, "https://www.amazon.in/dp/B2", OUT_OF_STOCK_PAGE).await;
    mount_page(&server, "https://www.amazon.in/dp/C3", IN_STOCK_PAGE).await;

    let fixture = Fixture::new();
    fixture.write_input(
        "Name,Product URL\n\
         Headphones,www.amazon.in/dp/A1\n\
         Speaker,https://www.amazon.in/dp/B2\n\
         Charger,  www.amazon.in/dp/C3  \n",
    );
    let config = fixture.config(&endpoint(&server), 3);

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .expect("Run failed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.out_of_stock, 1);

    let requests = server.received_requests().await.expect("Requests not recorded");
    assert_eq!(
        requested_urls(&requests),
        vec![
            "https://www.amazon.in/dp/A1",
            "https://www.amazon.in/dp/B2",
            "https://www.amazon.in/dp/C3",
        ]
    );

    let storage = fixture.open_database();
    let rows = storage.load_rows().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].url, "www.amazon.in/dp/A1");
    assert_eq!(rows[0].availability, "In Stock");
    assert_eq!(rows[0].price, "1299");
    assert_eq!(rows[0].no_of_reviews, "2451");
    assert_eq!(rows[0].rating, "4.3");
    assert_eq!(rows[0].electronics_rank, "1024");
    assert_eq!(rows[0].status, "Success");
    assert_eq!(rows[0].highlight, None);

    assert_eq!(rows[1].availability, "Out of Stock");
    assert_eq!(rows[1].price, "N/A");
    assert_eq!(rows[1].highlight, Some(Highlight::OutOfStock));

    let run = storage.get_latest_run().unwrap().expect("Run not recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.total, 3);
    assert_eq!(run.config_hash, "hash");
}

#[tokio::test]
async fn test_empty_content_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_body("")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_body(IN_STOCK_PAGE)))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    fixture.write_input("url\nhttps://www.amazon.in/dp/A1\n");
    let config = fixture.config(&endpoint(&server), 3);

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 1);

    let rows = fixture.open_database().load_rows().unwrap();
    assert_eq!(rows[0].availability, "In Stock");
    assert_eq!(rows[0].price, "1299");
}

#[tokio::test]
async fn test_proxy_errors_exhaust_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    fixture.write_input("URL\nhttps://www.amazon.in/dp/A1\n");
    let config = fixture.config(&endpoint(&server), 3);

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();
    assert_eq!(summary.failed, 1);

    let rows = fixture.open_database().load_rows().unwrap();
    assert_eq!(rows[0].availability, "Error");
    assert_eq!(rows[0].price, "N/A");
    assert_eq!(rows[0].no_of_reviews, "0");
    assert_eq!(rows[0].rating, "0.0");
    assert_eq!(rows[0].electronics_rank, "N/A");
    assert_eq!(rows[0].status, "All retry attempts failed");
}

#[tokio::test]
async fn test_requests_carry_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .and(header("authorization", "Basic dGVzdDp0ZXN0"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_body(IN_STOCK_PAGE)))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    fixture.write_input("url\nhttps://www.amazon.in/dp/A1\n");
    let config = fixture.config(&endpoint(&server), 1);

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn test_missing_url_column_writes_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_body(IN_STOCK_PAGE)))
        .expect(0)
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    fixture.write_input("Name,Link\nHeadphones,https://www.amazon.in/dp/A1\n");
    let config = fixture.config(&endpoint(&server), 3);

    let result = shelfwatch::scrape::run(&config, "hash", &NullReporter).await;

    assert!(matches!(
        result,
        Err(ShelfError::Input(InputError::NoUrlColumn))
    ));
    assert!(!fixture.path("shelfwatch.db").exists());
    assert!(!fixture.path("output.csv").exists());
}

#[tokio::test]
async fn test_blank_url_row_is_still_fetched() {
    let server = MockServer::start().await;
    mount_page(&server, "https://www.amazon.in/dp/A1", IN_STOCK_PAGE).await;

    let fixture = Fixture::new();
    fixture.write_input("Name,URL\nMystery,\nHeadphones,https://www.amazon.in/dp/A1\n");
    let config = fixture.config(&endpoint(&server), 3);

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();
    assert_eq!(summary.failed, 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requested_urls(&requests),
        vec![
            "https://",
            "https://",
            "https://",
            "https://www.amazon.in/dp/A1"
        ]
    );

    let rows = fixture.open_database().load_rows().unwrap();
    assert_eq!(rows[0].url, "");
    assert_eq!(rows[0].status, "All retry attempts failed");
    assert_eq!(rows[0].availability, "Error");
    assert_eq!(rows[1].status, "Success");
}

#[tokio::test]
async fn test_exports_written_after_run() {
    let server = MockServer::start().await;
    mount_page(&server, "https://www.amazon.in/dp/A1", IN_STOCK_PAGE).await;
    mount_page(&server, "https://www.amazon.in/dp/B2", OUT_OF_STOCK_PAGE).await;

    let fixture = Fixture::new();
    fixture.write_input("URL\nhttps://www.amazon.in/dp/A1\nhttps://www.amazon.in/dp/B2\n");
    let config = fixture.config(&endpoint(&server), 1);

    shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();

    let csv = std::fs::read_to_string(fixture.path("output.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "URL,Availability,Price,No_of_Reviews,Rating,Electronics_Rank,Last_Updated,Status"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("https://www.amazon.in/dp/B2,Out of Stock,N/A,"));

    let report = std::fs::read_to_string(fixture.path("summary.md")).unwrap();
    assert!(report.contains("## Out of Stock"));
    assert!(report.contains("https://www.amazon.in/dp/B2"));
}

#[tokio::test]
async fn test_export_failure_keeps_completed_run() {
    let server = MockServer::start().await;
    mount_page(&server, "https://www.amazon.in/dp/A1", IN_STOCK_PAGE).await;

    let fixture = Fixture::new();
    fixture.write_input("URL\nhttps://www.amazon.in/dp/A1\n");
    let mut config = fixture.config(&endpoint(&server), 1);
    config.output.csv_path = Some(
        fixture
            .path("missing-dir")
            .join("output.csv")
            .display()
            .to_string(),
    );

    let summary = shelfwatch::scrape::run(&config, "hash", &NullReporter)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert!(!fixture.path("missing-dir").exists());

    let storage = fixture.open_database();
    let rows = storage.load_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "Success");

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.succeeded, 1);
}

#[tokio::test]
async fn test_run_from_config_file() {
    let server = MockServer::start().await;
    mount_page(&server, "https://www.amazon.in/dp/A1", IN_STOCK_PAGE).await;

    let fixture = Fixture::new();
    let input = fixture.write_input("URL\nhttps://www.amazon.in/dp/A1\n");
    let database = fixture.path("shelfwatch.db");

    let config_path = fixture.path("shelfwatch.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[proxy]
endpoint = "{}"
auth-token = "dGVzdDp0ZXN0"
timeout-secs = 5

[retry]
max-attempts = 2

[input]
path = "{}"

[output]
database-path = "{}"
"#,
            endpoint(&server),
            toml_path(&input),
            toml_path(&database)
        ),
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(&config_path).expect("Config should load");
    assert_eq!(hash.len(), 64);

    shelfwatch::scrape::run(&config, &hash, &NullReporter)
        .await
        .unwrap();

    let storage = fixture.open_database();
    assert_eq!(storage.count_rows().unwrap(), 1);
    assert_eq!(storage.get_latest_run().unwrap().unwrap().config_hash, hash);
    assert!(!fixture.path("output.csv").exists());
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
