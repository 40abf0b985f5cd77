use std::fs;
use std::path::Path;

use fxwatch::store::{BlobStore, HISTORY_KEY, WATCHLIST_KEY, disk::FjallStore};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "test-key";

    pub async fn create_exchange_rate_mock(from: &str, to: &str, rate: f64) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/{API_KEY}/pair/{from}/{to}");
        let body = format!(r#"{{"result": "success", "conversion_rate": {rate}}}"#);

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_polygon_prev_mock(from: &str, to: &str, close: f64) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v2/aggs/ticker/C:{from}{to}/prev");
        let body = format!(r#"{{"resultsCount": 1, "results": [{{"c": {close}, "t": 1719360000000}}]}}"#);

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(
        path: &std::path::Path,
        exchange_rate_url: &str,
        polygon_url: &str,
        data_dir: &std::path::Path,
    ) {
        let content = format!(
            r#"
providers:
  exchange_rate:
    base_url: "{exchange_rate_url}"
    api_key: "{API_KEY}"
  polygon:
    base_url: "{polygon_url}"
    api_key: "{API_KEY}"
max_tracked_pairs: 3
request_timeout_secs: 5
data_dir: "{}"
"#,
            data_dir.display()
        );
        std::fs::write(path, content).expect("Failed to write config file");
    }
}

fn stored_watchlist_codes(data_dir: &Path) -> Vec<String> {
    let store = FjallStore::open(data_dir).expect("Failed to reopen store");
    let blob = store
        .get(WATCHLIST_KEY)
        .unwrap()
        .expect("watchlist blob missing");
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    value
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_records_history() {
    let xr_server = test_utils::create_exchange_rate_mock("USD", "EUR", 0.92).await;
    let data_dir = tempfile::tempdir().unwrap();

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(
        config_file.path(),
        &xr_server.uri(),
        "http://polygon.invalid",
        data_dir.path(),
    );

    let result = fxwatch::run_command(
        fxwatch::AppCommand::Convert {
            from: "usd".to_string(),
            to: "eur".to_string(),
            amount: 100.0,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    // The conversion must be durable in the history blob.
    let store = FjallStore::open(data_dir.path()).unwrap();
    let blob = store.get(HISTORY_KEY).unwrap().expect("history blob missing");
    let records: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["amount"], 100.0);
    assert_eq!(records[0]["from"], "USD");
    assert_eq!(records[0]["to"], "EUR");
    assert_eq!(records[0]["result"], 92.0);
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_degenerate_pair() {
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    test_utils::write_config(
        config_file.path(),
        "http://xr.invalid",
        "http://polygon.invalid",
        data_dir.path(),
    );

    let result = fxwatch::run_command(
        fxwatch::AppCommand::Convert {
            from: "USD".to_string(),
            to: "USD".to_string(),
            amount: 10.0,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_watch_flow_tolerates_partial_failures() {
    // Only EUR/USD has working sources; the other seeded pair fails on
    // both, which must not abort the refresh.
    let xr_server = test_utils::create_exchange_rate_mock("EUR", "USD", 1.10).await;
    let polygon_server = test_utils::create_polygon_prev_mock("EUR", "USD", 1.00).await;
    let data_dir = tempfile::tempdir().unwrap();

    {
        let store = FjallStore::open(data_dir.path()).unwrap();
        let blob = r#"{
            "EUR/USD": {"code": "EUR/USD", "displayName": "Euro / US Dollar"},
            "GBP/INR": {"code": "GBP/INR", "displayName": "British Pound / Indian Rupee"}
        }"#;
        store.put(WATCHLIST_KEY, blob).unwrap();
    }

    let config_file = tempfile::NamedTempFile::new().unwrap();
    test_utils::write_config(
        config_file.path(),
        &xr_server.uri(),
        &polygon_server.uri(),
        data_dir.path(),
    );

    let result = fxwatch::run_command(
        fxwatch::AppCommand::Watch { poll: false },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Watch failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_track_untrack_fifo_survives_restarts() {
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    test_utils::write_config(
        config_file.path(),
        "http://xr.invalid",
        "http://polygon.invalid",
        data_dir.path(),
    );
    let config_path = config_file.path().to_str().unwrap();

    // First mutation materializes the seeded defaults and evicts the
    // oldest of them (EUR/USD).
    fxwatch::run_command(
        fxwatch::AppCommand::Track {
            pair: "AAA/BBB".to_string(),
            name: None,
        },
        Some(config_path),
    )
    .await
    .unwrap();
    assert_eq!(
        stored_watchlist_codes(data_dir.path()),
        vec!["GBP/INR", "CAD/INR", "AAA/BBB"]
    );

    fxwatch::run_command(
        fxwatch::AppCommand::Track {
            pair: "CCC/DDD".to_string(),
            name: Some("Test pair".to_string()),
        },
        Some(config_path),
    )
    .await
    .unwrap();
    assert_eq!(
        stored_watchlist_codes(data_dir.path()),
        vec!["CAD/INR", "AAA/BBB", "CCC/DDD"]
    );

    fxwatch::run_command(
        fxwatch::AppCommand::Untrack {
            pair: "AAA/BBB".to_string(),
        },
        Some(config_path),
    )
    .await
    .unwrap();
    assert_eq!(
        stored_watchlist_codes(data_dir.path()),
        vec!["CAD/INR", "CCC/DDD"]
    );
}

#[test_log::test(tokio::test)]
async fn test_duplicate_track_does_not_evict() {
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    test_utils::write_config(
        config_file.path(),
        "http://xr.invalid",
        "http://polygon.invalid",
        data_dir.path(),
    );
    let config_path = config_file.path().to_str().unwrap();

    fxwatch::run_command(
        fxwatch::AppCommand::Track {
            pair: "AAA/BBB".to_string(),
            name: None,
        },
        Some(config_path),
    )
    .await
    .unwrap();
    let before = stored_watchlist_codes(data_dir.path());

    // Re-tracking the same pair is reported to the user but is a no-op
    // at the store level.
    fxwatch::run_command(
        fxwatch::AppCommand::Track {
            pair: "AAA/BBB".to_string(),
            name: None,
        },
        Some(config_path),
    )
    .await
    .unwrap();
    assert_eq!(stored_watchlist_codes(data_dir.path()), before);
}

#[test_log::test(tokio::test)]
async fn test_favorites_flow() {
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = tempfile::NamedTempFile::new().unwrap();
    test_utils::write_config(
        config_file.path(),
        "http://xr.invalid",
        "http://polygon.invalid",
        data_dir.path(),
    );
    let config_path = config_file.path().to_str().unwrap();

    fxwatch::run_command(
        fxwatch::AppCommand::Favorite {
            pair: "usd/eur".to_string(),
        },
        Some(config_path),
    )
    .await
    .unwrap();

    let store = FjallStore::open(data_dir.path()).unwrap();
    let blob = store
        .get(fxwatch::store::FAVORITES_KEY)
        .unwrap()
        .expect("favorites blob missing");
    assert_eq!(blob, r#"["USD/EUR"]"#);

    // Degenerate pairs are rejected at the favorites boundary.
    let result = fxwatch::run_command(
        fxwatch::AppCommand::Favorite {
            pair: "USD/USD".to_string(),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_config_file_is_required() {
    let missing = std::env::temp_dir().join("fxwatch-no-such-config.yaml");
    let _ = fs::remove_file(&missing);

    let result = fxwatch::run_command(
        fxwatch::AppCommand::Pairs,
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}
