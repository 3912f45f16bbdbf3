//! # Configuration Loading Tests

use endpoint_router::observability::LogFormat;
use endpoint_router::{Endpoint, Router, RouterConfig, StrategyKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_load_yaml_config() {
    let file = write_config(
        ".yaml",
        "strategy: least_connections\nlogging:\n  level: warn\n  format: text\n",
    );

    let config = RouterConfig::load_from_file(file.path()).await.unwrap();
    assert_eq!(config.strategy, StrategyKind::LeastConnections);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[tokio::test]
async fn test_load_json_config_by_extension() {
    let file = write_config(".json", r#"{"strategy": "response_time_weighted"}"#);

    let config = RouterConfig::load(file.path()).await.unwrap();
    assert_eq!(config.strategy, StrategyKind::ResponseTimeWeighted);
    assert_eq!(config.logging.level, "info");
}

#[tokio::test]
async fn test_empty_yaml_uses_defaults() {
    let file = write_config(".yaml", "");

    let config = RouterConfig::load_from_file(file.path()).await.unwrap();
    assert_eq!(config, RouterConfig::default());
}

#[tokio::test]
async fn test_missing_file_is_an_io_error() {
    let err = RouterConfig::load_from_file("/nonexistent/router.yaml")
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), "io_error");

    let err = RouterConfig::load("/nonexistent/router.json").await.unwrap_err();
    assert_eq!(err.error_type(), "io_error");
}

#[tokio::test]
async fn test_malformed_files_surface_parse_errors() {
    let yaml = write_config(".yaml", "logging: [unterminated\n");
    let err = RouterConfig::load(yaml.path()).await.unwrap_err();
    assert_eq!(err.error_type(), "yaml_error");

    let json = write_config(".json", "{ not json");
    let err = RouterConfig::load(json.path()).await.unwrap_err();
    assert_eq!(err.error_type(), "json_error");
}

#[tokio::test]
async fn test_invalid_level_fails_validation() {
    let file = write_config(".yaml", "logging:\n  level: chatty\n");

    let err = RouterConfig::load_from_file(file.path()).await.unwrap_err();
    assert!(err.to_string().contains("logging.level"));
}

#[tokio::test]
async fn test_router_from_loaded_config() {
    let file = write_config(".yaml", "strategy: weighted_round_robin\n");
    let config = RouterConfig::load_from_file(file.path()).await.unwrap();

    let router = Router::from_config(&config);
    assert_eq!(router.strategy_name(), "weighted_round_robin");

    let list = vec![
        Endpoint::new("a", "10.0.0.1", 80).with_metadata("weight", "0"),
        Endpoint::new("b", "10.0.0.2", 80).with_metadata("weight", "4"),
    ];
    for _ in 0..4 {
        assert_eq!(router.choose(&list).unwrap().id, "b");
    }
}
