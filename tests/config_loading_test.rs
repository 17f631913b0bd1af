use shared_context::config::{load_from_path, validate};
use shared_context::{ConfigError, Context, ContextConfig, ContextError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_toml() {
    let file = write_config(".toml", "initialCapacity = 128\nshardAmount = 16\n");
    let config = load_from_path(file.path()).unwrap();

    assert_eq!(
        config,
        ContextConfig {
            initial_capacity: 128,
            shard_amount: Some(16),
        }
    );

    let context: Context<String, i32> = Context::with_config(&config).unwrap();
    assert!(context.is_empty());
}

#[test]
fn test_load_yaml_with_defaults() {
    let file = write_config(".yaml", "shardAmount: 4\n");
    let config = load_from_path(file.path()).unwrap();

    assert_eq!(config.initial_capacity, 0);
    assert_eq!(config.shard_amount, Some(4));
}

#[test]
fn test_load_json() {
    let file = write_config(".json", r#"{"initialCapacity": 10}"#);
    let config = load_from_path(file.path()).unwrap();

    assert_eq!(config.initial_capacity, 10);
    assert_eq!(config.shard_amount, None);
}

#[test]
fn test_invalid_shard_amount_rejected() {
    let file = write_config(".toml", "shardAmount = 6\n");
    let err = load_from_path(file.path()).unwrap_err();

    assert!(matches!(
        err,
        ContextError::Config(ConfigError::Validation(_))
    ));
}

#[test]
fn test_unsupported_extension() {
    let file = write_config(".ini", "shardAmount = 4\n");
    let err = load_from_path(file.path()).unwrap_err();

    assert!(matches!(err, ContextError::Config(ConfigError::Parse(_))));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let file = write_config(".json", "{ not json");
    let err = load_from_path(file.path()).unwrap_err();

    assert!(matches!(err, ContextError::Config(ConfigError::Parse(_))));
}

#[test]
fn test_default_config_is_valid() {
    assert!(validate(&ContextConfig::default()).is_ok());
}
