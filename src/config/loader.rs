use super::schema::{ContextConfig, MAX_INITIAL_CAPACITY};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use std::borrow::Cow;
use std::io;
use std::path::Path;

const ENV_PREFIX: &str = "SHARED_CONTEXT_";

/// `SHARED_CONTEXT_SHARD_AMOUNT` is emitted as `shardAmount`, so it lands on
/// the same key a config file uses.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .map(|key| Cow::<str>::Owned(camel_case(key.as_str())).into())
        .lowercase(false)
}

fn camel_case(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(c.to_ascii_lowercase());
        }
    }
    result
}

pub fn load_from_env_or_file() -> Result<ContextConfig> {
    let config: ContextConfig = Figment::new()
        .merge(Toml::file("shared-context.toml"))
        .merge(Json::file("shared-context.json"))
        .merge(Yaml::file("shared-context.yaml"))
        .merge(Yaml::file("shared-context.yml"))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    tracing::debug!(?config, "Loaded context configuration");

    Ok(config)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ContextConfig> {
    let path = path.as_ref();

    // figment silently skips missing files
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Config file not found: {}", path.display()),
        )
        .into());
    }

    let figment = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Figment::new().merge(Toml::file(path)),
        Some("json") => Figment::new().merge(Json::file(path)),
        Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
        _ => {
            return Err(ConfigError::Parse(
                "Unsupported config file format. Use .toml, .json, .yaml, or .yml".into(),
            )
            .into());
        }
    };

    let config: ContextConfig = figment
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    tracing::debug!(path = %path.display(), ?config, "Loaded context configuration");

    Ok(config)
}

pub fn validate(config: &ContextConfig) -> Result<()> {
    if config.initial_capacity > MAX_INITIAL_CAPACITY {
        return Err(ConfigError::Validation(format!(
            "Initial capacity must not exceed {MAX_INITIAL_CAPACITY}, got {}",
            config.initial_capacity
        ))
        .into());
    }

    if let Some(shards) = config.shard_amount {
        if shards < 2 || !shards.is_power_of_two() {
            return Err(ConfigError::Validation(format!(
                "Shard amount must be a power of two greater than 1, got {shards}"
            ))
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;

    #[test]
    fn test_validate_shard_amount() {
        let mut config = ContextConfig::default();
        assert!(validate(&config).is_ok());

        config.shard_amount = Some(16);
        assert!(validate(&config).is_ok());

        for bad in [0, 1, 3, 12] {
            config.shard_amount = Some(bad);
            let err = validate(&config).unwrap_err();
            assert!(matches!(
                err,
                ContextError::Config(ConfigError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_validate_initial_capacity() {
        let mut config = ContextConfig {
            initial_capacity: MAX_INITIAL_CAPACITY,
            shard_amount: None,
        };
        assert!(validate(&config).is_ok());

        for bad in [MAX_INITIAL_CAPACITY + 1, usize::MAX / 2, usize::MAX] {
            config.initial_capacity = bad;
            let err = validate(&config).unwrap_err();
            assert!(matches!(
                err,
                ContextError::Config(ConfigError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_oversized_capacity_is_rejected_before_allocating() {
        let config = ContextConfig {
            initial_capacity: usize::MAX / 2,
            shard_amount: None,
        };

        let result = std::panic::catch_unwind(|| {
            crate::Context::<String, i32>::with_config(&config).is_err()
        });
        assert!(matches!(result, Ok(true)));
    }

    #[test]
    fn test_camel_case_env_keys() {
        assert_eq!(camel_case("SHARD_AMOUNT"), "shardAmount");
        assert_eq!(camel_case("INITIAL_CAPACITY"), "initialCapacity");
        assert_eq!(camel_case("shard_amount"), "shardAmount");
        assert_eq!(camel_case("_LEADING"), "leading");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_from_path("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ContextError::Io(_)));
    }
}
