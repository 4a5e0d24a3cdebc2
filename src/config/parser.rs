use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that overrides `proxy.auth-token`
pub const AUTH_TOKEN_ENV: &str = "SHELFWATCH_AUTH_TOKEN";

/// Loads and parses a configuration file from the given path
///
/// The proxy auth token may come from the file or from the
/// `SHELFWATCH_AUTH_TOKEN` environment variable; the variable wins.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shelfwatch::config::load_config;
///
/// let config = load_config(Path::new("shelfwatch.toml")).unwrap();
/// println!("Proxy: {}", config.proxy.endpoint);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;
    let config = apply_env_overrides(config, std::env::var(AUTH_TOKEN_ENV).ok());

    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides to a parsed configuration
///
/// A blank environment value is ignored.
pub fn apply_env_overrides(mut config: Config, env_token: Option<String>) -> Config {
    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        config.proxy.auth_token = Some(token);
    }
    config
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored with each run so results can be traced back to the settings
/// that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
