use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a crawl configuration
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Parse`
/// for malformed TOML, and a validation variant for out-of-range settings.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use doc_ripple::config::load_config;
///
/// let config = load_config(Path::new("doc-ripple.toml")).unwrap();
/// println!("Crawling from {}", config.crawler.start_url);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Loads a configuration together with the hash of the exact text parsed
///
/// The file is read once so the hash always describes the settings in use.
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, digest_hex(&content)))
}

fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// SHA-256 of the configuration text, hex encoded
fn digest_hex(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
