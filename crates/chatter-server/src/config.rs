use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub presence_ttl: Duration,
    /// Built client to serve alongside the API, if any.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ttl_secs: u64 = parse_or(&lookup, "CHATTER_PRESENCE_TTL_SECS", 300)?;

        Ok(Self {
            host: lookup("CHATTER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "CHATTER_PORT", 3002)?,
            data_dir: lookup("CHATTER_DATA_DIR")
                .unwrap_or_else(|| "./data".into())
                .into(),
            presence_ttl: Duration::from_secs(ttl_secs),
            static_dir: lookup("CHATTER_STATIC_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid {key} value: {raw:?}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
