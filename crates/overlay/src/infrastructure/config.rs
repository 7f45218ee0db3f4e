//! Runtime configuration, read from the environment (and `.env` via dotenvy).

use thiserror::Error;
use url::Url;

use super::websocket::feed_endpoint;

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const CATALOG_PATH: &str = "/api/catalog";
pub const DEFAULT_ESPEAK_BIN: &str = "espeak-ng";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Page origin; relative sound URLs resolve against it
    pub origin: Url,
    pub ws_url: Url,
    pub catalog_url: Url,
    /// Warm the sound cache from the catalog at startup
    pub preload: bool,
    pub espeak_bin: String,
}

impl OverlayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let origin = parse_url(
            "OVERLAY_ORIGIN",
            &var("OVERLAY_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.into()),
        )?;

        let ws_url = match var("OVERLAY_WS_URL") {
            Some(raw) => parse_url("OVERLAY_WS_URL", &raw)?,
            None => feed_endpoint(&origin)?,
        };

        let catalog_url = match var("OVERLAY_CATALOG_URL") {
            Some(raw) => parse_url("OVERLAY_CATALOG_URL", &raw)?,
            None => origin
                .join(CATALOG_PATH)
                .map_err(|source| ConfigError::InvalidUrl {
                    var: "OVERLAY_ORIGIN",
                    source,
                })?,
        };

        let preload = !var("OVERLAY_SKIP_PRELOAD").is_some_and(|v| is_flag_set(&v));
        let espeak_bin = var("OVERLAY_ESPEAK_BIN").unwrap_or_else(|| DEFAULT_ESPEAK_BIN.into());

        Ok(Self {
            origin,
            ws_url,
            catalog_url,
            preload,
            espeak_bin,
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { var, source })
}

fn is_flag_set(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
