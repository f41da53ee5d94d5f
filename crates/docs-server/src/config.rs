use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Application configuration loaded explicitly from environment variables.
///
/// The documentation root is not required to exist: a missing root serves an
/// empty structure instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path to the documentation root.
    pub docs_root: PathBuf,
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// How long a scanned structure is reused. Zero rescans on every request.
    pub cache_ttl: Duration,
    /// Single allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Required:
    /// - `DOCS_ROOT`: path to the documentation folder tree
    ///
    /// Optional:
    /// - `LISTEN_ADDR`: socket address (default `127.0.0.1:3000`)
    /// - `DOCS_CACHE_TTL_SECS`: structure cache lifetime in seconds (default 30)
    /// - `CORS_ALLOW_ORIGIN`: origin allowed to call the API
    pub fn from_env() -> Result<Self, AppError> {
        let docs_root = std::env::var("DOCS_ROOT").map_err(|_| {
            AppError::Config("DOCS_ROOT environment variable is required".to_string())
        })?;

        let listen_addr = std::env::var("LISTEN_ADDR").ok();
        let cache_ttl = std::env::var("DOCS_CACHE_TTL_SECS").ok();

        Self::from_parts(
            &docs_root,
            listen_addr.as_deref(),
            cache_ttl.as_deref(),
            std::env::var("CORS_ALLOW_ORIGIN").ok(),
        )
    }

    fn from_parts(
        docs_root: &str,
        listen_addr: Option<&str>,
        cache_ttl: Option<&str>,
        cors_origin: Option<String>,
    ) -> Result<Self, AppError> {
        if docs_root.trim().is_empty() {
            return Err(AppError::Config("DOCS_ROOT must not be empty".to_string()));
        }
        let docs_root = std::path::absolute(docs_root)
            .map_err(|e| AppError::Config(format!("invalid DOCS_ROOT '{docs_root}': {e}")))?;

        let listen_addr = listen_addr
            .unwrap_or(DEFAULT_LISTEN_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("invalid LISTEN_ADDR: {e}")))?;

        let cache_ttl = match cache_ttl {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("invalid DOCS_CACHE_TTL_SECS '{raw}': {e}"))
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            docs_root,
            listen_addr,
            cache_ttl: Duration::from_secs(cache_ttl),
            cors_origin: cors_origin.filter(|origin| !origin.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = Config::from_parts("/srv/docs", None, None, None).unwrap();
        assert_eq!(config.docs_root, PathBuf::from("/srv/docs"));
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(config.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let config = Config::from_parts("docs", None, Some("0"), None).unwrap();
        assert!(config.docs_root.is_absolute());
        assert!(config.docs_root.ends_with("docs"));
        assert_eq!(config.cache_ttl, Duration::ZERO);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(matches!(
            Config::from_parts("/srv/docs", Some("not-an-addr"), None, None),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_parts("/srv/docs", None, Some("soon"), None),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_parts("  ", None, None, None),
            Err(AppError::Config(_))
        ));
    }
}
