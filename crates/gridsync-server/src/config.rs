//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use gridsync_core::{GridError, GridTheme};
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:3030";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid GRIDSYNC_ADDR {value:?}: {source}")]
    Addr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("Failed to read theme {path:?}: {source}")]
    ThemeIo { path: PathBuf, source: std::io::Error },
    #[error("Invalid theme {path:?}: {source}")]
    Theme { path: PathBuf, source: GridError },
}

/// Bind address and grid theme for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub theme: GridTheme,
}

impl ServerConfig {
    /// Read `GRIDSYNC_ADDR` and `GRIDSYNC_THEME`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("GRIDSYNC_ADDR").ok().as_deref(),
            std::env::var_os("GRIDSYNC_THEME").map(PathBuf::from),
        )
    }

    fn from_vars(addr: Option<&str>, theme_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let value = addr.unwrap_or(DEFAULT_ADDR);
        let addr = value.parse().map_err(|source| ConfigError::Addr {
            value: value.to_string(),
            source,
        })?;
        let theme = match theme_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::ThemeIo {
                    path: path.clone(),
                    source,
                })?;
                GridTheme::from_json(&json).map_err(|source| ConfigError::Theme { path, source })?
            }
            None => GridTheme::default(),
        };
        Ok(Self { addr, theme })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3030".parse().unwrap());
        assert_eq!(config.theme, GridTheme::default());
    }

    #[test]
    fn test_custom_addr() {
        let config = ServerConfig::from_vars(Some("127.0.0.1:9000"), None).unwrap();
        assert_eq!(config.addr.port(), 9000);
    }

    #[test]
    fn test_invalid_addr() {
        let err = ServerConfig::from_vars(Some("not an address"), None).unwrap_err();
        assert!(matches!(err, ConfigError::Addr { .. }));
    }

    #[test]
    fn test_missing_theme_file() {
        let err = ServerConfig::from_vars(None, Some(PathBuf::from("/nonexistent/theme.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ThemeIo { .. }));
    }
}
