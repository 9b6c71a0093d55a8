use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

use crate::cli::{GlobalArgs, Mode};
use crate::client::websocket_client::normalize_ws_url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log level '{0}' (use trace, debug, info, warn or error)")]
    LogLevel(String),
    #[error("timeout must be at least one second")]
    Timeout,
}

/// Resolved settings for one run of the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub mode: Mode,
    pub server_url: String,
    pub api_base: String,
    pub log_file: PathBuf,
    pub log_level: Level,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_args(mode: Mode, args: &GlobalArgs) -> Result<Self, ConfigError> {
        let log_level = args
            .log_level
            .trim()
            .parse::<Level>()
            .map_err(|_| ConfigError::LogLevel(args.log_level.clone()))?;
        if args.timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }
        Ok(Self {
            mode,
            server_url: normalize_ws_url(args.server.trim()),
            api_base: args.api.trim().trim_end_matches('/').to_string(),
            log_file: PathBuf::from(&args.log_file),
            log_level,
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}
