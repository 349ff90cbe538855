use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::loader::SheetRequest;
use crate::records::{DateFormat, DatePolicy};

pub const DEFAULT_WORKSHEET: &str = "Sheet1";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DOTENV_FILE: &str = ".env";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

/// Runtime configuration for the dashboard server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Spreadsheet id or full CSV export URL
    pub source: String,
    pub worksheet: String,
    /// Zero disables caching.
    pub cache_ttl: Duration,
    /// Bearer token for private sheets
    pub token: Option<String>,
    pub date_policy: DatePolicy,
    pub bind_addr: SocketAddr,
    pub http_timeout: Duration,
}

impl DashboardConfig {
    /// Load configuration from environment variables, with `.env` in the
    /// working directory filling in anything the environment leaves unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = dotenv_vars(Path::new(DOTENV_FILE))?;
        vars.extend(std::env::vars());
        Self::from_vars(vars)
    }

    /// Builds the configuration from a variable map. Blank values count as
    /// unset.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let source = get("SHEET_SOURCE")
            .ok_or(ConfigError::Missing("SHEET_SOURCE"))?
            .to_string();
        let worksheet = get("SHEET_NAME").unwrap_or(DEFAULT_WORKSHEET).to_string();
        let token = get("SHEET_TOKEN").map(str::to_string);

        let cache_ttl = match get("CACHE_TTL") {
            Some(value) => Duration::from_secs(parse_secs("CACHE_TTL", value)?),
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_secs("HTTP_TIMEOUT_SECS", value)?),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let date_policy = match get("DATE_FORMAT") {
            Some(value) => value.parse::<DatePolicy>().map_err(|_| ConfigError::Invalid {
                key: "DATE_FORMAT",
                value: value.to_string(),
                reason: format!("expected one of {}", date_format_names().join(", ")),
            })?,
            None => DatePolicy::default(),
        };

        let bind_value = get("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: bind_value.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            source,
            worksheet,
            cache_ttl,
            token,
            date_policy,
            bind_addr,
            http_timeout,
        })
    }

    pub fn sheet_request(&self) -> SheetRequest {
        SheetRequest::new(self.source.clone(), self.worksheet.clone())
    }
}

/// Variables declared in a dotenv file. A missing file declares nothing.
pub fn dotenv_vars(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let env_file_error = |e: dotenv::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    dotenv::from_path_iter(path)
        .map_err(env_file_error)?
        .map(|item| item.map_err(env_file_error))
        .collect()
}

fn date_format_names() -> Vec<String> {
    std::iter::once("auto".to_string())
        .chain(DateFormat::FIRST_MATCH_ORDER.iter().map(ToString::to_string))
        .collect()
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
