use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which ledger backend serves the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayBackend {
    /// Talk to the remote REST API.
    Remote,
    /// Keep the ledger in on-device JSON documents.
    Local,
}

impl GatewayBackend {
    /// Returns the configuration string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for GatewayBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "unknown gateway backend: '{other}' (expected remote or local)"
            )),
        }
    }
}

/// Top-level application configuration.
///
/// Every section has a default, so the app runs without a config file:
/// remote backend against `http://localhost:8080/api`, documents under
/// `./data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

/// Backend selection, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub backend: GatewayBackend,
}

/// Remote REST API settings. Ignored under the local backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the path prefix, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Durable on-device storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory the JSON documents live in.
    pub data_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: GatewayBackend::Remote,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}
