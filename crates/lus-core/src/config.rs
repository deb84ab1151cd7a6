//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server and Drive sub-configs. Every section defaults sensibly so a
//! completely empty `{}` file is valid. Deployment-specific values (root
//! folder id, credentials, database path) can also be supplied through the
//! environment via [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Environment variable naming the Drive root folder id.
pub const ENV_ROOT_FOLDER: &str = "DRIVE_DATA_ROOT_ID";
/// Environment variable naming the service-account key file.
pub const ENV_CREDENTIALS_PATH: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Environment variable carrying the service-account key inline as JSON.
pub const ENV_CREDENTIALS_JSON: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
/// Environment variable overriding the SQLite database path.
pub const ENV_DB_PATH: &str = "LUS_DB_PATH";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub drive: DriveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            drive: DriveConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Overlay environment-supplied values onto this config.
    ///
    /// The environment wins over the file for the deployment surface: Drive
    /// root folder id, credentials (file path or inline JSON), and the
    /// database path.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var(ENV_ROOT_FOLDER) {
            if !v.is_empty() {
                self.drive.root_folder_id = v;
            }
        }
        if let Ok(v) = std::env::var(ENV_CREDENTIALS_PATH) {
            if !v.is_empty() {
                self.drive.credentials_path = PathBuf::from(v);
            }
        }
        if let Ok(v) = std::env::var(ENV_CREDENTIALS_JSON) {
            if !v.is_empty() {
                self.drive.credentials_json = Some(v);
            }
        }
        if let Ok(v) = std::env::var(ENV_DB_PATH) {
            if !v.is_empty() {
                self.server.db_path = PathBuf::from(v);
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.drive.root_folder_id.is_empty() {
            warnings.push(format!(
                "drive.root_folder_id is empty (set it in the config file or via {ENV_ROOT_FOLDER}); \
                 patient listings will be empty"
            ));
        }

        if self.drive.credentials_json.is_none() && !self.drive.credentials_path.exists() {
            warnings.push(format!(
                "no Drive credentials: {} does not exist and {ENV_CREDENTIALS_JSON} is not set",
                self.drive.credentials_path.display()
            ));
        }

        if self.drive.stream_chunk_bytes == 0 {
            warnings.push("drive.stream_chunk_bytes is 0; streaming would stall".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            db_path: PathBuf::from("lus_labeler.db"),
        }
    }
}

/// Google Drive data-source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Folder id whose immediate subfolders are the patients.
    pub root_folder_id: String,
    /// Path to the service-account key file.
    pub credentials_path: PathBuf,
    /// Inline service-account key JSON; takes precedence over the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_json: Option<String>,
    /// Base URL of the Drive API (overridable for tests).
    pub api_base: String,
    /// Size of each ranged download request when relaying video bytes.
    pub stream_chunk_bytes: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root_folder_id: String::new(),
            credentials_path: PathBuf::from("drive-service-account.json"),
            credentials_json: None,
            api_base: default_api_base(),
            stream_chunk_bytes: default_stream_chunk(),
        }
    }
}

fn default_api_base() -> String {
    "https://www.googleapis.com".into()
}

fn default_stream_chunk() -> u64 {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.db_path, PathBuf::from("lus_labeler.db"));
        assert_eq!(cfg.drive.api_base, "https://www.googleapis.com");
        assert_eq!(cfg.drive.stream_chunk_bytes, 1024 * 1024);
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "drive": {"root_folder_id": "abc"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.drive.root_folder_id, "abc");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn load_or_default_with_none() {
        let cfg = Config::load_or_default(None);
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/config.json")));
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn empty_root_folder_warns() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("root_folder_id")));
    }

    #[test]
    fn zero_chunk_size_warns() {
        let mut cfg = Config::default();
        cfg.drive.root_folder_id = "root".into();
        cfg.drive.stream_chunk_bytes = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("stream_chunk_bytes")));
    }
}
