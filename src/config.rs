// Séminaire - Intranet client core for the seminar platform
// Copyright (C) 2025 Séminaire Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default so the core starts with zero configuration
//! against a platform running on `localhost:8080`.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Named pipe name for Windows
#[cfg(windows)]
const DEFAULT_IPC_PATH: &str = r"\\.\pipe\seminaire_ipc";

/// Unix socket path
#[cfg(not(windows))]
const DEFAULT_IPC_PATH: &str = "/tmp/seminaire_ipc.sock";

/// Core configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the platform REST API.
    /// Env: `SEMINAIRE_API_URL`
    /// Default: `http://localhost:8080`
    pub api_url: String,

    /// Server-sent events endpoint.
    /// Env: `SEMINAIRE_EVENTS_URL`
    /// Default: `<api_url>/events`
    pub events_url: String,

    /// Socket path (named pipe on Windows) the front-end connects to.
    /// Env: `SEMINAIRE_IPC_PATH`
    pub ipc_path: String,

    /// Teacher identifier sent with check-ins and uploads.
    /// Env: `SEMINAIRE_TEACHER_ID`
    /// Default: `teacher-1`
    pub teacher_id: String,

    /// Class used when the session has none, for uploads and pushed file events.
    /// Env: `SEMINAIRE_DEFAULT_CLASS`
    /// Default: `L3`
    pub default_class: String,

    /// Per-request timeout.
    /// Env: `SEMINAIRE_REQUEST_TIMEOUT_SECS`
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Delay before re-opening a dropped event stream.
    /// Env: `SEMINAIRE_RECONNECT_SECS`
    /// Default: 3 seconds
    pub reconnect_delay: Duration,

    /// Maximum log level.
    /// Env: `SEMINAIRE_LOG_LEVEL`
    /// Default: `info`
    pub log_level: Level,

    /// Directory for rotated log files.
    /// Env: `SEMINAIRE_LOG_DIR`
    /// Default: platform data dir, see [`crate::logger::LoggerConfig`]
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_url = "http://localhost:8080".to_string();
        Self {
            events_url: format!("{}/events", api_url),
            api_url,
            ipc_path: DEFAULT_IPC_PATH.to_string(),
            teacher_id: "teacher-1".to_string(),
            default_class: "L3".to_string(),
            request_timeout: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(3),
            log_level: Level::INFO,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SEMINAIRE_API_URL") {
            config.api_url = normalize_url(&url);
            config.events_url = format!("{}/events", config.api_url);
        }

        if let Some(url) = lookup("SEMINAIRE_EVENTS_URL") {
            config.events_url = normalize_url(&url);
        }

        if let Some(path) = lookup("SEMINAIRE_IPC_PATH") {
            config.ipc_path = path;
        }

        if let Some(id) = lookup("SEMINAIRE_TEACHER_ID") {
            config.teacher_id = id;
        }

        if let Some(class) = lookup("SEMINAIRE_DEFAULT_CLASS") {
            config.default_class = class;
        }

        if let Some(secs) = lookup("SEMINAIRE_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %secs,
                    "Invalid SEMINAIRE_REQUEST_TIMEOUT_SECS, using default"
                ),
            }
        }

        if let Some(secs) = lookup("SEMINAIRE_RECONNECT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config.reconnect_delay = Duration::from_secs(secs),
                Err(e) => tracing::warn!(
                    value = %secs,
                    error = %e,
                    "Invalid SEMINAIRE_RECONNECT_SECS, using default"
                ),
            }
        }

        if let Some(level) = lookup("SEMINAIRE_LOG_LEVEL") {
            match level.parse::<Level>() {
                Ok(level) => config.log_level = level,
                Err(e) => tracing::warn!(
                    value = %level,
                    error = %e,
                    "Invalid SEMINAIRE_LOG_LEVEL, using default"
                ),
            }
        }

        if let Some(dir) = lookup("SEMINAIRE_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

/// Normalize a base URL
fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    // Remove trailing slash
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.events_url, "http://localhost:8080/events");
        assert_eq!(config.teacher_id, "teacher-1");
        assert_eq!(config.default_class, "L3");
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_api_url_drives_events_url() {
        let config = config_from(&[("SEMINAIRE_API_URL", "intranet.local:9000/")]);
        assert_eq!(config.api_url, "http://intranet.local:9000");
        assert_eq!(config.events_url, "http://intranet.local:9000/events");

        let config = config_from(&[
            ("SEMINAIRE_API_URL", "https://intranet.local"),
            ("SEMINAIRE_EVENTS_URL", "https://push.intranet.local/sse"),
        ]);
        assert_eq!(config.events_url, "https://push.intranet.local/sse");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("SEMINAIRE_REQUEST_TIMEOUT_SECS", "0"),
            ("SEMINAIRE_RECONNECT_SECS", "soon"),
            ("SEMINAIRE_LOG_LEVEL", "loud"),
        ]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.log_level, Level::INFO);

        let config = config_from(&[("SEMINAIRE_LOG_LEVEL", "debug")]);
        assert_eq!(config.log_level, Level::DEBUG);
    }
}
