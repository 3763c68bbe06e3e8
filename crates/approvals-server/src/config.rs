use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{net::SocketAddr, time::Duration};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Approvals store and page settings
    #[serde(default)]
    pub approvals: ApprovalsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Approvals validation - the store endpoint is required
        self.approvals.store_url()?;
        if self.approvals.request_timeout_ms == 0 {
            return Err("approvals.request_timeout_ms must be > 0".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Approvals store endpoint and page links.
///
/// ```toml
/// [approvals]
/// uri = "https://uaa.example.com/approvals"
///
/// [approvals.links]
/// home = "/"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalsConfig {
    /// Endpoint of the user's approvals collection (required).
    #[serde(default)]
    pub uri: Option<String>,
    /// Timeout for each call to the approvals store.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Link name to URL, shown on the approvals page.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ApprovalsConfig {
    fn default() -> Self {
        Self {
            uri: None,
            request_timeout_ms: default_request_timeout_ms(),
            links: BTreeMap::new(),
        }
    }
}

impl ApprovalsConfig {
    /// Parsed store endpoint. Fails if `uri` is missing or not an http(s) URL.
    pub fn store_url(&self) -> Result<Url, String> {
        let raw = self
            .uri
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "approvals.uri is required".to_string())?;
        let url = Url::parse(raw).map_err(|e| format!("approvals.uri is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "approvals.uri must use http or https, got '{}'",
                url.scheme()
            ));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "approvals.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., APPROVALS__APPROVALS__URI=https://...
        builder = builder.add_source(
            Environment::with_prefix("APPROVALS")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_uri(uri: &str) -> AppConfig {
        AppConfig {
            approvals: ApprovalsConfig {
                uri: Some(uri.to_string()),
                ..ApprovalsConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_missing_uri_is_rejected() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.contains("approvals.uri is required"));

        let err = with_uri("   ").validate().unwrap_err();
        assert!(err.contains("approvals.uri is required"));
    }

    #[test]
    fn test_uri_must_be_http() {
        assert!(with_uri("https://uaa.example.com/approvals").validate().is_ok());
        assert!(with_uri("not a url").validate().is_err());
        let err = with_uri("ftp://example.com/approvals").validate().unwrap_err();
        assert!(err.contains("http or https"));
    }

    #[test]
    fn test_log_level_validation() {
        let mut cfg = with_uri("http://localhost:8081/approvals");
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
        cfg.logging.level = "DEBUG".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_addr_falls_back_to_unspecified() {
        let mut cfg = with_uri("http://localhost/approvals");
        cfg.server.host = "not-an-ip".into();
        cfg.server.port = 9000;
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:9000");
    }
}
