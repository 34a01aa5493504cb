use aloha_error::SettingsError;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the pager
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 20, 50, 100];

/// ApiSettings for use with AlohaApiClient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_dir: String,
    pub health_route: String,
}

impl ApiSettings {
    /// Root that every resource route is joined onto
    pub fn base_path(&self) -> String {
        join_url(&self.base_url, &self.api_dir)
    }

    /// The health endpoint lives next to the api directory, not under it
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_route)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let lower = self.base_url.trim().to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(SettingsError::Error(format!(
                "Base url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub log_level: String,
}

/// AlohaConfig is the primary configuration struct for the admin client.
/// Every field is sourced from the environment with a default fallback.
#[derive(Debug, Clone)]
pub struct AlohaConfig {
    pub app_name: String,
    pub app_env: String,
    pub app_version: String,
    pub api_url: String,
    pub api_dir: String,
    pub health_route: String,
    pub page_size: u32,
    pub session_path: PathBuf,
    pub log_level: String,
}

impl Default for AlohaConfig {
    fn default() -> Self {
        AlohaConfig {
            app_name: "aloha".to_string(),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            api_url: env::var("ALOHA_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            api_dir: env::var("ALOHA_API_DIR").unwrap_or_else(|_| "api".to_string()),
            health_route: env::var("ALOHA_HEALTH_ROUTE")
                .unwrap_or_else(|_| "health_check".to_string()),
            page_size: AlohaConfig::parse_page_size(env::var("ALOHA_PAGE_SIZE").ok()),
            session_path: env::var("ALOHA_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".aloha").join("session.json")),
            log_level: env::var("ALOHA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl AlohaConfig {
    pub fn new() -> Self {
        AlohaConfig::default()
    }

    /// Invalid or zero sizes fall back to the default
    pub fn parse_page_size(value: Option<String>) -> u32 {
        value
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            api_dir: self.api_dir.clone(),
            health_route: self.health_route.clone(),
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            log_level: self.log_level.clone(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_path.clone()
    }
}

fn join_url(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_matches('/');

    if segment.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, segment)
    }
}
