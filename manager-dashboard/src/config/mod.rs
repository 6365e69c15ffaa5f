use serde::Deserialize;
use service_core::config::{load_layered, TelemetryConfig};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth_service: AuthServiceSettings,
    pub enrollment_service: EnrollmentServiceSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_static_dir() -> String {
    "manager-dashboard/static".to_string()
}

#[derive(Deserialize, Clone)]
pub struct AuthServiceSettings {
    /// Base URL of the auth service issuing manager access tokens.
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct EnrollmentServiceSettings {
    /// Base URL of the enrollment backend, without the API prefix.
    pub url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Per-request timeout. Unset means requests wait for the backend.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

impl EnrollmentServiceSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_prefix: default_api_prefix(),
            timeout_secs: None,
        }
    }

    /// Base for every backend call, e.g. `http://backend:8001/api`.
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()?;

    // Run either from the workspace root or from inside the crate
    let configuration_directory = if base_path.ends_with("manager-dashboard") {
        base_path.join("config")
    } else {
        base_path.join("manager-dashboard").join("config")
    };

    load_layered(&configuration_directory.join("base.yaml"), "APP")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_joins_prefix() {
        let settings = EnrollmentServiceSettings::new("http://backend:8001/");
        assert_eq!(settings.api_base(), "http://backend:8001/api");
    }

    #[test]
    fn test_api_base_with_empty_prefix() {
        let settings = EnrollmentServiceSettings {
            url: "http://backend:8001".to_string(),
            api_prefix: String::new(),
            timeout_secs: Some(5),
        };
        assert_eq!(settings.api_base(), "http://backend:8001");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(5)));
    }
}
