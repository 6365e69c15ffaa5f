use crate::error::AppError;
use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Telemetry settings shared by every service binary.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector. Spans are only exported when this is set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load settings from a YAML base file layered with `<PREFIX>_SECTION__KEY`
/// environment overrides.
pub fn load_layered<T: DeserializeOwned>(base_file: &Path, env_prefix: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(base_file).required(true))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
