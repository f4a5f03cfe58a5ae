use crate::api;
use crate::model::{self, API_URL};
use config::{Config, ConfigError};
use std::time::Duration;

/// Default time between two updates of a sensor, in seconds.
pub const SCAN_INTERVAL: u64 = 600;

#[derive(Clone, serde::Deserialize)]
pub struct ZaptecConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub installation_id: String,
    pub interval: u64,
}

impl ZaptecConfig {
    pub fn api(&self) -> model::Api {
        api::api(
            self.api_url.to_owned(),
            self.username.to_owned(),
            self.password.to_owned(),
            self.installation_id.to_owned(),
        )
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("installation_id", &self.installation_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} must not be empty", key)));
            }
        }
        if self.interval == 0 {
            return Err(ConfigError::Message("interval must be positive".to_string()));
        }
        Ok(self)
    }
}

fn with_defaults(mut settings: Config) -> Result<Config, ConfigError> {
    settings
        .set_default("api_url", API_URL)?
        .set_default("interval", SCAN_INTERVAL as i64)?;
    Ok(settings)
}

fn from_config(settings: Config) -> Result<ZaptecConfig, ConfigError> {
    with_defaults(settings)?
        .try_into::<ZaptecConfig>()
        .and_then(ZaptecConfig::validate)
}

/// Read `zaptec.{toml,json,yaml,...}` if present, then `ZAPTEC_*` environment variables.
pub fn read_settings() -> Result<ZaptecConfig, ConfigError> {
    let mut settings = Config::default();
    settings
        .merge(config::File::with_name("zaptec").required(false))?
        .merge(config::Environment::with_prefix("ZAPTEC"))?;

    from_config(settings)
}
