use serde::Deserialize;
use thiserror::Error;

use crate::auth::{DataAdmin, GeneralAdmin, StaticAdminPolicy};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub general_admin_code: String,
    pub general_admin_names: Vec<String>,
    pub data_admin_code: String,
    pub data_admin_name: String,
    pub data_admin_crush: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),
    #[error("Environment variable {0} has an incorrect value")]
    Invalid(&'static str),
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn non_empty_string(string: &str) -> bool {
    !string.trim().is_empty()
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        envy::from_env::<AppConfig>()?.validated()
    }

    fn validated(self) -> Result<AppConfig, ConfigError> {
        let required = [
            ("DATABASE_URL", &self.database_url),
            ("GENERAL_ADMIN_CODE", &self.general_admin_code),
            ("DATA_ADMIN_CODE", &self.data_admin_code),
            ("DATA_ADMIN_NAME", &self.data_admin_name),
            ("DATA_ADMIN_CRUSH", &self.data_admin_crush),
        ];

        for (name, value) in required {
            if !non_empty_string(value) {
                return Err(ConfigError::Invalid(name));
            }
        }

        if !self
            .general_admin_names
            .iter()
            .any(|name| non_empty_string(name))
        {
            return Err(ConfigError::Invalid("GENERAL_ADMIN_NAMES"));
        }

        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn admin_policy(&self) -> StaticAdminPolicy {
        StaticAdminPolicy::new(
            GeneralAdmin {
                code: self.general_admin_code.trim().to_string(),
                names: self
                    .general_admin_names
                    .iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect(),
            },
            DataAdmin {
                code: self.data_admin_code.trim().to_string(),
                name: self.data_admin_name.trim().to_string(),
                crush: self.data_admin_crush.trim().to_string(),
            },
        )
    }
}
