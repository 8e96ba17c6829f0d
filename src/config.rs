use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};
use crate::models::{MAX_IDLE_TIMEOUT_SECS, MAX_SEARCH_LIMIT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub region: RegionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub data_path: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub idle_timeout_secs: i64,  // seconds
    pub sweep_interval_secs: u64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub file_name: String,
}

fn default_search_limit() -> usize {
    MAX_SEARCH_LIMIT
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 7200,
            sweep_interval_secs: 300,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "policy_input.csv".to_string(),
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config file {config_path} not found, using environment variables");
                Self::from_env_defaults()
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "无法读取配置文件 {config_path}: {e}"
                )));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {e}")))
    }

    fn from_env_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            region: RegionConfig {
                data_path: get_env("REGION_DATA_PATH")
                    .unwrap_or_else(|| "data/county_2015.csv".to_string()),
                search_limit: get_env_parse("REGION_SEARCH_LIMIT", default_search_limit()),
            },
            session: SessionConfig::default(),
            export: ExportConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("REGION_DATA_PATH") {
            self.region.data_path = v;
        }
        if let Ok(v) = env::var("REGION_SEARCH_LIMIT")
            && let Ok(n) = v.parse()
        {
            self.region.search_limit = n;
        }
        if let Ok(v) = env::var("SESSION_IDLE_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.session.idle_timeout_secs = n;
        }
        if let Ok(v) = env::var("SESSION_SWEEP_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.session.sweep_interval_secs = n;
        }
        if let Ok(v) = env::var("EXPORT_FILE_NAME") {
            self.export.file_name = v;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&self.region.search_limit) {
            return Err(AppError::ConfigError(format!(
                "region.search_limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        if !(1..=MAX_IDLE_TIMEOUT_SECS).contains(&self.session.idle_timeout_secs) {
            return Err(AppError::ConfigError(format!(
                "session.idle_timeout_secs must be between 1 and {MAX_IDLE_TIMEOUT_SECS}"
            )));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(AppError::ConfigError(
                "session.sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(AppError::ConfigError(
                "export.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [region]
            data_path = "regions.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.region.search_limit, 50);
        assert_eq!(config.session.idle_timeout_secs, 7200);
        assert_eq!(config.session.sweep_interval_secs, 300);
        assert_eq!(config.export.file_name, "policy_input.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server]\nhost = 1");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    fn minimal_config() -> Config {
        Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [region]
            data_path = "regions.csv"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_search_limit_bounds() {
        let mut config = minimal_config();
        config.region.search_limit = 0;
        assert!(config.validate().is_err());

        config.region.search_limit = 50;
        assert!(config.validate().is_ok());

        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [region]
            data_path = "regions.csv"
            search_limit = 51
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_validate_idle_timeout_bounds() {
        let mut config = minimal_config();
        config.session.idle_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.session.idle_timeout_secs = MAX_IDLE_TIMEOUT_SECS;
        assert!(config.validate().is_ok());

        config.session.idle_timeout_secs = 1_000_000_000_000_000;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }
}
