//! catalog-config - 配置加载库

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

/// 环境变量前缀，嵌套字段用 `__` 分隔
pub const ENV_PREFIX: &str = "CATALOG_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 远端商品 gRPC 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProductServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// 单次调用的截止时间，未配置时沿用 gRPC 库默认行为
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9090".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

impl ProductServiceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl Default for ProductServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            deadline_ms: None,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_metrics")]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            metrics: default_metrics(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub product_service: ProductServiceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_env: default_app_env(),
            server: ServerConfig::default(),
            product_service: ProductServiceConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 优先级：环境变量 > `{APP_ENV}.toml` > `default.toml`
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let mut config: Self = Self::figment(config_dir, &env).extract()?;
        config.app_env = env;
        config.validate()?;

        Ok(config)
    }

    pub fn figment(config_dir: &str, env: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.product_service.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid(
                "product_service.endpoint must not be empty".to_string(),
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "product_service.endpoint must start with http:// or https://, got '{endpoint}'"
            )));
        }
        if self.product_service.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "product_service.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.product_service.deadline_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "product_service.deadline_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
