use std::env;

use auth::HashingParams;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "JwtConfig::default_expiration_hours")]
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Seven days.
    fn default_expiration_hours() -> i64 {
        168
    }
}

/// Argon2id cost parameters for newly hashed passwords.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = HashingParams::default();
        Self {
            memory_cost_kib: params.memory_cost_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl From<PasswordConfig> for HashingParams {
    fn from(config: PasswordConfig) -> Self {
        Self {
            memory_cost_kib: config.memory_cost_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"

            [jwt]
            secret = "a-secret-that-is-at-least-32-bytes-long"
            "#,
        )
        .expect("config should deserialize");

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.expiration_hours, 168);
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        let result = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"

            [jwt]
            expiration_hours = 1
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_password_config_converts_to_hashing_params() {
        let params: HashingParams = PasswordConfig {
            memory_cost_kib: 4096,
            iterations: 2,
            parallelism: 1,
        }
        .into();

        assert_eq!(params.memory_cost_kib, 4096);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, 1);
    }
}
