use serde::Deserialize;
use std::env;
use std::str::FromStr;

const DEFAULT_SECRET_KEY: &str = "justletmein";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub secret_key: Option<String>,
    pub access_token_expire_minutes: Option<i64>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = cfg.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Catch obviously broken settings before the server binds.
    fn validate(&self) -> Result<(), config::ConfigError> {
        if let Some(host) = &self.host {
            if !host
                .chars()
                .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
            {
                return Err(config::ConfigError::Message(
                    "Invalid host format".to_string(),
                ));
            }
        }

        if let Some(port) = self.port {
            if port < 1024 {
                return Err(config::ConfigError::Message(
                    "Port must be 1024 or higher for security reasons".to_string(),
                ));
            }
        }

        if let Some(secret) = &self.secret_key {
            if secret.trim().is_empty() {
                return Err(config::ConfigError::Message(
                    "SECRET_KEY must not be empty".to_string(),
                ));
            }
        }

        if let Some(minutes) = self.access_token_expire_minutes {
            if !(1..=1440).contains(&minutes) {
                return Err(config::ConfigError::Message(format!(
                    "access_token_expire_minutes must be between 1 and 1440, got {}",
                    minutes
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }

    pub fn effective_database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| "sqlite://animals.db?mode=rwc".to_string())
    }

    pub fn effective_secret_key(&self) -> String {
        match &self.secret_key {
            Some(secret) => secret.clone(),
            None => {
                log::warn!("SECRET_KEY is not set, falling back to the built-in development key");
                DEFAULT_SECRET_KEY.to_string()
            }
        }
    }

    pub fn effective_token_expire_minutes(&self) -> i64 {
        self.access_token_expire_minutes.unwrap_or(30)
    }

    pub fn effective_admin_username(&self) -> String {
        self.admin_username
            .clone()
            .unwrap_or_else(|| "admin".to_string())
    }

    pub fn effective_admin_password(&self) -> String {
        self.admin_password
            .clone()
            .unwrap_or_else(|| "password".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}
