//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `clinic.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Credential signing settings.
    pub auth: AuthConfig,
    /// Payment processor settings.
    pub payment: PaymentConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Emit one JSON object per line instead of human-readable output.
    pub json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret used to sign and verify bearer tokens.
    #[serde(deserialize_with = "secret")]
    pub token_secret: SecretString,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Stripe secret key (`sk_...`).
    #[serde(deserialize_with = "secret")]
    pub stripe_secret_key: SecretString,
    /// Stripe API base URL.
    pub api_base: String,
    /// ISO 4217 currency payment intents are created in.
    pub currency: String,
    /// Timeout for each Stripe request, in seconds.
    pub timeout_secs: u64,
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl Config {
    /// Load configuration from `clinic.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("clinic.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CLINIC_HOST") {
            self.server.host = val;
        }
        // `PORT` is what most hosting platforms inject.
        for key in ["PORT", "CLINIC_PORT"] {
            if let Some(port) = std::env::var(key).ok().and_then(|val| val.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("CLINIC_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("CLINIC_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("CLINIC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("ACCESS_TOKEN_SECRET") {
            self.auth.token_secret = SecretString::from(val);
        }
        if let Ok(val) = std::env::var("STRIPE_SECRET_KEY") {
            self.payment.stripe_secret_key = SecretString::from(val);
        }
        if let Ok(val) = std::env::var("CLINIC_CURRENCY") {
            self.payment.currency = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.auth.token_secret.expose_secret().is_empty() {
            return Err(ConfigError::Validation(
                "token secret must be set (ACCESS_TOKEN_SECRET)".to_string(),
            ));
        }
        let currency = &self.payment.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Validation(format!(
                "currency must be a three-letter code, got {currency:?}"
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Whether a Stripe key was configured.
    #[must_use]
    pub fn has_stripe_key(&self) -> bool {
        !self.payment.stripe_secret_key.expose_secret().is_empty()
    }
}

impl PaymentConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:clinic.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "clinicd=info,clinic=info,tower_http=debug".to_string(),
            json: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: SecretString::from(String::new()),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: SecretString::from(String::new()),
            api_base: clinic_adapter_payment_stripe::DEFAULT_API_BASE.to_string(),
            currency: "usd".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
