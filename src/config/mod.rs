use crate::core::{AppError, Result};
use crate::modules::rates::RateTable;
use std::env;

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub rates: RateTable,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `json` or `pretty`
    pub log_format: String,
    /// Prefix of exported CSV file names
    pub export_prefix: String,
    /// Organizers granted the VIP fast track
    pub fast_track_organizers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub admin_api_key: String,
    /// `(api_key, organizer_id)` pairs
    pub organizer_api_keys: Vec<(String, String)>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("SERVER_PORT", "8080")
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        let mut server = ServerConfig::new(var("SERVER_HOST", "0.0.0.0"), port);
        server.cors_allowed_origin = var("CORS_ALLOWED_ORIGIN", "*");

        let config = Config {
            app: AppConfig {
                env: var("APP_ENV", "development"),
                log_level: var("LOG_LEVEL", "info"),
                log_format: var("LOG_FORMAT", "pretty"),
                export_prefix: var("DEMDEM_EXPORT_PREFIX", "demdem_partners"),
                fast_track_organizers: split_list(&var("DEMDEM_FAST_TRACK_ORGANIZERS", ""))
                    .map(str::to_string)
                    .collect(),
            },
            server,
            security: SecurityConfig {
                admin_api_key: lookup("DEMDEM_ADMIN_API_KEY").ok_or_else(|| {
                    AppError::Configuration("DEMDEM_ADMIN_API_KEY not set".to_string())
                })?,
                organizer_api_keys: parse_organizer_keys(&var("DEMDEM_ORGANIZER_API_KEYS", ""))?,
            },
            rates: RateTable::from_lookup(&lookup)?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.security.admin_api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "Admin API key cannot be empty".to_string(),
            ));
        }

        if self.app.export_prefix.trim().is_empty() {
            return Err(AppError::Configuration(
                "Export prefix cannot be empty".to_string(),
            ));
        }

        self.rates.validate()
    }

    /// Fee constants every service of this deployment is built with
    pub fn get_rates(&self) -> &RateTable {
        &self.rates
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `key:organizer_id,key:organizer_id`
fn parse_organizer_keys(raw: &str) -> Result<Vec<(String, String)>> {
    split_list(raw)
        .map(|entry| match entry.split_once(':') {
            Some((key, organizer)) if !key.trim().is_empty() && !organizer.trim().is_empty() => {
                Ok((key.trim().to_string(), organizer.trim().to_string()))
            }
            _ => Err(AppError::Configuration(
                "Invalid DEMDEM_ORGANIZER_API_KEYS entry, expected key:organizer_id".to_string(),
            )),
        })
        .collect()
}
