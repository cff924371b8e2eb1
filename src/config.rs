use std::env;

use thiserror::Error;
use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const MONGODB_DATABASE: &str = "TripPlanner";
const TOKEN_TTL_HOURS: i64 = 24;
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";
// Low randomness keeps repeated requests for the same trip close to each other.
const GENERATION_TEMPERATURE: f64 = 0.3;
const PUBLIC_BASE_URL: &str = "http://localhost:8080";
const ENVIRONMENT: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    MongoDb,
    Memory,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    /// Forces every generated text field into this language instead of the
    /// destination's own.
    pub language: Option<String>,
}

/// Process-wide settings, read once by `main` and shared through the
/// application state.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub generation: GenerationConfig,
    pub public_base_url: Url,
    pub allow_db_reset: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => PORT,
        };

        let backend = match get("DATABASE_BACKEND").as_deref() {
            None | Some("mongodb") | Some("mongo") => DatabaseBackend::MongoDb,
            Some("memory") => DatabaseBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "DATABASE_BACKEND",
                    value: other.to_string(),
                })
            }
        };
        let mongodb_uri = get("MONGODB_URI");
        if backend == DatabaseBackend::MongoDb && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let token_ttl_hours = match get("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_HOURS",
                        value: raw,
                    })
                }
            },
            None => TOKEN_TTL_HOURS,
        };
        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::Invalid { key: "BCRYPT_COST", value: raw }),
            },
            None => bcrypt::DEFAULT_COST,
        };

        let temperature = match get("GENERATION_TEMPERATURE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "GENERATION_TEMPERATURE",
                        value: raw,
                    })
                }
            },
            None => GENERATION_TEMPERATURE,
        };

        let raw_base = get("PUBLIC_BASE_URL").unwrap_or_else(|| PUBLIC_BASE_URL.to_string());
        let public_base_url = parse_base_url(&raw_base).ok_or(ConfigError::Invalid {
            key: "PUBLIC_BASE_URL",
            value: raw_base.clone(),
        })?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            environment: get("RUST_ENV").unwrap_or_else(|| ENVIRONMENT.to_string()),
            database: DatabaseConfig {
                backend,
                mongodb_uri,
                mongodb_database: get("MONGODB_DATABASE")
                    .unwrap_or_else(|| MONGODB_DATABASE.to_string()),
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_hours,
                bcrypt_cost,
            },
            generation: GenerationConfig {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("OPENAI_MODEL").unwrap_or_else(|| OPENAI_MODEL.to_string()),
                temperature,
                language: get("GENERATION_LANGUAGE"),
            },
            public_base_url,
            allow_db_reset: get("ALLOW_DB_RESET").as_deref() == Some("true"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Bulk reset is open outside production, and in production only behind
    /// `ALLOW_DB_RESET=true`.
    pub fn reset_allowed(&self) -> bool {
        !self.is_production() || self.allow_db_reset
    }
}

// Relative joins against the base must keep its full path, so it always ends in '/'.
fn parse_base_url(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}
