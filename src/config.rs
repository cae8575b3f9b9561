use std::env;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "TripPlanner";
const TRIPS_COLLECTION: &str = "Trips";
const DISCOVER_DEFAULT_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub trips_collection: String,
    pub discover_default_limit: u32,
    /// `None` allows any origin.
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults for
    /// everything except the MongoDB URI.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongodb_uri = env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(PORT),
            mongodb_uri,
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string()),
            trips_collection: env::var("TRIPS_COLLECTION")
                .unwrap_or_else(|_| TRIPS_COLLECTION.to_string()),
            discover_default_limit: env::var("DISCOVER_DEFAULT_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DISCOVER_DEFAULT_LIMIT),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty() && s != "*"),
        })
    }
}
