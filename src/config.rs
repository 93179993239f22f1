use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Secret<String>,
    pub host: String,
    pub port: u16,

    // Sessions
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,

    // Staff account created at startup when missing
    pub admin_username: Option<String>,
    pub admin_password: Option<Secret<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Self::from_source(&config)
    }

    pub fn from_source(config: &config::Config) -> Result<Self, config::ConfigError> {
        Ok(Self {
            database_url: Secret::new(config.get("database_url")?),
            host: config.get("host").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: config.get("port").unwrap_or(8080),

            session_ttl_hours: config.get("session_ttl_hours").unwrap_or(12),
            secure_cookies: config.get("secure_cookies").unwrap_or(false),

            admin_username: config.get("admin_username").ok(),
            admin_password: config
                .get::<String>("admin_password")
                .ok()
                .map(Secret::new),
        })
    }
}
