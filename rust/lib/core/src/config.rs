use thiserror::Error;

/// Environment variable holding the store connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable overriding the HTTP listen address.
pub const LISTEN_ENV: &str = "ISSUEFORGE_LISTEN";

/// Default HTTP listen address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is not defined; set it to a store URL such as sqlite://issues.db")]
    MissingDatabaseUrl,

    #[error("listen address must not be empty")]
    EmptyListen,
}

/// Server configuration.
///
/// The binary collects these from command-line flags or environment
/// variables, then passes them to storage and HTTP initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Connection string for the issue store. Required.
    pub database_url: String,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl ServiceConfig {
    /// Build a validated configuration.
    ///
    /// A missing or blank connection string is an error; a missing listen
    /// address falls back to [`DEFAULT_LISTEN`].
    pub fn new(database_url: Option<String>, listen: Option<String>) -> Result<Self, ConfigError> {
        let database_url = database_url
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let listen = match listen {
            Some(l) if l.trim().is_empty() => return Err(ConfigError::EmptyListen),
            Some(l) => l.trim().to_string(),
            None => DEFAULT_LISTEN.to_string(),
        };

        Ok(Self {
            database_url,
            listen,
        })
    }
}
