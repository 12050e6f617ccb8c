use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Listener settings, read from `HOST` and `PORT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Loads `.env` from the working directory (or a parent) into the process environment.
/// Variables already set win. A missing file is not an error.
pub fn load_dotenv() -> bool {
    absorb_dotenv(dotenv::dotenv().map(|path| debug!(path = %path.display(), "Loaded .env file")))
}

/// Same as [`load_dotenv`] for an explicit file
pub fn load_env_file(path: &Path) -> bool {
    absorb_dotenv(dotenv::from_path(path))
}

fn absorb_dotenv(result: dotenv::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) if e.not_found() => {
            debug!("No .env file found, using process environment");
            false
        }
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable .env file");
            false
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").filter(|host| !host.is_empty()) {
            config.host = host;
        }

        if let Some(value) = lookup("PORT") {
            config.port = value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
