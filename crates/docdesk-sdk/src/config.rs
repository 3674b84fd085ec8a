//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Development API base URL
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:3000";

/// Production API base URL
pub const PRODUCTION_BASE_URL: &str = "https://api.docdesk.app";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Environment selected when the crate was built (`DOCDESK_ENV`)
    pub fn compiled() -> Self {
        option_env!("DOCDESK_ENV")
            .and_then(|env| env.parse().ok())
            .unwrap_or_default()
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "local" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(Error::Config(format!("unknown environment '{}'", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration for the DocDesk client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Overrides the environment's base URL
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::compiled(),
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self { api_url: Some(api_url.into()), ..Default::default() }
    }

    /// Resolved base URL, always ending in `/`
    pub fn base_url(&self) -> Result<Url, Error> {
        let raw = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.environment.base_url());

        let url = if raw.ends_with('/') {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("{}/", raw))?
        };

        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("'{}' cannot be used as a base URL", raw)));
        }
        Ok(url)
    }
}
