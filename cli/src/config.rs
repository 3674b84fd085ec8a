//! CLI Configuration

use anyhow::{anyhow, Context as _};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub environment: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub const KEYS: [&'static str; 4] = ["api_url", "token", "environment", "default_format"];

    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "token" => self.token.as_deref().map(mask),
            "environment" => self.environment.clone(),
            "default_format" => self.default_format.clone(),
            _ => return Err(unknown_key(key)),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        let value = Some(value).filter(|v| !v.trim().is_empty());
        match key {
            "api_url" => self.api_url = value,
            "token" => self.token = value,
            "environment" => self.environment = value,
            "default_format" => self.default_format = value,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".docdesk").join(filename))
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!("Unknown config key: {} (expected one of {})", key, Config::KEYS.join(", "))
}

/// First characters of a secret followed by `****`
pub fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(8).collect();
    format!("{}****", visible)
}
