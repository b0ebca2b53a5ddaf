// File: crm-core/src/config.rs
// Purpose: Configuration parsing from crm.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub agent: AgentConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Remote data service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (default: "sqlite://crm.db?mode=rwc")
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Local preference store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// JSON file holding templates and the theme flag
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

/// Agent identity used in page titles and outgoing e-mail drafts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_email_subject")]
    pub email_subject: String,

    /// `{nome}` is replaced with the contact's name
    #[serde(default = "default_email_body")]
    pub email_body: String,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_database_url() -> String {
    "sqlite://crm.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_preferences_path() -> String {
    "crm-preferences.json".to_string()
}

fn default_agent_name() -> String {
    "Alexandre Nascimento".to_string()
}

fn default_email_subject() -> String {
    "Proposta Imóvel CRM".to_string()
}

fn default_email_body() -> String {
    "Prezado(a) {nome},\n\nSou seu corretor de imóveis e gostaria de dar seguimento ao seu interesse no mercado imobiliário.\n\nAguardamos seu contato.".to_string()
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            email_subject: default_email_subject(),
            email_body: default_email_body(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./crm.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("crm.toml")
    }

    /// Apply `DATABASE_URL` and `CRM_PORT` from the environment, when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = url;
            }
        }

        match std::env::var("CRM_PORT").map(|p| p.parse::<u16>()) {
            Ok(Ok(port)) => self.server.port = port,
            Ok(Err(_)) => tracing::warn!("Ignoring CRM_PORT: not a valid port number"),
            Err(_) => {}
        }

        self
    }
}
