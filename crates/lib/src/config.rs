//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.handover/config.json`) and environment.
//! Environment variables override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Messaging-platform channel settings (reply token auth, signature secret).
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Generation model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Knowledge document source.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

/// Webhook server bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// HTTP listen port (default 8080). Overridden by PORT env.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the platform must reach the webhook).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Messaging-platform credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    /// Bearer token for the reply API. Overridden by CHANNEL_ACCESS_TOKEN env when set.
    pub access_token: Option<String>,
    /// Shared secret the platform signs webhook bodies with. Overridden by CHANNEL_SECRET env.
    pub secret: Option<String>,
}

/// Generation model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// API key for the generation endpoint. Overridden by MODEL_API_KEY env when set.
    pub api_key: Option<String>,
    /// Model id (default "gemini-1.5-flash").
    pub name: Option<String>,
}

/// Where the knowledge document comes from. `path` takes precedence over `inline`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeConfig {
    /// UTF-8 text file path (default "knowledge.md").
    pub path: Option<PathBuf>,
    /// Inline literal used when no path is set.
    pub inline: Option<String>,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn config_nonempty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the reply-API access token: env CHANNEL_ACCESS_TOKEN overrides config.
pub fn resolve_access_token(config: &Config) -> Option<String> {
    env_nonempty("CHANNEL_ACCESS_TOKEN").or_else(|| config_nonempty(&config.channel.access_token))
}

/// Resolve the webhook signing secret: env CHANNEL_SECRET overrides config.
pub fn resolve_channel_secret(config: &Config) -> Option<String> {
    env_nonempty("CHANNEL_SECRET").or_else(|| config_nonempty(&config.channel.secret))
}

/// Resolve the generation API key: env MODEL_API_KEY overrides config.
pub fn resolve_model_api_key(config: &Config) -> Option<String> {
    env_nonempty("MODEL_API_KEY").or_else(|| config_nonempty(&config.model.api_key))
}

/// Resolve the listen port: env PORT overrides config when it parses as u16.
pub fn resolve_port(config: &Config) -> u16 {
    env_nonempty("PORT")
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HANDOVER_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".handover").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or HANDOVER_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_port_and_bind() {
        let s = ServerConfig::default();
        assert_eq!(s.port, 8080);
        assert_eq!(s.bind, "0.0.0.0");
    }

    #[test]
    fn empty_config_json_parses_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse empty config");
        assert_eq!(config.server.port, 8080);
        assert!(config.channel.secret.is_none());
        assert!(config.model.api_key.is_none());
        assert!(config.knowledge.path.is_none());
    }

    #[test]
    fn camel_case_fields_parse() {
        let config: Config = serde_json::from_str(
            r#"{
                "server": { "port": 9000, "bind": "127.0.0.1" },
                "channel": { "accessToken": "tok", "secret": "sec" },
                "model": { "apiKey": "key", "name": "gemini-1.5-pro" },
                "knowledge": { "path": "docs/handover.md" }
            }"#,
        )
        .expect("parse config");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.channel.access_token.as_deref(), Some("tok"));
        assert_eq!(config.model.name.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(
            config.knowledge.path,
            Some(PathBuf::from("docs/handover.md"))
        );
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("handover-config-does-not-exist.json");
        let (config, used) = load_config(Some(path.clone())).expect("load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(used, path);
    }

    #[test]
    fn blank_config_values_resolve_to_none() {
        let mut config = Config::default();
        config.channel.secret = Some("   ".to_string());
        assert_eq!(resolve_channel_secret(&config), None);
        config.channel.secret = Some("s3cret".to_string());
        assert_eq!(resolve_channel_secret(&config).as_deref(), Some("s3cret"));
    }
}
