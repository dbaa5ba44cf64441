use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::api::session::DEFAULT_MAX_SESSIONS;
use crate::llm::DEFAULT_MODEL;

pub struct Config {
    pub tavily_api_key: String,
    pub tavily_base_url: String,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub llm_model: String,
    pub host: String,
    pub port: u16,
    pub http_timeout: Duration,
    pub log_level: tracing::Level,
    pub static_dir: String,
    pub max_sessions: usize,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Ok(Config {
            tavily_api_key: get_env("TAVILY_API_KEY")?,
            tavily_base_url: get_env_or_default("TAVILY_BASE_URL", "https://api.tavily.com"),
            openrouter_api_key: get_env("OPENROUTER_API_KEY")?,
            openrouter_base_url: get_env_or_default(
                "OPENROUTER_BASE_URL",
                "https://openrouter.ai/api/v1",
            ),
            llm_model: get_env_or_default("LLM_MODEL", DEFAULT_MODEL),
            host: get_env_or_default("HOST", "0.0.0.0"),
            port: parse_env_or_default("PORT", 5000)?,
            http_timeout: Duration::from_secs(parse_env_or_default("HTTP_TIMEOUT_SECS", 30)?),
            log_level: parse_env_or_default("LOG_LEVEL", tracing::Level::INFO)?,
            static_dir: get_env_or_default("STATIC_DIR", "static"),
            max_sessions: parse_env_or_default("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
        })
    }
}

fn get_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Missing required environment variable: {key}"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {key}={raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
