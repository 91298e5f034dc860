use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Regeneration attempts and extra denylist terms are deliberately
/// configuration, not hardcoded.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Optional search backend. When unset, research runs with zero hits and
    /// reports degrade to profile-derived content.
    pub search_endpoint: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Per-research-task timeout. A timed-out task is recorded absent.
    pub research_timeout_secs: u64,
    /// Per-interviewer-turn generation timeout.
    pub turn_timeout_secs: u64,
    /// How many times a compliance-violating turn is regenerated before the
    /// session fails.
    pub max_regen_attempts: u32,
    /// Comma-separated extra protected-characteristic terms appended to the
    /// built-in denylist.
    pub denylist_extra: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            search_endpoint: std::env::var("SEARCH_ENDPOINT").ok(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            research_timeout_secs: env_or("RESEARCH_TIMEOUT_SECS", "90")
                .parse::<u64>()
                .context("RESEARCH_TIMEOUT_SECS must be an integer")?,
            turn_timeout_secs: env_or("TURN_TIMEOUT_SECS", "45")
                .parse::<u64>()
                .context("TURN_TIMEOUT_SECS must be an integer")?,
            max_regen_attempts: env_or("MAX_REGEN_ATTEMPTS", "3")
                .parse::<u32>()
                .context("MAX_REGEN_ATTEMPTS must be an integer")?,
            denylist_extra: std::env::var("DENYLIST_EXTRA")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
