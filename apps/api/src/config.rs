use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; the tool must start on a bare machine.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Fallback credential. A key entered in the form takes precedence.
    pub openrouter_api_key: Option<String>,
    pub data_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            data_file: std::env::var("CAREERMATCH_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("career_match_data.json")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
