use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL_API_URL: &str = "https://api.fireworks.ai/inference/v1/chat/completions";
pub const DEFAULT_MODEL_ID: &str = "accounts/colin-fbf68a/models/pddl-gpt-oss-model";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const SYSTEM_PROMPT: &str = "You are an expert planning assistant. When given a problem, output a structured plan in PDDL format with actions and explanations.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub model_api_url: String,
    pub model_id: String,
    pub model_timeout: Duration,
    pub training_data_dir: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = get("FIREWORKS_API_KEY")?;
        let model_api_url = std::env::var("MODEL_API_URL").unwrap_or_else(|_| DEFAULT_MODEL_API_URL.to_string());
        let model_id = std::env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let model_timeout = match std::env::var("MODEL_TIMEOUT_SECS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("MODEL_TIMEOUT_SECS must be a whole number of seconds, got {v:?}"))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let training_data_dir =
            std::env::var("TRAINING_DATA_DIR").unwrap_or_else(|_| "training_data".to_string());

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
            format!("0.0.0.0:{port}")
        });

        // fail fast, fail loud
        if !model_api_url.starts_with("http://") && !model_api_url.starts_with("https://") {
            bail!("MODEL_API_URL must start with http:// or https://");
        }
        if model_timeout == 0 {
            bail!("MODEL_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            api_key,
            model_api_url,
            model_id,
            model_timeout: Duration::from_secs(model_timeout),
            training_data_dir,
            bind_addr,
        })
    }
}

fn get(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing required env var: {key}"))
}
