use std::env;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "SAYIT_MODEL";
pub const BASE_URL_ENV: &str = "SAYIT_OPENAI_BASE_URL";
pub const STATIC_DIR_ENV: &str = "SAYIT_STATIC_DIR";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Server-side configuration, read once at startup and injected into the
/// proxy state. A missing API key does not stop the server from starting;
/// it surfaces as a 500 on each rewrite request instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_env(API_KEY_ENV),
            model: non_empty_env(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty_env(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            static_dir: non_empty_env(STATIC_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
