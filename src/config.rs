use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::error::ToolError;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

pub const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PDFSHIFT_BASE_URL: &str = "https://api.pdfshift.io";
pub const DEFAULT_BLOB_BASE_URL: &str = "https://blob.vercel-storage.com";

/// Process configuration. Credentials are optional at load time and only
/// demanded by the tool that needs them, so a missing key fails that tool's
/// request instead of the whole process.
#[derive(Debug, Clone)]
pub struct Config {
    pub serper_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub pdfshift_api_key: Option<String>,
    pub blob_token: Option<String>,
    pub mongo_uri: Option<String>,
    pub mongo_db_name: String,

    pub serper_base_url: String,
    pub gemini_base_url: String,
    pub pdfshift_base_url: String,
    pub blob_base_url: String,

    pub search_model: String,
    pub pdf_model: String,
    pub default_result_count: i64,
    pub pdfshift_sandbox: bool,
    pub http_timeout: Duration,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            serper_api_key: get_env("SERPER_API_KEY"),
            gemini_api_key: get_env("GEMINI_API_KEY"),
            pdfshift_api_key: get_env("PDFSHIFT_API_KEY"),
            blob_token: get_env("BLOB_READ_WRITE_TOKEN"),
            mongo_uri: get_env("MONGO_URI"),
            mongo_db_name: get_env_or_default("MONGO_DB_NAME", "toolrelay"),
            serper_base_url: get_env_or_default("SERPER_BASE_URL", DEFAULT_SERPER_BASE_URL),
            gemini_base_url: get_env_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            pdfshift_base_url: get_env_or_default("PDFSHIFT_BASE_URL", DEFAULT_PDFSHIFT_BASE_URL),
            blob_base_url: get_env_or_default("BLOB_BASE_URL", DEFAULT_BLOB_BASE_URL),
            search_model: get_env_or_default("SEARCH_MODEL", "gemini-2.5-flash-lite"),
            pdf_model: get_env_or_default("PDF_MODEL", "gemini-1.5-flash"),
            default_result_count: parse_env_or_default("DEFAULT_RESULT_COUNT", 10),
            pdfshift_sandbox: parse_env_or_default("PDFSHIFT_SANDBOX", true),
            http_timeout: Duration::from_secs(parse_env_or_default("HTTP_TIMEOUT_SECS", 30)),
            bind_addr: get_env_or_default("BIND_ADDR", "0.0.0.0:3000"),
        }
    }

    /// Keys the search tool cannot run without.
    pub fn search_credentials(&self) -> Result<(&str, &str), ToolError> {
        match (&self.serper_api_key, &self.gemini_api_key) {
            (Some(serper), Some(gemini)) => Ok((serper, gemini)),
            _ => Err(ToolError::Config(
                "SERPER_API_KEY and GEMINI_API_KEY must be set on the server.".to_string(),
            )),
        }
    }

    /// Keys the pdf tool cannot run without.
    pub fn pdf_credentials(&self) -> Result<(&str, &str, &str), ToolError> {
        match (&self.gemini_api_key, &self.pdfshift_api_key, &self.blob_token) {
            (Some(gemini), Some(pdfshift), Some(blob)) => Ok((gemini, pdfshift, blob)),
            _ => Err(ToolError::Config(
                "GEMINI_API_KEY, PDFSHIFT_API_KEY and BLOB_READ_WRITE_TOKEN must be set on the server."
                    .to_string(),
            )),
        }
    }

    pub fn http_client(&self) -> Result<reqwest::Client, ToolError> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!("toolrelay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolError::Config(format!("failed to build http client: {e}")))
    }
}

fn get_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    match get_env(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!("ignoring unparsable value for {key}, using default");
            default
        }
        None => default,
    }
}
