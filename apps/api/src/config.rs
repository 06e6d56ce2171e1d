use anyhow::{Context, Result};

const DEFAULT_JOBS_API_URL: &str = "https://api.scrapingdog.com/jobs";

/// Application configuration loaded from environment variables.
///
/// Every upstream credential is optional: a missing job API key switches `/jobs`
/// to sample data, missing identity settings make the auth routes answer 501,
/// and missing storage settings make presigning fail with 500.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub frontend_url: String,
    pub jobs_api_url: String,
    pub scrapingdog_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub storage: Option<StorageConfig>,
    pub resumes_bucket: String,
}

/// S3-compatible credentials for the resume bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage = match (
            optional_env("SUPABASE_S3_ENDPOINT"),
            optional_env("SUPABASE_S3_ACCESS_KEY_ID"),
            optional_env("SUPABASE_S3_SECRET_ACCESS_KEY"),
        ) {
            (Some(endpoint), Some(access_key_id), Some(secret_access_key)) => Some(StorageConfig {
                endpoint,
                region: optional_env("SUPABASE_S3_REGION")
                    .unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            frontend_url: optional_env("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            jobs_api_url: optional_env("JOBS_API_URL")
                .unwrap_or_else(|| DEFAULT_JOBS_API_URL.to_string()),
            scrapingdog_api_key: optional_env("SCRAPINGDOG_API_KEY"),
            supabase_url: optional_env("SUPABASE_URL"),
            supabase_anon_key: optional_env("SUPABASE_ANON_KEY"),
            storage,
            resumes_bucket: optional_env("RESUMES_BUCKET").unwrap_or_else(|| "resume".to_string()),
        })
    }

    /// Identity provider settings, present only when both URL and anon key are set.
    pub fn identity(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

/// Reads an environment variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
