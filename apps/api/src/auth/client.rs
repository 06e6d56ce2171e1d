/// Identity provider client (Supabase GoTrue REST API).
///
/// Sessions, password hashing, and email confirmation all live on the provider;
/// this client only forwards credentials and tokens and relays the outcome.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity provider rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// User plus session, as returned by sign-up and sign-in.
/// `session` is `null` when sign-up still awaits email confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: Value,
    pub session: Value,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_data: Value,
    ) -> Result<AuthSession, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

    async fn get_user(&self, access_token: &str) -> Result<Value, IdentityError>;

    /// Merges the top-level keys of `data` into the user's metadata and returns the
    /// updated user. Keys absent from `data` keep their stored values.
    async fn update_user_metadata(
        &self,
        access_token: &str,
        data: Value,
    ) -> Result<Value, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    pub fn new(supabase_url: &str, anon_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build identity HTTP client")?;
        Ok(Self {
            client,
            base_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        })
    }

    /// Attaches the project key, plus the caller's token when acting as a user.
    fn request(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_data: Value,
    ) -> Result<AuthSession, IdentityError> {
        let response = self
            .request(self.client.post(self.url("/signup")), None)
            .json(&json!({ "email": email, "password": password, "data": user_data }))
            .send()
            .await?;
        let body = read_json(response).await?;
        Ok(session_from_body(body))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let response = self
            .request(self.client.post(self.url("/token")), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body = read_json(response).await?;
        Ok(session_from_body(body))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self
            .request(self.client.post(self.url("/logout")), Some(access_token))
            .send()
            .await?;
        read_json(response).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Value, IdentityError> {
        let response = self
            .request(self.client.get(self.url("/user")), Some(access_token))
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        data: Value,
    ) -> Result<Value, IdentityError> {
        let response = self
            .request(self.client.put(self.url("/user")), Some(access_token))
            .json(&json!({ "data": data }))
            .send()
            .await?;
        read_json(response).await
    }
}

/// Reads a provider response, turning non-2xx statuses into `Rejected`.
/// Empty success bodies (e.g. logout's 204) read as `null`.
async fn read_json(response: Response) -> Result<Value, IdentityError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = provider_message(&text).unwrap_or_else(|| format!("status {status}"));
        warn!("Identity provider returned {status}: {message}");
        return Err(IdentityError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    debug!("Identity provider returned {status}");
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Picks the human-readable message out of a provider error body.
fn provider_message(text: &str) -> Option<String> {
    let body: ProviderErrorBody = serde_json::from_str(text).ok()?;
    body.msg
        .or(body.error_description)
        .or(body.message)
        .or(body.error)
        .filter(|m| !m.is_empty())
}

/// A body carrying `access_token` is a session wrapping its user; otherwise the
/// body is the bare user and no session was issued.
fn session_from_body(body: Value) -> AuthSession {
    if body.get("access_token").is_some() {
        AuthSession {
            user: body.get("user").cloned().unwrap_or(Value::Null),
            session: body,
        }
    } else {
        AuthSession {
            user: body,
            session: Value::Null,
        }
    }
}
