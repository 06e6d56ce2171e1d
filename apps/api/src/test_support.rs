//! In-process fakes for the external collaborators, plus helpers that drive the
//! router with `tower::ServiceExt::oneshot`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::auth::client::{AuthSession, IdentityError, IdentityProvider};
use crate::config::Config;
use crate::jobs::client::{JobSource, UpstreamError};
use crate::jobs::filters::UpstreamParams;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{PresignError, UploadSigner};

pub fn test_config() -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        jobs_api_url: "http://jobs.test/jobs".to_string(),
        scrapingdog_api_key: None,
        supabase_url: Some("https://proj.supabase.test".to_string()),
        supabase_anon_key: None,
        storage: None,
        resumes_bucket: "resume".to_string(),
    }
}

/// State with every collaborator unconfigured.
pub fn test_state() -> AppState {
    AppState {
        config: test_config(),
        jobs: None,
        uploads: None,
        identity: None,
    }
}

pub async fn request_json(
    state: AppState,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    request_json(state, "GET", uri, None, None).await
}

pub async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    request_json(state, "POST", uri, None, Some(body)).await
}

/// Job source returning a canned body or status, recording every call.
pub struct FakeJobSource {
    outcome: Result<Value, (u16, Value)>,
    calls: Mutex<Vec<UpstreamParams>>,
}

impl FakeJobSource {
    pub fn ok(body: Value) -> Self {
        Self {
            outcome: Ok(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            outcome: Err((status, body)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<UpstreamParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSource for FakeJobSource {
    async fn search(&self, params: &UpstreamParams) -> Result<Value, UpstreamError> {
        self.calls.lock().unwrap().push(params.clone());
        match &self.outcome {
            Ok(body) => Ok(body.clone()),
            Err((status, body)) => Err(UpstreamError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PresignCall {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub expires_in: Duration,
}

#[derive(Default)]
pub struct FakeSigner {
    failure: Option<String>,
    calls: Mutex<Vec<PresignCall>>,
}

impl FakeSigner {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PresignCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadSigner for FakeSigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        self.calls.lock().unwrap().push(PresignCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            expires_in,
        });
        match &self.failure {
            Some(message) => Err(PresignError::Sdk(message.clone())),
            None => Ok(format!(
                "https://storage.test/{bucket}/{key}?X-Amz-Expires={}",
                expires_in.as_secs()
            )),
        }
    }
}

/// Identity provider accepting `good-token` and any password except `wrong`.
#[derive(Default)]
pub struct FakeIdentity {
    metadata: Mutex<Option<Value>>,
    signed_out: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn last_metadata(&self) -> Option<Value> {
        self.metadata.lock().unwrap().clone()
    }

    pub fn signed_out(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }

    fn user(&self, email: &str) -> Value {
        json!({
            "id": "user-1",
            "email": email,
            "user_metadata": self.last_metadata().unwrap_or_else(|| json!({})),
        })
    }

    fn check_token(token: &str) -> Result<(), IdentityError> {
        if token == "good-token" {
            Ok(())
        } else {
            Err(IdentityError::Rejected {
                status: 401,
                message: "invalid JWT".to_string(),
            })
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        user_data: Value,
    ) -> Result<AuthSession, IdentityError> {
        *self.metadata.lock().unwrap() = Some(user_data);
        Ok(AuthSession {
            user: self.user(email),
            session: Value::Null,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        if password == "wrong" {
            return Err(IdentityError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }
        let user = self.user(email);
        Ok(AuthSession {
            user: user.clone(),
            session: json!({ "access_token": "good-token", "user": user }),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        Self::check_token(access_token)?;
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_string());
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Value, IdentityError> {
        Self::check_token(access_token)?;
        Ok(self.user("ada@example.com"))
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        data: Value,
    ) -> Result<Value, IdentityError> {
        Self::check_token(access_token)?;
        // Top-level merge, like the provider's `PUT /user`.
        {
            let mut stored = self.metadata.lock().unwrap();
            let merged = stored.get_or_insert_with(|| json!({}));
            if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), data) {
                target.extend(fields);
            }
        }
        Ok(self.user("ada@example.com"))
    }
}
