mod auth;
mod config;
mod errors;
mod jobs;
mod profile;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::client::{IdentityProvider, SupabaseAuthClient};
use crate::config::Config;
use crate::jobs::client::{JobSource, ScrapingdogClient};
use crate::routes::{build_router, handle_panic};
use crate::state::AppState;
use crate::storage::{S3UploadSigner, UploadSigner};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobSearch API v{}", env!("CARGO_PKG_VERSION"));

    let jobs: Option<Arc<dyn JobSource>> = match &config.scrapingdog_api_key {
        Some(key) => {
            let client = ScrapingdogClient::new(config.jobs_api_url.clone(), key.clone())?;
            info!("Job API client initialized ({})", config.jobs_api_url);
            Some(Arc::new(client))
        }
        None => {
            warn!("SCRAPINGDOG_API_KEY not set; /jobs serves sample listings");
            None
        }
    };

    let uploads: Option<Arc<dyn UploadSigner>> = match &config.storage {
        Some(storage) => {
            let signer = S3UploadSigner::from_config(storage).await;
            info!("S3 presigner initialized (bucket: {})", config.resumes_bucket);
            Some(Arc::new(signer))
        }
        None => {
            warn!("SUPABASE_S3_* not set; upload URLs are unavailable");
            None
        }
    };

    let identity: Option<Arc<dyn IdentityProvider>> = match config.identity() {
        Some((url, anon_key)) => {
            let client = SupabaseAuthClient::new(url, anon_key)?;
            info!("Identity provider client initialized");
            Some(Arc::new(client))
        }
        None => {
            warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; auth routes return 501");
            None
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_url
                .parse::<HeaderValue>()
                .context("FRONTEND_URL must be a valid header value")?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let state = AppState {
        config: config.clone(),
        jobs,
        uploads,
        identity,
    };

    let app = build_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
