use std::sync::Arc;

use crate::auth::client::IdentityProvider;
use crate::config::Config;
use crate::jobs::client::JobSource;
use crate::storage::UploadSigner;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Each collaborator is `None` when its credentials are absent; handlers decide
/// whether that means degraded output or an error.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream job API. `None` serves sample listings.
    pub jobs: Option<Arc<dyn JobSource>>,
    /// Presigner for resume uploads. `None` fails `/storage/upload-url` with 500.
    pub uploads: Option<Arc<dyn UploadSigner>>,
    /// Identity provider. `None` answers the auth routes with 501.
    pub identity: Option<Arc<dyn IdentityProvider>>,
}
