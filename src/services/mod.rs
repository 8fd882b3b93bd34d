//! Business logic services

pub mod auth;
pub mod catalog;
pub mod sessions;
pub mod uploads;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    repository::Storage,
    services::{
        auth::{AuthService, FixedCredentialVerifier},
        sessions::SessionStore,
    },
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub uploads: uploads::UploadService,
}

impl Services {
    /// Create all services over the given store and session store.
    /// Ensures the admin account exists and the uploads directory is present.
    pub async fn new(
        storage: Arc<dyn Storage>,
        sessions: Arc<dyn SessionStore>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let admin = AuthService::ensure_admin(storage.as_ref(), &config.auth).await?;
        let verifier = Arc::new(FixedCredentialVerifier::new(&config.auth, admin));

        let uploads = uploads::UploadService::new(&config.uploads);
        uploads.ensure_dir().await?;

        Ok(Self {
            auth: AuthService::new(storage.clone(), sessions, verifier),
            catalog: catalog::CatalogService::new(storage),
            uploads,
        })
    }
}
