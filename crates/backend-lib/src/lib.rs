// ============================
// miniblog-backend-lib/src/lib.rs
// ============================
//! Identity core for the mini-blog backend: credential hashing, signed
//! tokens and ownership checks, plus the axum glue that applies them.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod storage;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::storage::{CredentialStore, ResourceStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings the service was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build the state from validated settings and the two stores
    pub fn new<C, R>(settings: Settings, credentials: C, resources: R) -> anyhow::Result<Self>
    where
        C: CredentialStore + 'static,
        R: ResourceStore + 'static,
    {
        settings.validate()?;
        let auth = Arc::new(DefaultAuth::from_settings(&settings, credentials, resources)?);

        Ok(Self {
            auth,
            settings: Arc::new(settings),
        })
    }
}
