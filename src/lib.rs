//! slidegate library interface
//!
//! Single-component upload gateway: accepts a document over HTTP,
//! stores it, runs an external converter, and serves the result. Exposes
//! the router and state for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Settings;
use crate::services::{Converter, UploadStore};
use crate::validators::UploadPolicy;

/// Headroom on top of the upload limit for multipart framing
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved gateway settings
    pub settings: Arc<Settings>,
    /// Upload and output directories
    pub store: Arc<UploadStore>,
    /// External converter invoker
    pub converter: Arc<Converter>,
    /// Upload validation policy
    pub policy: Arc<UploadPolicy>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last conversion error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Build state from settings, creating the data directories if
    /// absent (idempotent).
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let store = UploadStore::new(&settings.data_dir).with_context(|| {
            format!(
                "failed to initialize data directories under {}",
                settings.data_dir.display()
            )
        })?;

        let converter = Converter::new(&settings.converter);
        let policy = UploadPolicy::new(
            settings.upload.max_bytes,
            settings.upload.allowed_types.clone(),
        );

        Ok(Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
            converter: Arc::new(converter),
            policy: Arc::new(policy),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        })
    }
}

/// Build application router
///
/// `uploads/` and `converted/` are served statically at matching URL
/// prefixes. Retrieval is public: anyone holding a filename can fetch
/// it (documented deployment decision, see DESIGN.md).
pub fn build_router(state: AppState) -> Router {
    let body_limit = (state.settings.upload.max_bytes + MULTIPART_OVERHEAD_BYTES) as usize;

    Router::new()
        .merge(api::upload_routes())
        .merge(api::health_routes())
        .nest_service("/uploads", ServeDir::new(state.store.uploads_dir()))
        .nest_service("/converted", ServeDir::new(state.store.converted_dir()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
