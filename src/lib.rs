pub mod config;
pub mod controllers;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::BookingError;
use crate::services::BookingService;
use crate::store::SnapshotStore;

// Shared state for every request handler
pub struct AppState {
    pub booking: BookingService,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(
        config: config::Config,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Arc<Self>, BookingError> {
        let booking = BookingService::load(
            config.booking.clone(),
            store,
            config.store.snapshot_key.clone(),
        )
        .await?;

        Ok(Arc::new(Self { booking, config }))
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seat Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
