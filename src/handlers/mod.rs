pub mod common;
pub mod dte_import;
pub mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::db::DbPool;
use crate::services::{documents::DocumentIngestionService, suppliers::SupplierReconciler};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub suppliers: Arc<SupplierReconciler>,
    pub ingestion: Arc<DocumentIngestionService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        let suppliers = Arc::new(SupplierReconciler::new(db.clone()));
        let ingestion = Arc::new(DocumentIngestionService::new(
            db,
            suppliers.as_ref().clone(),
        ));
        Self {
            suppliers,
            ingestion,
        }
    }
}

/// Full application router: health plus the versioned ingestion API.
pub fn app_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/dte", dte_import::routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
