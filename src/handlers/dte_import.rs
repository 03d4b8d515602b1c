use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use tracing::info;

use super::common::{created_response, map_service_error, success_response};
use crate::{dte, errors::ApiError, handlers::AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/import", post(import_document))
        .route("/preview", post(preview_document))
}

/// Processes an uploaded DTE XML file: extracts header, details and
/// references, creates or enriches the supplier, and persists the
/// purchase-document aggregate.
async fn import_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let xml = read_uploaded_xml(multipart).await?;

    let document = state
        .services
        .ingestion
        .ingest(&xml)
        .await
        .map_err(map_service_error)?;

    info!(
        document_id = document.id,
        folio = %document.folio,
        "purchase document ingested"
    );

    Ok(created_response(document))
}

/// Extracts an uploaded DTE XML file and returns the data for
/// previewing, without persisting anything.
async fn preview_document(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let xml = read_uploaded_xml(multipart).await?;

    let extracted = dte::parse_document(&xml).map_err(map_service_error)?;

    Ok(success_response(extracted))
}

/// Reads the uploaded XML part (field named "file", or any part carrying a
/// filename) as UTF-8 text.
async fn read_uploaded_xml(mut multipart: Multipart) -> Result<String, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::BadRequest {
        message: format!("invalid multipart request: {e}"),
    })? {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }

        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest {
            message: format!("failed to read uploaded file: {e}"),
        })?;

        return String::from_utf8(bytes.to_vec()).map_err(|_| ApiError::BadRequest {
            message: "uploaded file must be UTF-8 encoded XML".to_string(),
        });
    }

    Err(ApiError::BadRequest {
        message: "missing file upload".to_string(),
    })
}
