use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::query_generator::{GeneratedQuery, QueryGeneratorError};

use super::{
    AppState,
    models::{ErrorResponse, FieldInfo, FieldsQuery, FieldsResponse, QueryRequest},
};

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "fieldsql",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handler for POST /api/v1/generate-query
pub async fn generate_query_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<GeneratedQuery>, HandlerError> {
    let Json(request) = payload.map_err(|rejection| {
        log::debug!("Rejected generate-query body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Invalid request format: {}", rejection.body_text()),
                "InvalidRequest",
            )),
        )
    })?;

    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Invalid request format: {}", e),
                "ValidationError",
            )),
        ));
    }

    log::debug!(
        "Generate query: description={:?}, system={}, limit={}",
        request.description,
        request.system(),
        request.limit()
    );

    let response = app_state
        .generator
        .generate(&request.description, request.system(), request.limit())
        .map_err(generation_error)?;

    Ok(Json(response))
}

fn generation_error(e: QueryGeneratorError) -> HandlerError {
    let status = match e {
        QueryGeneratorError::EmptyDescription => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::warn!("Query generation failed: {}", e);

    (
        status,
        Json(ErrorResponse::new(
            format!("Failed to generate query: {}", e),
            e.kind(),
        )),
    )
}

/// Handler for GET /api/v1/fields
pub async fn list_fields_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<FieldsQuery>,
) -> Json<FieldsResponse> {
    let system = params.system.as_deref().unwrap_or_default();
    let fields = app_state
        .generator
        .catalog()
        .get_all_fields(system)
        .into_iter()
        .map(FieldInfo::from)
        .collect();

    Json(FieldsResponse { fields })
}
