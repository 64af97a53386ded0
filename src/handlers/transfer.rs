// src/handlers/transfer.rs

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    services::transfer::{ExportOutcome, ImportReport, XLSX_CONTENT_TYPE},
};

// POST /api/leads/import
#[utoipa::path(
    post,
    path = "/api/leads/import",
    tag = "Import/Export",
    request_body(content = String, content_type = "text/csv", description = "CSV com cabeçalho: name,email,phone,company,role,source[,status]"),
    responses(
        (status = 201, description = "Leads importados; linhas inválidas listadas com o motivo", body = ImportReport),
        (status = 400, description = "Arquivo ilegível ou cabeçalhos faltando"),
        (status = 422, description = "Nenhum lead válido no arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .transfer_service
        .import_csv(user.id, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

// GET /api/leads/export
#[utoipa::path(
    get,
    path = "/api/leads/export",
    tag = "Import/Export",
    responses(
        (status = 200, description = "Planilha leads_AAAA-MM-DD.xlsx, ou aviso quando não há leads")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response, AppError> {
    let outcome = app_state.transfer_service.export_xlsx(user.id).await?;

    let response = match outcome {
        ExportOutcome::Empty => (
            StatusCode::OK,
            Json(json!({ "message": "Nenhum lead para exportar", "exported": 0 })),
        )
            .into_response(),
        ExportOutcome::File { filename, bytes } => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
    };

    Ok(response)
}
