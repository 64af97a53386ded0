// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        interaction::{CreateInteractionPayload, InteractionCandidate, InteractionEntry, LeadDetail},
        lead::{Lead, LeadCandidate, MoveLeadPayload, MoveOutcome},
    },
    services::board::{self, BoardColumn, DragState, DropEvent, DropOutcome},
};

// =============================================================================
//  PIPELINE (lista e quadro)
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads do usuário, mais novos primeiro", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.pipeline.load(Some(user.id)).await?;
    Ok((StatusCode::OK, Json((*leads).clone())))
}

// GET /api/leads/board
#[utoipa::path(
    get,
    path = "/api/leads/board",
    tag = "Leads",
    responses(
        (status = 200, description = "Colunas do pipeline", body = Vec<BoardColumn>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.pipeline.current(user.id).await?;
    Ok((StatusCode::OK, Json(board::columns(&leads))))
}

// PATCH /api/leads/{id}/status
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    request_body = MoveLeadPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead movido (ou já estava no estágio)", body = MoveOutcome),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<MoveLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .pipeline
        .move_lead(user.id, lead_id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(outcome)))
}

// POST /api/leads/board/drop
#[utoipa::path(
    post,
    path = "/api/leads/board/drop",
    tag = "Leads",
    request_body = DropEvent,
    responses(
        (status = 200, description = "Resultado do arraste", body = DropOutcome)
    ),
    security(("api_jwt" = []))
)]
pub async fn drop_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(event): Json<DropEvent>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.pipeline.current(user.id).await?;

    let mut drag = DragState::default();
    drag.start(event.lead_id);
    let outcome = drag.end(event.target_status, &leads);

    if let DropOutcome::Move { lead_id, to, .. } = outcome {
        app_state.pipeline.move_lead(user.id, lead_id, to).await?;
    }

    Ok((StatusCode::OK, Json(outcome)))
}

// =============================================================================
//  FORMULÁRIO E PAINEL DE DETALHES
// =============================================================================

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = LeadCandidate,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<LeadCandidate>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.create_lead(user.id, payload).await?;
    app_state.pipeline.invalidate(user.id).await;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead e histórico de interações", body = LeadDetail),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.lead_service.get_detail(user.id, lead_id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// GET /api/leads/{id}/interactions
#[utoipa::path(
    get,
    path = "/api/leads/{id}/interactions",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Histórico, mais recente primeiro", body = Vec<InteractionEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_interactions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let interactions = app_state
        .lead_service
        .list_interactions(user.id, lead_id)
        .await?;

    Ok((StatusCode::OK, Json(interactions)))
}

// POST /api/leads/{id}/interactions
#[utoipa::path(
    post,
    path = "/api/leads/{id}/interactions",
    tag = "Leads",
    request_body = CreateInteractionPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 201, description = "Interação registrada", body = InteractionEntry),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_interaction(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<CreateInteractionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let candidate = InteractionCandidate {
        lead_id: lead_id.to_string(),
        kind: payload.kind,
        content: payload.content,
    };

    let interaction = app_state
        .lead_service
        .add_interaction(user.id, candidate)
        .await?;

    Ok((StatusCode::CREATED, Json(interaction)))
}
