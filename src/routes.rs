// src/routes.rs

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, BackendCredentials},
    docs::ApiDoc,
    handlers,
    middleware::session::{session_gate, setup_gate},
};

/// Router completo: credenciais presentes, banco conectado.
pub fn app_router(app_state: AppState) -> Router {
    // Rotas de autenticação (o gate manda quem já tem sessão para o quadro)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login"
               ,post(handlers::auth::login)
               .get(handlers::auth::login_info)
        );

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/logout", post(handlers::auth::logout));

    let lead_routes = Router::new()
        .route("/"
               ,post(handlers::leads::create_lead)
               .get(handlers::leads::list_leads)
        )
        .route("/board", get(handlers::leads::get_board))
        .route("/board/drop", post(handlers::leads::drop_lead))
        .route("/import", post(handlers::transfer::import_leads))
        .route("/export", get(handlers::transfer::export_leads))
        .route("/{id}", get(handlers::leads::get_lead))
        .route("/{id}/status", patch(handlers::leads::move_lead))
        .route("/{id}/interactions"
               ,post(handlers::leads::create_interaction)
               .get(handlers::leads::list_interactions)
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/setup", get(handlers::setup::setup_page))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/leads", lead_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // O gate roda antes de todas as rotas acima
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_gate,
        ))
        .with_state(app_state)
}

/// Router do modo de configuração: sem banco, só a página de instruções.
pub fn setup_router(credentials: Arc<BackendCredentials>) -> Router {
    Router::new()
        .route("/setup", get(handlers::setup::setup_page))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(axum_middleware::from_fn_with_state(
            credentials.clone(),
            setup_gate,
        ))
        .with_state(credentials)
}
