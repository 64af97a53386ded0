// src/middleware/session.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::{
    config::{AppState, BackendCredentials},
    middleware::auth::resolve_session,
};

pub const SETUP_PATH: &str = "/setup";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const AUTH_PREFIX: &str = "/api/auth";
pub const DASHBOARD_PATH: &str = "/api/leads/board";

// Rotas que nunca passam pelo gate (saúde e documentação)
const PUBLIC_PREFIXES: [&str; 3] = ["/api/health", "/docs", "/api-docs"];

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn is_auth_surface(path: &str) -> bool {
    path == AUTH_PREFIX || path.starts_with("/api/auth/")
}

/// Sem credenciais válidas só a página de configuração responde.
fn setup_redirect(credentials: &BackendCredentials, path: &str) -> Option<Response> {
    if credentials.is_configured() || path == SETUP_PATH {
        return None;
    }
    Some(Redirect::to(SETUP_PATH).into_response())
}

/// Gate do modo de configuração (servidor subiu sem credenciais).
pub async fn setup_gate(
    State(credentials): State<Arc<BackendCredentials>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(redirect) = setup_redirect(&credentials, request.uri().path()) {
        return redirect;
    }
    next.run(request).await
}

/// Gate de sessão, avaliado a cada requisição:
/// - credenciais ausentes => /setup
/// - sem sessão fora de /api/auth => login
/// - com sessão em /api/auth => dashboard
pub async fn session_gate(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if let Some(redirect) = setup_redirect(&app_state.credentials, &path) {
        return redirect;
    }
    if path == SETUP_PATH || is_public(&path) {
        return next.run(request).await;
    }

    let session = resolve_session(&app_state.auth_service, request.headers()).await;

    match (session, is_auth_surface(&path)) {
        (None, false) => Redirect::to(LOGIN_PATH).into_response(),
        (Some(_), true) => Redirect::to(DASHBOARD_PATH).into_response(),
        (Some(user), false) => {
            // Insere o usuário nos "extensions" da requisição
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        (None, true) => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_surface_always_renders() {
        let unconfigured = BackendCredentials::default();
        assert!(setup_redirect(&unconfigured, SETUP_PATH).is_none());
        assert!(setup_redirect(&unconfigured, "/api/leads").is_some());

        let configured = BackendCredentials::new(Some("postgres://db".into()), Some("segredo".into()));
        assert!(setup_redirect(&configured, "/api/leads").is_none());
    }

    #[test]
    fn classifies_paths() {
        assert!(is_auth_surface("/api/auth/login"));
        assert!(!is_auth_surface("/api/authors"));
        assert!(is_public("/api/health"));
        assert!(is_public("/docs/index.html"));
        assert!(!is_public("/api/leads"));
    }
}
