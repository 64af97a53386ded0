use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, models::auth::User, services::auth::AuthService};

/// Lê o "Authorization: Bearer <token>" e resolve o usuário.
/// Token ausente, inválido ou de usuário apagado => sem sessão.
pub async fn resolve_session(auth_service: &AuthService, headers: &HeaderMap) -> Option<User> {
    let bearer = headers.typed_get::<Authorization<Bearer>>()?;
    match auth_service.validate_token(bearer.token()).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!("Sessão recusada: {}", e);
            None
        }
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers.
// O session_gate coloca o `User` nos extensions da requisição.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthenticated)
    }
}
