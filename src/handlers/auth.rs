// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, format::initials},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginInfo, LoginUserPayload, RegisterUserPayload, UserProfile},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .register_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/auth/login
#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = "Auth",
    responses(
        (status = 200, description = "Como iniciar uma sessão", body = LoginInfo)
    )
)]
pub async fn login_info() -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Sessão necessária. Envie e-mail e senha para obter um token Bearer.".to_string(),
        login: "POST /api/auth/login".to_string(),
        register: "POST /api/auth/register".to_string(),
        fields: vec!["email".to_string(), "password".to_string()],
    })
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário da sessão", body = UserProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserProfile> {
    let initials = initials(Some(&user.email));
    Json(UserProfile { user, initials })
}

// POST /api/users/logout
#[utoipa::path(
    post,
    path = "/api/users/logout",
    tag = "Users",
    responses(
        (status = 204, description = "Cache do pipeline descartado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> StatusCode {
    // O token é stateless; o que a sessão deixa para trás é o cache dos leads
    app_state.pipeline.invalidate(user.id).await;
    StatusCode::NO_CONTENT
}
