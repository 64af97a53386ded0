use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

use crate::services::schema::SchemaError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação (formulários e linhas de importação) ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    // --- Autenticação / Sessão ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não autenticado")]
    Unauthenticated,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Persistência ---
    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // --- Arquivos (importação / exportação) ---
    #[error("Arquivo inválido: {0}")]
    FileFormat(String),

    #[error("Nenhum lead válido encontrado no arquivo")]
    NoValidLeads,

    #[error("Erro ao gerar planilha: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::FileFormat(format!("Erro ao ler arquivo: {}", e))
    }
}

fn validation_details(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    details
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(ref errors)
            | AppError::Schema(SchemaError::InvalidLead(ref errors))
            | AppError::Schema(SchemaError::InvalidInteraction(ref errors)) => {
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": validation_details(errors),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::FileFormat(ref message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Usuário não autenticado."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead não encontrado."),
            AppError::NoValidLeads => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Nenhum lead válido encontrado no arquivo.",
            ),

            // Todos os outros erros (banco, planilha, bcrypt, jwt...) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
