// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Setup ---
        handlers::setup::setup_page,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::login_info,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::logout,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::get_board,
        handlers::leads::drop_lead,
        handlers::leads::move_lead,
        handlers::leads::get_lead,
        handlers::leads::list_interactions,
        handlers::leads::create_interaction,

        // --- Import/Export ---
        handlers::transfer::import_leads,
        handlers::transfer::export_leads,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::UserProfile,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::LoginInfo,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::LeadCard,
            models::lead::LeadCandidate,
            models::lead::MoveLeadPayload,
            models::lead::MoveOutcome,
            services::board::BoardColumn,
            services::board::DropEvent,
            services::board::DropOutcome,

            // --- Interações ---
            models::interaction::InteractionType,
            models::interaction::Interaction,
            models::interaction::InteractionEntry,
            models::interaction::CreateInteractionPayload,
            models::interaction::LeadDetail,

            // --- Import/Export ---
            services::transfer::ImportReport,
            services::transfer::RejectedRow,

            // --- Setup ---
            handlers::setup::SetupInfo,
        )
    ),
    tags(
        (name = "Setup", description = "Configuração do Backend"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Sessão"),
        (name = "Leads", description = "Pipeline de Leads e Interações"),
        (name = "Import/Export", description = "Importação CSV e Exportação Excel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
