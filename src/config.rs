// src/config.rs

use axum::extract::FromRef;
use std::{env, sync::Arc};

use crate::{
    db::PersistenceGateway,
    services::{
        auth::AuthService, lead_service::LeadService, pipeline::PipelineStore,
        transfer::TransferService,
    },
};

// Valores do .env.example: enquanto estiverem assim o servidor fica em modo de configuração
pub const DATABASE_URL_PLACEHOLDER: &str = "your_database_url";
pub const JWT_SECRET_PLACEHOLDER: &str = "your_jwt_secret";

/// As duas credenciais do backend, lidas na inicialização.
#[derive(Debug, Clone, Default)]
pub struct BackendCredentials {
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
}

impl BackendCredentials {
    pub fn new(database_url: Option<String>, jwt_secret: Option<String>) -> Self {
        Self { database_url, jwt_secret }
    }

    /// Ausente, vazia ou ainda com o placeholder => não configurada
    pub fn is_configured(&self) -> bool {
        let usable = |value: &Option<String>, placeholder: &str| {
            value
                .as_deref()
                .map(str::trim)
                .is_some_and(|v| !v.is_empty() && v != placeholder)
        };
        usable(&self.database_url, DATABASE_URL_PLACEHOLDER)
            && usable(&self.jwt_secret, JWT_SECRET_PLACEHOLDER)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: BackendCredentials,
    pub port: u16,
}

impl AppConfig {
    /// Lê o .env (se existir) e as variáveis de ambiente.
    /// Credenciais faltando não são erro: o gate manda tudo para /setup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let credentials = BackendCredentials::new(env::var("DATABASE_URL").ok(), env::var("JWT_SECRET").ok());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self { credentials, port }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<BackendCredentials>,
    pub auth_service: AuthService,
    pub pipeline: PipelineStore,
    pub lead_service: LeadService,
    pub transfer_service: TransferService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(
        credentials: BackendCredentials,
        gateway: Arc<dyn PersistenceGateway>,
        jwt_secret: String,
    ) -> Self {
        let pipeline = PipelineStore::new(gateway.clone());
        let auth_service = AuthService::new(gateway.clone(), jwt_secret);
        let lead_service = LeadService::new(gateway.clone());
        let transfer_service = TransferService::new(gateway, pipeline.clone());

        Self {
            credentials: Arc::new(credentials),
            auth_service,
            pipeline,
            lead_service,
            transfer_service,
        }
    }
}

// Permite `State<Arc<BackendCredentials>>` nos handlers/middlewares do app completo
impl FromRef<AppState> for Arc<BackendCredentials> {
    fn from_ref(state: &AppState) -> Self {
        state.credentials.clone()
    }
}
