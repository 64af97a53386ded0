// src/db/gateway.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InteractionRepository, LeadRepository, UserRepository},
    models::{
        auth::User,
        interaction::{Interaction, NewInteraction},
        lead::{Lead, LeadStatus, NewLead},
    },
};

/// Porta de persistência: tudo o que o resto da aplicação precisa do banco.
///
/// Toda leitura/escrita de leads recebe o `owner` (usuário da sessão) e fica
/// restrita às linhas dele. Implementação real: `PgGateway`. Em testes:
/// `db::memory::MemoryGateway`.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    // --- usuários (sessão) ---
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    // --- leads ---
    /// Ordenados por `created_at` decrescente.
    async fn list_leads(&self, owner: Uuid) -> Result<Vec<Lead>, AppError>;
    async fn find_lead(&self, owner: Uuid, id: Uuid) -> Result<Option<Lead>, AppError>;
    async fn insert_lead(&self, owner: Uuid, lead: &NewLead) -> Result<Lead, AppError>;
    /// Insert em lote; devolve quantas linhas entraram.
    async fn insert_leads(&self, owner: Uuid, leads: &[NewLead]) -> Result<u64, AppError>;
    async fn update_lead_status(&self, owner: Uuid, id: Uuid, status: LeadStatus) -> Result<(), AppError>;

    // --- interações ---
    async fn list_interactions(&self, lead_id: Uuid) -> Result<Vec<Interaction>, AppError>;
    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<Interaction, AppError>;
}

// Monta o gateway a partir dos repositórios do Postgres
#[derive(Clone)]
pub struct PgGateway {
    users: UserRepository,
    leads: LeadRepository,
    interactions: InteractionRepository,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            leads: LeadRepository::new(pool.clone()),
            interactions: InteractionRepository::new(pool),
        }
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.users.create_user(email, password_hash).await
    }

    async fn list_leads(&self, owner: Uuid) -> Result<Vec<Lead>, AppError> {
        self.leads.list_by_owner(owner).await
    }

    async fn find_lead(&self, owner: Uuid, id: Uuid) -> Result<Option<Lead>, AppError> {
        self.leads.find_by_id(owner, id).await
    }

    async fn insert_lead(&self, owner: Uuid, lead: &NewLead) -> Result<Lead, AppError> {
        self.leads.create_lead(owner, lead).await
    }

    async fn insert_leads(&self, owner: Uuid, leads: &[NewLead]) -> Result<u64, AppError> {
        self.leads.bulk_insert(owner, leads).await
    }

    async fn update_lead_status(&self, owner: Uuid, id: Uuid, status: LeadStatus) -> Result<(), AppError> {
        self.leads.update_status(owner, id, status).await
    }

    async fn list_interactions(&self, lead_id: Uuid) -> Result<Vec<Interaction>, AppError> {
        self.interactions.list_by_lead(lead_id).await
    }

    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<Interaction, AppError> {
        self.interactions.create_interaction(interaction).await
    }
}
