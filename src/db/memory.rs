// src/db/memory.rs
//
// Gateway em memória para os testes: mesmas regras de escopo por dono do Postgres,
// com contador de escritas de status e injeção de falhas.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PersistenceGateway,
    models::{
        auth::User,
        interaction::{Interaction, NewInteraction},
        lead::{Lead, LeadStatus, NewLead},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    leads: Vec<Lead>,
    interactions: Vec<Interaction>,
    // Relógio lógico: cada insert fica 1s "mais novo" que o anterior
    ticks: i64,
}

impl Tables {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(self.ticks)
    }
}

#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    status_writes: AtomicUsize,
    bulk_inserts: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

fn unavailable() -> AppError {
    AppError::DatabaseError(sqlx::Error::PoolTimedOut)
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantas vezes `update_lead_status` foi chamado (com ou sem sucesso).
    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }

    pub fn bulk_inserts(&self) -> usize {
        self.bulk_inserts.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Estado "do servidor", ignorando qualquer cache.
    pub fn stored_leads(&self, owner: Uuid) -> Vec<Lead> {
        let tables = self.tables.lock().unwrap();
        let mut leads: Vec<Lead> = tables.leads.iter().filter(|l| l.user_id == owner).cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leads
    }

    /// Cria um lead direto na tabela (atalho para montar cenários)
    pub fn seed_lead(&self, owner: Uuid, name: &str, status: LeadStatus) -> Lead {
        let mut tables = self.tables.lock().unwrap();
        let lead = Lead {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            email: format!("{}@empresa.com", name.to_lowercase()),
            phone: "11999998888".to_string(),
            company: "Empresa XYZ".to_string(),
            role: "CEO".to_string(),
            status,
            source: "LinkedIn".to_string(),
            created_at: tables.next_timestamp(),
        };
        tables.leads.push(lead.clone());
        lead
    }

    fn check_write(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

fn build_lead(owner: Uuid, lead: &NewLead, created_at: DateTime<Utc>) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        user_id: owner,
        name: lead.name.clone(),
        email: lead.email.clone(),
        phone: lead.phone.clone(),
        company: lead.company.clone(),
        role: lead.role.clone(),
        status: lead.status,
        source: lead.source.clone(),
        created_at,
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.check_read()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.check_read()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let now = tables.next_timestamp();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_leads(&self, owner: Uuid) -> Result<Vec<Lead>, AppError> {
        self.check_read()?;
        Ok(self.stored_leads(owner))
    }

    async fn find_lead(&self, owner: Uuid, id: Uuid) -> Result<Option<Lead>, AppError> {
        self.check_read()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.leads.iter().find(|l| l.id == id && l.user_id == owner).cloned())
    }

    async fn insert_lead(&self, owner: Uuid, lead: &NewLead) -> Result<Lead, AppError> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let created_at = tables.next_timestamp();
        let created = build_lead(owner, lead, created_at);
        tables.leads.push(created.clone());
        Ok(created)
    }

    async fn insert_leads(&self, owner: Uuid, leads: &[NewLead]) -> Result<u64, AppError> {
        self.bulk_inserts.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        for lead in leads {
            let created_at = tables.next_timestamp();
            tables.leads.push(build_lead(owner, lead, created_at));
        }
        Ok(leads.len() as u64)
    }

    async fn update_lead_status(&self, owner: Uuid, id: Uuid, status: LeadStatus) -> Result<(), AppError> {
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        let lead = tables
            .leads
            .iter_mut()
            .find(|l| l.id == id && l.user_id == owner)
            .ok_or(AppError::LeadNotFound)?;
        lead.status = status;
        Ok(())
    }

    async fn list_interactions(&self, lead_id: Uuid) -> Result<Vec<Interaction>, AppError> {
        self.check_read()?;
        let tables = self.tables.lock().unwrap();
        let mut interactions: Vec<Interaction> =
            tables.interactions.iter().filter(|i| i.lead_id == lead_id).cloned().collect();
        interactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interactions)
    }

    async fn insert_interaction(&self, interaction: &NewInteraction) -> Result<Interaction, AppError> {
        self.check_write()?;
        let mut tables = self.tables.lock().unwrap();
        // FK: o lead precisa existir
        if !tables.leads.iter().any(|l| l.id == interaction.lead_id) {
            return Err(AppError::LeadNotFound);
        }
        let created = Interaction {
            id: Uuid::new_v4(),
            lead_id: interaction.lead_id,
            kind: interaction.kind,
            content: interaction.content.clone(),
            created_at: tables.next_timestamp(),
        };
        tables.interactions.push(created.clone());
        Ok(created)
    }
}
