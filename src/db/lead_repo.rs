// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadStatus, NewLead},
};

// Colunas explícitas, na ordem do struct `Lead`
const LEAD_COLUMNS: &str = "id, user_id, name, email, phone, company, role, status, source, created_at";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todos os leads do dono, do mais novo para o mais antigo
    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {} FROM leads WHERE user_id = $1 ORDER BY created_at DESC",
            LEAD_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    pub async fn find_by_id(&self, owner: Uuid, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {} FROM leads WHERE id = $1 AND user_id = $2",
            LEAD_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lead)
    }

    /// Cria um lead (formulário "Novo Lead")
    pub async fn create_lead(&self, owner: Uuid, lead: &NewLead) -> Result<Lead, AppError> {
        let created = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (user_id, name, email, phone, company, role, status, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(owner)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(&lead.role)
        .bind(lead.status)
        .bind(&lead.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Insert em lote da importação: um único comando, um array por coluna.
    /// O número de parâmetros não cresce com o número de linhas.
    pub async fn bulk_insert(&self, owner: Uuid, leads: &[NewLead]) -> Result<u64, AppError> {
        if leads.is_empty() {
            return Ok(0);
        }

        let columns = LeadColumns::from_leads(leads);

        let result = sqlx::query(
            r#"
            INSERT INTO leads (user_id, name, email, phone, company, role, status, source)
            SELECT $1, t.name, t.email, t.phone, t.company, t.role, t.status::lead_status, t.source
            FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[], $8::text[])
                AS t(name, email, phone, company, role, status, source)
            "#,
        )
        .bind(owner)
        .bind(columns.names)
        .bind(columns.emails)
        .bind(columns.phones)
        .bind(columns.companies)
        .bind(columns.roles)
        .bind(columns.statuses)
        .bind(columns.sources)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Muda o estágio do lead (arrastar e soltar no quadro)
    pub async fn update_status(&self, owner: Uuid, id: Uuid, status: LeadStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE leads SET status = $1 WHERE id = $2 AND user_id = $3")
            .bind(status)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::LeadNotFound);
        }

        Ok(())
    }
}

// Lote transposto: uma coluna por parâmetro do UNNEST, na ordem das linhas
#[derive(Debug, Default)]
struct LeadColumns {
    names: Vec<String>,
    emails: Vec<String>,
    phones: Vec<String>,
    companies: Vec<String>,
    roles: Vec<String>,
    statuses: Vec<String>,
    sources: Vec<String>,
}

impl LeadColumns {
    fn from_leads(leads: &[NewLead]) -> Self {
        let mut columns = LeadColumns::default();
        for lead in leads {
            columns.names.push(lead.name.clone());
            columns.emails.push(lead.email.clone());
            columns.phones.push(lead.phone.clone());
            columns.companies.push(lead.company.clone());
            columns.roles.push(lead.role.clone());
            columns.statuses.push(lead.status.as_str().to_string());
            columns.sources.push(lead.source.clone());
        }
        columns
    }
}
