// src/db/interaction_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::interaction::{Interaction, NewInteraction},
};

#[derive(Clone)]
pub struct InteractionRepository {
    pool: PgPool,
}

impl InteractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Histórico do lead, mais recente primeiro
    pub async fn list_by_lead(&self, lead_id: Uuid) -> Result<Vec<Interaction>, AppError> {
        let interactions = sqlx::query_as::<_, Interaction>(
            r#"
            SELECT id, lead_id, type, content, created_at
            FROM interactions
            WHERE lead_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(interactions)
    }

    pub async fn create_interaction(&self, interaction: &NewInteraction) -> Result<Interaction, AppError> {
        let created = sqlx::query_as::<_, Interaction>(
            r#"
            INSERT INTO interactions (lead_id, type, content)
            VALUES ($1, $2, $3)
            RETURNING id, lead_id, type, content, created_at
            "#,
        )
        .bind(interaction.lead_id)
        .bind(interaction.kind)
        .bind(&interaction.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
