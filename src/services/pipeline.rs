// src/services/pipeline.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PersistenceGateway,
    models::lead::{Lead, LeadStatus, MoveOutcome},
    services::optimistic::QueryCache,
};

/// Store do pipeline: a lista de leads de cada usuário, em cache por dono,
/// com mudança de estágio otimista.
#[derive(Clone)]
pub struct PipelineStore {
    gateway: Arc<dyn PersistenceGateway>,
    cache: Arc<QueryCache<Uuid, Vec<Lead>>>,
}

impl PipelineStore {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            cache: Arc::new(QueryCache::new()),
        }
    }

    /// Carrega (e guarda em cache) os leads do usuário da sessão.
    /// Sem sessão devolve lista vazia, não erro.
    pub async fn load(&self, session: Option<Uuid>) -> Result<Arc<Vec<Lead>>, AppError> {
        let Some(owner) = session else {
            return Ok(Arc::new(Vec::new()));
        };
        let leads = self.gateway.list_leads(owner).await?;
        Ok(self.cache.set(owner, leads).await)
    }

    /// O que está em cache, sem ir ao banco
    pub async fn cached(&self, owner: Uuid) -> Option<Arc<Vec<Lead>>> {
        self.cache.get(&owner).await
    }

    /// Cache se houver, senão carrega
    pub async fn current(&self, owner: Uuid) -> Result<Arc<Vec<Lead>>, AppError> {
        match self.cache.get(&owner).await {
            Some(leads) => Ok(leads),
            None => self.load(Some(owner)).await,
        }
    }

    pub async fn invalidate(&self, owner: Uuid) {
        self.cache.invalidate(&owner).await;
    }

    /// Move um lead de estágio.
    ///
    /// O cache mostra a mudança antes da escrita sair; se a escrita falhar a foto
    /// anterior volta intacta. Em qualquer desfecho a lista é recarregada do banco.
    pub async fn move_lead(
        &self,
        owner: Uuid,
        lead_id: Uuid,
        new_status: LeadStatus,
    ) -> Result<MoveOutcome, AppError> {
        let leads = self.current(owner).await?;
        let from = leads
            .iter()
            .find(|lead| lead.id == lead_id)
            .map(|lead| lead.status)
            .ok_or(AppError::LeadNotFound)?;

        // Mesmo estágio: nada de escrita, cache intacto
        if from == new_status {
            return Ok(MoveOutcome::Unchanged);
        }

        let result = self
            .cache
            .mutate(
                &owner,
                leads.clone(),
                |leads| with_status(leads, lead_id, new_status),
                || self.gateway.update_lead_status(owner, lead_id, new_status),
            )
            .await;

        match &result {
            Ok(()) => tracing::info!("🔀 Lead {} movido de {} para {}", lead_id, from, new_status),
            Err(e) => tracing::warn!("↩️ Falha ao mover lead {}, revertendo: {}", lead_id, e),
        }

        // Reconciliação: vale o que está no banco
        if let Err(e) = self.load(Some(owner)).await {
            tracing::warn!("Falha ao recarregar leads de {}: {}", owner, e);
        }

        result.map(|_| MoveOutcome::Moved { from, to: new_status })
    }
}

// Cópia da lista com só o lead alvo alterado
fn with_status(leads: &[Lead], lead_id: Uuid, status: LeadStatus) -> Vec<Lead> {
    leads
        .iter()
        .map(|lead| {
            if lead.id == lead_id {
                Lead { status, ..lead.clone() }
            } else {
                lead.clone()
            }
        })
        .collect()
}
