// src/services/lead_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::{format_phone, phone_digits}},
    db::PersistenceGateway,
    models::{
        interaction::{InteractionCandidate, InteractionEntry, LeadDetail},
        lead::{Lead, LeadCandidate},
    },
    services::schema::{validate_interaction, validate_lead},
};

// Formulário "Novo Lead" e painel de detalhes
#[derive(Clone)]
pub struct LeadService {
    gateway: Arc<dyn PersistenceGateway>,
}

impl LeadService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// O formulário guarda só os dígitos do telefone; a validação roda depois disso.
    pub async fn create_lead(&self, owner: Uuid, mut candidate: LeadCandidate) -> Result<Lead, AppError> {
        candidate.phone = phone_digits(&candidate.phone);
        let new_lead = validate_lead(&candidate)?;

        let lead = self.gateway.insert_lead(owner, &new_lead).await?;
        tracing::info!("➕ Lead {} criado para o usuário {}", lead.id, owner);
        Ok(lead)
    }

    async fn owned_lead(&self, owner: Uuid, lead_id: Uuid) -> Result<Lead, AppError> {
        self.gateway
            .find_lead(owner, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)
    }

    /// Lead + histórico de interações (mais recente primeiro)
    pub async fn get_detail(&self, owner: Uuid, lead_id: Uuid) -> Result<LeadDetail, AppError> {
        let lead = self.owned_lead(owner, lead_id).await?;
        let interactions = self.list_entries(lead.id).await?;

        Ok(LeadDetail {
            phone_formatted: format_phone(&lead.phone),
            lead,
            interactions,
        })
    }

    async fn list_entries(&self, lead_id: Uuid) -> Result<Vec<InteractionEntry>, AppError> {
        let interactions = self.gateway.list_interactions(lead_id).await?;
        Ok(interactions.into_iter().map(InteractionEntry::from).collect())
    }

    pub async fn list_interactions(&self, owner: Uuid, lead_id: Uuid) -> Result<Vec<InteractionEntry>, AppError> {
        let lead = self.owned_lead(owner, lead_id).await?;
        self.list_entries(lead.id).await
    }

    pub async fn add_interaction(
        &self,
        owner: Uuid,
        candidate: InteractionCandidate,
    ) -> Result<InteractionEntry, AppError> {
        let new_interaction = validate_interaction(&candidate)?;

        // A interação herda o dono do lead: só registra em lead próprio
        self.owned_lead(owner, new_interaction.lead_id).await?;

        let interaction = self.gateway.insert_interaction(&new_interaction).await?;
        Ok(interaction.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryGateway;
    use crate::models::{interaction::InteractionType, lead::LeadStatus};
    use crate::services::schema::SchemaError;

    fn form() -> LeadCandidate {
        LeadCandidate {
            name: "João Silva".into(),
            email: "joao@empresa.com".into(),
            phone: "(11) 99999-8888".into(),
            company: "Empresa XYZ".into(),
            role: "CEO".into(),
            source: "Website".into(),
            status: None,
        }
    }

    #[tokio::test]
    async fn form_stores_phone_digits() {
        let gateway = Arc::new(MemoryGateway::new());
        let service = LeadService::new(gateway.clone());
        let owner = Uuid::new_v4();

        let lead = service.create_lead(owner, form()).await.unwrap();
        assert_eq!(lead.phone, "11999998888");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.user_id, owner);
    }

    #[tokio::test]
    async fn form_rejects_short_phone_after_stripping() {
        let service = LeadService::new(Arc::new(MemoryGateway::new()));
        let mut candidate = form();
        candidate.phone = "(11) 9999".into();

        let err = service.create_lead(Uuid::new_v4(), candidate).await.unwrap_err();
        assert!(matches!(err, AppError::Schema(SchemaError::InvalidLead(_))));
    }

    #[tokio::test]
    async fn detail_includes_history_newest_first() {
        let gateway = Arc::new(MemoryGateway::new());
        let service = LeadService::new(gateway.clone());
        let owner = Uuid::new_v4();
        let lead = gateway.seed_lead(owner, "Ana", LeadStatus::Contacted);

        for (kind, content) in [("call", "Primeira ligação"), ("email", "Proposta enviada")] {
            service
                .add_interaction(
                    owner,
                    InteractionCandidate {
                        lead_id: lead.id.to_string(),
                        kind: kind.into(),
                        content: content.into(),
                    },
                )
                .await
                .unwrap();
        }

        let detail = service.get_detail(owner, lead.id).await.unwrap();
        assert_eq!(detail.lead, lead);
        assert_eq!(detail.phone_formatted, "(11) 99999-8888");
        assert_eq!(detail.interactions.len(), 2);
        assert_eq!(detail.interactions[0].interaction.kind, InteractionType::Email);
        assert_eq!(detail.interactions[1].interaction.content, "Primeira ligação");
        assert_eq!(detail.interactions[1].type_label, "Ligação");
    }

    #[tokio::test]
    async fn other_owners_cannot_see_or_annotate() {
        let gateway = Arc::new(MemoryGateway::new());
        let service = LeadService::new(gateway.clone());
        let lead = gateway.seed_lead(Uuid::new_v4(), "Ana", LeadStatus::New);
        let intruder = Uuid::new_v4();

        assert!(matches!(
            service.get_detail(intruder, lead.id).await,
            Err(AppError::LeadNotFound)
        ));

        let result = service
            .add_interaction(
                intruder,
                InteractionCandidate {
                    lead_id: lead.id.to_string(),
                    kind: "note".into(),
                    content: "não devia".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::LeadNotFound)));
        assert!(gateway.list_interactions(lead.id).await.unwrap().is_empty());
    }
}
