// src/models/interaction.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::lead::Lead;

// Mapeia o CREATE TYPE interaction_type do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "interaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Call,
    Email,
    Meeting,
    Note,
}

impl InteractionType {
    pub const ALL: [InteractionType; 4] = [
        InteractionType::Call,
        InteractionType::Email,
        InteractionType::Meeting,
        InteractionType::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Call => "call",
            InteractionType::Email => "email",
            InteractionType::Meeting => "meeting",
            InteractionType::Note => "note",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InteractionType::Call => "Ligação",
            InteractionType::Email => "Email",
            InteractionType::Meeting => "Reunião",
            InteractionType::Note => "Nota",
        }
    }
}

impl FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("tipo de interação desconhecido: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub lead_id: Uuid,

    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: InteractionType,

    pub content: String,
    pub created_at: DateTime<Utc>,
}

// Candidato vindo do formulário do painel de detalhes
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionCandidate {
    #[validate(custom(function = "validate_uuid"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub lead_id: String,

    #[serde(rename = "type")]
    #[validate(custom(function = "validate_interaction_type"))]
    #[schema(example = "note")]
    pub kind: String,

    #[validate(length(min = 1, message = "Conteúdo é obrigatório"))]
    #[schema(example = "Cliente pediu proposta até sexta.")]
    pub content: String,
}

fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_uuid").with_message("Lead inválido".into()))
}

fn validate_interaction_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<InteractionType>().map(|_| ()).map_err(|_| {
        ValidationError::new("invalid_type").with_message("Tipo de interação inválido".into())
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub lead_id: Uuid,
    pub kind: InteractionType,
    pub content: String,
}

// Corpo do POST: o lead vem da rota
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInteractionPayload {
    #[serde(rename = "type", default)]
    #[schema(example = "call")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

// Item do histórico: a interação com o rótulo do tipo para exibição
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEntry {
    #[serde(flatten)]
    pub interaction: Interaction,
    #[schema(example = "Ligação")]
    pub type_label: String,
}

impl From<Interaction> for InteractionEntry {
    fn from(interaction: Interaction) -> Self {
        let type_label = interaction.kind.label().to_string();
        Self { interaction, type_label }
    }
}

// Painel de detalhes: lead + histórico (mais recente primeiro)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: Lead,
    pub phone_formatted: String,
    pub interactions: Vec<InteractionEntry>,
}
