// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::format::format_phone;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco.
// Os cinco estágios do pipeline; nenhum outro valor existe em repouso ou em trânsito.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Negotiation,
    Closed,
    Lost,
}

impl LeadStatus {
    /// Ordem das colunas no quadro.
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Negotiation,
        LeadStatus::Closed,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Closed => "closed",
            LeadStatus::Lost => "lost",
        }
    }

    /// Título da coluna no quadro.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "Novos",
            LeadStatus::Contacted => "Contatados",
            LeadStatus::Negotiation => "Em Negociação",
            LeadStatus::Closed => "Fechados",
            LeadStatus::Lost => "Perdidos",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("status desconhecido: {}", s))
    }
}

// --- LEAD (linha da tabela `leads`) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Uuid,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub role: String,

    pub status: LeadStatus,
    pub source: String, // Canal livre: "Website", "LinkedIn"...

    pub created_at: DateTime<Utc>,
}

// Cartão do quadro: o lead com o telefone já formatado para exibição
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadCard {
    #[serde(flatten)]
    pub lead: Lead,
    pub phone_formatted: String,
}

impl From<Lead> for LeadCard {
    fn from(lead: Lead) -> Self {
        let phone_formatted = format_phone(&lead.phone);
        Self { lead, phone_formatted }
    }
}

// --- CANDIDATO (formulário ou linha de importação, ainda não validado) ---

// Tudo como texto: campos ausentes viram "" e caem na validação,
// em vez de serem rejeitados pelo desserializador.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadCandidate {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    #[schema(example = "João Silva")]
    pub name: String,

    #[validate(email(message = "Email inválido"))]
    #[schema(example = "joao@empresa.com")]
    pub email: String,

    #[validate(length(min = 10, message = "Telefone inválido"))]
    #[schema(example = "11999998888")]
    pub phone: String,

    #[validate(length(min = 1, message = "Empresa é obrigatória"))]
    #[schema(example = "Empresa XYZ")]
    pub company: String,

    #[validate(length(min = 1, message = "Cargo é obrigatório"))]
    #[schema(example = "CEO")]
    pub role: String,

    #[validate(length(min = 1, message = "Origem é obrigatória"))]
    #[schema(example = "LinkedIn")]
    pub source: String,

    // Em branco ou ausente => "new"
    #[validate(custom(function = "validate_status"))]
    #[schema(example = "new")]
    pub status: Option<String>,
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<LeadStatus>().is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("invalid_status").with_message("Status inválido".into()))
}

// --- LEAD NORMALIZADO (pronto para o INSERT) ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub role: String,
    pub source: String,
    pub status: LeadStatus,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveLeadPayload {
    #[schema(example = "negotiation")]
    pub status: LeadStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum MoveOutcome {
    /// Mesmo estágio: nada foi escrito.
    Unchanged,
    Moved { from: LeadStatus, to: LeadStatus },
}
