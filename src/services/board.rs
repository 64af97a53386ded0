// src/services/board.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead::{Lead, LeadCard, LeadStatus};

// Ativação do arraste: distância mínima com mouse, pressão longa no toque.
// Separa "arrastar" de "clicar para abrir os detalhes".
pub const POINTER_ACTIVATION_DISTANCE: f64 = 8.0;
pub const TOUCH_ACTIVATION_DELAY: Duration = Duration::from_millis(200);
pub const TOUCH_ACTIVATION_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationConstraint {
    Distance { min: f64 },
    Delay { delay: Duration, tolerance: f64 },
}

impl ActivationConstraint {
    pub fn pointer() -> Self {
        ActivationConstraint::Distance { min: POINTER_ACTIVATION_DISTANCE }
    }

    pub fn touch() -> Self {
        ActivationConstraint::Delay {
            delay: TOUCH_ACTIVATION_DELAY,
            tolerance: TOUCH_ACTIVATION_TOLERANCE,
        }
    }

    /// `travel` é quanto o ponteiro andou desde o início, `held` há quanto tempo está pressionado.
    pub fn is_satisfied(&self, travel: f64, held: Duration) -> bool {
        match *self {
            ActivationConstraint::Distance { min } => travel >= min,
            // Mexer mais que a tolerância antes do tempo cancela a pressão longa
            ActivationConstraint::Delay { delay, tolerance } => held >= delay && travel <= tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { active_lead_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum DropOutcome {
    /// Soltou numa coluna diferente: vira um `move_lead`.
    Move {
        #[serde(rename = "leadId")]
        lead_id: Uuid,
        from: LeadStatus,
        to: LeadStatus,
    },
    /// Soltou na própria coluna.
    NoOp,
    /// Fora de qualquer coluna, ou nada sendo arrastado.
    Cancelled,
}

impl DragState {
    pub fn start(&mut self, lead_id: Uuid) {
        *self = DragState::Dragging { active_lead_id: lead_id };
    }

    pub fn active(&self) -> Option<Uuid> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { active_lead_id } => Some(*active_lead_id),
        }
    }

    /// Fim do gesto (soltar ou cancelar). Sempre volta para `Idle`.
    pub fn end(&mut self, target: Option<LeadStatus>, leads: &[Lead]) -> DropOutcome {
        let active = self.active();
        *self = DragState::Idle;

        let (Some(lead_id), Some(to)) = (active, target) else {
            return DropOutcome::Cancelled;
        };
        let Some(lead) = leads.iter().find(|lead| lead.id == lead_id) else {
            return DropOutcome::Cancelled;
        };

        if lead.status == to {
            DropOutcome::NoOp
        } else {
            DropOutcome::Move { lead_id, from: lead.status, to }
        }
    }
}

// Evento de "soltar" enviado pelo cliente
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub lead_id: Uuid,
    /// Coluna sob o cartão; ausente = soltou fora.
    pub target_status: Option<LeadStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: LeadStatus,
    pub title: String,
    pub leads: Vec<LeadCard>,
}

/// Agrupa a lista (já ordenada por data decrescente) nas cinco colunas.
pub fn columns(leads: &[Lead]) -> Vec<BoardColumn> {
    LeadStatus::ALL
        .into_iter()
        .map(|status| BoardColumn {
            status,
            title: status.label().to_string(),
            leads: leads
                .iter()
                .filter(|lead| lead.status == status)
                .cloned()
                .map(LeadCard::from)
                .collect(),
        })
        .collect()
}
