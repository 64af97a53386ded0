// src/services/schema.rs

use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{
    interaction::{InteractionCandidate, InteractionType, NewInteraction},
    lead::{LeadCandidate, LeadStatus, NewLead},
};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Lead inválido")]
    InvalidLead(ValidationErrors),

    #[error("Interação inválida")]
    InvalidInteraction(ValidationErrors),
}

impl SchemaError {
    /// Resumo legível ("phone: Telefone inválido; email: Email inválido").
    pub fn reason(&self) -> String {
        let errors = match self {
            SchemaError::InvalidLead(e) | SchemaError::InvalidInteraction(e) => e,
        };
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        parts.sort();
        parts.join("; ")
    }
}

/// Valida um lead candidato e devolve o registro normalizado.
///
/// Função pura: mesma entrada, mesmo veredito. Status ausente ou em branco vira `new`.
pub fn validate_lead(candidate: &LeadCandidate) -> Result<NewLead, SchemaError> {
    candidate.validate().map_err(SchemaError::InvalidLead)?;

    let status = match candidate.status.as_deref().map(str::trim) {
        None | Some("") => LeadStatus::New,
        // O validador já garantiu que o texto é um dos cinco estágios
        Some(s) => s.parse().unwrap_or_default(),
    };

    Ok(NewLead {
        name: candidate.name.clone(),
        email: candidate.email.clone(),
        phone: candidate.phone.clone(),
        company: candidate.company.clone(),
        role: candidate.role.clone(),
        source: candidate.source.clone(),
        status,
    })
}

pub fn validate_interaction(candidate: &InteractionCandidate) -> Result<NewInteraction, SchemaError> {
    candidate.validate().map_err(SchemaError::InvalidInteraction)?;

    // Já validados acima; o fallback nunca é usado
    let lead_id = Uuid::parse_str(&candidate.lead_id).unwrap_or_default();
    let kind = candidate.kind.parse().unwrap_or(InteractionType::Note);

    Ok(NewInteraction {
        lead_id,
        kind,
        content: candidate.content.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> LeadCandidate {
        LeadCandidate {
            name: "Ana".into(),
            email: "a@b.com".into(),
            phone: "1234567890".into(),
            company: "X".into(),
            role: "Y".into(),
            source: "Z".into(),
            status: None,
        }
    }

    #[test]
    fn accepts_valid_lead_and_defaults_status() {
        let lead = validate_lead(&candidate()).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.phone, "1234567890");
    }

    #[test]
    fn blank_status_defaults_to_new() {
        let mut c = candidate();
        c.status = Some("  ".into());
        assert_eq!(validate_lead(&c).unwrap().status, LeadStatus::New);

        c.status = Some("closed".into());
        assert_eq!(validate_lead(&c).unwrap().status, LeadStatus::Closed);
    }

    #[test]
    fn rejects_empty_name() {
        let mut c = candidate();
        c.name = String::new();
        let err = validate_lead(&c).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidLead(_)));
        assert_eq!(err.reason(), "name: Nome é obrigatório");
    }

    #[test]
    fn rejects_bad_email() {
        let mut c = candidate();
        c.email = "bad".into();
        let err = validate_lead(&c).unwrap_err();
        assert!(err.reason().contains("Email inválido"));
    }

    #[test]
    fn rejects_short_phone_and_blank_fields() {
        let mut c = candidate();
        c.phone = "123456789".into();
        c.company = String::new();
        c.role = String::new();
        c.source = String::new();
        let err = validate_lead(&c).unwrap_err();
        let SchemaError::InvalidLead(errors) = err else {
            panic!("esperava InvalidLead");
        };
        let fields = errors.field_errors();
        for field in ["phone", "company", "role", "source"] {
            assert!(fields.contains_key(field), "faltou {}", field);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let mut c = candidate();
        c.status = Some("won".into());
        assert!(validate_lead(&c).is_err());
    }

    #[test]
    fn verdict_is_deterministic() {
        let mut c = candidate();
        c.email = "nope".into();
        let first = validate_lead(&c).unwrap_err().reason();
        let second = validate_lead(&c).unwrap_err().reason();
        assert_eq!(first, second);
        assert_eq!(validate_lead(&candidate()).unwrap(), validate_lead(&candidate()).unwrap());
    }

    #[test]
    fn validates_interactions() {
        let lead_id = Uuid::new_v4();
        let ok = InteractionCandidate {
            lead_id: lead_id.to_string(),
            kind: "meeting".into(),
            content: "Reunião de kickoff".into(),
        };
        let interaction = validate_interaction(&ok).unwrap();
        assert_eq!(interaction.lead_id, lead_id);
        assert_eq!(interaction.kind, InteractionType::Meeting);

        let bad_id = InteractionCandidate { lead_id: "123".into(), ..ok.clone() };
        assert!(matches!(
            validate_interaction(&bad_id),
            Err(SchemaError::InvalidInteraction(_))
        ));

        let bad_type = InteractionCandidate { kind: "sms".into(), ..ok.clone() };
        assert!(validate_interaction(&bad_type).is_err());

        let empty = InteractionCandidate { content: String::new(), ..ok };
        assert!(validate_interaction(&empty).is_err());
    }
}
