// src/services/transfer.rs

use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PersistenceGateway,
    models::lead::{Lead, LeadCandidate, NewLead},
    services::{pipeline::PipelineStore, schema::validate_lead},
};

pub const REQUIRED_HEADERS: [&str; 6] = ["name", "email", "phone", "company", "role", "source"];

// Colunas exportadas: o formato cru da tabela `leads`
pub const EXPORT_COLUMNS: [&str; 10] = [
    "id", "user_id", "name", "email", "phone", "company", "role", "status", "source", "created_at",
];

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub type RawRow = BTreeMap<String, String>;

#[derive(Debug)]
pub struct ParsedFile {
    pub headers: Vec<String>,
    /// (linha no arquivo, valores por cabeçalho)
    pub rows: Vec<(u64, RawRow)>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub line: u64,
    pub row: RawRow,
    pub reason: String,
}

/// Separação explícita das linhas: as que entram e as descartadas (com motivo).
#[derive(Debug, Default)]
pub struct ImportPartition {
    pub valid: Vec<NewLead>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: u64,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug)]
pub enum ExportOutcome {
    /// Nada para exportar: não é erro, só um aviso.
    Empty,
    File { filename: String, bytes: Vec<u8> },
}

/// Lê o CSV usando a primeira linha como cabeçalho. Linhas vazias são ignoradas.
pub fn parse_csv(data: &[u8]) -> Result<ParsedFile, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim_start_matches('\u{feff}').to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RawRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push((line, row));
    }

    Ok(ParsedFile { headers, rows })
}

pub fn missing_headers(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_HEADERS
        .into_iter()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

fn candidate_from_row(row: &RawRow) -> LeadCandidate {
    let field = |name: &str| row.get(name).cloned().unwrap_or_default();
    LeadCandidate {
        name: field("name"),
        email: field("email"),
        phone: field("phone"),
        company: field("company"),
        role: field("role"),
        source: field("source"),
        status: row.get("status").filter(|s| !s.trim().is_empty()).cloned(),
    }
}

/// Valida linha a linha; linha inválida é descartada, o lote continua.
pub fn partition_rows(rows: Vec<(u64, RawRow)>) -> ImportPartition {
    let mut partition = ImportPartition::default();
    for (line, row) in rows {
        match validate_lead(&candidate_from_row(&row)) {
            Ok(lead) => partition.valid.push(lead),
            Err(e) => {
                tracing::debug!("Linha {} descartada: {}", line, e.reason());
                partition.rejected.push(RejectedRow {
                    line,
                    reason: e.reason(),
                    row,
                });
            }
        }
    }
    partition
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("leads_{}.xlsx", date.format("%Y-%m-%d"))
}

fn export_cell(lead: &Lead, column: &str) -> String {
    match column {
        "id" => lead.id.to_string(),
        "user_id" => lead.user_id.to_string(),
        "name" => lead.name.clone(),
        "email" => lead.email.clone(),
        "phone" => lead.phone.clone(),
        "company" => lead.company.clone(),
        "role" => lead.role.clone(),
        "status" => lead.status.to_string(),
        "source" => lead.source.clone(),
        "created_at" => lead.created_at.to_rfc3339(),
        _ => String::new(),
    }
}

/// Planilha com uma aba "Leads": cabeçalho + uma linha por lead, sem filtro.
pub fn build_workbook(leads: &[Lead]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Leads")?;

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (row, lead) in leads.iter().enumerate() {
        for (col, column) in EXPORT_COLUMNS.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, export_cell(lead, column))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[derive(Clone)]
pub struct TransferService {
    gateway: Arc<dyn PersistenceGateway>,
    pipeline: PipelineStore,
}

impl TransferService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, pipeline: PipelineStore) -> Self {
        Self { gateway, pipeline }
    }

    /// Importa um CSV: tudo ou nada quanto aos cabeçalhos, linha a linha quanto aos dados.
    pub async fn import_csv(&self, owner: Uuid, data: &[u8]) -> Result<ImportReport, AppError> {
        let parsed = parse_csv(data)?;

        let missing = missing_headers(&parsed.headers);
        if !missing.is_empty() {
            return Err(AppError::FileFormat(format!(
                "Cabeçalhos faltando: {}",
                missing.join(", ")
            )));
        }

        let partition = partition_rows(parsed.rows);
        if partition.valid.is_empty() {
            return Err(AppError::NoValidLeads);
        }

        let imported = self.gateway.insert_leads(owner, &partition.valid).await?;
        self.pipeline.invalidate(owner).await;

        tracing::info!(
            "📥 {} leads importados para {} ({} linhas descartadas)",
            imported,
            owner,
            partition.rejected.len()
        );

        Ok(ImportReport {
            imported,
            rejected: partition.rejected,
        })
    }

    pub async fn export_xlsx(&self, owner: Uuid) -> Result<ExportOutcome, AppError> {
        let leads = self.gateway.list_leads(owner).await?;
        if leads.is_empty() {
            return Ok(ExportOutcome::Empty);
        }

        let bytes = build_workbook(&leads)?;
        let filename = export_filename(Utc::now().date_naive());
        tracing::info!("📤 {} leads exportados para {}", leads.len(), filename);

        Ok(ExportOutcome::File { filename, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryGateway;
    use crate::models::lead::LeadStatus;

    fn service() -> (Arc<MemoryGateway>, TransferService) {
        let gateway = Arc::new(MemoryGateway::new());
        let pipeline = PipelineStore::new(gateway.clone());
        (gateway.clone(), TransferService::new(gateway, pipeline))
    }

    const FIVE_ROWS: &str = "\
name,email,phone,company,role,source,status
Ana,ana@empresa.com,11999998888,Acme,CEO,LinkedIn,
Bruno,bruno@empresa.com,1133334444,Acme,CTO,Website,negotiation
,sem-nome@empresa.com,1133334444,Acme,CTO,Website,
Carla,email-ruim,1133334444,Acme,CFO,Evento,
Davi,davi@empresa.com,11988887777,Beta,COO,Indicação,closed
";

    #[test]
    fn parses_rows_keyed_by_header() {
        let parsed = parse_csv(FIVE_ROWS.as_bytes()).unwrap();
        assert_eq!(parsed.headers.len(), 7);
        assert_eq!(parsed.rows.len(), 5);
        assert_eq!(parsed.rows[0].1["name"], "Ana");
        assert_eq!(parsed.rows[1].1["status"], "negotiation");
    }

    #[test]
    fn partition_splits_valid_and_rejected() {
        let parsed = parse_csv(FIVE_ROWS.as_bytes()).unwrap();
        let partition = partition_rows(parsed.rows);

        assert_eq!(partition.valid.len(), 3);
        assert_eq!(partition.rejected.len(), 2);
        assert_eq!(partition.valid[0].status, LeadStatus::New);
        assert_eq!(partition.valid[1].status, LeadStatus::Negotiation);
        assert!(partition.rejected[0].reason.contains("Nome é obrigatório"));
        assert!(partition.rejected[1].reason.contains("Email inválido"));
        assert_eq!(partition.rejected[1].row["name"], "Carla");
    }

    #[test]
    fn reports_missing_headers() {
        let headers: Vec<String> = ["name", "email", "phone", "company", "role"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(missing_headers(&headers), vec!["source"]);
    }

    #[tokio::test]
    async fn import_without_source_header_inserts_nothing() {
        let (gateway, service) = service();
        let owner = Uuid::new_v4();
        let csv = "name,email,phone,company,role\nAna,ana@empresa.com,11999998888,Acme,CEO\n";

        let err = service.import_csv(owner, csv.as_bytes()).await.unwrap_err();

        match err {
            AppError::FileFormat(message) => assert!(message.contains("source")),
            other => panic!("erro inesperado: {:?}", other),
        }
        assert_eq!(gateway.bulk_inserts(), 0);
        assert!(gateway.stored_leads(owner).is_empty());
    }

    #[tokio::test]
    async fn import_inserts_only_valid_rows_tagged_with_owner() {
        let (gateway, service) = service();
        let owner = Uuid::new_v4();

        let report = service.import_csv(owner, FIVE_ROWS.as_bytes()).await.unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(gateway.bulk_inserts(), 1);
        let stored = gateway.stored_leads(owner);
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|l| l.user_id == owner));
    }

    #[tokio::test]
    async fn import_with_no_valid_rows_fails_without_write() {
        let (gateway, service) = service();
        let csv = "name,email,phone,company,role,source\n,x,1,,,\n";

        let err = service.import_csv(Uuid::new_v4(), csv.as_bytes()).await.unwrap_err();

        assert!(matches!(err, AppError::NoValidLeads));
        assert_eq!(gateway.bulk_inserts(), 0);
    }

    #[tokio::test]
    async fn imported_leads_round_trip_through_load() {
        let (gateway, service) = service();
        let owner = Uuid::new_v4();
        let csv = "name,email,phone,company,role,source,status\n\
                   Ana,ana@empresa.com,(11) 99999-8888,Acme,CEO,LinkedIn,contacted\n";

        service.import_csv(owner, csv.as_bytes()).await.unwrap();

        let store = PipelineStore::new(gateway);
        let leads = store.load(Some(owner)).await.unwrap();
        let lead = &leads[0];
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.email, "ana@empresa.com");
        assert_eq!(lead.phone, "(11) 99999-8888");
        assert_eq!(lead.company, "Acme");
        assert_eq!(lead.role, "CEO");
        assert_eq!(lead.source, "LinkedIn");
        assert_eq!(lead.status, LeadStatus::Contacted);
    }

    #[tokio::test]
    async fn import_invalidates_pipeline_cache() {
        let gateway = Arc::new(MemoryGateway::new());
        let pipeline = PipelineStore::new(gateway.clone());
        let service = TransferService::new(gateway, pipeline.clone());
        let owner = Uuid::new_v4();
        pipeline.load(Some(owner)).await.unwrap();

        service.import_csv(owner, FIVE_ROWS.as_bytes()).await.unwrap();

        assert!(pipeline.cached(owner).await.is_none());
        assert_eq!(pipeline.current(owner).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn export_of_empty_collection_is_not_an_error() {
        let (_, service) = service();
        let outcome = service.export_xlsx(Uuid::new_v4()).await.unwrap();
        assert!(matches!(outcome, ExportOutcome::Empty));
    }

    #[tokio::test]
    async fn export_builds_dated_workbook() {
        let (gateway, service) = service();
        let owner = Uuid::new_v4();
        gateway.seed_lead(owner, "Ana", LeadStatus::Lost);

        let ExportOutcome::File { filename, bytes } = service.export_xlsx(owner).await.unwrap() else {
            panic!("esperava um arquivo");
        };

        assert_eq!(filename, export_filename(Utc::now().date_naive()));
        assert!(filename.starts_with("leads_") && filename.ends_with(".xlsx"));
        // xlsx é um zip
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn export_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "leads_2024-03-07.xlsx");
    }

    #[test]
    fn export_cells_keep_raw_values() {
        let lead = Lead {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: "Ana".into(),
            email: "ana@empresa.com".into(),
            phone: "11999998888".into(),
            company: "Acme".into(),
            role: "CEO".into(),
            status: LeadStatus::Negotiation,
            source: "LinkedIn".into(),
            created_at: Utc::now(),
        };
        assert_eq!(export_cell(&lead, "status"), "negotiation");
        assert_eq!(export_cell(&lead, "phone"), "11999998888");
        assert_eq!(export_cell(&lead, "created_at"), lead.created_at.to_rfc3339());
    }
}
