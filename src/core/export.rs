use crate::domain::model::{ExportArtifact, ExportFormat, ReportId};
use crate::domain::ports::Storage;
use crate::utils::dates::ISO_DATE_FORMAT;
use crate::utils::error::Result;
use chrono::NaiveDate;

pub const CSV_MIME_TYPE: &str = "text/csv";

/// `{report}_report_{YYYY-MM-DD}.csv`. XLSX is not produced; it falls back to CSV.
pub fn export_filename(report: ReportId, today: NaiveDate, format: ExportFormat) -> String {
    if format == ExportFormat::Xlsx {
        tracing::warn!("⚠️ XLSX export is not available, falling back to CSV");
    }
    format!("{}_report_{}.csv", report, today.format(ISO_DATE_FORMAT))
}

pub fn build_artifact(
    report: ReportId,
    today: NaiveDate,
    format: ExportFormat,
    body: String,
) -> ExportArtifact {
    ExportArtifact {
        filename: export_filename(report, today, format),
        mime_type: CSV_MIME_TYPE.to_string(),
        body,
    }
}

/// Hands the finished artifact to the storage backend.
pub struct ExportTrigger<S: Storage> {
    storage: S,
}

impl<S: Storage> ExportTrigger<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn trigger(&self, artifact: &ExportArtifact) -> Result<String> {
        tracing::debug!(
            "💾 Writing {} ({}, {} bytes)",
            artifact.filename,
            artifact.mime_type,
            artifact.body.len()
        );
        self.storage
            .write_file(&artifact.filename, artifact.body.as_bytes())
            .await
    }
}
