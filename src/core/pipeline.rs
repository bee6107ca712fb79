use crate::core::export::{build_artifact, ExportTrigger};
use crate::core::fetcher::DataFetcher;
use crate::core::projector::{project_sections, projected_columns};
use crate::core::serializer::serialize_sections;
use crate::core::session::ReportSession;
use crate::core::transform::transform;
use crate::domain::model::{
    ExportFormat, FilterCriteria, ReportDefinition, ReportId, TransformResult,
};
use crate::domain::ports::{DataService, Pipeline, Storage};
use crate::domain::records::RawRecords;
use crate::utils::error::{ReportError, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One export run: fetch → transform → project → serialize → trigger.
///
/// The definition and column set are captured when the pipeline is prepared
/// and used unchanged for the whole run.
pub struct ReportPipeline<D: DataService, S: Storage> {
    definition: Arc<ReportDefinition>,
    selected: BTreeSet<String>,
    filter: FilterCriteria,
    format: ExportFormat,
    today: NaiveDate,
    fetcher: DataFetcher<D>,
    trigger: ExportTrigger<S>,
}

impl<D: DataService, S: Storage> ReportPipeline<D, S> {
    /// 進入管線前的檢查：未選報表或欄位全部取消時直接拒絕
    pub fn prepare(
        session: &ReportSession,
        report: Option<ReportId>,
        filter: FilterCriteria,
        fetcher: DataFetcher<D>,
        trigger: ExportTrigger<S>,
    ) -> Result<Self> {
        let report = report.ok_or(ReportError::NoReportSelected)?;
        let definition = session
            .definition(report)
            .ok_or(ReportError::NoReportSelected)?;
        let selected = session.selection(report);

        if projected_columns(&selected, &definition.fields).is_empty() {
            return Err(ReportError::EmptyColumnSelection {
                report: report.to_string(),
            });
        }

        Ok(Self {
            definition,
            selected,
            filter,
            format: ExportFormat::default(),
            today: chrono::Local::now().date_naive(),
            fetcher,
            trigger,
        })
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Reference date for day counts and the filename.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn definition(&self) -> &ReportDefinition {
        &self.definition
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }
}

#[async_trait::async_trait]
impl<D: DataService, S: Storage> Pipeline for ReportPipeline<D, S> {
    async fn extract(&self) -> Result<RawRecords> {
        self.fetcher.fetch(self.definition.id, &self.filter).await
    }

    fn transform(&self, data: RawRecords) -> Result<TransformResult> {
        let definition = self.definition.as_ref();
        let rows = transform(definition, data, self.today);

        let (columns, sections) =
            project_sections(rows.sections(definition), &self.selected, &definition.fields);
        let body = serialize_sections(&sections, &columns)?;

        Ok(TransformResult {
            rows: rows.to_rows(definition),
            columns,
            sections,
            artifact: build_artifact(definition.id, self.today, self.format, body),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        self.trigger.trigger(&result.artifact).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{DataQuery, TableNames};
    use crate::domain::records::DocumentCategory;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct StaticService(Vec<Value>);

    #[async_trait::async_trait]
    impl DataService for StaticService {
        async fn query(&self, _query: &DataQuery) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()).into()
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(path.to_string())
        }
    }

    fn session() -> ReportSession {
        ReportSession::new(&[DocumentCategory {
            id: "1".to_string(),
            name: "Passport".to_string(),
        }])
    }

    fn prepare(
        session: &ReportSession,
        report: Option<ReportId>,
        rows: Vec<Value>,
        storage: MockStorage,
    ) -> Result<ReportPipeline<StaticService, MockStorage>> {
        ReportPipeline::prepare(
            session,
            report,
            FilterCriteria::default(),
            DataFetcher::new(StaticService(rows), TableNames::default()),
            ExportTrigger::new(storage),
        )
    }

    #[test]
    fn test_no_report_selected() {
        let result = prepare(&session(), None, vec![], MockStorage::default());
        assert!(matches!(result, Err(ReportError::NoReportSelected)));
    }

    #[test]
    fn test_empty_column_selection_regardless_of_data() {
        let mut session = session();
        session.set_selection(ReportId::Leaves, Vec::<String>::new());

        let rows = vec![json!({"id": 1, "employee": {"name": "Ana"}})];
        let result = prepare(&session, Some(ReportId::Leaves), rows, MockStorage::default());

        assert!(matches!(
            result,
            Err(ReportError::EmptyColumnSelection { report }) if report == "leaves"
        ));
    }

    #[tokio::test]
    async fn test_document_export_end_to_end() {
        let mut session = session();
        session.set_selection(ReportId::Documents, ["Passport Days Left", "Name"]);

        let storage = MockStorage::default();
        let pipeline = prepare(
            &session,
            Some(ReportId::Documents),
            vec![
                json!({"id": 1, "name": "Ana", "documents": [
                    {"category": {"id": 1, "name": "Passport"}, "expiry_date": "2024-01-31"}
                ]}),
                json!({"id": 2, "name": "Ben", "is_sponsored": true, "documents": [
                    {"category": {"id": 1, "name": "Passport"}, "expiry_date": "2023-12-01"}
                ]}),
                json!({"id": 3, "name": "Cai", "documents": []}),
            ],
            storage.clone(),
        )
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).unwrap();

        assert_eq!(result.columns, vec!["Name", "Passport Days Left"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(
            result.artifact.body,
            "Employees Not Sponsored or Hours Restricted\n\
             \"Name\",\"Passport Days Left\"\n\
             \"Ana\",\"30\"\n\
             \n\
             Sponsored or Hours Restricted Employees\n\
             \"Name\",\"Passport Days Left\"\n\
             \"Ben\",\"-31\""
        );

        let path = pipeline.load(result).await.unwrap();
        assert_eq!(path, "documents_report_2024-01-01.csv");
        assert!(storage.read_file(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_unaffected_by_later_refresh() {
        let mut session = session();
        let pipeline = prepare(
            &session,
            Some(ReportId::Documents),
            vec![],
            MockStorage::default(),
        )
        .unwrap();

        session.refresh(&[]);

        assert!(pipeline.definition().has_field("Passport"));
    }
}
