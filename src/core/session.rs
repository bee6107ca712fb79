use crate::core::catalog::resolve_definitions;
use crate::domain::model::{ColumnSelection, ReportDefinition, ReportId};
use crate::domain::records::DocumentCategory;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Process-wide report state: current definitions and the user's column choices.
///
/// Pipelines take an `Arc` snapshot of a definition when they start, so a
/// catalog refresh never changes the shape of an export already running.
#[derive(Debug, Default)]
pub struct ReportSession {
    definitions: Vec<Arc<ReportDefinition>>,
    selection: ColumnSelection,
}

impl ReportSession {
    pub fn new(categories: &[DocumentCategory]) -> Self {
        let mut session = Self::default();
        session.refresh(categories);
        session
    }

    /// 分類目錄變動時重新產生報表定義並初始化欄位選擇
    pub fn refresh(&mut self, categories: &[DocumentCategory]) {
        let previous = std::mem::take(&mut self.definitions);

        self.definitions = resolve_definitions(categories)
            .into_iter()
            .map(Arc::new)
            .collect();

        for definition in &self.definitions {
            let before = previous.iter().find(|d| d.id == definition.id);
            self.selection
                .initialize(definition, before.map(|d| d.as_ref()));
        }

        tracing::debug!(
            "🔄 Report catalog refreshed with {} document categories",
            categories.len()
        );
    }

    pub fn definitions(&self) -> &[Arc<ReportDefinition>] {
        &self.definitions
    }

    pub fn definition(&self, report: ReportId) -> Option<Arc<ReportDefinition>> {
        self.definitions.iter().find(|d| d.id == report).cloned()
    }

    pub fn selection(&self, report: ReportId) -> BTreeSet<String> {
        self.selection.columns(report)
    }

    /// Returns the names that were ignored because the report has no such field.
    pub fn set_selection<I, S>(&mut self, report: ReportId, fields: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.definitions.iter().find(|d| d.id == report) {
            Some(definition) => self.selection.set(definition, fields),
            None => fields.into_iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    pub fn select(&mut self, report: ReportId, field: &str) -> bool {
        match self.definitions.iter().find(|d| d.id == report) {
            Some(definition) => self.selection.select(definition, field),
            None => false,
        }
    }

    pub fn deselect(&mut self, report: ReportId, field: &str) -> bool {
        self.selection.deselect(report, field)
    }
}
