use crate::domain::records::DocumentCategory;
use crate::utils::error::ReportError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportId {
    Employees,
    Leaves,
    Documents,
    Compliance,
}

impl ReportId {
    pub const ALL: [ReportId; 4] = [
        ReportId::Employees,
        ReportId::Leaves,
        ReportId::Documents,
        ReportId::Compliance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportId::Employees => "employees",
            ReportId::Leaves => "leaves",
            ReportId::Documents => "documents",
            ReportId::Compliance => "compliance",
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ReportId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

/// 一種可匯出報表的欄位宣告。`fields` 是欄位選擇與輸出順序的唯一依據。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefinition {
    pub id: ReportId,
    pub display_name: String,
    pub description: String,
    pub fields: Vec<String>,
    /// Category snapshot the dynamic fields were generated from.
    pub categories: Vec<DocumentCategory>,
}

impl ReportDefinition {
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Per-report set of chosen columns. Storage order is irrelevant; output order
/// always comes from `ReportDefinition::fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    selected: HashMap<ReportId, BTreeSet<String>>,
}

impl ColumnSelection {
    pub fn get(&self, report: ReportId) -> Option<&BTreeSet<String>> {
        self.selected.get(&report)
    }

    pub fn columns(&self, report: ReportId) -> BTreeSet<String> {
        self.selected.get(&report).cloned().unwrap_or_default()
    }

    /// 依據目前的欄位清單重新初始化：移除已不存在的欄位，並補上新出現的欄位。
    pub fn initialize(&mut self, definition: &ReportDefinition, previous: Option<&ReportDefinition>) {
        match self.selected.get_mut(&definition.id) {
            None => {
                self.selected
                    .insert(definition.id, definition.fields.iter().cloned().collect());
            }
            Some(columns) => {
                columns.retain(|c| definition.has_field(c));
                if let Some(previous) = previous {
                    for field in &definition.fields {
                        if !previous.has_field(field) {
                            columns.insert(field.clone());
                        }
                    }
                }
            }
        }
    }

    /// Replaces the selection. Returns the names that are not fields of the report.
    pub fn set<I, S>(&mut self, definition: &ReportDefinition, fields: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rejected = Vec::new();
        let mut columns = BTreeSet::new();
        for field in fields {
            let field = field.as_ref().trim();
            if definition.has_field(field) {
                columns.insert(field.to_string());
            } else {
                rejected.push(field.to_string());
            }
        }
        self.selected.insert(definition.id, columns);
        rejected
    }

    pub fn select(&mut self, definition: &ReportDefinition, field: &str) -> bool {
        definition.has_field(field)
            && self
                .selected
                .entry(definition.id)
                .or_default()
                .insert(field.to_string())
    }

    pub fn deselect(&mut self, report: ReportId, field: &str) -> bool {
        self.selected
            .get_mut(&report)
            .is_some_and(|columns| columns.remove(field))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    BiAnnual,
    Annual,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::BiAnnual => "bi-annual",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "bi-annual" | "biannual" | "bi_annual" | "semi-annual" => Ok(Frequency::BiAnnual),
            "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
            _ => Err(ReportError::ValidationError {
                message: format!("Unknown frequency: {}", s),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodFilter {
    Prefix(String),
    AnyOf(BTreeSet<String>),
}

impl PeriodFilter {
    pub fn matches(&self, identifier: &str) -> bool {
        match self {
            PeriodFilter::Prefix(prefix) => identifier.starts_with(prefix.as_str()),
            PeriodFilter::AnyOf(identifiers) => identifiers.contains(identifier),
        }
    }
}

/// 使用者原始輸入，尚未依報表類型與頻率正規化
#[derive(Debug, Clone, Default)]
pub struct RawSelections {
    pub branch: Option<String>,
    pub sub_type: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub year: Option<String>,
    pub months: Vec<String>,
    pub quarters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub branch: Option<String>,
    pub sub_type: Option<String>,
    pub date_range: Option<DateRange>,
    pub year: Option<String>,
    pub months: BTreeSet<String>,
    pub quarters: BTreeSet<String>,
    pub period: Option<PeriodFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformedRow {
    cells: HashMap<String, Value>,
}

impl TransformedRow {
    pub fn from_cells(fields: &[String], values: Vec<Value>) -> Self {
        debug_assert_eq!(fields.len(), values.len(), "row shape must match fields");
        Self {
            cells: fields.iter().cloned().zip(values).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }

    pub fn retain_columns(&mut self, keep: &[String]) {
        self.cells.retain(|column, _| keep.contains(column));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub label: Option<String>,
    pub rows: Vec<TransformedRow>,
}

impl Section {
    pub fn unlabeled(rows: Vec<TransformedRow>) -> Self {
        Self { label: None, rows }
    }

    pub fn labeled(label: impl Into<String>, rows: Vec<TransformedRow>) -> Self {
        Self {
            label: Some(label.into()),
            rows,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ReportError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: csv, xlsx".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Transformed rows before projection (all sections).
    pub rows: Vec<TransformedRow>,
    pub columns: Vec<String>,
    pub sections: Vec<Section>,
    pub artifact: ExportArtifact,
}
