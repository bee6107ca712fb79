use crate::domain::model::{Frequency, ReportDefinition, Section, TransformedRow};
use crate::domain::records::{
    ComplianceRecord, DocumentCategory, DocumentHolderRecord, EmployeeRecord, LeaveRecord,
    NamedRef, RawRecords, TrackedDocument,
};
use crate::utils::dates::{days_left, format_date, format_strict_date, inclusive_days, parse_date};
use chrono::NaiveDate;
use serde_json::{Number, Value};

pub const UNRESTRICTED_SECTION: &str = "Employees Not Sponsored or Hours Restricted";
pub const RESTRICTED_SECTION: &str = "Sponsored or Hours Restricted Employees";

/// A typed row whose values line up with its report's declared fields.
pub trait ReportRow {
    fn values(&self, definition: &ReportDefinition) -> Vec<Value>;

    fn to_row(&self, definition: &ReportDefinition) -> TransformedRow {
        TransformedRow::from_cells(&definition.fields, self.values(definition))
    }
}

fn text(value: &Option<String>) -> Value {
    Value::String(value.clone().unwrap_or_default())
}

fn name_of(reference: &Option<NamedRef>) -> Value {
    Value::String(
        reference
            .as_ref()
            .and_then(|r| r.name.clone())
            .unwrap_or_default(),
    )
}

fn counter(value: &Option<Number>) -> Value {
    Value::Number(value.clone().unwrap_or_else(|| Number::from(0)))
}

fn date(value: &Option<String>) -> Value {
    Value::String(format_date(value.as_deref()))
}

fn yes_no(flag: bool) -> Value {
    Value::String(if flag { "Yes" } else { "No" }.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow(EmployeeRecord);

impl ReportRow for EmployeeRow {
    fn values(&self, _definition: &ReportDefinition) -> Vec<Value> {
        let e = &self.0;
        vec![
            Value::String(e.name.clone()),
            text(&e.email),
            text(&e.phone),
            text(&e.position),
            text(&e.department),
            name_of(&e.branch),
            text(&e.nationality),
            text(&e.start_date),
            counter(&e.annual_leave_entitlement),
            counter(&e.annual_leave_taken),
            counter(&e.sick_leave_taken),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRow(LeaveRecord);

impl LeaveRow {
    /// 紀錄沒有天數時，以起訖日計算（含首尾）
    fn days(&self) -> Value {
        let leave = &self.0;
        if let Some(days) = &leave.days {
            return Value::Number(days.clone());
        }
        let start = leave.start_date.as_deref().and_then(parse_date);
        let end = leave.end_date.as_deref().and_then(parse_date);
        match (start, end) {
            (Some(start), Some(end)) if end >= start => Value::from(inclusive_days(start, end)),
            _ => Value::String(String::new()),
        }
    }
}

impl ReportRow for LeaveRow {
    fn values(&self, _definition: &ReportDefinition) -> Vec<Value> {
        let l = &self.0;
        vec![
            name_of(&l.employee),
            name_of(&l.leave_type),
            date(&l.start_date),
            date(&l.end_date),
            self.days(),
            text(&l.status),
            text(&l.reason),
            date(&l.created_at),
            text(&l.approved_by),
            date(&l.approved_at),
            text(&l.rejected_by),
            date(&l.rejected_at),
            text(&l.rejection_reason),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentExpiry {
    pub expiry: String,
    pub days_left: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub name: String,
    pub branch: String,
    pub sponsored: bool,
    pub hours_restricted: bool,
    pub status: String,
    pub country: String,
    /// One entry per category of the definition, in the same order.
    pub expiries: Vec<DocumentExpiry>,
}

impl DocumentRow {
    fn build(holder: &DocumentHolderRecord, categories: &[DocumentCategory], today: NaiveDate) -> Self {
        let documents = holder.documents();
        let passport = documents.iter().find(|d| d.is_passport());

        let expiries = categories
            .iter()
            .map(|category| {
                latest_of_category(documents, category)
                    .map(|doc| {
                        let expiry = doc.expiry_date.as_deref();
                        DocumentExpiry {
                            expiry: format_date(expiry),
                            days_left: expiry.and_then(parse_date).map(|d| days_left(d, today)),
                        }
                    })
                    .unwrap_or(DocumentExpiry {
                        expiry: String::new(),
                        days_left: None,
                    })
            })
            .collect();

        Self {
            name: holder.name.clone(),
            branch: holder
                .branch
                .as_ref()
                .and_then(|b| b.name.clone())
                .unwrap_or_default(),
            sponsored: holder.is_sponsored(),
            hours_restricted: holder.is_hours_restricted(),
            status: passport.and_then(|d| d.status.clone()).unwrap_or_default(),
            country: passport.and_then(|d| d.country.clone()).unwrap_or_default(),
            expiries,
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.sponsored || self.hours_restricted
    }
}

/// 同一分類有多份文件時取最晚到期者
fn latest_of_category<'a>(
    documents: &'a [TrackedDocument],
    category: &DocumentCategory,
) -> Option<&'a TrackedDocument> {
    documents
        .iter()
        .filter(|d| d.category.as_ref().is_some_and(|c| c.id == category.id))
        .max_by_key(|d| d.expiry_date.as_deref().and_then(parse_date))
}

impl ReportRow for DocumentRow {
    fn values(&self, _definition: &ReportDefinition) -> Vec<Value> {
        let mut values = vec![
            Value::String(self.name.clone()),
            Value::String(self.branch.clone()),
            yes_no(self.sponsored),
            yes_no(self.hours_restricted),
            Value::String(self.status.clone()),
            Value::String(self.country.clone()),
        ];
        for expiry in &self.expiries {
            values.push(Value::String(expiry.expiry.clone()));
            values.push(
                expiry
                    .days_left
                    .map(Value::from)
                    .unwrap_or_else(|| Value::String(String::new())),
            );
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceRow(ComplianceRecord);

impl ComplianceRow {
    fn completion_date(&self) -> Value {
        match &self.0.completion_date {
            Value::Null => Value::String(String::new()),
            Value::String(raw) if raw.trim().is_empty() => Value::String(String::new()),
            Value::String(raw) => Value::String(
                format_strict_date("Completion Date", raw).unwrap_or_else(|e| {
                    tracing::debug!("Passing through compliance record {}: {}", self.0.id, e);
                    raw.clone()
                }),
            ),
            other => other.clone(),
        }
    }

    fn frequency(&self) -> Value {
        let raw = self
            .0
            .compliance_type
            .as_ref()
            .and_then(|t| t.frequency.clone())
            .unwrap_or_default();
        let label = raw
            .parse::<Frequency>()
            .map(|f| f.as_str().to_string())
            .unwrap_or(raw);
        Value::String(label)
    }
}

impl ReportRow for ComplianceRow {
    fn values(&self, _definition: &ReportDefinition) -> Vec<Value> {
        let c = &self.0;
        vec![
            name_of(&c.employee),
            name_of(&c.branch),
            Value::String(
                c.compliance_type
                    .as_ref()
                    .and_then(|t| t.name.clone())
                    .unwrap_or_default(),
            ),
            self.frequency(),
            text(&c.period_identifier),
            text(&c.status),
            self.completion_date(),
            text(&c.completed_by),
            text(&c.notes),
        ]
    }
}

/// Transformed rows, one variant per report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRows {
    Employees(Vec<EmployeeRow>),
    Leaves(Vec<LeaveRow>),
    Documents(Vec<DocumentRow>),
    Compliance(Vec<ComplianceRow>),
}

fn rows_of<R: ReportRow>(rows: &[R], definition: &ReportDefinition) -> Vec<TransformedRow> {
    rows.iter().map(|r| r.to_row(definition)).collect()
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            ReportRows::Employees(r) => r.len(),
            ReportRows::Leaves(r) => r.len(),
            ReportRows::Documents(r) => r.len(),
            ReportRows::Compliance(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_rows(&self, definition: &ReportDefinition) -> Vec<TransformedRow> {
        match self {
            ReportRows::Employees(r) => rows_of(r, definition),
            ReportRows::Leaves(r) => rows_of(r, definition),
            ReportRows::Documents(r) => rows_of(r, definition),
            ReportRows::Compliance(r) => rows_of(r, definition),
        }
    }

    /// 文件報表拆成兩個區段，其餘報表為單一無標題區段
    pub fn sections(&self, definition: &ReportDefinition) -> Vec<Section> {
        match self {
            ReportRows::Documents(rows) => {
                let (restricted, unrestricted): (Vec<&DocumentRow>, Vec<&DocumentRow>) =
                    rows.iter().partition(|r| r.is_restricted());
                vec![
                    Section::labeled(
                        UNRESTRICTED_SECTION,
                        unrestricted.iter().map(|r| r.to_row(definition)).collect(),
                    ),
                    Section::labeled(
                        RESTRICTED_SECTION,
                        restricted.iter().map(|r| r.to_row(definition)).collect(),
                    ),
                ]
            }
            other => vec![Section::unlabeled(other.to_rows(definition))],
        }
    }
}

pub fn transform(definition: &ReportDefinition, records: RawRecords, today: NaiveDate) -> ReportRows {
    match records {
        RawRecords::Employees(records) => {
            ReportRows::Employees(records.into_iter().map(EmployeeRow).collect())
        }
        RawRecords::Leaves(records) => {
            ReportRows::Leaves(records.into_iter().map(LeaveRow).collect())
        }
        RawRecords::Documents(records) => {
            let total = records.len();
            let rows: Vec<DocumentRow> = records
                .iter()
                .filter(|holder| !holder.documents().is_empty())
                .map(|holder| DocumentRow::build(holder, &definition.categories, today))
                .collect();
            if rows.len() < total {
                tracing::debug!(
                    "Excluded {} employees without tracked documents",
                    total - rows.len()
                );
            }
            ReportRows::Documents(rows)
        }
        RawRecords::Compliance(records) => {
            ReportRows::Compliance(records.into_iter().map(ComplianceRow).collect())
        }
    }
}
