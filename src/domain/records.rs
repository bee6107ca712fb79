//! Source records as returned by the relational data service.
//!
//! Nested relations arrive already expanded (`employee`, `branch`,
//! `documents[].category`, ...). Ids may be strings or numbers depending on the
//! table and are normalized to strings.

use crate::domain::model::{Frequency, ReportId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCategory {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComplianceType {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub frequency: Option<String>,
}

impl ComplianceType {
    /// 未宣告或無法辨識的頻率都視為沒有頻率
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency.as_deref().and_then(|f| f.parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub nationality: Option<String>,
    pub start_date: Option<String>,
    pub branch: Option<NamedRef>,
    pub annual_leave_entitlement: Option<Number>,
    pub annual_leave_taken: Option<Number>,
    pub sick_leave_taken: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub employee: Option<NamedRef>,
    pub leave_type: Option<NamedRef>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days: Option<Number>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackedDocument {
    pub category: Option<DocumentCategory>,
    pub document_number: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
    pub country: Option<String>,
}

impl TrackedDocument {
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn is_passport(&self) -> bool {
        self.category_name().to_lowercase().contains("passport")
    }
}

/// Employee with its tracked documents expanded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentHolderRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub branch: Option<NamedRef>,
    pub is_sponsored: Option<bool>,
    pub has_hours_restriction: Option<bool>,
    pub documents: Option<Vec<TrackedDocument>>,
}

impl DocumentHolderRecord {
    pub fn documents(&self) -> &[TrackedDocument] {
        self.documents.as_deref().unwrap_or_default()
    }

    pub fn is_sponsored(&self) -> bool {
        self.is_sponsored.unwrap_or(false)
    }

    pub fn is_hours_restricted(&self) -> bool {
        self.has_hours_restriction.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComplianceTypeRef {
    pub name: Option<String>,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplianceRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub employee: Option<NamedRef>,
    pub branch: Option<NamedRef>,
    pub compliance_type: Option<ComplianceTypeRef>,
    pub period_identifier: Option<String>,
    pub status: Option<String>,
    /// 舊資料可能不是標準日期字串，保留原始 JSON 值
    #[serde(default)]
    pub completion_date: Value,
    pub completed_by: Option<String>,
    pub notes: Option<String>,
}

/// Fetched records, one variant per report.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecords {
    Employees(Vec<EmployeeRecord>),
    Leaves(Vec<LeaveRecord>),
    Documents(Vec<DocumentHolderRecord>),
    Compliance(Vec<ComplianceRecord>),
}

impl RawRecords {
    pub fn report_id(&self) -> ReportId {
        match self {
            RawRecords::Employees(_) => ReportId::Employees,
            RawRecords::Leaves(_) => ReportId::Leaves,
            RawRecords::Documents(_) => ReportId::Documents,
            RawRecords::Compliance(_) => ReportId::Compliance,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RawRecords::Employees(r) => r.len(),
            RawRecords::Leaves(r) => r.len(),
            RawRecords::Documents(r) => r.len(),
            RawRecords::Compliance(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids() {
        let numeric: DocumentCategory =
            serde_json::from_value(json!({"id": 7, "name": "Visa"})).unwrap();
        let text: DocumentCategory =
            serde_json::from_value(json!({"id": "c-1", "name": "Passport"})).unwrap();
        assert_eq!(numeric.id, "7");
        assert_eq!(text.id, "c-1");
    }

    #[test]
    fn test_document_holder_null_documents() {
        let holder: DocumentHolderRecord = serde_json::from_value(json!({
            "id": 1,
            "name": "Ana",
            "documents": null
        }))
        .unwrap();
        assert!(holder.documents().is_empty());
        assert!(!holder.is_sponsored());
    }

    #[test]
    fn test_compliance_type_frequency() {
        let ty: ComplianceType = serde_json::from_value(json!({
            "id": "t1", "name": "Fire drill", "frequency": "Quarterly"
        }))
        .unwrap();
        assert_eq!(ty.frequency(), Some(Frequency::Quarterly));

        let none: ComplianceType =
            serde_json::from_value(json!({"id": "t2", "name": "Ad hoc"})).unwrap();
        assert_eq!(none.frequency(), None);
    }

    #[test]
    fn test_passport_detection_is_case_insensitive() {
        let doc: TrackedDocument = serde_json::from_value(json!({
            "category": {"id": 1, "name": "UK PASSPORT"},
            "status": "Valid"
        }))
        .unwrap();
        assert!(doc.is_passport());
    }
}
