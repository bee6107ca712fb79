use crate::domain::model::{ReportDefinition, ReportId};
use crate::domain::records::DocumentCategory;

pub const EMPLOYEE_FIELDS: [&str; 11] = [
    "Name",
    "Email",
    "Phone",
    "Position",
    "Department",
    "Branch",
    "Nationality",
    "Start Date",
    "Annual Leave Entitlement",
    "Annual Leave Taken",
    "Sick Leave Taken",
];

pub const LEAVE_FIELDS: [&str; 13] = [
    "Employee",
    "Leave Type",
    "Start Date",
    "End Date",
    "Days",
    "Status",
    "Reason",
    "Requested On",
    "Approved By",
    "Approved On",
    "Rejected By",
    "Rejected On",
    "Rejection Reason",
];

pub const DOCUMENT_BASE_FIELDS: [&str; 6] = [
    "Name",
    "Branch",
    "Sponsored",
    "Hours Restricted",
    "Status",
    "Country",
];

pub const COMPLIANCE_FIELDS: [&str; 9] = [
    "Employee",
    "Branch",
    "Compliance Type",
    "Frequency",
    "Period",
    "Status",
    "Completion Date",
    "Completed By",
    "Notes",
];

pub fn days_left_field(category_name: &str) -> String {
    format!("{} Days Left", category_name)
}

/// Builds every report definition from the current category catalog.
///
/// Must be re-run whenever the catalog changes; the result is never cached
/// across catalog versions.
pub fn resolve_definitions(categories: &[DocumentCategory]) -> Vec<ReportDefinition> {
    ReportId::ALL
        .into_iter()
        .map(|id| resolve_definition(id, categories))
        .collect()
}

pub fn resolve_definition(id: ReportId, categories: &[DocumentCategory]) -> ReportDefinition {
    let (display_name, description, base): (&str, &str, &[&str]) = match id {
        ReportId::Employees => (
            "Employee Directory",
            "All employees with contact details and leave counters",
            &EMPLOYEE_FIELDS,
        ),
        ReportId::Leaves => (
            "Leave Ledger",
            "Leave requests with approval history",
            &LEAVE_FIELDS,
        ),
        ReportId::Documents => (
            "Document Tracker",
            "Tracked employee documents with expiry dates and days remaining",
            &DOCUMENT_BASE_FIELDS,
        ),
        ReportId::Compliance => (
            "Compliance Ledger",
            "Compliance records by period",
            &COMPLIANCE_FIELDS,
        ),
    };

    let mut fields: Vec<String> = base.iter().map(|f| f.to_string()).collect();
    let mut used = Vec::new();

    if id == ReportId::Documents {
        for category in categories {
            let days_left = days_left_field(&category.name);
            // 同名分類或與固定欄位衝突時只保留第一個
            if fields.contains(&category.name) || fields.contains(&days_left) {
                tracing::warn!(
                    "⚠️ Skipping document category '{}' ({}): column name already in use",
                    category.name,
                    category.id
                );
                continue;
            }
            fields.push(category.name.clone());
            fields.push(days_left);
            used.push(category.clone());
        }
    }

    ReportDefinition {
        id,
        display_name: display_name.to_string(),
        description: description.to_string(),
        fields,
        categories: used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> DocumentCategory {
        DocumentCategory {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn documents(defs: &[ReportDefinition]) -> &ReportDefinition {
        defs.iter().find(|d| d.id == ReportId::Documents).unwrap()
    }

    #[test]
    fn test_empty_catalog_keeps_fixed_fields() {
        let defs = resolve_definitions(&[]);
        assert_eq!(defs.len(), 4);
        assert_eq!(documents(&defs).fields, DOCUMENT_BASE_FIELDS.to_vec());
    }

    #[test]
    fn test_fields_are_deterministic() {
        let catalog = vec![category("1", "Passport"), category("2", "Visa")];
        assert_eq!(resolve_definitions(&catalog), resolve_definitions(&catalog));
    }

    #[test]
    fn test_adding_category_appends_two_fields() {
        let mut catalog = vec![category("1", "Passport")];
        let before = documents(&resolve_definitions(&catalog)).fields.clone();

        catalog.push(category("2", "Visa"));
        let after = documents(&resolve_definitions(&catalog)).fields.clone();

        assert_eq!(after.len(), before.len() + 2);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(&after[before.len()..], &["Visa", "Visa Days Left"]);
    }

    #[test]
    fn test_removing_category_removes_its_pair() {
        let catalog = vec![
            category("1", "Passport"),
            category("2", "Right to Work"),
            category("3", "Visa"),
        ];
        let before = documents(&resolve_definitions(&catalog)).fields.clone();
        let after = documents(&resolve_definitions(&[catalog[0].clone(), catalog[2].clone()]))
            .fields
            .clone();

        let removed: Vec<&String> = before.iter().filter(|f| !after.contains(f)).collect();
        assert_eq!(removed, vec!["Right to Work", "Right to Work Days Left"]);
        assert_eq!(after.len(), before.len() - 2);
    }

    #[test]
    fn test_duplicate_category_names_are_skipped() {
        let catalog = vec![category("1", "Visa"), category("2", "Visa")];
        let defs = resolve_definitions(&catalog);
        let docs = documents(&defs);
        assert_eq!(docs.fields.len(), DOCUMENT_BASE_FIELDS.len() + 2);
        assert_eq!(docs.categories, vec![category("1", "Visa")]);
    }

    #[test]
    fn test_static_reports_ignore_categories() {
        let defs = resolve_definitions(&[category("1", "Passport")]);
        let leaves = defs.iter().find(|d| d.id == ReportId::Leaves).unwrap();
        assert_eq!(leaves.fields, LEAVE_FIELDS.to_vec());
        assert!(leaves.categories.is_empty());
    }
}
