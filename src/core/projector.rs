use crate::domain::model::{Section, TransformedRow};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub columns: Vec<String>,
    pub rows: Vec<TransformedRow>,
}

/// Output columns: the declared order, keeping only selected fields.
pub fn projected_columns(selected: &BTreeSet<String>, declared: &[String]) -> Vec<String> {
    declared
        .iter()
        .filter(|field| selected.contains(*field))
        .cloned()
        .collect()
}

pub fn project(
    rows: &[TransformedRow],
    selected: &BTreeSet<String>,
    declared: &[String],
) -> Projection {
    let columns = projected_columns(selected, declared);
    let rows = rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.retain_columns(&columns);
            row
        })
        .collect();

    Projection { columns, rows }
}

/// 每個區段套用同一組欄位
pub fn project_sections(
    sections: Vec<Section>,
    selected: &BTreeSet<String>,
    declared: &[String],
) -> (Vec<String>, Vec<Section>) {
    let columns = projected_columns(selected, declared);
    let sections = sections
        .into_iter()
        .map(|section| Section {
            label: section.label,
            rows: project(&section.rows, selected, declared).rows,
        })
        .collect();
    (columns, sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declared() -> Vec<String> {
        ["Name", "Branch", "Passport", "Passport Days Left"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row() -> TransformedRow {
        TransformedRow::from_cells(
            &declared(),
            vec![json!("Ana"), json!("Leeds"), json!("31/01/2024"), json!(30)],
        )
    }

    #[test]
    fn test_columns_follow_declared_order() {
        let selected = BTreeSet::from([
            "Passport Days Left".to_string(),
            "Name".to_string(),
            "Passport".to_string(),
        ]);

        let projection = project(&[row()], &selected, &declared());

        assert_eq!(projection.columns, vec!["Name", "Passport", "Passport Days Left"]);
        assert_eq!(projection.rows[0].len(), 3);
        assert!(projection.rows[0].get("Branch").is_none());
    }

    #[test]
    fn test_unknown_selection_is_ignored() {
        let selected = BTreeSet::from(["Salary".to_string(), "Branch".to_string()]);
        let projection = project(&[row()], &selected, &declared());
        assert_eq!(projection.columns, vec!["Branch"]);
    }

    #[test]
    fn test_empty_selection_yields_no_columns() {
        let projection = project(&[row()], &BTreeSet::new(), &declared());
        assert!(projection.columns.is_empty());
        assert_eq!(projection.rows.len(), 1);
        assert!(projection.rows[0].is_empty());
    }

    #[test]
    fn test_sections_keep_labels() {
        let selected = BTreeSet::from(["Name".to_string()]);
        let sections = vec![
            Section::labeled("A", vec![row()]),
            Section::labeled("B", vec![]),
        ];

        let (columns, sections) = project_sections(sections, &selected, &declared());

        assert_eq!(columns, vec!["Name"]);
        assert_eq!(sections[0].label.as_deref(), Some("A"));
        assert_eq!(sections[0].rows[0].len(), 1);
        assert!(sections[1].rows.is_empty());
    }
}
