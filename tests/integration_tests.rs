use chrono::NaiveDate;
use hr_report_export::core::export::ExportTrigger;
use hr_report_export::domain::model::{RawSelections, ReportId};
use hr_report_export::domain::ports::ReferenceCatalog;
use hr_report_export::domain::query::TableNames;
use hr_report_export::{
    DataFetcher, ExportEngine, FilterResolver, LocalStorage, ReportError, ReportPipeline,
    ReportSession, RestDataService,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn test_document_report_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let categories_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/document_categories")
            .query_param("order", "name.asc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"id": 1, "name": "Passport"}, {"id": 2, "name": "Visa"}]));
    });
    let employees_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/employees")
            .query_param("branch_id", "eq.b1")
            .query_param("order", "name.asc,id.asc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {"id": 1, "name": "Ana", "branch": {"name": "North"}, "documents": [
                    {"category": {"id": 1, "name": "Passport"}, "expiry_date": "2024-01-31",
                     "document_number": "P123", "status": "valid", "country": "PT"}
                ]},
                {"id": 2, "name": "Ben", "branch": {"name": "North"}, "has_hours_restriction": true,
                 "documents": [
                    {"category": {"id": 2, "name": "Visa"}, "expiry_date": "2023-12-01"}
                ]},
                {"id": 3, "name": "Cai", "branch": {"name": "North"}, "documents": []}
            ]));
    });

    let fetcher = DataFetcher::new(RestDataService::new(server.base_url()), TableNames::default());
    let categories = fetcher.list_categories().await.unwrap();
    let mut session = ReportSession::new(&categories);
    session.set_selection(
        ReportId::Documents,
        ["Name", "Hours Restricted", "Passport Days Left", "Visa Days Left"],
    );

    let raw = RawSelections {
        branch: Some("b1".to_string()),
        ..RawSelections::default()
    };
    let filter = FilterResolver::default().resolve(ReportId::Documents, &raw);

    let pipeline = ReportPipeline::prepare(
        &session,
        Some(ReportId::Documents),
        filter,
        fetcher,
        ExportTrigger::new(LocalStorage::new(output_path.clone())),
    )
    .unwrap()
    .with_today(today());

    let written = ExportEngine::new(pipeline).run().await.unwrap();

    categories_mock.assert();
    employees_mock.assert();
    assert!(written.ends_with("documents_report_2024-01-01.csv"));

    let content = std::fs::read_to_string(temp_dir.path().join("documents_report_2024-01-01.csv"))
        .unwrap();
    assert_eq!(
        content,
        "Employees Not Sponsored or Hours Restricted\n\
         \"Name\",\"Hours Restricted\",\"Passport Days Left\",\"Visa Days Left\"\n\
         \"Ana\",\"No\",\"30\",\"\"\n\
         \n\
         Sponsored or Hours Restricted Employees\n\
         \"Name\",\"Hours Restricted\",\"Passport Days Left\",\"Visa Days Left\"\n\
         \"Ben\",\"Yes\",\"\",\"-31\""
    );
}

#[tokio::test]
async fn test_compliance_report_with_monthly_periods() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/document_categories");
        then.status(200).json_body(json!([]));
    });
    let types_mock = server.mock(|when, then| {
        when.method(GET).path("/compliance_types");
        then.status(200).json_body(json!([
            {"id": 7, "name": "Fire Drill", "frequency": "Monthly"},
            {"id": 8, "name": "Audit", "frequency": "annual"}
        ]));
    });
    let records_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/compliance_records")
            .query_param("compliance_type_id", "eq.7")
            .query_param("period_identifier", "in.(\"2024-01\",\"2024-12\")")
            .query_param("order", "period_identifier.desc,id.desc");
        then.status(200).json_body(json!([
            {"id": 11, "employee": {"name": "Ana"}, "branch": {"name": "North"},
             "compliance_type": {"name": "Fire Drill", "frequency": "Monthly"},
             "period_identifier": "2024-12", "status": "completed",
             "completion_date": "2024-12-03", "completed_by": "Dee", "notes": "On time"},
            {"id": 10, "employee": {"name": "Ana"}, "branch": {"name": "North"},
             "compliance_type": {"name": "Fire Drill", "frequency": "Monthly"},
             "period_identifier": "2024-01", "status": "pending",
             "completion_date": null}
        ]));
    });

    let fetcher = DataFetcher::new(RestDataService::new(server.base_url()), TableNames::default());
    let mut session = ReportSession::new(&fetcher.list_categories().await.unwrap());
    session.set_selection(
        ReportId::Compliance,
        ["Employee", "Frequency", "Period", "Status", "Completion Date"],
    );

    let types = fetcher.list_compliance_types().await.unwrap();
    let raw = RawSelections {
        branch: Some("all".to_string()),
        sub_type: Some("7".to_string()),
        year: Some("2024".to_string()),
        months: vec!["12".to_string(), "1".to_string()],
        quarters: vec!["Q2".to_string()],
        ..RawSelections::default()
    };
    let filter = FilterResolver::new(&types).resolve(ReportId::Compliance, &raw);
    assert!(filter.branch.is_none());
    assert!(filter.quarters.is_empty());

    let pipeline = ReportPipeline::prepare(
        &session,
        Some(ReportId::Compliance),
        filter,
        fetcher,
        ExportTrigger::new(LocalStorage::new(output_path)),
    )
    .unwrap()
    .with_today(today());

    let written = ExportEngine::new(pipeline).run().await.unwrap();

    types_mock.assert();
    records_mock.assert();

    let content = std::fs::read_to_string(written).unwrap();
    assert_eq!(
        content,
        "\"Employee\",\"Frequency\",\"Period\",\"Status\",\"Completion Date\"\n\
         \"Ana\",\"monthly\",\"2024-12\",\"completed\",\"03/12/2024\"\n\
         \"Ana\",\"monthly\",\"2024-01\",\"pending\",\"\""
    );
}

#[tokio::test]
async fn test_unavailable_service_writes_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/leave_requests");
        then.status(500).body("database is down");
    });

    let fetcher = DataFetcher::new(RestDataService::new(server.base_url()), TableNames::default());
    let session = ReportSession::new(&[]);
    let filter = FilterResolver::default().resolve(ReportId::Leaves, &RawSelections::default());

    let pipeline = ReportPipeline::prepare(
        &session,
        Some(ReportId::Leaves),
        filter,
        fetcher,
        ExportTrigger::new(LocalStorage::new(output_path)),
    )
    .unwrap();

    let err = ExportEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ReportError::DataUnavailable { .. }));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
