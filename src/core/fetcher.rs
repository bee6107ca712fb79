use crate::domain::model::{FilterCriteria, PeriodFilter, ReportId};
use crate::domain::ports::{DataService, ReferenceCatalog};
use crate::domain::query::{DataQuery, Direction, Predicate, TableNames};
use crate::domain::records::{ComplianceType, DocumentCategory, RawRecords};
use crate::utils::dates::ISO_DATE_FORMAT;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Thin adapter between the export pipeline and the data service.
#[derive(Debug, Clone)]
pub struct DataFetcher<D: DataService> {
    service: D,
    tables: TableNames,
}

impl<D: DataService> DataFetcher<D> {
    pub fn new(service: D, tables: TableNames) -> Self {
        Self { service, tables }
    }

    /// 每個報表對應一個查詢；排序固定以確保匯出結果可重現
    pub fn build_query(&self, report: ReportId, filter: &FilterCriteria) -> DataQuery {
        let t = &self.tables;
        let query = match report {
            ReportId::Employees => DataQuery::new(
                t.employees.as_str(),
                format!("*,branch:{}(name)", t.branches),
            )
            .order_by("name", Direction::Asc)
            .order_by("id", Direction::Asc),

            ReportId::Leaves => DataQuery::new(
                t.leaves.as_str(),
                format!(
                    "*,employee:{}!inner(name,branch_id),leave_type:{}(name)",
                    t.employees, t.leave_types
                ),
            )
            .order_by("start_date", Direction::Desc)
            .order_by("id", Direction::Desc),

            ReportId::Documents => DataQuery::new(
                t.employees.as_str(),
                format!(
                    "id,name,is_sponsored,has_hours_restriction,branch:{}(name),\
                     documents:{}(document_number,expiry_date,status,country,category:{}(id,name))",
                    t.branches, t.employee_documents, t.document_categories
                ),
            )
            .order_by("name", Direction::Asc)
            .order_by("id", Direction::Asc),

            ReportId::Compliance => DataQuery::new(
                t.compliance_records.as_str(),
                format!(
                    "*,employee:{}(name),branch:{}(name),compliance_type:{}(name,frequency)",
                    t.employees, t.branches, t.compliance_types
                ),
            )
            .order_by("period_identifier", Direction::Desc)
            .order_by("id", Direction::Desc),
        };

        apply_filter(report, query, filter)
    }

    pub async fn fetch(&self, report: ReportId, filter: &FilterCriteria) -> Result<RawRecords> {
        let query = self.build_query(report, filter);
        tracing::debug!("📡 Querying '{}' for {} report", query.table, report);

        let rows = self.run(&query).await?;

        let records = match report {
            ReportId::Employees => RawRecords::Employees(decode(&query.table, rows)?),
            ReportId::Leaves => RawRecords::Leaves(decode(&query.table, rows)?),
            ReportId::Documents => RawRecords::Documents(decode(&query.table, rows)?),
            ReportId::Compliance => RawRecords::Compliance(decode(&query.table, rows)?),
        };

        tracing::info!("📡 Fetched {} {} records", records.len(), report);
        Ok(records)
    }

    async fn run(&self, query: &DataQuery) -> Result<Vec<Value>> {
        self.service.query(query).await.map_err(|e| match e {
            ReportError::DataUnavailable { .. } => e,
            other => ReportError::data_unavailable(format!("{}: {}", query.table, other)),
        })
    }
}

fn apply_filter(report: ReportId, mut query: DataQuery, filter: &FilterCriteria) -> DataQuery {
    if let Some(branch) = &filter.branch {
        let column = match report {
            ReportId::Leaves => "employee.branch_id",
            _ => "branch_id",
        };
        query = query.filter(Predicate::Eq(column.to_string(), branch.clone()));
    }

    if let Some(sub_type) = &filter.sub_type {
        let column = match report {
            ReportId::Leaves => Some("leave_type_id"),
            ReportId::Compliance => Some("compliance_type_id"),
            ReportId::Employees | ReportId::Documents => None,
        };
        if let Some(column) = column {
            query = query.filter(Predicate::Eq(column.to_string(), sub_type.clone()));
        }
    }

    if let Some(range) = &filter.date_range {
        if let Some(from) = range.from {
            query = query.filter(Predicate::Gte(
                "start_date".to_string(),
                from.format(ISO_DATE_FORMAT).to_string(),
            ));
        }
        if let Some(to) = range.to {
            query = query.filter(Predicate::Lte(
                "start_date".to_string(),
                to.format(ISO_DATE_FORMAT).to_string(),
            ));
        }
    }

    match &filter.period {
        Some(PeriodFilter::Prefix(prefix)) => query.filter(Predicate::Like(
            "period_identifier".to_string(),
            format!("{}*", prefix),
        )),
        Some(PeriodFilter::AnyOf(identifiers)) => query.filter(Predicate::In(
            "period_identifier".to_string(),
            identifiers.iter().cloned().collect(),
        )),
        None => query,
    }
}

fn decode<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|e| {
                ReportError::data_unavailable(format!(
                    "{}: record {} could not be decoded: {}",
                    table, index, e
                ))
            })
        })
        .collect()
}

#[async_trait]
impl<D: DataService> ReferenceCatalog for DataFetcher<D> {
    async fn list_categories(&self) -> Result<Vec<DocumentCategory>> {
        let query = DataQuery::new(self.tables.document_categories.as_str(), "id,name")
            .order_by("name", Direction::Asc);
        let rows = self.run(&query).await?;
        decode(&query.table, rows)
    }

    async fn list_compliance_types(&self) -> Result<Vec<ComplianceType>> {
        let query = DataQuery::new(self.tables.compliance_types.as_str(), "id,name,frequency")
            .order_by("name", Direction::Asc);
        let rows = self.run(&query).await?;
        decode(&query.table, rows)
    }
}
