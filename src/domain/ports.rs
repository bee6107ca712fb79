use crate::domain::model::TransformResult;
use crate::domain::query::{DataQuery, TableNames};
use crate::domain::records::{ComplianceType, DocumentCategory, RawRecords};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn headers(&self) -> &HashMap<String, String>;
    fn tables(&self) -> &TableNames;
    fn output_path(&self) -> &str;
}

/// 關聯式資料服務：每次匯出只發出一個列表查詢
#[async_trait]
pub trait DataService: Send + Sync {
    async fn query(&self, query: &DataQuery) -> Result<Vec<serde_json::Value>>;
}

/// Reference lists maintained outside the export core.
#[async_trait]
pub trait ReferenceCatalog: Send + Sync {
    /// Ordered by name.
    async fn list_categories(&self) -> Result<Vec<DocumentCategory>>;
    async fn list_compliance_types(&self) -> Result<Vec<ComplianceType>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawRecords>;
    /// 純記憶體運算，不會 await
    fn transform(&self, data: RawRecords) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
