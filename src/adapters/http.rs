use crate::domain::ports::{ConfigProvider, DataService};
use crate::domain::query::DataQuery;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// PostgREST-compatible data service (`GET {endpoint}/{table}?select=...`).
#[derive(Debug, Clone)]
pub struct RestDataService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    headers: HashMap<String, String>,
}

impl RestDataService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
            headers: HashMap::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        // 逾時交由設定決定，核心本身不另設
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api_endpoint().to_string(),
            api_key: config.api_key().map(str::to_string),
            headers: config.headers().clone(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), table)
    }
}

#[async_trait]
impl DataService for RestDataService {
    async fn query(&self, query: &DataQuery) -> Result<Vec<Value>> {
        let url = self.table_url(&query.table);
        let mut request = self.client.get(&url).query(&query.to_query_pairs());

        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        tracing::debug!("📡 GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Query on '{}' failed with status {}", query.table, status);
            return Err(ReportError::data_unavailable(format!(
                "{} returned {}: {}",
                query.table, status, body
            )));
        }

        match response.json::<Value>().await? {
            Value::Array(items) => Ok(items),
            other => Err(ReportError::data_unavailable(format!(
                "{} returned a non-list response: {}",
                query.table, other
            ))),
        }
    }
}
