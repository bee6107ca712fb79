use crate::domain::model::ExportFormat;
use crate::domain::ports::ConfigProvider;
use crate::domain::query::TableNames;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service: SourceConfig,
    #[serde(default)]
    pub tables: TableNames,
    #[serde(default)]
    pub export: ExportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_output_path() -> String {
    "./exports".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            format: ExportFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl ServiceConfig {
    /// 只有端點時的最小設定（僅使用命令列參數）
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            service: SourceConfig {
                endpoint: endpoint.into(),
                api_key: None,
                timeout_seconds: None,
                headers: HashMap::new(),
            },
            tables: TableNames::default(),
            export: ExportConfig::default(),
            monitoring: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HR_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;
        validate_path("export.output_path", &self.export.output_path)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validate_range("service.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(api_key) = &self.service.api_key {
            if api_key.contains("${") {
                return Err(ReportError::MissingConfigError {
                    field: format!("service.api_key ({})", api_key),
                });
            }
            validate_non_empty_string("service.api_key", api_key)?;
        }

        let tables = &self.tables;
        for (field, name) in [
            ("tables.employees", &tables.employees),
            ("tables.branches", &tables.branches),
            ("tables.leaves", &tables.leaves),
            ("tables.leave_types", &tables.leave_types),
            ("tables.employee_documents", &tables.employee_documents),
            ("tables.document_categories", &tables.document_categories),
            ("tables.compliance_records", &tables.compliance_records),
            ("tables.compliance_types", &tables.compliance_types),
        ] {
            validate_non_empty_string(field, name)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for ServiceConfig {
    fn api_endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.service.api_key.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.service.timeout_seconds
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.service.headers
    }

    fn tables(&self) -> &TableNames {
        &self.tables
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
endpoint = "https://hr.example.com/rest/v1"
api_key = "abc123"
timeout_seconds = 20

[service.headers]
"X-Tenant" = "north"

[tables]
leaves = "leaves"

[export]
output_path = "./out"
format = "xlsx"

[monitoring]
enabled = true
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), "https://hr.example.com/rest/v1");
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.headers().get("X-Tenant").map(String::as_str), Some("north"));
        assert_eq!(config.tables.leaves, "leaves");
        assert_eq!(config.tables.employees, "employees");
        assert_eq!(config.export.format, ExportFormat::Xlsx);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = ServiceConfig::from_toml_str(
            r#"
[service]
endpoint = "http://localhost:3000"
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), "./exports");
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.tables, TableNames::default());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HR_REPORT_TEST_KEY", "from-env");

        let config = ServiceConfig::from_toml_str(
            r#"
[service]
endpoint = "http://localhost:3000"
api_key = "${HR_REPORT_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("HR_REPORT_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = ServiceConfig::from_toml_str(
            r#"
[service]
endpoint = "http://localhost:3000"
api_key = "${HR_REPORT_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ReportError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServiceConfig::new("invalid-url");
        assert!(config.validate().is_err());

        config.service.endpoint = "https://hr.example.com".to_string();
        config.service.timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        config.service.timeout_seconds = Some(30);
        config.tables.leaves = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nendpoint = \"https://hr.example.com\"\n")
            .unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_endpoint(), "https://hr.example.com");
    }
}
