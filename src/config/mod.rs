pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::config::toml_config::ServiceConfig;
    use crate::domain::model::{ExportFormat, RawSelections, ReportId};
    use crate::utils::error::{ReportError, Result};
    use crate::utils::validation::{validate_month, validate_quarter, validate_year, Validate};
    use chrono::NaiveDate;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "hr-report-export")]
    #[command(about = "Export HR and compliance reports as CSV files")]
    pub struct CliConfig {
        #[arg(short, long, help = "Path to a TOML service configuration")]
        pub config: Option<String>,

        #[arg(long, help = "Data service endpoint (overrides the config file)")]
        pub endpoint: Option<String>,

        #[arg(long, help = "Data service API key (overrides the config file)")]
        pub api_key: Option<String>,

        #[arg(long, help = "Directory the export is written to")]
        pub output_path: Option<String>,

        #[arg(short, long, help = "Report to export: employees, leaves, documents, compliance")]
        pub report: Option<String>,

        #[arg(long, value_delimiter = ',', help = "Columns to export (default: all)")]
        pub columns: Vec<String>,

        #[arg(long, help = "Branch id, or \"all\"")]
        pub branch: Option<String>,

        #[arg(long, help = "Leave type id or compliance type id")]
        pub sub_type: Option<String>,

        #[arg(long, help = "Earliest leave start date (YYYY-MM-DD)")]
        pub from: Option<NaiveDate>,

        #[arg(long, help = "Latest leave start date (YYYY-MM-DD)")]
        pub to: Option<NaiveDate>,

        #[arg(long, help = "Compliance period year")]
        pub year: Option<String>,

        #[arg(long, value_delimiter = ',', help = "Compliance months, e.g. 1,2,12")]
        pub months: Vec<String>,

        #[arg(long, value_delimiter = ',', help = "Compliance quarters, e.g. Q1,Q3")]
        pub quarters: Vec<String>,

        #[arg(long, help = "Export format: csv or xlsx")]
        pub format: Option<String>,

        #[arg(long, help = "List reports and their columns, then exit")]
        pub list: bool,

        #[arg(long, help = "Emit JSON log lines")]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log memory and CPU usage per phase")]
        pub monitor: bool,
    }

    impl CliConfig {
        pub fn report_id(&self) -> Result<Option<ReportId>> {
            self.report.as_deref().map(str::parse).transpose()
        }

        pub fn export_format(&self) -> Result<Option<ExportFormat>> {
            self.format.as_deref().map(str::parse).transpose()
        }

        pub fn raw_selections(&self) -> RawSelections {
            RawSelections {
                branch: self.branch.clone(),
                sub_type: self.sub_type.clone(),
                from: self.from,
                to: self.to,
                year: self.year.clone(),
                months: self.months.clone(),
                quarters: self.quarters.clone(),
            }
        }

        /// 載入設定檔（若有），再以命令列參數覆寫
        pub fn service_config(&self) -> Result<ServiceConfig> {
            let mut config = match (&self.config, &self.endpoint) {
                (Some(path), _) => {
                    tracing::info!("📄 Loading configuration from {}", path);
                    ServiceConfig::from_file(path)?
                }
                (None, Some(endpoint)) => ServiceConfig::new(endpoint.clone()),
                (None, None) => {
                    return Err(ReportError::MissingConfigError {
                        field: "--config or --endpoint".to_string(),
                    })
                }
            };

            if let Some(endpoint) = &self.endpoint {
                config.service.endpoint = endpoint.clone();
            }
            if let Some(api_key) = &self.api_key {
                config.service.api_key = Some(api_key.clone());
            }
            if let Some(output_path) = &self.output_path {
                config.export.output_path = output_path.clone();
            }
            if let Some(format) = self.export_format()? {
                config.export.format = format;
            }
            if self.monitor {
                config.monitoring = Some(crate::config::toml_config::MonitoringConfig {
                    enabled: true,
                });
            }

            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            self.report_id()?;
            self.export_format()?;

            if let Some(year) = &self.year {
                validate_year("year", year)?;
            }
            for month in &self.months {
                validate_month("months", month)?;
            }
            for quarter in &self.quarters {
                validate_quarter("quarters", quarter)?;
            }

            if let (Some(from), Some(to)) = (self.from, self.to) {
                if from > to {
                    return Err(ReportError::InvalidConfigValueError {
                        field: "from".to_string(),
                        value: from.to_string(),
                        reason: format!("Start date is after end date {}", to),
                    });
                }
            }

            Ok(())
        }
    }

}
