use clap::Parser;
use hr_report_export::core::export::ExportTrigger;
use hr_report_export::domain::model::ReportId;
use hr_report_export::domain::ports::{ConfigProvider, ReferenceCatalog};
use hr_report_export::utils::error::ErrorSeverity;
use hr_report_export::utils::{logger, validation::Validate};
use hr_report_export::{
    CliConfig, DataFetcher, ExportEngine, FilterResolver, LocalStorage, ReportError,
    ReportPipeline, ReportSession, RestDataService, Result,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting hr-report-export");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證命令列參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(Some(output_path)) => {
            tracing::info!("✅ Report exported successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Report exported successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// Returns the written file path, or `None` when only the catalog was listed.
async fn run(cli: &CliConfig) -> Result<Option<String>> {
    let service_config = cli.service_config()?;
    service_config.validate()?;

    if service_config.monitoring_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let service = RestDataService::from_config(&service_config)?;
    let fetcher = DataFetcher::new(service, service_config.tables().clone());

    let categories = fetcher.list_categories().await?;
    let mut session = ReportSession::new(&categories);

    if cli.list {
        print_catalog(&session);
        return Ok(None);
    }

    let report = cli.report_id()?.ok_or(ReportError::NoReportSelected)?;

    if !cli.columns.is_empty() {
        for ignored in session.set_selection(report, &cli.columns) {
            tracing::warn!("⚠️ Ignoring unknown column '{}' for {} report", ignored, report);
        }
    }

    let compliance_types = match report {
        ReportId::Compliance => fetcher.list_compliance_types().await?,
        _ => Vec::new(),
    };
    let filter = FilterResolver::new(&compliance_types).resolve(report, &cli.raw_selections());

    let storage = LocalStorage::new(service_config.output_path().to_string());
    let pipeline = ReportPipeline::prepare(
        &session,
        Some(report),
        filter,
        fetcher,
        ExportTrigger::new(storage),
    )?
    .with_format(service_config.export.format);

    let engine = ExportEngine::new_with_monitoring(pipeline, service_config.monitoring_enabled());
    engine.run().await.map(Some)
}

fn print_catalog(session: &ReportSession) {
    for definition in session.definitions() {
        let selected = session.selection(definition.id);
        println!(
            "{} ({}): {}",
            definition.display_name, definition.id, definition.description
        );
        for field in &definition.fields {
            let mark = if selected.contains(field) { "x" } else { " " };
            println!("  [{}] {}", mark, field);
        }
    }
}
