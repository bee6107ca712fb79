use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 任一階段失敗即中止，不會輸出部分檔案
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting report export");

        tracing::info!("📥 Fetching records...");
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Fetched {} records", records.len());
        self.monitor.log_stats("Extract");

        tracing::info!("🔄 Transforming records...");
        let result = self.pipeline.transform(records)?;
        tracing::info!(
            "🔄 Prepared {} rows in {} section(s) with {} columns",
            result.rows.len(),
            result.sections.len(),
            result.columns.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Saving {}...", result.artifact.filename);
        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
