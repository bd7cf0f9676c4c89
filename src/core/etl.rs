use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives one pipeline through extract, transform, verify and load.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let label = self.pipeline.label();
        tracing::info!("{}: START", label);
        self.monitor.log_stats(&format!("{} start", label));

        tracing::debug!("{}: extracting", label);
        let raw_data = self.pipeline.extract().await?;
        self.monitor.log_stats(&format!("{} extract", label));

        tracing::debug!("{}: transforming", label);
        let transformed = self.pipeline.transform(raw_data).await?;
        self.monitor.log_stats(&format!("{} transform", label));

        tracing::debug!("{}: verifying", label);
        self.pipeline.verify(&transformed)?;

        tracing::debug!("{}: loading", label);
        let output_path = self.pipeline.load(transformed).await?;
        self.monitor.log_stats(&format!("{} load", label));

        tracing::info!("{}: wrote {}", label, output_path);
        tracing::info!("{}: END", label);
        if self.monitor.is_enabled() {
            self.monitor.log_final_stats();
        }

        Ok(output_path)
    }
}
