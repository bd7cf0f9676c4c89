use crate::app::pipelines::{CsvPipeline, JsonPipeline, SalesPipeline, TextPipeline, XlsxPipeline};
use crate::config::toml_config::AnalyticsConfig;
use crate::core::etl::EtlEngine;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::io::Write;
use std::time::{Duration, Instant};
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PipelineKind {
    Csv,
    Xlsx,
    Json,
    Text,
    Sales,
}

impl PipelineKind {
    /// Execution order.
    pub const ALL: [PipelineKind; 5] = [
        PipelineKind::Csv,
        PipelineKind::Xlsx,
        PipelineKind::Json,
        PipelineKind::Text,
        PipelineKind::Sales,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PipelineKind::Csv => "CSV",
            PipelineKind::Xlsx => "XLSX",
            PipelineKind::Json => "JSON",
            PipelineKind::Text => "TXT",
            PipelineKind::Sales => "SALES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPipeline {
    pub kind: PipelineKind,
    pub input: String,
    pub outputs: Vec<String>,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub kind: PipelineKind,
    pub elapsed: Duration,
    /// Written files on success, the error message on failure.
    pub result: std::result::Result<Vec<String>, String>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<PipelineOutcome>,
    pub archive: Option<String>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outputs(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Runs the enabled pipelines in order against one storage backend.
pub struct Runner<S: Storage + Clone> {
    storage: S,
    config: AnalyticsConfig,
}

impl<S: Storage + Clone> Runner<S> {
    pub fn new(storage: S, config: AnalyticsConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn enabled_pipelines(&self) -> Vec<PipelineKind> {
        PipelineKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                PipelineKind::Csv => self.config.csv.enabled,
                PipelineKind::Xlsx => self.config.xlsx.enabled,
                PipelineKind::Json => self.config.json.enabled,
                PipelineKind::Text => self.config.text.enabled,
                PipelineKind::Sales => self.config.sales.enabled,
            })
            .collect()
    }

    /// Inputs and outputs of every enabled pipeline, without touching storage.
    pub fn plan(&self) -> Vec<PlannedPipeline> {
        let c = &self.config;
        self.enabled_pipelines()
            .into_iter()
            .map(|kind| {
                let (input, outputs) = match kind {
                    PipelineKind::Csv => (&c.csv.input, vec![&c.csv.output]),
                    PipelineKind::Xlsx => (&c.xlsx.input, vec![&c.xlsx.output]),
                    PipelineKind::Json => (&c.json.input, vec![&c.json.output]),
                    PipelineKind::Text => (&c.text.input, vec![&c.text.output]),
                    PipelineKind::Sales => {
                        (&c.sales.input, vec![&c.sales.output, &c.sales.csv_output])
                    }
                };
                PlannedPipeline {
                    kind,
                    input: c.raw_path(input),
                    outputs: outputs.into_iter().map(|o| c.processed_path(o)).collect(),
                }
            })
            .collect()
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for kind in self.enabled_pipelines() {
            let started = Instant::now();
            match self.run_one(kind).await {
                Ok(outputs) => summary.outcomes.push(PipelineOutcome {
                    kind,
                    elapsed: started.elapsed(),
                    result: Ok(outputs),
                }),
                Err(e) if self.config.error_handling.continue_on_error => {
                    tracing::error!("{}: failed: {}", kind.label(), e);
                    tracing::warn!("💡 {}", e.recovery_suggestion());
                    summary.outcomes.push(PipelineOutcome {
                        kind,
                        elapsed: started.elapsed(),
                        result: Err(e.to_string()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if self.config.load.archive.enabled {
            let outputs: Vec<String> = summary.outputs().into_iter().map(str::to_string).collect();
            summary.archive = Some(self.write_archive(&outputs).await?);
        }

        tracing::info!(
            "Run finished: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }

    async fn run_one(&self, kind: PipelineKind) -> Result<Vec<String>> {
        let storage = self.storage.clone();
        let c = &self.config;
        match kind {
            PipelineKind::Csv => {
                let path = self.execute(CsvPipeline::new(storage, c, c.csv.clone())).await?;
                Ok(vec![path])
            }
            PipelineKind::Xlsx => {
                let path = self.execute(XlsxPipeline::new(storage, c, c.xlsx.clone())).await?;
                Ok(vec![path])
            }
            PipelineKind::Json => {
                let path = self.execute(JsonPipeline::new(storage, c, c.json.clone())).await?;
                Ok(vec![path])
            }
            PipelineKind::Text => {
                let path = self.execute(TextPipeline::new(storage, c, c.text.clone())).await?;
                Ok(vec![path])
            }
            PipelineKind::Sales => {
                let path = self.execute(SalesPipeline::new(storage, c, &c.sales)?).await?;
                Ok(vec![path, c.processed_path(&c.sales.csv_output)])
            }
        }
    }

    async fn execute<P: Pipeline>(&self, pipeline: P) -> Result<String> {
        EtlEngine::new_with_monitoring(pipeline, self.config.monitoring_enabled())
            .run()
            .await
    }

    /// Bundles the written reports into one zip in the processed directory.
    async fn write_archive(&self, outputs: &[String]) -> Result<String> {
        let archive_path = self.config.processed_path(&self.config.load.archive.filename);

        let mut entries = Vec::with_capacity(outputs.len());
        for path in outputs {
            let data = self.storage.read_file(path).await?;
            let name = path.rsplit('/').next().unwrap_or(path).to_string();
            entries.push((name, data));
        }

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &entries {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            zip.finish()?.into_inner()
        };

        tracing::debug!(
            "Writing archive with {} reports ({} bytes)",
            entries.len(),
            zip_data.len()
        );
        self.storage.write_file(&archive_path, &zip_data).await?;
        tracing::info!("📦 Reports archived to {}", archive_path);
        Ok(archive_path)
    }
}
