pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::app::runner::PipelineKind;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::AnalyticsConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "datafun-analytics")]
#[command(about = "Run the ETVL analytics pipelines over data/raw and write reports to data/processed")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the raw input directory
    #[arg(long)]
    pub raw_dir: Option<String>,

    /// Override the processed output directory
    #[arg(long)]
    pub processed_dir: Option<String>,

    /// Run only these pipelines (csv, xlsx, json, text, sales)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<PipelineKind>,

    /// Bundle all written reports into a zip archive
    #[arg(long)]
    pub archive: bool,

    /// Keep running the remaining pipelines after a failure
    #[arg(long)]
    pub continue_on_error: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage between phases")]
    pub monitor: bool,

    /// Show what would be processed without reading or writing files
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    pub fn load_config(&self) -> crate::Result<AnalyticsConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyticsConfig::from_file(path)?,
            None => AnalyticsConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AnalyticsConfig) {
        if let Some(raw_dir) = &self.raw_dir {
            config.paths.raw_dir = raw_dir.clone();
        }
        if let Some(processed_dir) = &self.processed_dir {
            config.paths.processed_dir = processed_dir.clone();
        }
        if !self.only.is_empty() {
            config.csv.enabled = self.only.contains(&PipelineKind::Csv);
            config.xlsx.enabled = self.only.contains(&PipelineKind::Xlsx);
            config.json.enabled = self.only.contains(&PipelineKind::Json);
            config.text.enabled = self.only.contains(&PipelineKind::Text);
            config.sales.enabled = self.only.contains(&PipelineKind::Sales);
        }
        if self.archive {
            config.load.archive.enabled = true;
        }
        if self.continue_on_error {
            config.error_handling.continue_on_error = true;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        if self.json_logs {
            config.monitoring.json_logs = true;
        }
    }
}
