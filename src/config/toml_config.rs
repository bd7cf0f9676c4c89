use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub paths: PathsConfig,
    pub csv: CsvConfig,
    pub json: JsonConfig,
    pub text: TextConfig,
    pub xlsx: XlsxConfig,
    pub sales: SalesConfig,
    pub load: LoadConfig,
    pub monitoring: MonitoringConfig,
    pub error_handling: ErrorHandlingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_dir: String,
    pub processed_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: "data/raw".to_string(),
            processed_dir: "data/processed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub enabled: bool,
    pub input: String,
    pub column: String,
    pub title: String,
    pub output: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: "2020_happiness.csv".to_string(),
            column: "Ladder score".to_string(),
            title: "CSV Ladder Score Statistics".to_string(),
            output: "csv_ladder_score_stats.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    pub enabled: bool,
    pub input: String,
    pub list_key: String,
    pub group_key: String,
    pub title: String,
    pub output: String,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: "astros.json".to_string(),
            list_key: "people".to_string(),
            group_key: "craft".to_string(),
            title: "Astronauts by spacecraft:".to_string(),
            output: "json_astronauts_by_craft.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub enabled: bool,
    pub input: String,
    pub output: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: "romeo_and_juliet.txt".to_string(),
            output: "txt_summary.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XlsxConfig {
    pub enabled: bool,
    pub input: String,
    pub column: String,
    pub word: String,
    pub output: String,
}

impl Default for XlsxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: "Feedback.xlsx".to_string(),
            column: "A".to_string(),
            word: "GitHub".to_string(),
            output: "xlsx_feedback_github_count.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    pub enabled: bool,
    pub input: String,
    /// Inclusive, `YYYY-MM-DD`.
    pub start: String,
    /// Exclusive, `YYYY-MM-DD`.
    pub end: String,
    pub limit: i64,
    pub output: String,
    pub csv_output: String,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            input: "sales.csv".to_string(),
            start: "2024-01-01".to_string(),
            end: "2025-01-01".to_string(),
            limit: 10,
            output: "sales_top_customers.txt".to_string(),
            csv_output: "sales_top_customers.csv".to_string(),
        }
    }
}

impl SalesConfig {
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let start = validation::parse_date("sales.start", &self.start)?;
        let end = validation::parse_date("sales.end", &self.end)?;
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub filename: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "reports.zip".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorHandlingConfig {
    pub continue_on_error: bool,
}

impl AnalyticsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EtlError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for AnalyticsConfig {
    fn raw_dir(&self) -> &str {
        &self.paths.raw_dir
    }

    fn processed_dir(&self) -> &str {
        &self.paths.processed_dir
    }
}

impl Validate for AnalyticsConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("paths.raw_dir", &self.paths.raw_dir)?;
        validation::validate_path("paths.processed_dir", &self.paths.processed_dir)?;

        if self.csv.enabled {
            validation::validate_path("csv.input", &self.csv.input)?;
            validation::validate_path("csv.output", &self.csv.output)?;
            validation::validate_non_empty_string("csv.column", &self.csv.column)?;
        }

        if self.json.enabled {
            validation::validate_path("json.input", &self.json.input)?;
            validation::validate_path("json.output", &self.json.output)?;
            validation::validate_non_empty_string("json.list_key", &self.json.list_key)?;
            validation::validate_non_empty_string("json.group_key", &self.json.group_key)?;
        }

        if self.text.enabled {
            validation::validate_path("text.input", &self.text.input)?;
            validation::validate_path("text.output", &self.text.output)?;
        }

        if self.xlsx.enabled {
            validation::validate_file_extension("xlsx.input", &self.xlsx.input, &["xlsx"])?;
            validation::validate_path("xlsx.output", &self.xlsx.output)?;
            validation::parse_column_letter("xlsx.column", &self.xlsx.column)?;
            validation::validate_non_empty_string("xlsx.word", &self.xlsx.word)?;
        }

        if self.sales.enabled {
            validation::validate_path("sales.input", &self.sales.input)?;
            validation::validate_path("sales.output", &self.sales.output)?;
            validation::validate_path("sales.csv_output", &self.sales.csv_output)?;
            let (start, end) = self.sales.date_range()?;
            if start >= end {
                tracing::warn!(
                    "⚠️ sales range [{}, {}) is empty, the report will list no customers",
                    start,
                    end
                );
            }
        }

        if self.load.archive.enabled {
            validation::validate_file_extension(
                "load.archive.filename",
                &self.load.archive.filename,
                &["zip"],
            )?;
        }

        Ok(())
    }
}
