use crate::config::toml_config::CsvConfig;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::ScoreStats;
use crate::utils::error::{EtlError, Result};

/// Summary statistics for one numeric column of a CSV file.
pub struct CsvPipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
    settings: CsvConfig,
}

impl<S: Storage> CsvPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, paths: &C, settings: CsvConfig) -> Self {
        Self {
            storage,
            input_path: paths.raw_path(&settings.input),
            output_path: paths.processed_path(&settings.output),
            settings,
        }
    }
}

/// Reads `column` as floats. Blank and non-numeric cells are skipped.
pub fn extract_column_values(data: &[u8], column: &str, source: &str) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| EtlError::MissingColumn {
            path: source.to_string(),
            column: column.to_string(),
            found: headers.iter().map(str::to_string).collect(),
        })?;

    let mut values = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        let raw = record.get(index).unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => values.push(value),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} non-numeric values in column '{}'", skipped, column);
    }
    Ok(values)
}

pub fn transform_scores_to_stats(scores: &[f64]) -> Result<ScoreStats> {
    if scores.is_empty() {
        return Err(EtlError::processing("No numeric values found for analysis."));
    }

    let count = scores.len();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.iter().sum::<f64>() / count as f64;
    let stdev = if count > 1 {
        let variance =
            scores.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Ok(ScoreStats {
        count,
        min,
        max,
        mean,
        stdev,
    })
}

pub fn verify_stats(stats: &ScoreStats) -> Result<()> {
    if stats.count == 0 {
        return Err(EtlError::verification("CSV", "Count must be positive."));
    }
    if stats.min > stats.max {
        return Err(EtlError::verification("CSV", "Min cannot be greater than max."));
    }
    // Tolerate rounding in the mean.
    let epsilon = 1e-9 * stats.max.abs().max(1.0);
    if stats.mean < stats.min - epsilon || stats.mean > stats.max + epsilon {
        return Err(EtlError::verification("CSV", "Mean must lie between min and max."));
    }
    if stats.stdev < 0.0 || stats.stdev.is_nan() {
        return Err(EtlError::verification("CSV", "Standard deviation must be non-negative."));
    }
    Ok(())
}

pub fn render_stats_report(title: &str, stats: &ScoreStats) -> String {
    format!(
        "{}\nCount: {}\nMinimum: {:.2}\nMaximum: {:.2}\nMean: {:.2}\nStandard Deviation: {:.2}\n",
        title, stats.count, stats.min, stats.max, stats.mean, stats.stdev
    )
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for CsvPipeline<S> {
    type Extracted = Vec<f64>;
    type Transformed = ScoreStats;

    fn label(&self) -> &str {
        "CSV"
    }

    async fn extract(&self) -> Result<Vec<f64>> {
        if !self.storage.exists(&self.input_path).await {
            return Err(EtlError::FileNotFound {
                path: self.input_path.clone(),
            });
        }
        let data = self.storage.read_file(&self.input_path).await?;
        let values = extract_column_values(&data, &self.settings.column, &self.input_path)?;
        tracing::debug!("CSV: read {} values from {}", values.len(), self.input_path);
        Ok(values)
    }

    async fn transform(&self, data: Vec<f64>) -> Result<ScoreStats> {
        transform_scores_to_stats(&data)
    }

    fn verify(&self, result: &ScoreStats) -> Result<()> {
        verify_stats(result)
    }

    async fn load(&self, result: ScoreStats) -> Result<String> {
        let report = render_stats_report(&self.settings.title, &result);
        self.storage
            .write_file(&self.output_path, report.as_bytes())
            .await?;
        Ok(self.output_path.clone())
    }
}
