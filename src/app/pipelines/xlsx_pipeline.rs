use crate::config::toml_config::XlsxConfig;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::WordCount;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::parse_column_letter;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Counts a word across one column of the first worksheet of a workbook.
pub struct XlsxPipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
    settings: XlsxConfig,
}

impl<S: Storage> XlsxPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, paths: &C, settings: XlsxConfig) -> Self {
        Self {
            storage,
            input_path: paths.raw_path(&settings.input),
            output_path: paths.processed_path(&settings.output),
            settings,
        }
    }
}

/// Non-blank string cells of `column_letter` on the first worksheet, top to bottom.
pub fn extract_column_strings(data: &[u8], column_letter: &str) -> Result<Vec<String>> {
    let column = parse_column_letter("xlsx.column", column_letter)?;
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EtlError::validation("Workbook has no worksheets."))??;

    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };

    let values = (first_row..=last_row)
        .filter_map(|row| match range.get_value((row, column)) {
            Some(Data::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
        .collect();
    Ok(values)
}

/// Case-insensitive, non-overlapping occurrences of `word` across `values`.
pub fn transform_count_word(values: &[String], word: &str, column: &str) -> Result<WordCount> {
    if word.is_empty() {
        return Err(EtlError::processing("Word to count cannot be empty."));
    }

    let target = word.to_lowercase();
    let mut count = 0;
    let mut scanned_chars = 0;
    for text in values {
        let lowered = text.to_lowercase();
        scanned_chars += lowered.chars().count();
        count += lowered.matches(target.as_str()).count();
    }

    Ok(WordCount {
        word: word.to_string(),
        column: column.to_string(),
        count,
        max_possible: scanned_chars / target.chars().count(),
    })
}

pub fn verify_count(result: &WordCount) -> Result<()> {
    if result.word.is_empty() {
        return Err(EtlError::verification("XLSX", "Counted word is empty."));
    }
    if result.count > result.max_possible {
        return Err(EtlError::verification(
            "XLSX",
            format!(
                "Count {} exceeds the {} possible matches",
                result.count, result.max_possible
            ),
        ));
    }
    Ok(())
}

pub fn render_count_report(result: &WordCount) -> String {
    format!(
        "XLSX Word Count Result\nWord: {}\nColumn: {}\nCount: {}\n",
        result.word, result.column, result.count
    )
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for XlsxPipeline<S> {
    type Extracted = Vec<String>;
    type Transformed = WordCount;

    fn label(&self) -> &str {
        "XLSX"
    }

    async fn extract(&self) -> Result<Vec<String>> {
        if !self.storage.exists(&self.input_path).await {
            return Err(EtlError::FileNotFound {
                path: self.input_path.clone(),
            });
        }
        let data = self.storage.read_file(&self.input_path).await?;
        let values = extract_column_strings(&data, &self.settings.column)?;
        tracing::debug!(
            "XLSX: read {} text cells from column {}",
            values.len(),
            self.settings.column
        );
        Ok(values)
    }

    async fn transform(&self, data: Vec<String>) -> Result<WordCount> {
        transform_count_word(&data, &self.settings.word, &self.settings.column)
    }

    fn verify(&self, result: &WordCount) -> Result<()> {
        verify_count(result)
    }

    async fn load(&self, result: WordCount) -> Result<String> {
        let report = render_count_report(&result);
        self.storage
            .write_file(&self.output_path, report.as_bytes())
            .await?;
        Ok(self.output_path.clone())
    }
}
