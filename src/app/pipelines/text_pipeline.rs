use crate::config::toml_config::TextConfig;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::TextSummary;
use crate::utils::error::{EtlError, Result};

pub struct TextPipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
}

impl<S: Storage> TextPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, paths: &C, settings: TextConfig) -> Self {
        Self {
            storage,
            input_path: paths.raw_path(&settings.input),
            output_path: paths.processed_path(&settings.output),
        }
    }
}

/// Splits UTF-8 text into lines that keep their trailing `\n`.
pub fn extract_lines(data: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(data)
        .map_err(|e| EtlError::validation(format!("Input is not valid UTF-8: {}", e)))?;
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    Ok(normalized.split_inclusive('\n').map(str::to_string).collect())
}

pub fn transform_line_word_char_counts(lines: &[String]) -> TextSummary {
    lines.iter().fold(
        TextSummary {
            lines: lines.len(),
            words: 0,
            chars: 0,
        },
        |mut summary, line| {
            summary.words += line.split_whitespace().count();
            summary.chars += line.chars().count();
            summary
        },
    )
}

pub fn verify_summary(summary: &TextSummary) -> Result<()> {
    if summary.words > summary.chars {
        return Err(EtlError::verification(
            "TXT",
            format!("{} words cannot fit in {} characters", summary.words, summary.chars),
        ));
    }
    if summary.lines > summary.chars {
        return Err(EtlError::verification(
            "TXT",
            format!("{} lines cannot fit in {} characters", summary.lines, summary.chars),
        ));
    }
    Ok(())
}

pub fn render_summary_report(summary: &TextSummary) -> String {
    format!(
        "Text File Summary\nLines: {}\nWords: {}\nCharacters: {}\n",
        summary.lines, summary.words, summary.chars
    )
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TextPipeline<S> {
    type Extracted = Vec<String>;
    type Transformed = TextSummary;

    fn label(&self) -> &str {
        "TXT"
    }

    async fn extract(&self) -> Result<Vec<String>> {
        if !self.storage.exists(&self.input_path).await {
            return Err(EtlError::FileNotFound {
                path: self.input_path.clone(),
            });
        }
        let data = self.storage.read_file(&self.input_path).await?;
        extract_lines(&data)
    }

    async fn transform(&self, data: Vec<String>) -> Result<TextSummary> {
        Ok(transform_line_word_char_counts(&data))
    }

    fn verify(&self, result: &TextSummary) -> Result<()> {
        verify_summary(result)
    }

    async fn load(&self, result: TextSummary) -> Result<String> {
        let report = render_summary_report(&result);
        self.storage
            .write_file(&self.output_path, report.as_bytes())
            .await?;
        Ok(self.output_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipelines::test_support::{MockStorage, TestPaths};
    use crate::core::etl::EtlEngine;

    #[test]
    fn test_lines_keep_newlines() {
        let lines = extract_lines(b"Two households,\r\nboth alike\nin dignity").unwrap();
        assert_eq!(
            lines,
            vec!["Two households,\n", "both alike\n", "in dignity"]
        );
    }

    #[test]
    fn test_lone_carriage_return_ends_a_line() {
        let lines = extract_lines(b"a\rb\r\nc\r").unwrap();
        assert_eq!(lines, vec!["a\n", "b\n", "c\n"]);
        assert_eq!(transform_line_word_char_counts(&lines).chars, 6);
    }

    #[test]
    fn test_counts() {
        let lines = extract_lines("O Romeo, Romeo!\nwherefore art thou\n".as_bytes()).unwrap();
        let summary = transform_line_word_char_counts(&lines);
        assert_eq!(
            summary,
            TextSummary {
                lines: 2,
                words: 6,
                chars: 35,
            }
        );
        assert!(verify_summary(&summary).is_ok());
    }

    #[test]
    fn test_chars_count_unicode_scalars() {
        let lines = extract_lines("naïve café\n".as_bytes()).unwrap();
        let summary = transform_line_word_char_counts(&lines);
        assert_eq!(summary.chars, 11);
        assert_eq!(summary.words, 2);
    }

    #[test]
    fn test_empty_text() {
        let summary = transform_line_word_char_counts(&extract_lines(b"").unwrap());
        assert_eq!(
            summary,
            TextSummary {
                lines: 0,
                words: 0,
                chars: 0,
            }
        );
        assert!(verify_summary(&summary).is_ok());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(extract_lines(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[tokio::test]
    async fn test_pipeline_writes_report() {
        let storage = MockStorage::new();
        storage
            .insert("data/raw/romeo_and_juliet.txt", b"a b\nc\n")
            .await;
        let pipeline = TextPipeline::new(storage.clone(), &TestPaths, TextConfig::default());

        let path = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(path, "data/processed/txt_summary.txt");
        assert_eq!(
            storage.get_string(&path).await.unwrap(),
            "Text File Summary\nLines: 2\nWords: 3\nCharacters: 6\n"
        );
    }
}
