use crate::config::toml_config::JsonConfig;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::CraftCounts;
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};

const UNKNOWN_GROUP: &str = "Unknown";

/// Counts the objects of a top-level JSON list by one string field.
pub struct JsonPipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
    settings: JsonConfig,
}

impl<S: Storage> JsonPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, paths: &C, settings: JsonConfig) -> Self {
        Self {
            storage,
            input_path: paths.raw_path(&settings.input),
            output_path: paths.processed_path(&settings.output),
            settings,
        }
    }
}

/// Returns the objects under `list_key`. A missing key yields an empty list;
/// non-object elements are dropped.
pub fn extract_object_list(data: &[u8], list_key: &str) -> Result<Vec<Map<String, Value>>> {
    let root: Value = serde_json::from_slice(data)?;

    let Value::Object(mut root) = root else {
        return Err(EtlError::validation(
            "Expected JSON top-level value to be an object.",
        ));
    };

    let items = match root.remove(list_key) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(EtlError::validation(format!(
                "Expected '{}' to be a list.",
                list_key
            )))
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect())
}

pub fn transform_count_by_key(items: &[Map<String, Value>], group_key: &str) -> CraftCounts {
    let mut counts = CraftCounts::new();
    for item in items {
        let group = match item.get(group_key) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
            _ => UNKNOWN_GROUP,
        };
        *counts.entry(group.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn verify_counts(counts: &CraftCounts) -> Result<()> {
    for (group, count) in counts {
        if group.trim().is_empty() {
            return Err(EtlError::verification(
                "JSON",
                format!("Invalid group name: {:?}", group),
            ));
        }
        if *count == 0 {
            return Err(EtlError::verification(
                "JSON",
                format!("Group {:?} has no members", group),
            ));
        }
    }
    Ok(())
}

pub fn render_counts_report(title: &str, counts: &CraftCounts) -> String {
    let mut out = format!("{}\n", title);
    for (group, count) in counts {
        out.push_str(&format!("{}: {}\n", group, count));
    }
    out
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for JsonPipeline<S> {
    type Extracted = Vec<Map<String, Value>>;
    type Transformed = CraftCounts;

    fn label(&self) -> &str {
        "JSON"
    }

    async fn extract(&self) -> Result<Self::Extracted> {
        if !self.storage.exists(&self.input_path).await {
            return Err(EtlError::FileNotFound {
                path: self.input_path.clone(),
            });
        }
        let data = self.storage.read_file(&self.input_path).await?;
        extract_object_list(&data, &self.settings.list_key)
    }

    async fn transform(&self, data: Self::Extracted) -> Result<CraftCounts> {
        Ok(transform_count_by_key(&data, &self.settings.group_key))
    }

    fn verify(&self, result: &CraftCounts) -> Result<()> {
        verify_counts(result)
    }

    async fn load(&self, result: CraftCounts) -> Result<String> {
        let report = render_counts_report(&self.settings.title, &result);
        self.storage
            .write_file(&self.output_path, report.as_bytes())
            .await?;
        Ok(self.output_path.clone())
    }
}
