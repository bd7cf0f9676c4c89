use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Where pipelines find raw inputs and put processed reports.
pub trait ConfigProvider: Send + Sync {
    fn raw_dir(&self) -> &str;
    fn processed_dir(&self) -> &str;

    fn raw_path(&self, file: &str) -> String {
        join_path(self.raw_dir(), file)
    }

    fn processed_path(&self, file: &str) -> String {
        join_path(self.processed_dir(), file)
    }
}

pub(crate) fn join_path(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

/// Extract, transform, verify, load.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send + Sync;

    /// Short label used in log lines, e.g. `CSV`.
    fn label(&self) -> &str;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    fn verify(&self, result: &Self::Transformed) -> Result<()>;
    /// Writes the report and returns the path it was written to.
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("data/raw", "a.csv"), "data/raw/a.csv");
        assert_eq!(join_path("data/raw/", "a.csv"), "data/raw/a.csv");
        assert_eq!(join_path(".", "a.csv"), "a.csv");
        assert_eq!(join_path("", "a.csv"), "a.csv");
    }
}
