use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        tokio_test::block_on(async {
            storage
                .write_file("data/processed/report.txt", b"hello")
                .await
                .unwrap();

            assert!(storage.exists("data/processed/report.txt").await);
            assert!(!storage.exists("data/processed/other.txt").await);
            let data = storage.read_file("data/processed/report.txt").await.unwrap();
            assert_eq!(data, b"hello");
        });
    }

    #[test]
    fn test_absolute_paths_bypass_base() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new("relative/base");
        let absolute = temp_dir.path().join("x.txt");
        assert_eq!(storage.resolve(absolute.to_str().unwrap()), absolute);
        assert_eq!(
            storage.resolve("data/raw/x.csv"),
            std::path::Path::new("relative/base/data/raw/x.csv")
        );
    }
}
