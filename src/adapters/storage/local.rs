use crate::domain::ports::ObjectStore;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Object store backed by a directory tree. Keys are `/`-separated paths
/// relative to `base_path`. Used for local runs and in tests.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
}

impl LocalObjectStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.base_path.clone(), |path, segment| path.join(segment))
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.base_path) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(key);
            }
        }
        Ok(())
    }
}

impl ObjectStore for LocalObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = self.full_path(prefix);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        self.collect_keys(&dir, &mut keys)
            .map_err(|e| EtlError::storage("list", prefix, e))?;
        keys.sort();
        Ok(keys)
    }

    async fn download(&self, key: &str, local_path: &Path) -> Result<()> {
        let source = self.full_path(key);
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, local_path).map_err(|e| EtlError::storage("download", key, e))?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        let target = self.full_path(key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| EtlError::storage("upload", key, e))?;
        }
        fs::copy(local_path, &target).map_err(|e| EtlError::storage("upload", key, e))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        fs::remove_file(self.full_path(key)).map_err(|e| EtlError::storage("delete", key, e))
    }
}
