use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use fintrack_core::{storage::FinanceStore, CoreError};
use serde_json::Value;
use tracing::debug;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed key-value store: one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn value_path(&self, key: &str) -> Result<PathBuf, CoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

impl FinanceStore for JsonFileStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let path = self.value_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&data).map_err(|err| {
            CoreError::Serde(format!("failed to parse `{}`: {}", path.display(), err))
        })?;
        Ok(Some(value))
    }

    fn set_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let path = self.value_path(key)?;
        let data = serde_json::to_string_pretty(&value)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), bytes = data.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.value_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if is_valid_key(stem) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}

fn validate_key(key: &str) -> Result<(), CoreError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(CoreError::Storage(format!("invalid storage key `{}`", key)))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("{}.{}", FILE_EXTENSION, TMP_SUFFIX));
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
