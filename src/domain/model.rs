use serde::Serialize;
use std::path::{Path, PathBuf};

/// One input file discovered in the pending folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    pub key: String,
    pub filename: String,
}

impl BatchItem {
    /// Builds an item from an object key. Folder markers and keys whose last
    /// component could escape the staging directory yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.ends_with('/') {
            return None;
        }
        let filename = key.rsplit('/').next()?;
        if filename.is_empty() || filename == "." || filename == ".." || filename.contains('\\')
        {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            filename: filename.to_string(),
        })
    }

    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.filename)
    }

    pub fn ok_filename(&self) -> String {
        format!("{}_ok.csv", self.stem())
    }

    pub fn error_filename(&self) -> String {
        format!("{}_error.csv", self.stem())
    }
}

/// One parsed CSV row. `position` is the 1-based data row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub position: usize,
    pub fields: Vec<String>,
}

/// Field values in the order the remote endpoint expects them, after
/// coercion. `None` is sent as NULL / an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecord {
    pub position: usize,
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub record: Record,
    pub reason: String,
}

/// Result of reconciling one file: every input row lands in exactly one of
/// `ok` or `errors`, each in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub header: Option<Vec<String>>,
    pub ok: Vec<Record>,
    pub errors: Vec<RejectedRecord>,
    pub encoding: &'static str,
    pub remote_calls: usize,
}

impl Reconciliation {
    pub fn total(&self) -> usize {
        self.ok.len() + self.errors.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPair {
    pub ok_path: PathBuf,
    pub error_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Discover,
    Download,
    Reconcile,
    Upload,
    Cleanup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Completed { ok: usize, errors: usize },
    Failed { stage: Stage, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub key: String,
    pub filename: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.status, ItemStatus::Completed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.completed()
    }
}
