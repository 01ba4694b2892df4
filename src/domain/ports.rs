use crate::domain::model::{Outcome, PreparedRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Bucket-style storage holding the pending, processed and error folders.
pub trait ObjectStore: Send + Sync {
    /// Keys of every object under `prefix`, folder markers included.
    fn list(&self, prefix: &str) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn download(
        &self,
        key: &str,
        local_path: &Path,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn upload(
        &self,
        local_path: &Path,
        key: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The remote system that accepts or rejects individual records.
#[async_trait]
pub trait RecordProcessor: Send + Sync {
    /// Checked once per file before any row is submitted. An error here is an
    /// item-level failure: the file is left pending.
    async fn ready(&self) -> Result<()> {
        Ok(())
    }

    /// Submits one record. Rejections and transport problems come back as
    /// `Outcome::Failure`, never as `Err`.
    async fn process(&self, record: &PreparedRecord) -> Outcome;
}
