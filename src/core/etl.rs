use crate::config::pipeline::PipelineConfig;
use crate::core::reconciler::Reconciler;
use crate::core::writer::write_outputs;
use crate::domain::model::{
    BatchItem, BatchReport, ItemReport, ItemStatus, OutputPair, Stage,
};
use crate::domain::ports::{ObjectStore, RecordProcessor};
use crate::domain::schema::Schema;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::PathBuf;

struct StagedItem {
    item: BatchItem,
    local_path: PathBuf,
}

struct ReconciledItem {
    staged: StagedItem,
    outputs: OutputPair,
    ok: usize,
    errors: usize,
}

/// Runs one batch: list, download, reconcile, upload, clean up. Each stage
/// finishes for every item before the next stage starts.
pub struct EtlEngine<'a, S: ObjectStore, P: RecordProcessor> {
    store: &'a S,
    processor: &'a P,
    schema: &'a Schema,
    config: &'a PipelineConfig,
}

impl<'a, S: ObjectStore, P: RecordProcessor> EtlEngine<'a, S, P> {
    pub fn new(
        store: &'a S,
        processor: &'a P,
        schema: &'a Schema,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            store,
            processor,
            schema,
            config,
        }
    }

    /// Pending items, without touching them.
    pub async fn discover(&self) -> Result<Vec<BatchItem>> {
        let prefix = &self.config.storage.pending_folder;
        let keys = self.store.list(prefix).await?;

        let mut items = Vec::new();
        for key in keys {
            if key == *prefix || key.ends_with('/') {
                continue;
            }
            match BatchItem::from_key(&key) {
                Some(item) => items.push(item),
                None => tracing::warn!("Skipping object with unusable name: {}", key),
            }
        }
        tracing::info!("Found {} file(s) in {}", items.len(), prefix);
        Ok(items)
    }

    /// A listing failure aborts the run; every later failure only affects
    /// its own item.
    pub async fn run(&self, run_id: &str) -> Result<BatchReport> {
        let mut report = BatchReport {
            run_id: run_id.to_string(),
            items: Vec::new(),
        };

        let items = self.discover().await?;
        if items.is_empty() {
            tracing::info!("No files found to process");
            return Ok(report);
        }
        let (items, clashes) = split_name_clashes(items);
        report.items.extend(clashes);

        // Step 1: stage every pending file locally
        let mut staged = Vec::new();
        for item in items {
            match self.stage(&item).await {
                Ok(local_path) => staged.push(StagedItem { item, local_path }),
                Err(e) => {
                    tracing::error!("❌ Download of {} failed: {}", item.key, e);
                    report.items.push(failed(&item, Stage::Download, &e));
                }
            }
        }

        // Step 2: reconcile and write the output pair of each staged file
        let mut reconciled = Vec::new();
        for staged_item in staged {
            tracing::info!("Processing file: {}", staged_item.item.filename);
            match self.reconcile(&staged_item).await {
                Ok((outputs, ok, errors)) => reconciled.push(ReconciledItem {
                    staged: staged_item,
                    outputs,
                    ok,
                    errors,
                }),
                Err(e) => {
                    tracing::error!(
                        "❌ Processing of {} failed: {}",
                        staged_item.item.filename,
                        e
                    );
                    report
                        .items
                        .push(failed(&staged_item.item, Stage::Reconcile, &e));
                }
            }
        }

        // Step 3: publish outputs, then remove the sources
        for done in reconciled {
            report.items.push(self.publish(done).await);
        }

        tracing::info!(
            "Run finished: {} completed, {} failed",
            report.completed(),
            report.failed()
        );
        Ok(report)
    }

    async fn stage(&self, item: &BatchItem) -> Result<PathBuf> {
        let local_dir = &self.config.local.pending_dir;
        tokio::fs::create_dir_all(local_dir).await?;
        let local_path = local_dir.join(&item.filename);
        self.store.download(&item.key, &local_path).await?;
        tracing::info!("Downloaded: {} -> {}", item.key, local_path.display());
        Ok(local_path)
    }

    async fn reconcile(&self, staged: &StagedItem) -> Result<(OutputPair, usize, usize)> {
        self.processor.ready().await?;
        let result = Reconciler::new(self.schema, self.processor)
            .reconcile_file(&staged.local_path)
            .await?;
        let outputs = write_outputs(
            &staged.item,
            &result,
            self.schema,
            &self.config.local.processed_dir,
            &self.config.local.error_dir,
        )?;
        Ok((outputs, result.ok.len(), result.errors.len()))
    }

    /// Upload ok, upload error, delete the remote source, delete the local
    /// source. A failed step stops the sequence, so the source is never
    /// removed before both outputs exist remotely.
    async fn publish(&self, done: ReconciledItem) -> ItemReport {
        let item = &done.staged.item;
        let storage = &self.config.storage;

        for (path, folder) in [
            (&done.outputs.ok_path, &storage.processed_folder),
            (&done.outputs.error_path, &storage.error_folder),
        ] {
            if let Err(e) = self.upload(path, folder).await {
                tracing::error!(
                    "❌ Upload for {} failed, keeping pending source: {}",
                    item.filename,
                    e
                );
                return failed(item, Stage::Upload, &e);
            }
        }

        if let Err(e) = self.store.delete(&item.key).await {
            tracing::error!("❌ Could not delete {} from storage: {}", item.key, e);
            return failed(item, Stage::Cleanup, &e);
        }
        tracing::info!("Deleted from storage: {}", item.key);

        match tokio::fs::remove_file(&done.staged.local_path).await {
            Ok(()) => tracing::info!("Deleted local file: {}", done.staged.local_path.display()),
            Err(e) => tracing::warn!(
                "⚠️ Could not delete local file {}: {}",
                done.staged.local_path.display(),
                e
            ),
        }

        if done.errors == 0 {
            tracing::info!("✅ File {} processed successfully", item.filename);
        } else {
            tracing::warn!(
                "File {} processed with {} error(s)",
                item.filename,
                done.errors
            );
        }

        ItemReport {
            key: item.key.clone(),
            filename: item.filename.clone(),
            status: ItemStatus::Completed {
                ok: done.ok,
                errors: done.errors,
            },
        }
    }

    async fn upload(&self, path: &std::path::Path, folder: &str) -> Result<()> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let key = format!("{}{}", folder, filename);
        self.store.upload(path, &key).await?;
        tracing::info!("Uploaded: {} -> {}", path.display(), key);
        Ok(())
    }
}

/// Staging paths and output names derive from the file stem, so only the
/// first item per stem runs. Later ones stay pending for a later run.
fn split_name_clashes(items: Vec<BatchItem>) -> (Vec<BatchItem>, Vec<ItemReport>) {
    let mut first_by_stem: HashMap<String, String> = HashMap::new();
    let mut runnable = Vec::new();
    let mut clashes = Vec::new();
    for item in items {
        match first_by_stem.get(item.stem()) {
            Some(first) => {
                let message = format!(
                    "Output name {} is already taken by {} in this run",
                    item.ok_filename(),
                    first
                );
                tracing::warn!("⚠️ Leaving {} pending: {}", item.key, message);
                clashes.push(ItemReport {
                    key: item.key.clone(),
                    filename: item.filename.clone(),
                    status: ItemStatus::Failed {
                        stage: Stage::Discover,
                        message,
                    },
                });
            }
            None => {
                first_by_stem.insert(item.stem().to_string(), item.key.clone());
                runnable.push(item);
            }
        }
    }
    (runnable, clashes)
}

fn failed(item: &BatchItem, stage: Stage, error: &crate::utils::error::EtlError) -> ItemReport {
    ItemReport {
        key: item.key.clone(),
        filename: item.filename.clone(),
        status: ItemStatus::Failed {
            stage,
            message: error.to_string(),
        },
    }
}
