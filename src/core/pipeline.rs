use crate::adapters::csv_io;
use crate::core::paths::RunPaths;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ClassificationResult, LoadReport, RecordBatch};
use crate::domain::services::{classify, validate_count, validate_extension};
use crate::utils::error::{EtlError, Result};

/// The intake job's stages over a storage backend and a configuration.
pub struct IntakePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> IntakePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn write_output(&self, path: &str, data: Vec<u8>) -> Result<()> {
        tracing::debug!("Writing {} bytes to {}", data.len(), path);
        self.storage
            .write_file(path, &data)
            .await
            .map_err(|e| EtlError::WriteError {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    async fn relocate(&self, from: &str, to: &str) -> Result<()> {
        self.storage
            .move_file(from, to)
            .await
            .map_err(|e| EtlError::RelocationError {
                from: from.to_string(),
                to: to.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for IntakePipeline<S, C> {
    fn resolve_paths(&self, incoming_path: &str) -> Result<RunPaths> {
        self.config.path_layout().resolve(incoming_path)
    }

    async fn extract(&self, paths: &RunPaths) -> Result<RecordBatch> {
        let data = self
            .storage
            .read_file(&paths.incoming_path)
            .await
            .map_err(|e| EtlError::LoadError {
                path: paths.incoming_path.clone(),
                message: e.to_string(),
            })?;

        csv_io::read_batch(
            &paths.incoming_path,
            &data,
            self.config.delimiter(),
            self.config.na_values(),
        )
    }

    fn validate(&self, paths: &RunPaths, batch: &RecordBatch) -> Result<()> {
        validate_count(&paths.file_name, batch.len())?;
        validate_extension(&paths.file_name, self.config.allowed_extensions())?;
        tracing::info!("File validation for {} complete.", paths.file_name);
        Ok(())
    }

    fn transform(&self, batch: &RecordBatch) -> Result<ClassificationResult> {
        let result = classify(batch);

        if result.total() != batch.len() {
            return Err(EtlError::ClassificationError {
                message: format!(
                    "{} input records became {} clean + {} bad",
                    batch.len(),
                    result.clean.len(),
                    result.bad.len()
                ),
            });
        }
        Ok(result)
    }

    async fn load(&self, paths: &RunPaths, result: &ClassificationResult) -> Result<LoadReport> {
        let delimiter = self.config.delimiter();

        let clean = csv_io::write_clean(&result.clean, delimiter)?;
        self.write_output(&paths.cleaned_path, clean).await?;

        let bad = csv_io::write_bad(&result.input_headers, &result.bad, delimiter)?;
        self.write_output(&paths.bad_records_path, bad).await?;

        Ok(LoadReport {
            cleaned_path: paths.cleaned_path.clone(),
            bad_records_path: paths.bad_records_path.clone(),
            clean_count: result.clean.len(),
            bad_count: result.bad.len(),
        })
    }

    async fn archive(&self, paths: &RunPaths) -> Result<()> {
        self.relocate(&paths.incoming_path, &paths.archive_path).await?;
        tracing::info!("File archived successfully to {}", paths.archive_path);
        Ok(())
    }

    async fn quarantine(&self, paths: &RunPaths) -> Result<()> {
        self.relocate(&paths.incoming_path, &paths.error_path).await
    }

    async fn discard_outputs(&self, paths: &RunPaths) -> Result<()> {
        self.storage.remove_file(&paths.cleaned_path).await?;
        self.storage.remove_file(&paths.bad_records_path).await
    }
}
