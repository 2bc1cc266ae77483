use crate::core::paths::{PathLayout, RunPaths};
use crate::domain::model::{ClassificationResult, DeliveryOutcome, LoadReport, RecordBatch};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Fails when `from` does not exist.
    fn move_file(
        &self,
        from: &str,
        to: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Succeeds when `path` is already absent.
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn path_layout(&self) -> &PathLayout;
    fn allowed_extensions(&self) -> &[String];
    fn delimiter(&self) -> u8;
    fn na_values(&self) -> &[String];
}

/// Delivery problems are reported in the outcome, never as an error.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> DeliveryOutcome;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn resolve_paths(&self, incoming_path: &str) -> Result<RunPaths>;
    async fn extract(&self, paths: &RunPaths) -> Result<RecordBatch>;
    fn validate(&self, paths: &RunPaths, batch: &RecordBatch) -> Result<()>;
    fn transform(&self, batch: &RecordBatch) -> Result<ClassificationResult>;
    async fn load(&self, paths: &RunPaths, result: &ClassificationResult) -> Result<LoadReport>;
    async fn archive(&self, paths: &RunPaths) -> Result<()>;
    async fn quarantine(&self, paths: &RunPaths) -> Result<()>;
    async fn discard_outputs(&self, paths: &RunPaths) -> Result<()>;
}
