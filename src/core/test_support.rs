use crate::core::paths::RunPaths;
use crate::core::{ClassificationResult, LoadReport, Pipeline, RecordBatch, Storage};
use crate::domain::model::DeliveryOutcome;
use crate::domain::ports::Notifier;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing_writes: Arc<Mutex<Vec<String>>>,
    failing_moves: Arc<Mutex<Vec<String>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: &str, data: &str) {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.as_bytes().to_vec());
    }

    pub async fn get_file(&self, path: &str) -> Option<String> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    pub async fn paths(&self) -> Vec<String> {
        let files = self.files.lock().await;
        let mut paths: Vec<String> = files.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn fail_writes_to(&self, path: &str) {
        self.failing_writes.lock().await.push(path.to_string());
    }

    pub async fn fail_moves_to(&self, path: &str) {
        self.failing_moves.lock().await.push(path.to_string());
    }
}

fn unavailable(path: &str) -> EtlError {
    EtlError::IoError(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        format!("destination unavailable: {}", path),
    ))
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            EtlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        if self.failing_writes.lock().await.iter().any(|p| p == path) {
            return Err(unavailable(path));
        }
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        if self.failing_moves.lock().await.iter().any(|p| p == to) {
            return Err(unavailable(to));
        }
        let mut files = self.files.lock().await;
        let data = files.remove(from).ok_or_else(|| {
            EtlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source file not found: {}", from),
            ))
        })?;
        files.insert(to.to_string(), data);
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        let mut files = self.files.lock().await;
        files.remove(path);
        Ok(())
    }
}

/// Records every notification and answers with a fixed outcome.
#[derive(Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    outcome: DeliveryOutcome,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::answering(DeliveryOutcome::Delivered)
    }

    pub fn answering(outcome: DeliveryOutcome) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) -> DeliveryOutcome {
        self.sent
            .lock()
            .await
            .push((subject.to_string(), body.to_string()));
        self.outcome.clone()
    }
}

/// Delegates to another pipeline, counting the stages past validation.
pub struct CountingPipeline<P> {
    inner: P,
    transforms: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
}

impl<P: Pipeline> CountingPipeline<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            transforms: Arc::new(AtomicUsize::new(0)),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (self.transforms.clone(), self.loads.clone())
    }
}

#[async_trait::async_trait]
impl<P: Pipeline> Pipeline for CountingPipeline<P> {
    fn resolve_paths(&self, incoming_path: &str) -> Result<RunPaths> {
        self.inner.resolve_paths(incoming_path)
    }

    async fn extract(&self, paths: &RunPaths) -> Result<RecordBatch> {
        self.inner.extract(paths).await
    }

    fn validate(&self, paths: &RunPaths, batch: &RecordBatch) -> Result<()> {
        self.inner.validate(paths, batch)
    }

    fn transform(&self, batch: &RecordBatch) -> Result<ClassificationResult> {
        self.transforms.fetch_add(1, Ordering::SeqCst);
        self.inner.transform(batch)
    }

    async fn load(&self, paths: &RunPaths, result: &ClassificationResult) -> Result<LoadReport> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(paths, result).await
    }

    async fn archive(&self, paths: &RunPaths) -> Result<()> {
        self.inner.archive(paths).await
    }

    async fn quarantine(&self, paths: &RunPaths) -> Result<()> {
        self.inner.quarantine(paths).await
    }

    async fn discard_outputs(&self, paths: &RunPaths) -> Result<()> {
        self.inner.discard_outputs(paths).await
    }
}
