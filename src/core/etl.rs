use crate::core::paths::RunPaths;
use crate::core::{LoadReport, Notifier, Pipeline};
use crate::domain::model::DeliveryOutcome;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Validating,
    Classifying,
    Writing,
    Archiving,
    NotifyingSuccess,
    Done,
    MovingToError,
    NotifyingFailure,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub file_name: String,
    pub total_records: usize,
    pub clean_records: usize,
    pub bad_records: usize,
    pub cleaned_path: String,
    pub bad_records_path: String,
    pub archive_path: String,
    pub notification: DeliveryOutcome,
    pub states: Vec<PipelineState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub fn success_subject(file_name: &str) -> String {
    format!("Uploaded user_file {} updated successfully.", file_name)
}

pub fn success_body(load: &LoadReport) -> String {
    format!(
        "The file has been cleaned successfully after completing all the tests.\n\
         Clean records: {} ({})\n\
         Bad records: {} ({})",
        load.clean_count, load.cleaned_path, load.bad_count, load.bad_records_path
    )
}

pub fn failure_subject(file_name: &str) -> String {
    format!("Uploaded user_file {} was rejected", file_name)
}

pub fn failure_body(error: &EtlError, error_path: &str) -> String {
    format!(
        "{}. \n Please refer path for the error file with added information : {}",
        error, error_path
    )
}

/// Failure body for an input whose path yields no error location.
pub fn left_in_place_body(error: &EtlError, incoming_path: &str) -> String {
    format!(
        "{}. \n The file could not be moved and was left in place : {}",
        error, incoming_path
    )
}

/// Drives one file through the pipeline and reports the outcome.
///
/// Any error from validation, classification, writing or archiving moves the
/// input to its error location, sends a failure notification, and is then
/// returned unchanged. An input path the layout cannot resolve is reported
/// the same way but left where it is.
pub struct EtlEngine<P: Pipeline, N: Notifier> {
    pipeline: P,
    notifier: N,
}

impl<P: Pipeline, N: Notifier> EtlEngine<P, N> {
    pub fn new(pipeline: P, notifier: N) -> Self {
        Self { pipeline, notifier }
    }

    fn enter(states: &mut Vec<PipelineState>, state: PipelineState) {
        tracing::debug!("→ {}", state);
        states.push(state);
    }

    pub async fn run(&self, incoming_path: &str) -> Result<RunReport> {
        let started_at = Utc::now();
        let paths = match self.pipeline.resolve_paths(incoming_path) {
            Ok(paths) => paths,
            Err(error) => {
                self.refuse(incoming_path, &error).await;
                return Err(error);
            }
        };
        tracing::info!("Processing {}", paths.incoming_path);

        let mut states = Vec::new();
        match self.process(&paths, &mut states).await {
            Ok(load) => {
                Self::enter(&mut states, PipelineState::NotifyingSuccess);
                let notification = self
                    .notifier
                    .notify(&success_subject(&paths.file_name), &success_body(&load))
                    .await;
                Self::enter(&mut states, PipelineState::Done);

                tracing::info!(
                    "✅ {}: {} clean, {} bad",
                    paths.file_name,
                    load.clean_count,
                    load.bad_count
                );

                Ok(RunReport {
                    file_name: paths.file_name,
                    total_records: load.clean_count + load.bad_count,
                    clean_records: load.clean_count,
                    bad_records: load.bad_count,
                    cleaned_path: load.cleaned_path,
                    bad_records_path: load.bad_records_path,
                    archive_path: paths.archive_path,
                    notification,
                    states,
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(error) => {
                self.fail(&paths, &error, &mut states).await;
                Err(error)
            }
        }
    }

    async fn process(
        &self,
        paths: &RunPaths,
        states: &mut Vec<PipelineState>,
    ) -> Result<LoadReport> {
        Self::enter(states, PipelineState::Validating);
        let batch = self.pipeline.extract(paths).await?;
        self.pipeline.validate(paths, &batch)?;

        Self::enter(states, PipelineState::Classifying);
        let result = self.pipeline.transform(&batch)?;

        Self::enter(states, PipelineState::Writing);
        let load = match self.pipeline.load(paths, &result).await {
            Ok(load) => load,
            Err(e) => {
                self.discard_outputs(paths).await;
                return Err(e);
            }
        };

        Self::enter(states, PipelineState::Archiving);
        if let Err(e) = self.pipeline.archive(paths).await {
            self.discard_outputs(paths).await;
            return Err(e);
        }

        Ok(load)
    }

    async fn discard_outputs(&self, paths: &RunPaths) {
        if let Err(e) = self.pipeline.discard_outputs(paths).await {
            tracing::warn!("Could not remove partial outputs for {}: {}", paths.file_name, e);
        }
    }

    async fn refuse(&self, incoming_path: &str, error: &EtlError) {
        tracing::error!("❌ Cannot process {}: {}", incoming_path, error);

        let file_name = incoming_path.rsplit('/').next().unwrap_or(incoming_path);
        tracing::debug!("→ {}", PipelineState::NotifyingFailure);
        let outcome = self
            .notifier
            .notify(
                &failure_subject(file_name),
                &left_in_place_body(error, incoming_path),
            )
            .await;
        if let DeliveryOutcome::NotDelivered(reason) = outcome {
            tracing::warn!("Failure notification was not delivered: {}", reason);
        }
        tracing::debug!("→ {}", PipelineState::Failed);
    }

    async fn fail(&self, paths: &RunPaths, error: &EtlError, states: &mut Vec<PipelineState>) {
        tracing::error!(
            "❌ {} failed (Category: {:?}): {}",
            paths.file_name,
            error.category(),
            error
        );

        Self::enter(states, PipelineState::MovingToError);
        tracing::info!(
            "File validation failed so moving the file :{} to error folder",
            paths.file_name
        );
        if let Err(e) = self.pipeline.quarantine(paths).await {
            tracing::error!("Could not move {} to the error folder: {}", paths.file_name, e);
        }

        Self::enter(states, PipelineState::NotifyingFailure);
        let outcome = self
            .notifier
            .notify(
                &failure_subject(&paths.file_name),
                &failure_body(error, &paths.error_path),
            )
            .await;
        if let DeliveryOutcome::NotDelivered(reason) = outcome {
            tracing::warn!("Failure notification was not delivered: {}", reason);
        }

        Self::enter(states, PipelineState::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::core::pipeline::IntakePipeline;
    use crate::core::test_support::{CountingPipeline, MockStorage, RecordingNotifier};
    use std::sync::atomic::Ordering;

    const INCOMING: &str = "data/incoming/users.csv";
    const CLEANED: &str = "data/cleaned_data/users.csv/cleaned_data.csv";
    const BAD: &str = "data/bad_records_data/users.csv/bad_records.csv";

    const SAMPLE: &str = "name,email,phone1,phone2,address,reviews_list\n\
Alice,a@x.com,+1 234 567 8901,,1 Elm St,Nice\n\
Bob,b@x.com,+1234567890,,123 Main St!!,\"Great place,,\"\n";

    fn engine(
        storage: MockStorage,
        notifier: RecordingNotifier,
    ) -> EtlEngine<IntakePipeline<MockStorage, TomlConfig>, RecordingNotifier> {
        EtlEngine::new(IntakePipeline::new(storage, TomlConfig::default()), notifier)
    }

    #[tokio::test]
    async fn test_successful_run_writes_archives_and_notifies() {
        let storage = MockStorage::new();
        storage.put(INCOMING, SAMPLE).await;
        let notifier = RecordingNotifier::new();

        let report = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap();

        assert_eq!(report.total_records, 2);
        assert_eq!(report.clean_records, 1);
        assert_eq!(report.bad_records, 1);
        assert_eq!(report.notification, DeliveryOutcome::Delivered);
        assert_eq!(
            report.states,
            vec![
                PipelineState::Validating,
                PipelineState::Classifying,
                PipelineState::Writing,
                PipelineState::Archiving,
                PipelineState::NotifyingSuccess,
                PipelineState::Done,
            ]
        );

        assert_eq!(
            storage.get_file(CLEANED).await.unwrap(),
            "name,email,contact1,contact2,address,reviews_list\n\
             Bob,b@x.com,1234567890,,123 Main St,\"Great place,,\"\n"
        );
        assert_eq!(
            storage.get_file(BAD).await.unwrap(),
            "name,email,phone1,phone2,address,reviews_list\n\
             Alice,a@x.com,+1 234 567 8901,,1 Elm St,Nice\n"
        );
        assert!(storage.get_file(INCOMING).await.is_none());
        assert!(storage.get_file("data/archive/users.csv").await.is_some());

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Uploaded user_file users.csv updated successfully.");
        assert!(sent[0].1.contains("cleaned successfully"));
        assert!(!sent[0].1.to_lowercase().contains("error"));
    }

    #[tokio::test]
    async fn test_empty_file_is_moved_to_error_and_reported() {
        let storage = MockStorage::new();
        storage
            .put(INCOMING, "name,email,phone1,phone2,address,reviews_list\n")
            .await;
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::EmptyFileError { .. }));
        assert_eq!(
            storage.paths().await,
            vec!["data/error/users.csv".to_string()]
        );

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Uploaded user_file users.csv was rejected");
        assert!(sent[0]
            .1
            .starts_with("FileName : users.csv does not contain any record.. \n"));
        assert!(sent[0].1.ends_with("data/error/users.csv"));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let storage = MockStorage::new();
        storage.put("data/incoming/users.txt", SAMPLE).await;
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run("data/incoming/users.txt")
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::UnsupportedFormatError { .. }));
        assert_eq!(storage.paths().await, vec!["data/error/users.txt".to_string()]);
        assert_eq!(notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_discards_partial_outputs() {
        let storage = MockStorage::new();
        storage.put(INCOMING, SAMPLE).await;
        storage.fail_writes_to(BAD).await;
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::WriteError { ref path, .. } if path == BAD));
        assert_eq!(storage.paths().await, vec!["data/error/users.csv".to_string()]);
        assert!(notifier.sent().await[0].0.ends_with("was rejected"));
    }

    #[tokio::test]
    async fn test_archive_failure_fails_the_run() {
        let storage = MockStorage::new();
        storage.put(INCOMING, SAMPLE).await;
        storage.fail_moves_to("data/archive/users.csv").await;
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::RelocationError { .. }));
        assert!(storage.get_file(CLEANED).await.is_none());
        assert!(storage.get_file(BAD).await.is_none());
        assert!(storage.get_file("data/error/users.csv").await.is_some());
    }

    #[tokio::test]
    async fn test_missing_input_still_notifies_with_original_error() {
        let storage = MockStorage::new();
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::LoadError { .. }));
        assert!(storage.paths().await.is_empty());
        assert_eq!(notifier.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_undelivered_notification_does_not_fail_run() {
        let storage = MockStorage::new();
        storage.put(INCOMING, SAMPLE).await;
        let notifier =
            RecordingNotifier::answering(DeliveryOutcome::NotDelivered("503".to_string()));

        let report = engine(storage, notifier).run(INCOMING).await.unwrap();

        assert!(!report.notification.is_delivered());
        assert_eq!(report.states.last(), Some(&PipelineState::Done));
    }

    #[tokio::test]
    async fn test_path_without_incoming_directory_is_left_in_place_and_reported() {
        let storage = MockStorage::new();
        storage.put("data/users.csv", SAMPLE).await;
        let notifier = RecordingNotifier::new();

        let result = engine(storage.clone(), notifier.clone())
            .run("data/users.csv")
            .await;

        assert!(matches!(result, Err(EtlError::InvalidConfigValueError { .. })));
        assert_eq!(storage.paths().await, vec!["data/users.csv".to_string()]);

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Uploaded user_file users.csv was rejected");
        assert!(sent[0].1.contains("left in place : data/users.csv"));
    }

    #[tokio::test]
    async fn test_rejected_file_is_never_classified() {
        let storage = MockStorage::new();
        storage
            .put(INCOMING, "name,email,phone1,phone2,address,reviews_list\n")
            .await;
        let pipeline =
            CountingPipeline::new(IntakePipeline::new(storage.clone(), TomlConfig::default()));
        let (transforms, loads) = pipeline.counters();

        let err = EtlEngine::new(pipeline, RecordingNotifier::new())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::EmptyFileError { .. }));
        assert_eq!(transforms.load(Ordering::SeqCst), 0);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overlong_row_takes_failure_path() {
        let storage = MockStorage::new();
        storage
            .put(INCOMING, "name,email,phone1\nAlice,a@x.com,123,extra\n")
            .await;
        let notifier = RecordingNotifier::new();

        let err = engine(storage.clone(), notifier.clone())
            .run(INCOMING)
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::LoadError { .. }));
        assert_eq!(storage.paths().await, vec!["data/error/users.csv".to_string()]);
        assert_eq!(notifier.sent().await.len(), 1);
    }
}
