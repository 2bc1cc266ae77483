use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_path_segment, Validate};
use serde::{Deserialize, Serialize};

/// Directory segment names used to derive every location of a run from the
/// incoming file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLayout {
    pub incoming_segment: String,
    pub archive_segment: String,
    pub error_segment: String,
    pub cleaned_segment: String,
    pub bad_records_segment: String,
    pub cleaned_filename: String,
    pub bad_records_filename: String,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            incoming_segment: "incoming".to_string(),
            archive_segment: "archive".to_string(),
            error_segment: "error".to_string(),
            cleaned_segment: "cleaned_data".to_string(),
            bad_records_segment: "bad_records_data".to_string(),
            cleaned_filename: "cleaned_data.csv".to_string(),
            bad_records_filename: "bad_records.csv".to_string(),
        }
    }
}

impl Validate for PathLayout {
    fn validate(&self) -> Result<()> {
        validate_path_segment("paths.incoming_segment", &self.incoming_segment)?;
        validate_path_segment("paths.archive_segment", &self.archive_segment)?;
        validate_path_segment("paths.error_segment", &self.error_segment)?;
        validate_path_segment("paths.cleaned_segment", &self.cleaned_segment)?;
        validate_path_segment("paths.bad_records_segment", &self.bad_records_segment)?;
        validate_path_segment("paths.cleaned_filename", &self.cleaned_filename)?;
        validate_path_segment("paths.bad_records_filename", &self.bad_records_filename)?;

        if self.archive_segment == self.incoming_segment
            || self.error_segment == self.incoming_segment
        {
            return Err(EtlError::ConfigValidationError {
                field: "paths".to_string(),
                message: "archive and error segments must differ from the incoming segment"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Every location touched while processing one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPaths {
    pub file_name: String,
    pub incoming_path: String,
    pub archive_path: String,
    pub error_path: String,
    pub cleaned_path: String,
    pub bad_records_path: String,
}

impl PathLayout {
    /// Swap the last `incoming` directory in `incoming_path` for each target
    /// segment. `data/incoming/users.csv` archives to `data/archive/users.csv`
    /// and writes clean rows to `data/cleaned_data/users.csv/cleaned_data.csv`.
    pub fn resolve(&self, incoming_path: &str) -> Result<RunPaths> {
        let segments: Vec<&str> = incoming_path.split('/').collect();

        let file_name = match segments.last() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(EtlError::InvalidConfigValueError {
                    field: "incoming_path".to_string(),
                    value: incoming_path.to_string(),
                    reason: "Path does not name a file".to_string(),
                })
            }
        };

        let dirs = &segments[..segments.len() - 1];
        let position = dirs
            .iter()
            .rposition(|segment| *segment == self.incoming_segment)
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "incoming_path".to_string(),
                value: incoming_path.to_string(),
                reason: format!(
                    "Path has no '{}' directory to derive archive and error locations from",
                    self.incoming_segment
                ),
            })?;

        let swap = |replacement: &str| -> String {
            segments
                .iter()
                .enumerate()
                .map(|(i, segment)| if i == position { replacement } else { *segment })
                .collect::<Vec<_>>()
                .join("/")
        };

        Ok(RunPaths {
            file_name,
            incoming_path: incoming_path.to_string(),
            archive_path: swap(&self.archive_segment),
            error_path: swap(&self.error_segment),
            cleaned_path: format!("{}/{}", swap(&self.cleaned_segment), self.cleaned_filename),
            bad_records_path: format!(
                "{}/{}",
                swap(&self.bad_records_segment),
                self.bad_records_filename
            ),
        })
    }
}
