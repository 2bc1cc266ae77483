pub mod etl;
pub mod paths;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{ClassificationResult, LoadReport, Record, RecordBatch};
pub use crate::domain::ports::{ConfigProvider, Notifier, Pipeline, Storage};
pub use crate::utils::error::Result;
