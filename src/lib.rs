pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LogFormat};

pub use adapters::{ConfiguredNotifier, LocalStorage, LogNotifier, SendGridNotifier};
pub use config::TomlConfig;
pub use core::{
    etl::{EtlEngine, PipelineState, RunReport},
    pipeline::IntakePipeline,
};
pub use utils::error::{EtlError, Result};
