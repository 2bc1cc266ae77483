pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};

#[cfg(feature = "cli")]
mod cli {
    use super::TomlConfig;
    use crate::utils::error::{EtlError, Result};
    use crate::utils::validation::{validate_non_empty_string, Validate};
    use clap::{Parser, ValueEnum};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum LogFormat {
        Compact,
        Json,
    }

    #[derive(Debug, Clone, Parser)]
    #[command(name = "intake-etl")]
    #[command(about = "Validate an uploaded CSV file, split clean and bad records, archive and notify")]
    pub struct CliConfig {
        #[arg(long, help = "Path of the uploaded file, inside an 'incoming' directory")]
        pub incoming_path: String,

        #[arg(long, help = "TOML configuration file")]
        pub config: Option<String>,

        #[arg(long, default_value = ".", help = "Directory relative paths resolve against")]
        pub base_dir: String,

        #[arg(long, value_delimiter = ',', help = "Override accepted file extensions")]
        pub allowed_extensions: Vec<String>,

        #[arg(long, help = "Log notifications instead of e-mailing them")]
        pub no_email: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        /// File configuration (or defaults) with command-line overrides applied.
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::debug!("Loading configuration from {}", path);
                    TomlConfig::from_file(path).map_err(|e| EtlError::ConfigError {
                        message: format!("{}: {}", path, e),
                    })?
                }
                None => TomlConfig::default(),
            };

            if !self.allowed_extensions.is_empty() {
                config.intake.allowed_extensions = self.allowed_extensions.clone();
            }
            if self.no_email {
                config.notification.enabled = false;
            }

            config.validate()?;
            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_non_empty_string("incoming_path", &self.incoming_path)?;
            validate_non_empty_string("base_dir", &self.base_dir)
        }
    }

}
