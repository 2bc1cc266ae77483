use crate::adapters::csv_io::DEFAULT_NA_VALUES;
use crate::core::paths::PathLayout;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_email_address, validate_non_empty_list, validate_non_empty_string, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Job configuration. Every section and field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub paths: PathLayout,
    pub intake: IntakeConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub allowed_extensions: Vec<String>,
    pub delimiter: String,
    pub na_values: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string()],
            delimiter: ",".to_string(),
            na_values: DEFAULT_NA_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    #[default]
    SendGrid,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub provider: NotificationProvider,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub sender: String,
    pub recipients: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: NotificationProvider::SendGrid,
            endpoint: "https://api.sendgrid.com/v3/mail/send".to_string(),
            api_key: std::env::var("SENDGRID_API_KEY").ok(),
            sender: String::new(),
            recipients: Vec::new(),
            timeout_seconds: 30,
        }
    }
}

impl Validate for NotificationConfig {
    fn validate(&self) -> Result<()> {
        if !self.enabled || self.provider == NotificationProvider::Log {
            return Ok(());
        }

        validate_url("notification.endpoint", &self.endpoint)?;
        validate_range("notification.timeout_seconds", self.timeout_seconds, 1, 300)?;

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| EtlError::MissingConfigError {
                field: "notification.api_key".to_string(),
            })?;
        validate_non_empty_string("notification.api_key", api_key)?;
        if api_key.starts_with("${") {
            return Err(EtlError::ConfigValidationError {
                field: "notification.api_key".to_string(),
                message: format!("environment variable {} is not set", api_key),
            });
        }

        validate_email_address("notification.sender", &self.sender)?;
        validate_non_empty_list("notification.recipients", &self.recipients)?;
        for recipient in &self.recipients {
            validate_email_address("notification.recipients", recipient)?;
        }
        Ok(())
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value; unset variables stay verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        self.paths.validate()?;

        validate_non_empty_list("intake.allowed_extensions", &self.intake.allowed_extensions)?;
        for extension in &self.intake.allowed_extensions {
            validate_non_empty_string("intake.allowed_extensions", extension)?;
        }

        if self.intake.delimiter.len() != 1 || !self.intake.delimiter.is_ascii() {
            return Err(EtlError::InvalidConfigValueError {
                field: "intake.delimiter".to_string(),
                value: self.intake.delimiter.clone(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            });
        }

        self.notification.validate()
    }
}

impl ConfigProvider for TomlConfig {
    fn path_layout(&self) -> &PathLayout {
        &self.paths
    }

    fn allowed_extensions(&self) -> &[String] {
        &self.intake.allowed_extensions
    }

    fn delimiter(&self) -> u8 {
        self.intake.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    fn na_values(&self) -> &[String] {
        &self.intake.na_values
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
