//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_bridge(config, &mut result);
        Self::validate_logging(config, &mut result);
        Self::validate_vault(config, &mut result);

        result
    }

    fn validate_bridge(config: &Config, result: &mut ValidationResult) {
        let timeout = config.bridge.reply_timeout_ms;
        if timeout == 0 {
            result.add_warning(ValidationWarning::new(
                "bridge.reply_timeout_ms",
                "Reply timeout disabled, a page waits until the reply is answered or cancelled",
            ));
        } else if timeout > 10 * 60 * 1000 {
            result.add_warning(ValidationWarning::new(
                "bridge.reply_timeout_ms",
                "Reply timeout is very high (>10 minutes)",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.trim();
        if level.is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        } else if !level.contains('=') && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?} or a filter directive",
                    level, LOG_LEVELS
                ),
            ));
        }

        if config.logging.file && config.logging.max_log_files == 0 {
            result.add_error(ValidationError::new(
                "logging.max_log_files",
                "max_log_files must be greater than 0 when file logging is enabled",
            ));
        }

        if !config.logging.file && config.logging.directory.is_some() {
            result.add_warning(ValidationWarning::new(
                "logging.directory",
                "Log directory is set but file logging is disabled",
            ));
        }
    }

    fn validate_vault(config: &Config, result: &mut ValidationResult) {
        match &config.vault.fixture {
            Some(path) if !path.exists() => {
                result.add_warning(ValidationWarning::new(
                    "vault.fixture",
                    format!("Vault fixture does not exist: {:?}", path),
                ));
            }
            Some(_) => {}
            None => {
                result.add_warning(ValidationWarning::new(
                    "vault.fixture",
                    "No vault fixture configured, every request will be answered with no action",
                ));
            }
        }

        let timeout = config.bridge.reply_timeout_ms;
        if timeout > 0 && config.vault.prompt_delay_ms >= timeout {
            result.add_warning(ValidationWarning::new(
                "vault.prompt_delay_ms",
                "Prompt delay is not shorter than the reply timeout, every prompt will time out",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
