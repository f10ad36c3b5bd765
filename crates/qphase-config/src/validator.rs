//! Configuration validation.

use std::path::Path;

use qphase_protocols::TargetRef;

use crate::loader::ConfigLoader;
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

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_plugins(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_plugins(config: &Config, result: &mut ValidationResult) {
        let plugins = &config.plugins;

        if plugins.entry_point_group.trim().is_empty() {
            result.add_error(ValidationError::new(
                "plugins.entry_point_group",
                "Entry point group must not be empty",
            ));
        }

        for (i, module) in plugins.modules.iter().enumerate() {
            // A module path is valid exactly when it can head a target reference.
            if TargetRef::new(module.as_str(), "_").is_err() {
                result.add_error(ValidationError::new(
                    format!("plugins.modules[{}]", i),
                    format!("Invalid module path: {}", module),
                ));
            }
        }

        for (i, manifest) in plugins.manifests.iter().enumerate() {
            let expanded = ConfigLoader::expand_path(manifest);
            if !Path::new(&expanded).exists() {
                result.add_warning(ValidationWarning::new(
                    format!("plugins.manifests[{}]", i),
                    format!("Manifest does not exist: {}", expanded),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                "Empty log level, falling back to info",
            ));
        }
    }
}
