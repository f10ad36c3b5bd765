//! Target references: where a lazily registered implementation lives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TargetParseError;

/// An immutable `module.path:attribute` descriptor.
///
/// Constructing a target never loads anything; it only names the module and
/// the attribute inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetRef {
    module_path: String,
    attribute: String,
}

impl TargetRef {
    /// Build a target from its two parts, validating both.
    pub fn new(
        module_path: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Result<Self, TargetParseError> {
        let module_path = module_path.into();
        let attribute = attribute.into();
        let raw = format!("{}:{}", module_path, attribute);

        if module_path.is_empty() {
            return Err(TargetParseError::EmptyModule(raw));
        }
        if attribute.is_empty() {
            return Err(TargetParseError::EmptyAttribute(raw));
        }
        if !is_valid_module_path(&module_path) {
            return Err(TargetParseError::InvalidModulePath(module_path));
        }
        if attribute.contains(':') || attribute.chars().any(char::is_whitespace) {
            return Err(TargetParseError::InvalidAttribute(attribute));
        }

        Ok(Self {
            module_path,
            attribute,
        })
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

/// Dotted path with non-empty segments and no slashes or whitespace.
fn is_valid_module_path(path: &str) -> bool {
    path.split('.').all(|segment| {
        !segment.is_empty()
            && !segment
                .chars()
                .any(|c| c == '/' || c == '\\' || c == ':' || c.is_whitespace())
    })
}

impl FromStr for TargetRef {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (module_path, attribute) = trimmed
            .split_once(':')
            .ok_or_else(|| TargetParseError::MissingSeparator(trimmed.to_string()))?;
        Self::new(module_path.trim(), attribute.trim())
    }
}

impl TryFrom<String> for TargetRef {
    type Error = TargetParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetRef> for String {
    fn from(target: TargetRef) -> Self {
        target.to_string()
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module_path, self.attribute)
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
