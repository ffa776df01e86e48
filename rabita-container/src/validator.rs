//! Registration-time validation and alias classification.
//!
//! The validator is stateless. In the host language the per-kind checks
//! are mostly type guards; what survives in Rust is the set of checks
//! the type system cannot express: empty names, non-finite numbers, and
//! malformed alias paths inside constructor-argument lists.

use crate::container::ObjectConfig;
use crate::error::{RabitaError, Result};
use crate::value::Value;

/// The self-reference token: `get("container")` yields the container
/// itself, and every alias starts with this token.
pub const CONTAINER_TOKEN: &str = "container";

/// Separator between alias path segments.
pub(crate) const ALIAS_SEPARATOR: char = '.';

/// Validates registration inputs and classifies alias strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeValidator;

impl TypeValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates an entry name: must be non-empty.
    pub fn validate_name<'a>(&self, name: &'a str) -> Result<&'a str> {
        if name.is_empty() {
            return Err(RabitaError::InvalidArgument(
                "entry name cannot be empty".into(),
            ));
        }
        Ok(name)
    }

    /// Validates an object-registration configuration.
    ///
    /// Defaults are filled by [`ObjectConfig::default`]; what remains to
    /// check here is that every alias-shaped constructor argument is a
    /// well-formed dotted path. Never inspects the entry name.
    pub fn validate_object_config(&self, config: ObjectConfig) -> Result<ObjectConfig> {
        for arg in config.constructor_args() {
            if let Value::String(candidate) = arg {
                if self.is_alias(candidate) {
                    self.validate_alias_path(candidate)?;
                }
            }
        }
        Ok(config)
    }

    /// Validates a number literal: must be finite.
    ///
    /// NaN and the infinities are rejected; they would be unresolvable
    /// as stored configuration values.
    pub fn validate_number(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(RabitaError::InvalidArgument(format!(
                "number entry must be finite, got {value}"
            )));
        }
        Ok(value)
    }

    /// Validates a string literal. Total in Rust; kept so primitives pass
    /// through the validator exactly once at registration.
    pub fn validate_string<'a>(&self, value: &'a str) -> Result<&'a str> {
        Ok(value)
    }

    /// Validates a boolean literal. Total in Rust; see
    /// [`validate_string`](TypeValidator::validate_string).
    pub fn validate_boolean(&self, value: bool) -> Result<bool> {
        Ok(value)
    }

    /// Returns true iff `token` references the container: the bare
    /// self-reference token, or a dotted path starting with it.
    ///
    /// # Examples
    /// ```
    /// use rabita_container::validator::TypeValidator;
    ///
    /// let validator = TypeValidator::new();
    /// assert!(validator.is_alias("container"));
    /// assert!(validator.is_alias("container.engine"));
    /// assert!(!validator.is_alias("containers"));
    /// assert!(!validator.is_alias("engine"));
    /// ```
    pub fn is_alias(&self, token: &str) -> bool {
        match token.strip_prefix(CONTAINER_TOKEN) {
            Some("") => true,
            Some(rest) => rest.starts_with(ALIAS_SEPARATOR),
            None => false,
        }
    }

    fn validate_alias_path(&self, alias: &str) -> Result<()> {
        if alias.split(ALIAS_SEPARATOR).any(|segment| segment.is_empty()) {
            return Err(RabitaError::InvalidArgument(format!(
                "malformed alias {alias:?}: empty path segment"
            )));
        }
        Ok(())
    }
}
