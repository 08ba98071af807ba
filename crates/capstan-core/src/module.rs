//! Module identity and lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Unique, stable, human-readable module identifier.
///
/// Module IDs are strings like `"token-overrides"` or `"damage-hooks"`.
/// They must be non-empty and contain only lowercase alphanumeric characters
/// and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleId(String);

/// Deserialize with validation — rejects malformed IDs rather than letting
/// them into the catalog.
impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl ModuleId {
    /// Create a new `ModuleId`, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty or contains invalid characters.
    pub fn new(id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a `ModuleId` without validation (for tests and internal use).
    #[must_use]
    pub fn from_static(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a string is a valid module ID without constructing one.
    #[must_use]
    pub fn is_valid_id(id: &str) -> bool {
        Self::validate(id).is_ok()
    }

    /// Validate that a module ID string is well-formed.
    fn validate(id: &str) -> CoreResult<()> {
        if id.is_empty() {
            return Err(CoreError::InvalidId("module id must not be empty".into()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(CoreError::InvalidId(format!(
                "module id must contain only lowercase alphanumeric characters and hyphens, got: {id}"
            )));
        }
        if id.starts_with('-') || id.ends_with('-') {
            return Err(CoreError::InvalidId(format!(
                "module id must not start or end with a hyphen, got: {id}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The lifecycle state of a module.
///
/// Transitions: `Discovered` → `Resolved` after dependency resolution,
/// `Resolved` → `Activating` at the first stage callback, `Activating` →
/// `Activated` after the last requested stage completes. Any failure forces
/// `Failed`, which is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleState {
    /// Module is registered but not yet resolved.
    Discovered,
    /// Module survived dependency resolution and has an activation slot.
    Resolved,
    /// The module's first stage callback has been invoked.
    Activating,
    /// All requested stages completed without failure.
    Activated,
    /// The module failed to activate (terminal).
    Failed(String),
}

impl ModuleState {
    /// Whether this state is terminal failure.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_module_ids() {
        assert!(ModuleId::new("token-overrides").is_ok());
        assert!(ModuleId::new("damage-hooks").is_ok());
        assert!(ModuleId::new("module123").is_ok());
        assert!(ModuleId::new("a").is_ok());
    }

    #[test]
    fn test_invalid_module_ids() {
        // Empty
        assert!(ModuleId::new("").is_err());
        // Uppercase
        assert!(ModuleId::new("MyModule").is_err());
        // Spaces
        assert!(ModuleId::new("my module").is_err());
        // Underscores
        assert!(ModuleId::new("my_module").is_err());
        // Leading hyphen
        assert!(ModuleId::new("-module").is_err());
        // Trailing hyphen
        assert!(ModuleId::new("module-").is_err());
        // Special characters
        assert!(ModuleId::new("module@1").is_err());
    }

    #[test]
    fn test_module_id_display() {
        let id = ModuleId::new("my-module").unwrap();
        assert_eq!(id.to_string(), "my-module");
        assert_eq!(id.as_str(), "my-module");
    }

    #[test]
    fn test_module_id_serde_round_trip() {
        let id = ModuleId::new("my-module").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"my-module\"");
        let deserialized: ModuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_module_id_serde_rejects_invalid() {
        let result: Result<ModuleId, _> = serde_json::from_str("\"Not Valid\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_state_is_failed() {
        assert!(ModuleState::Failed("boom".into()).is_failed());
        assert!(!ModuleState::Activated.is_failed());
        assert!(!ModuleState::Discovered.is_failed());
    }
}
