//! Patch instrumentation.
//!
//! Every runtime patch or detour a module installs goes through the
//! [`PatchBoard`], which forwards the installation unchanged and keeps an
//! auditable record of who patched what. Instrumentation is best-effort: a
//! patch whose target cannot be identified is accepted and recorded as
//! unidentified, never rejected.

use std::fmt;

use tracing::debug;

use capstan_core::ModuleId;

/// The patched location, as precisely as the installer can name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    /// The scope (type, namespace, subsystem) declaring the target.
    pub declaring_scope: Option<String>,
    /// The target's own name.
    pub name: String,
}

impl PatchTarget {
    /// A target with a declaring scope.
    #[must_use]
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_scope: Some(scope.into()),
            name: name.into(),
        }
    }

    /// A target known only by name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            declaring_scope: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaring_scope {
            Some(scope) => write!(f, "{scope}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One recorded patch installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    /// The module that installed the patch.
    pub module: ModuleId,
    /// The patched target, if it could be identified.
    pub target: Option<PatchTarget>,
}

impl PatchRecord {
    /// Human-readable identifier for diagnostics.
    #[must_use]
    pub fn identifier(&self) -> String {
        match &self.target {
            Some(target) => target.to_string(),
            None => "<unidentified>".to_string(),
        }
    }
}

/// Auditable wrapper around runtime patch installation.
#[derive(Debug, Default)]
pub struct PatchBoard {
    records: Vec<PatchRecord>,
}

impl PatchBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a patch through the board.
    ///
    /// Runs `apply` unchanged, then records the installation and emits one
    /// structured log line. The board changes observability, not patch
    /// semantics.
    pub fn install<F>(&mut self, module: &ModuleId, target: Option<PatchTarget>, apply: F)
    where
        F: FnOnce(),
    {
        apply();
        let record = PatchRecord {
            module: module.clone(),
            target,
        };
        debug!(
            module_id = %record.module,
            target = %record.identifier(),
            "Hook installed"
        );
        self.records.push(record);
    }

    /// Every installation recorded so far, in installation order.
    #[must_use]
    pub fn records(&self) -> &[PatchRecord] {
        &self.records
    }

    /// Installations performed by one module.
    #[must_use]
    pub fn installed_by(&self, module: &ModuleId) -> Vec<&PatchRecord> {
        self.records.iter().filter(|r| &r.module == module).collect()
    }

    /// Number of recorded installations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been installed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
