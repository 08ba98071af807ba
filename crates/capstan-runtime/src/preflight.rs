//! Preflight environment checks.
//!
//! The host supplies an inventory of the code units it has loaded; preflight
//! scans it for units known to conflict with the orchestrator and confirms
//! the required companion unit is present. Findings are warning blocks only
//! and never abort activation.

use regex::RegexBuilder;
use tracing::warn;

/// Preflight policy: what to look for in the host's inventory.
#[derive(Debug, Clone, Default)]
pub struct PreflightConfig {
    /// Case-insensitive regex patterns naming conflicting code units.
    pub conflict_patterns: Vec<String>,
    /// Substring identifying the orchestrator's companion unit, if one must
    /// be loaded alongside it.
    pub companion_marker: Option<String>,
}

/// What preflight found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    /// Inventory entries matching a conflict pattern.
    pub conflicting_units: Vec<String>,
    /// Whether the companion unit was found (`true` when none is required).
    pub companion_present: bool,
}

impl PreflightReport {
    /// Whether nothing questionable was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicting_units.is_empty() && self.companion_present
    }
}

/// Inventory entries matching any of the given patterns, case-insensitively.
///
/// Patterns that fail to compile are skipped with a warning; a bad pattern
/// must not take the rest of the scan down with it.
#[must_use]
pub fn find_conflicting_units(inventory: &[String], patterns: &[String]) -> Vec<String> {
    let mut conflicts = Vec::new();
    for pattern in patterns {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping invalid conflict pattern");
                continue;
            },
        };
        for unit in inventory {
            if regex.is_match(unit) && !conflicts.contains(unit) {
                conflicts.push(unit.clone());
            }
        }
    }
    conflicts
}

/// Whether the companion unit is present in the inventory.
///
/// Matching is a case-insensitive substring check against unit names.
#[must_use]
pub fn companion_present(inventory: &[String], marker: &str) -> bool {
    let marker = marker.to_lowercase();
    inventory
        .iter()
        .any(|unit| unit.to_lowercase().contains(&marker))
}

/// Run the configured checks over the host's inventory, emitting warning
/// blocks for anything found.
#[must_use]
pub fn run_preflight(config: &PreflightConfig, inventory: &[String]) -> PreflightReport {
    let conflicting_units = find_conflicting_units(inventory, &config.conflict_patterns);
    if !conflicting_units.is_empty() {
        warn!("Conflicting code units are loaded alongside the orchestrator");
        warn!("Remove the following units from the host environment:");
        for unit in &conflicting_units {
            warn!(unit = %unit, "conflicting unit");
        }
    }

    let companion_ok = match &config.companion_marker {
        Some(marker) => {
            let present = companion_present(inventory, marker);
            if !present {
                warn!(
                    marker = %marker,
                    "The orchestrator's companion unit appears to be missing"
                );
                warn!("Make sure it is installed next to the orchestrator before reporting issues");
            }
            present
        },
        None => true,
    };

    PreflightReport {
        conflicting_units,
        companion_present: companion_ok,
    }
}
