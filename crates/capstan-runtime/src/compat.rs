//! Host compatibility gate.
//!
//! Compares the build identifier this orchestrator was built against with
//! whatever the running host reports. A mismatch is surfaced to the operator
//! as a warning and nothing else: activation proceeds, the host never sees
//! an error return.

use std::fmt;

use tracing::{debug, warn};

use capstan_core::Version;

/// Opaque host build identifier.
///
/// Hosts report builds as integers or strings; both are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTag(String);

impl BuildTag {
    /// The identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BuildTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BuildTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for BuildTag {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for BuildTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result of comparing expected and observed host builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Builds match.
    Match,
    /// Builds differ; informational only.
    Mismatch {
        /// The build this orchestrator was built for.
        expected: BuildTag,
        /// The build the host reported.
        observed: BuildTag,
    },
}

impl Compatibility {
    /// Whether the builds matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Warn-only comparison of the orchestrator's expected host build and
/// version against what the running host reports.
#[derive(Debug, Clone)]
pub struct CompatibilityGate {
    expected: BuildTag,
    own_version: Version,
}

impl CompatibilityGate {
    /// Create a gate for the given expected build and own version.
    #[must_use]
    pub fn new(expected: BuildTag, own_version: Version) -> Self {
        Self {
            expected,
            own_version,
        }
    }

    /// The build identifier this orchestrator expects.
    #[must_use]
    pub fn expected(&self) -> &BuildTag {
        &self.expected
    }

    /// The orchestrator's own version.
    #[must_use]
    pub fn own_version(&self) -> Version {
        self.own_version
    }

    /// Pure comparison of the expected build against an observed one.
    #[must_use]
    pub fn check(&self, observed: &BuildTag) -> Compatibility {
        if &self.expected == observed {
            Compatibility::Match
        } else {
            Compatibility::Mismatch {
                expected: self.expected.clone(),
                observed: observed.clone(),
            }
        }
    }

    /// Record the host's reported build, warning on mismatch.
    ///
    /// Never blocks activation; the host typically reports its build from an
    /// asynchronous notification after startup.
    pub fn observe_build(&self, observed: &BuildTag) -> Compatibility {
        let result = self.check(observed);
        match &result {
            Compatibility::Match => {
                debug!(build = %observed, "Host build matches expected build");
            },
            Compatibility::Mismatch { expected, observed } => {
                warn!(
                    expected = %expected,
                    observed = %observed,
                    "This orchestrator was built for a different host build"
                );
                warn!("Should any problems arise, check for an updated release before reporting issues");
            },
        }
        result
    }

    /// Whether this orchestrator's feature set is supported by the given
    /// version: same major, own minor not above the other's.
    #[must_use]
    pub fn supports_version(&self, other: &Version) -> bool {
        self.own_version.is_compatible_with(other)
    }

    /// Record a version string reported by the running host, warning when it
    /// does not support this orchestrator's feature set. Unparseable input
    /// is itself only a warning.
    pub fn observe_host_version(&self, raw: &str) {
        match Version::parse(raw) {
            Ok(version) => {
                if self.supports_version(&version) {
                    debug!(host_version = %version, "Host version supports this orchestrator");
                } else {
                    warn!(
                        own_version = %self.own_version,
                        host_version = %version,
                        "Host version does not support this orchestrator's feature set"
                    );
                }
            },
            Err(e) => {
                warn!(raw, error = %e, "Host reported an unparseable version string");
            },
        }
    }
}
