use crate::locator::Locator;
use serde::Serialize;

/// Severity of a document conformance diagnostic.
///
/// Only two levels exist: hard conformance errors and advisory warnings.
/// Internal faults are not diagnostics at all; they surface as [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One document conformance finding.
///
/// Diagnostics never abort the pass; the checker keeps going after emitting
/// one. The locator is the position of the construct being blamed, which for
/// deferred checks is the referencing construct seen earlier in the stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub locator: Locator,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, locator: Locator) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            locator,
        }
    }

    pub fn warning(message: impl Into<String>, locator: Locator) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            locator,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", self.locator, label, self.message)
    }
}

/// Engine-level failures, distinct from document conformance findings.
///
/// These mean the check of the current document cannot continue: either a
/// collaborator broke the event contract, or a configured resource bound was
/// hit. Document content alone can only trigger the limit variants.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CheckError {
    /// `end_element` arrived with no matching open element.
    #[error("element close event with no open element; upstream event stream is inconsistent")]
    StackUnderflow,

    /// The table-structure walker produced bookkeeping that would place a
    /// cell at a non-positive column or row.
    #[error("table cell placement out of range ({0}); upstream table bookkeeping is inconsistent")]
    TableContract(&'static str),

    /// Open-element depth exceeded `CheckerConfig::max_depth`.
    #[error("element nesting depth exceeds the configured limit of {0}")]
    DepthLimit(usize),

    /// Row count in one table exceeded `CheckerConfig::max_table_rows`.
    #[error("table row count exceeds the configured limit of {0}")]
    TableRowLimit(usize),

    /// Lifecycle misuse by the host, e.g. events after `end_document`.
    #[error("checker lifecycle violation: {0}")]
    Lifecycle(&'static str),
}

/// Result alias used by every event-intake method on the checker.
pub type CheckResult = Result<(), CheckError>;
