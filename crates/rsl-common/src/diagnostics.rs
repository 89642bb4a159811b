//! Diagnostic types and stable diagnostic codes for the type core.
//!
//! The solver produces structured `TypeError` values; callers convert them
//! into `Diagnostic`s (file + range + message + code) for display or for
//! serialization into tooling output.

use crate::position::Range;
use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., where a conflicting member was declared).
#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub range: Range,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A type-checking diagnostic message with optional related information.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub range: Range,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, range: Range, message: String, code: u32) -> Self {
        Self {
            file,
            range,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, range: Range, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            range,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }
}

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Stable numeric codes, grouped by the phase that reports them.
///
/// - `1xxx`: declaration and construction errors
/// - `2xxx`: member access errors
/// - `3xxx`: invocation and type argument errors
pub mod diagnostic_codes {
    pub const NOT_DECLARED: u32 = 1001;
    pub const DUPLICATE_DECLARATION: u32 = 1002;
    pub const UNKNOWN_CONTAINER: u32 = 1003;
    pub const INVALID_CONFORMANCE: u32 = 1004;
    pub const INVALID_RESTRICTED_TYPE_BASE: u32 = 1010;
    pub const INVALID_RESTRICTION_TYPE: u32 = 1011;
    pub const RESTRICTION_KIND_MISMATCH: u32 = 1012;
    pub const DUPLICATE_RESTRICTION: u32 = 1013;
    pub const NON_CONFORMING_RESTRICTION: u32 = 1014;
    pub const AMBIGUOUS_RESTRICTION_MEMBER: u32 = 1015;
    pub const MISSING_RESOURCE_ANNOTATION: u32 = 1020;
    pub const INVALID_RESOURCE_ANNOTATION: u32 = 1021;
    pub const INVALID_RESOURCE_FIELD: u32 = 1022;
    pub const TYPE_ANNOTATION_TOO_DEEP: u32 = 1030;

    pub const INVALID_RESTRICTED_TYPE_MEMBER_ACCESS: u32 = 2001;
    pub const NOT_DECLARED_MEMBER: u32 = 2002;

    pub const TYPE_MISMATCH: u32 = 3001;
    pub const TYPE_PARAMETER_TYPE_MISMATCH: u32 = 3002;
    pub const TYPE_PARAMETER_TYPE_INFERENCE: u32 = 3003;
    pub const INVALID_TYPE_ARGUMENT_COUNT: u32 = 3004;
    pub const ARGUMENT_COUNT: u32 = 3005;
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
