//! Typed errors reported by the solver.
//!
//! The solver never formats diagnostics eagerly for display; it returns
//! `TypeError` values (types already rendered to their concrete syntax) and
//! lets the caller decide whether to convert them into
//! `rsl_common::Diagnostic`s.
//!
//! | Phase | Variants |
//! |-------|----------|
//! | construction | restricted type validation, declarations, resource annotations and fields |
//! | access | `InvalidRestrictedTypeMemberAccess`, `NotDeclaredMember` |
//! | invocation | `TypeMismatch`, `TypeParameterTypeMismatch`, inference and count errors |
//!
//! Lattice definition bugs (duplicate type tags) are not represented here:
//! they panic.

use crate::types::CompositeKind;
use rsl_common::diagnostics::diagnostic_codes;
use rsl_common::{Diagnostic, Range};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("cannot find type in this scope: `{name}`")]
    NotDeclared { name: String, range: Range },

    #[error("duplicate declaration: `{type_id}`")]
    DuplicateDeclaration { type_id: String },

    #[error("cannot declare `{identifier}`: its container is not declared")]
    UnknownContainer { identifier: String },

    #[error("`{identifier}` cannot conform to `{conformance}`: not an interface")]
    InvalidConformance {
        identifier: String,
        conformance: String,
    },

    #[error("cannot restrict type: `{base}` is not a resource or structure type")]
    InvalidRestrictedTypeBase { base: String, range: Range },

    #[error("cannot restrict using non-interface type: `{ty}`")]
    InvalidRestrictionType { ty: String, range: Range },

    #[error(
        "restriction kind mismatch: `{restriction}` restricts {actual} types, but the base type is a {expected} type"
    )]
    RestrictionKindMismatch {
        restriction: String,
        expected: CompositeKind,
        actual: CompositeKind,
        range: Range,
    },

    #[error("duplicate restriction: `{restriction}`")]
    DuplicateRestriction { restriction: String, range: Range },

    #[error("restricted type does not conform to restricting type: `{base}` does not conform to `{restriction}`")]
    NonConformingRestriction {
        base: String,
        restriction: String,
        range: Range,
    },

    #[error("ambiguous restriction member: `{member}` is declared differently by `{first}` and `{second}`")]
    AmbiguousRestrictionMember {
        member: String,
        first: String,
        second: String,
        range: Range,
    },

    #[error("missing resource annotation: `@` is required for resource type `{ty}`")]
    MissingResourceAnnotation { ty: String, range: Range },

    #[error("invalid resource annotation: `{ty}` is not a resource type")]
    InvalidResourceAnnotation { ty: String, range: Range },

    #[error("field `{field}` of non-resource type `{container}` has resource type `{ty}`")]
    InvalidResourceField {
        container: String,
        field: String,
        ty: String,
    },

    #[error("type annotation is nested too deeply")]
    TypeAnnotationTooDeep { range: Range },

    #[error("cannot access `{member}`: member of restricted type `{restricted}` is not declared by any restriction")]
    InvalidRestrictedTypeMemberAccess {
        member: String,
        restricted: String,
        range: Range,
    },

    #[error("value of type `{ty}` has no member `{member}`")]
    NotDeclaredMember {
        member: String,
        ty: String,
        range: Range,
    },

    #[error("mismatched types: expected `{expected}`, got `{actual}`")]
    TypeMismatch {
        expected: String,
        actual: String,
        range: Range,
    },

    #[error("mismatched type for type parameter: expected `{expected}`, got `{actual}`")]
    TypeParameterTypeMismatch {
        expected: String,
        actual: String,
        range: Range,
    },

    #[error("cannot infer type parameter: `{name}`")]
    TypeParameterTypeInference { name: String, range: Range },

    #[error("incorrect number of type arguments: expected at most {expected}, got {actual}")]
    InvalidTypeArgumentCount {
        expected: usize,
        actual: usize,
        range: Range,
    },

    #[error("incorrect number of arguments: expected {expected}, got {actual}")]
    ArgumentCount {
        expected: usize,
        actual: usize,
        range: Range,
    },
}

impl TypeError {
    pub const fn code(&self) -> u32 {
        match self {
            Self::NotDeclared { .. } => diagnostic_codes::NOT_DECLARED,
            Self::DuplicateDeclaration { .. } => diagnostic_codes::DUPLICATE_DECLARATION,
            Self::UnknownContainer { .. } => diagnostic_codes::UNKNOWN_CONTAINER,
            Self::InvalidConformance { .. } => diagnostic_codes::INVALID_CONFORMANCE,
            Self::InvalidRestrictedTypeBase { .. } => {
                diagnostic_codes::INVALID_RESTRICTED_TYPE_BASE
            }
            Self::InvalidRestrictionType { .. } => diagnostic_codes::INVALID_RESTRICTION_TYPE,
            Self::RestrictionKindMismatch { .. } => diagnostic_codes::RESTRICTION_KIND_MISMATCH,
            Self::DuplicateRestriction { .. } => diagnostic_codes::DUPLICATE_RESTRICTION,
            Self::NonConformingRestriction { .. } => diagnostic_codes::NON_CONFORMING_RESTRICTION,
            Self::AmbiguousRestrictionMember { .. } => {
                diagnostic_codes::AMBIGUOUS_RESTRICTION_MEMBER
            }
            Self::MissingResourceAnnotation { .. } => {
                diagnostic_codes::MISSING_RESOURCE_ANNOTATION
            }
            Self::InvalidResourceAnnotation { .. } => {
                diagnostic_codes::INVALID_RESOURCE_ANNOTATION
            }
            Self::InvalidResourceField { .. } => diagnostic_codes::INVALID_RESOURCE_FIELD,
            Self::TypeAnnotationTooDeep { .. } => diagnostic_codes::TYPE_ANNOTATION_TOO_DEEP,
            Self::InvalidRestrictedTypeMemberAccess { .. } => {
                diagnostic_codes::INVALID_RESTRICTED_TYPE_MEMBER_ACCESS
            }
            Self::NotDeclaredMember { .. } => diagnostic_codes::NOT_DECLARED_MEMBER,
            Self::TypeMismatch { .. } => diagnostic_codes::TYPE_MISMATCH,
            Self::TypeParameterTypeMismatch { .. } => {
                diagnostic_codes::TYPE_PARAMETER_TYPE_MISMATCH
            }
            Self::TypeParameterTypeInference { .. } => {
                diagnostic_codes::TYPE_PARAMETER_TYPE_INFERENCE
            }
            Self::InvalidTypeArgumentCount { .. } => {
                diagnostic_codes::INVALID_TYPE_ARGUMENT_COUNT
            }
            Self::ArgumentCount { .. } => diagnostic_codes::ARGUMENT_COUNT,
        }
    }

    /// Source range of the error, if it is attributable to one.
    pub const fn range(&self) -> Option<Range> {
        match self {
            Self::NotDeclared { range, .. }
            | Self::InvalidRestrictedTypeBase { range, .. }
            | Self::InvalidRestrictionType { range, .. }
            | Self::RestrictionKindMismatch { range, .. }
            | Self::DuplicateRestriction { range, .. }
            | Self::NonConformingRestriction { range, .. }
            | Self::AmbiguousRestrictionMember { range, .. }
            | Self::MissingResourceAnnotation { range, .. }
            | Self::InvalidResourceAnnotation { range, .. }
            | Self::TypeAnnotationTooDeep { range }
            | Self::InvalidRestrictedTypeMemberAccess { range, .. }
            | Self::NotDeclaredMember { range, .. }
            | Self::TypeMismatch { range, .. }
            | Self::TypeParameterTypeMismatch { range, .. }
            | Self::TypeParameterTypeInference { range, .. }
            | Self::InvalidTypeArgumentCount { range, .. }
            | Self::ArgumentCount { range, .. } => Some(*range),
            Self::DuplicateDeclaration { .. }
            | Self::UnknownContainer { .. }
            | Self::InvalidConformance { .. }
            | Self::InvalidResourceField { .. } => None,
        }
    }

    /// Attach a source range; errors without a range are returned unchanged.
    #[must_use]
    pub fn with_range(mut self, new_range: Range) -> Self {
        match &mut self {
            Self::NotDeclared { range, .. }
            | Self::InvalidRestrictedTypeBase { range, .. }
            | Self::InvalidRestrictionType { range, .. }
            | Self::RestrictionKindMismatch { range, .. }
            | Self::DuplicateRestriction { range, .. }
            | Self::NonConformingRestriction { range, .. }
            | Self::AmbiguousRestrictionMember { range, .. }
            | Self::MissingResourceAnnotation { range, .. }
            | Self::InvalidResourceAnnotation { range, .. }
            | Self::TypeAnnotationTooDeep { range }
            | Self::InvalidRestrictedTypeMemberAccess { range, .. }
            | Self::NotDeclaredMember { range, .. }
            | Self::TypeMismatch { range, .. }
            | Self::TypeParameterTypeMismatch { range, .. }
            | Self::TypeParameterTypeInference { range, .. }
            | Self::InvalidTypeArgumentCount { range, .. }
            | Self::ArgumentCount { range, .. } => *range = new_range,
            Self::DuplicateDeclaration { .. }
            | Self::UnknownContainer { .. }
            | Self::InvalidConformance { .. }
            | Self::InvalidResourceField { .. } => {}
        }
        self
    }

    /// Convert into a displayable diagnostic for `file`.
    ///
    /// An ambiguous restriction member also points at the restriction whose
    /// declaration lost the name.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let range = self.range().unwrap_or_default();
        let diagnostic = Diagnostic::error(file.to_string(), range, self.to_string(), self.code());
        match self {
            Self::AmbiguousRestrictionMember { member, second, .. } => diagnostic.with_related(
                file.to_string(),
                range,
                format!("`{member}` is also declared by `{second}`"),
            ),
            _ => diagnostic,
        }
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
