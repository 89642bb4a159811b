//! Centralized limits and thresholds for the type core.
//!
//! Type values are finite trees (nominal types are referenced by handle, never
//! expanded), so the solver's own recursions terminate without guards. The
//! limits here bound the inputs the core accepts from its callers.

/// Maximum nesting depth of a type annotation accepted by lowering.
///
/// Lowering recurses once per nested type node; annotations nested deeper
/// than this report `TypeAnnotationTooDeep` and recover with the bottom type.
///
/// ```text
/// let x: [[[[[[[[ /* ... 256 levels ... */ Int ]]]]]]]] = ...
/// ```
pub const MAX_TYPE_ANNOTATION_DEPTH: u32 = 256;

/// Maximum number of segments in a nested type name (`A.B.C.D...`).
///
/// Nested names are resolved by walking a declaration's nested types one
/// segment at a time; longer paths are reported as not declared.
pub const MAX_QUALIFIED_NAME_DEPTH: usize = 128;
