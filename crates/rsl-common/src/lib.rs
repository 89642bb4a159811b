//! Common types and utilities for the rsl compiler front end.
//!
//! This crate provides foundational types used across all rsl crates:
//! - Declaring locations of compilation units (`Location`)
//! - Line/column positions and ranges for access sites (`Position`, `Range`)
//! - Diagnostic types and stable diagnostic codes
//! - Compiler limits and thresholds

// Compilation unit identity, part of nominal type identity
pub mod location;
pub use location::Location;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{Position, Range};

// Diagnostics shared by the solver and its callers
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

// Centralized limits and thresholds
pub mod limits;
