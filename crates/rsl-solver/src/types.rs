//! Type representation for the solver.
//!
//! `Type` is a closed sum type with one case per type the language can
//! express. Structural types (optionals, arrays, dictionaries, functions,
//! references, restricted types) are immutable values shared through `Arc`;
//! nominal types (composites and interfaces) are handles into the
//! `DeclarationTable` that owns their declarations.
//!
//! Equality is `==`:
//! - structural for container, function and optional types
//! - nominal (`DefId`) for composite and interface types
//! - set-based for the restrictions of a restricted type

use crate::def::DefId;
use crate::restricted::RestrictedType;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// =============================================================================
// TypeId - Stable String Identity
// =============================================================================

/// Stable string identity of a type.
///
/// Used as a mapping key and in serialized program metadata, so its grammar
/// is part of the external contract:
///
/// | Type | `TypeId` |
/// |------|----------|
/// | composite / interface | `S.a.Outer.Inner` |
/// | restricted | `S.a.R{S.b.I1,S.c.I2}` (restrictions sorted) |
/// | optional | `Int?` |
/// | arrays | `[Int]`, `[Int;2]` |
/// | dictionary | `{String:Int}` |
/// | function | `((Int8):Int16)` |
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(String);

impl TypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CompositeKind
// =============================================================================

/// Kind of a composite declaration, or the kind an interface restricts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CompositeKind {
    Structure,
    Resource,
    Contract,
    Event,
    Enum,
}

impl CompositeKind {
    /// The declaration keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Structure => "struct",
            Self::Resource => "resource",
            Self::Contract => "contract",
            Self::Event => "event",
            Self::Enum => "enum",
        }
    }

    /// Human readable name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Resource => "resource",
            Self::Contract => "contract",
            Self::Event => "event",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NumericType
// =============================================================================

/// Numeric primitive types, concrete and abstract.
///
/// The abstract types form the numeric hierarchy:
///
/// ```text
/// Number
/// ├── SignedNumber ── SignedInteger, SignedFixedPoint
/// ├── Integer ─────── SignedInteger, UInt, UInt8..UInt256, Word8..Word64
/// └── FixedPoint ──── SignedFixedPoint, UFix64
/// SignedInteger ───── Int, Int8..Int256
/// SignedFixedPoint ── Fix64
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericType {
    Number,
    SignedNumber,
    Integer,
    SignedInteger,
    FixedPoint,
    SignedFixedPoint,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    UInt256,
    Word8,
    Word16,
    Word32,
    Word64,
    Fix64,
    UFix64,
}

impl NumericType {
    pub const ALL: [Self; 26] = [
        Self::Number,
        Self::SignedNumber,
        Self::Integer,
        Self::SignedInteger,
        Self::FixedPoint,
        Self::SignedFixedPoint,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Int128,
        Self::Int256,
        Self::UInt,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::UInt128,
        Self::UInt256,
        Self::Word8,
        Self::Word16,
        Self::Word32,
        Self::Word64,
        Self::Fix64,
        Self::UFix64,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::SignedNumber => "SignedNumber",
            Self::Integer => "Integer",
            Self::SignedInteger => "SignedInteger",
            Self::FixedPoint => "FixedPoint",
            Self::SignedFixedPoint => "SignedFixedPoint",
            Self::Int => "Int",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Int128 => "Int128",
            Self::Int256 => "Int256",
            Self::UInt => "UInt",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::UInt128 => "UInt128",
            Self::UInt256 => "UInt256",
            Self::Word8 => "Word8",
            Self::Word16 => "Word16",
            Self::Word32 => "Word32",
            Self::Word64 => "Word64",
            Self::Fix64 => "Fix64",
            Self::UFix64 => "UFix64",
        }
    }

    /// Abstract numeric types have no values of their own.
    pub const fn is_abstract(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::SignedNumber
                | Self::Integer
                | Self::SignedInteger
                | Self::FixedPoint
                | Self::SignedFixedPoint
        )
    }
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Numeric(NumericType),
    String,
    Character,
    Address,
    Bool,
    Void,
    /// Bottom type: subtype of every type.
    Never,
    /// Top of all non-resource types.
    AnyStruct,
    /// Top of all resource types.
    AnyResource,
    Optional(Arc<Type>),
    VariableSized(Arc<Type>),
    ConstantSized(Arc<ConstantSizedType>),
    Dictionary(Arc<DictionaryType>),
    Function(Arc<FunctionType>),
    Composite(DefId),
    Interface(DefId),
    Restricted(Arc<RestrictedType>),
    Reference(Arc<ReferenceType>),
    /// A type parameter of a generic function, only meaningful inside its signature.
    Generic(Arc<TypeParameter>),
}

impl Type {
    pub const INT: Self = Self::Numeric(NumericType::Int);
    pub const INT8: Self = Self::Numeric(NumericType::Int8);
    pub const INT16: Self = Self::Numeric(NumericType::Int16);
    pub const UINT8: Self = Self::Numeric(NumericType::UInt8);
    pub const UINT16: Self = Self::Numeric(NumericType::UInt16);
    pub const UINT256: Self = Self::Numeric(NumericType::UInt256);

    /// The type of the `nil` literal.
    pub fn nil() -> Self {
        Self::optional(Self::Never)
    }

    pub fn optional(ty: Type) -> Self {
        Self::Optional(Arc::new(ty))
    }

    pub fn variable_sized(element: Type) -> Self {
        Self::VariableSized(Arc::new(element))
    }

    pub fn constant_sized(element: Type, size: u64) -> Self {
        Self::ConstantSized(Arc::new(ConstantSizedType { element, size }))
    }

    pub fn dictionary(key: Type, value: Type) -> Self {
        Self::Dictionary(Arc::new(DictionaryType { key, value }))
    }

    pub fn function(function: FunctionType) -> Self {
        Self::Function(Arc::new(function))
    }

    pub fn reference(authorized: bool, referenced: Type) -> Self {
        Self::Reference(Arc::new(ReferenceType {
            authorized,
            referenced,
        }))
    }

    pub fn restricted(restricted: RestrictedType) -> Self {
        Self::Restricted(Arc::new(restricted))
    }

    pub fn generic(parameter: TypeParameter) -> Self {
        Self::Generic(Arc::new(parameter))
    }

    pub const fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    pub const fn as_numeric(&self) -> Option<NumericType> {
        match self {
            Self::Numeric(numeric) => Some(*numeric),
            _ => None,
        }
    }

    /// Whether the type mentions a generic type parameter anywhere.
    pub fn contains_generic(&self) -> bool {
        match self {
            Self::Generic(_) => true,
            Self::Optional(inner) | Self::VariableSized(inner) => inner.contains_generic(),
            Self::ConstantSized(array) => array.element.contains_generic(),
            Self::Dictionary(dictionary) => {
                dictionary.key.contains_generic() || dictionary.value.contains_generic()
            }
            Self::Reference(reference) => reference.referenced.contains_generic(),
            Self::Function(function) => {
                function
                    .parameters
                    .iter()
                    .any(|parameter| parameter.annotation.ty.contains_generic())
                    || function.return_annotation.ty.contains_generic()
            }
            Self::Numeric(_)
            | Self::String
            | Self::Character
            | Self::Address
            | Self::Bool
            | Self::Void
            | Self::Never
            | Self::AnyStruct
            | Self::AnyResource
            | Self::Composite(_)
            | Self::Interface(_)
            | Self::Restricted(_) => false,
        }
    }
}

impl From<NumericType> for Type {
    fn from(numeric: NumericType) -> Self {
        Self::Numeric(numeric)
    }
}

// =============================================================================
// Structural Payloads
// =============================================================================

/// `[T; N]`: the size is part of the type's identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstantSizedType {
    pub element: Type,
    pub size: u64,
}

/// `{K: V}`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DictionaryType {
    pub key: Type,
    pub value: Type,
}

/// `&T` or `auth &T`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceType {
    pub authorized: bool,
    pub referenced: Type,
}

/// A type together with the `@` resource marker written in the source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeAnnotation {
    pub is_resource: bool,
    pub ty: Type,
}

impl TypeAnnotation {
    pub const fn new(ty: Type) -> Self {
        Self {
            is_resource: false,
            ty,
        }
    }

    /// An annotation carrying the `@` marker.
    pub const fn resource(ty: Type) -> Self {
        Self {
            is_resource: true,
            ty,
        }
    }
}

/// A generic type parameter: `<T: AnyResource>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    pub name: String,
    pub bound: Option<Type>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>, bound: Option<Type>) -> Self {
        Self {
            name: name.into(),
            bound,
        }
    }
}

/// A function parameter. Labels and identifiers are rendered but do not take
/// part in function type equality.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub label: Option<String>,
    pub identifier: Option<String>,
    pub annotation: TypeAnnotation,
}

impl Parameter {
    pub const fn new(annotation: TypeAnnotation) -> Self {
        Self {
            label: None,
            identifier: None,
            annotation,
        }
    }

    pub fn named(label: Option<&str>, identifier: &str, annotation: TypeAnnotation) -> Self {
        Self {
            label: label.map(str::to_string),
            identifier: Some(identifier.to_string()),
            annotation,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.annotation == other.annotation
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.annotation.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_annotation: TypeAnnotation,
}

impl FunctionType {
    pub const fn new(parameters: Vec<Parameter>, return_annotation: TypeAnnotation) -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters,
            return_annotation,
        }
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
