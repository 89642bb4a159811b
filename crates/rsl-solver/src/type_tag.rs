//! Type tags: bit-mask classification of types for the supertype lattice.
//!
//! Every type maps to a `TypeTag`. Joining the tags of a set of types with a
//! bitwise OR gives a constant-time summary of which kinds of types are
//! present, which `common_super_type` uses to pick its strategy.
//!
//! Numeric types form a sub-lattice: every concrete numeric type owns one
//! bit, and every abstract numeric type owns one bit *plus* the bits of all
//! its descendants. The common numeric ancestor of a set of numeric types is
//! therefore the narrowest registered numeric tag that contains their join.
//!
//! The own bit of an abstract type keeps its mask distinct from the join of
//! its children (`SignedFixedPoint` would otherwise collide with `Fix64`).
//! Mask uniqueness is verified when the built-in registry is created; a
//! collision is a bug in the lattice definition and aborts.

use crate::types::{NumericType, Type};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use tracing::trace;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct TypeTag: u64 {
        // Concrete numeric types
        const INT = 1 << 0;
        const INT8 = 1 << 1;
        const INT16 = 1 << 2;
        const INT32 = 1 << 3;
        const INT64 = 1 << 4;
        const INT128 = 1 << 5;
        const INT256 = 1 << 6;
        const UINT = 1 << 7;
        const UINT8 = 1 << 8;
        const UINT16 = 1 << 9;
        const UINT32 = 1 << 10;
        const UINT64 = 1 << 11;
        const UINT128 = 1 << 12;
        const UINT256 = 1 << 13;
        const WORD8 = 1 << 14;
        const WORD16 = 1 << 15;
        const WORD32 = 1 << 16;
        const WORD64 = 1 << 17;
        const FIX64 = 1 << 18;
        const UFIX64 = 1 << 19;

        // Abstract numeric types: own bit plus all descendants
        const SIGNED_INTEGER = (1 << 20)
            | Self::INT.bits()
            | Self::INT8.bits()
            | Self::INT16.bits()
            | Self::INT32.bits()
            | Self::INT64.bits()
            | Self::INT128.bits()
            | Self::INT256.bits();
        const INTEGER = (1 << 21)
            | Self::SIGNED_INTEGER.bits()
            | Self::UINT.bits()
            | Self::UINT8.bits()
            | Self::UINT16.bits()
            | Self::UINT32.bits()
            | Self::UINT64.bits()
            | Self::UINT128.bits()
            | Self::UINT256.bits()
            | Self::WORD8.bits()
            | Self::WORD16.bits()
            | Self::WORD32.bits()
            | Self::WORD64.bits();
        const SIGNED_FIXED_POINT = (1 << 22) | Self::FIX64.bits();
        const FIXED_POINT = (1 << 23) | Self::SIGNED_FIXED_POINT.bits() | Self::UFIX64.bits();
        const SIGNED_NUMBER = (1 << 24)
            | Self::SIGNED_INTEGER.bits()
            | Self::SIGNED_FIXED_POINT.bits();
        const NUMBER = (1 << 25)
            | Self::SIGNED_NUMBER.bits()
            | Self::INTEGER.bits()
            | Self::FIXED_POINT.bits();

        // Non-numeric types
        const STRING = 1 << 32;
        const CHARACTER = 1 << 33;
        const ADDRESS = 1 << 34;
        const BOOL = 1 << 35;
        const VOID = 1 << 36;
        const NEVER = 1 << 37;
        const ANY_STRUCT = 1 << 38;
        const ANY_RESOURCE = 1 << 39;
        const OPTIONAL = 1 << 40;
        const VARIABLE_SIZED = 1 << 41;
        const CONSTANT_SIZED = 1 << 42;
        const DICTIONARY = 1 << 43;
        const FUNCTION = 1 << 44;
        const COMPOSITE = 1 << 45;
        const INTERFACE = 1 << 46;
        const RESTRICTED = 1 << 47;
        const REFERENCE = 1 << 48;
        const GENERIC = 1 << 49;
    }
}

impl TypeTag {
    /// Whether every type in the join is numeric.
    pub fn is_numeric(self) -> bool {
        !self.is_empty() && Self::NUMBER.contains(self)
    }
}

const NON_NUMERIC_TAGS: [(&str, TypeTag); 18] = [
    ("String", TypeTag::STRING),
    ("Character", TypeTag::CHARACTER),
    ("Address", TypeTag::ADDRESS),
    ("Bool", TypeTag::BOOL),
    ("Void", TypeTag::VOID),
    ("Never", TypeTag::NEVER),
    ("AnyStruct", TypeTag::ANY_STRUCT),
    ("AnyResource", TypeTag::ANY_RESOURCE),
    ("Optional", TypeTag::OPTIONAL),
    ("VariableSized", TypeTag::VARIABLE_SIZED),
    ("ConstantSized", TypeTag::CONSTANT_SIZED),
    ("Dictionary", TypeTag::DICTIONARY),
    ("Function", TypeTag::FUNCTION),
    ("Composite", TypeTag::COMPOSITE),
    ("Interface", TypeTag::INTERFACE),
    ("Restricted", TypeTag::RESTRICTED),
    ("Reference", TypeTag::REFERENCE),
    ("Generic", TypeTag::GENERIC),
];

impl NumericType {
    pub const fn tag(self) -> TypeTag {
        match self {
            Self::Number => TypeTag::NUMBER,
            Self::SignedNumber => TypeTag::SIGNED_NUMBER,
            Self::Integer => TypeTag::INTEGER,
            Self::SignedInteger => TypeTag::SIGNED_INTEGER,
            Self::FixedPoint => TypeTag::FIXED_POINT,
            Self::SignedFixedPoint => TypeTag::SIGNED_FIXED_POINT,
            Self::Int => TypeTag::INT,
            Self::Int8 => TypeTag::INT8,
            Self::Int16 => TypeTag::INT16,
            Self::Int32 => TypeTag::INT32,
            Self::Int64 => TypeTag::INT64,
            Self::Int128 => TypeTag::INT128,
            Self::Int256 => TypeTag::INT256,
            Self::UInt => TypeTag::UINT,
            Self::UInt8 => TypeTag::UINT8,
            Self::UInt16 => TypeTag::UINT16,
            Self::UInt32 => TypeTag::UINT32,
            Self::UInt64 => TypeTag::UINT64,
            Self::UInt128 => TypeTag::UINT128,
            Self::UInt256 => TypeTag::UINT256,
            Self::Word8 => TypeTag::WORD8,
            Self::Word16 => TypeTag::WORD16,
            Self::Word32 => TypeTag::WORD32,
            Self::Word64 => TypeTag::WORD64,
            Self::Fix64 => TypeTag::FIX64,
            Self::UFix64 => TypeTag::UFIX64,
        }
    }

    /// Whether `self` is `other` or one of its (transitive) supertypes.
    pub fn is_super_type_of(self, other: Self) -> bool {
        self.tag().contains(other.tag())
    }
}

impl Type {
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Numeric(numeric) => numeric.tag(),
            Self::String => TypeTag::STRING,
            Self::Character => TypeTag::CHARACTER,
            Self::Address => TypeTag::ADDRESS,
            Self::Bool => TypeTag::BOOL,
            Self::Void => TypeTag::VOID,
            Self::Never => TypeTag::NEVER,
            Self::AnyStruct => TypeTag::ANY_STRUCT,
            Self::AnyResource => TypeTag::ANY_RESOURCE,
            Self::Optional(_) => TypeTag::OPTIONAL,
            Self::VariableSized(_) => TypeTag::VARIABLE_SIZED,
            Self::ConstantSized(_) => TypeTag::CONSTANT_SIZED,
            Self::Dictionary(_) => TypeTag::DICTIONARY,
            Self::Function(_) => TypeTag::FUNCTION,
            Self::Composite(_) => TypeTag::COMPOSITE,
            Self::Interface(_) => TypeTag::INTERFACE,
            Self::Restricted(_) => TypeTag::RESTRICTED,
            Self::Reference(_) => TypeTag::REFERENCE,
            Self::Generic(_) => TypeTag::GENERIC,
        }
    }
}

/// Join the tags of all `types`.
pub fn join_tags(types: &[Type]) -> TypeTag {
    types
        .iter()
        .fold(TypeTag::empty(), |joined, ty| joined | ty.tag())
}

// =============================================================================
// TypeTagRegistry
// =============================================================================

static BUILTIN_REGISTRY: LazyLock<TypeTagRegistry> = LazyLock::new(TypeTagRegistry::with_builtin_tags);

/// Registry of named tags, guaranteeing mask uniqueness.
#[derive(Debug, Default)]
pub struct TypeTagRegistry {
    names: FxHashMap<TypeTag, &'static str>,
    /// Numeric types ordered from narrowest to widest mask.
    numeric: Vec<NumericType>,
}

impl TypeTagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of all built-in tags, validated on first use.
    pub fn builtin() -> &'static Self {
        &BUILTIN_REGISTRY
    }

    fn with_builtin_tags() -> Self {
        let mut registry = Self::new();
        for numeric in NumericType::ALL {
            registry.register_numeric(numeric);
        }
        for (name, tag) in NON_NUMERIC_TAGS {
            registry.register(name, tag);
        }
        trace!(tags = registry.names.len(), "TypeTagRegistry::with_builtin_tags");
        registry
    }

    /// Register a named tag.
    ///
    /// # Panics
    ///
    /// Panics if another tag with the same mask is already registered. This
    /// is a lattice definition bug, never a user error.
    pub fn register(&mut self, name: &'static str, tag: TypeTag) {
        if let Some(existing) = self.names.get(&tag) {
            panic!(
                "duplicate type tag: {:#x} (`{existing}` and `{name}`)",
                tag.bits()
            );
        }
        self.names.insert(tag, name);
    }

    fn register_numeric(&mut self, numeric: NumericType) {
        self.register(numeric.name(), numeric.tag());
        self.numeric.push(numeric);
        // Stable: equal widths keep declaration order.
        self.numeric.sort_by_key(|numeric| numeric.tag().bits().count_ones());
    }

    pub fn name_of(&self, tag: TypeTag) -> Option<&'static str> {
        self.names.get(&tag).copied()
    }

    /// The narrowest numeric type whose mask contains `joined`.
    pub fn numeric_super_type(&self, joined: TypeTag) -> Option<NumericType> {
        self.numeric
            .iter()
            .copied()
            .find(|numeric| numeric.tag().contains(joined))
    }
}

#[cfg(test)]
#[path = "../tests/type_tag_tests.rs"]
mod tests;
