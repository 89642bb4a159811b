//! Static type core for the rsl resource-oriented language.
//!
//! This crate implements the type representation and the type relations the
//! checker is built on:
//!
//! - **Type model**: a closed `Type` sum with structural equality for
//!   containers and nominal (`DefId`) equality for declared types
//! - **Declarations**: a table owning composite and interface declarations,
//!   with memoized qualified identifiers and `TypeId`s
//! - **Resource-ness**: which types are linear, and the declaration checks
//!   that follow from it
//! - **Lattice**: `common_super_type` over a bit-mask numeric lattice
//! - **Restricted types**: interface-restricted member views with deferred
//!   member resolution
//! - **Generic invocations**: explicit and inferred type-argument validation
//! - **Lowering**: annotation syntax to `Type`, with error recovery
pub mod def;
pub mod diagnostics;
pub mod format;
pub mod generic_call;
pub mod lower;
pub mod options;
pub mod resource;
pub mod restricted;
pub mod subtype;
pub mod supertype;
pub mod type_tag;
pub mod types;

pub use def::{
    Access, AccountKind, Container, DeclarationInfo, DeclarationKind, DeclarationTable,
    DeclaredType, DefId, Member, MemberKind, VariableKind, qualified_identifier,
};
pub use diagnostics::TypeError;
pub use format::TypeFormatter;
pub use generic_call::{InvocationArgument, InvocationCheck, check_generic_invocation, substitute};
pub use lower::{
    ParameterNode, TypeAnnotationNode, TypeLowering, TypeNode, TypeParameterNode, TypeScope,
};
pub use options::{MemberConflictPolicy, SolverOptions};
pub use resource::{check_resource_annotation, check_resource_fields, is_resource_type};
pub use restricted::{MemberResolver, RestrictedType, get_members, resolve_member};
pub use subtype::is_subtype;
pub use supertype::common_super_type;
pub use type_tag::{TypeTag, TypeTagRegistry};
pub use types::{
    CompositeKind, ConstantSizedType, DictionaryType, FunctionType, NumericType, Parameter,
    ReferenceType, Type, TypeAnnotation, TypeId, TypeParameter,
};
