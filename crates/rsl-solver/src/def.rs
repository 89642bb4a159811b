//! Declarations of nominal types and the table that owns them.
//!
//! Composite and interface declarations are created during declaration
//! checking and read thereafter. The `DeclarationTable` owns them and hands
//! out `DefId` handles; types refer to declarations only through those
//! handles, so nested declarations and their containers never own each other.
//!
//! ## Nominal identity
//!
//! A declaration is identified by its location and its *qualified
//! identifier*, the `.`-joined chain of identifiers from the outermost
//! container down to the declaration itself:
//!
//! | Declaration | Container | Qualified identifier | `TypeId` (location `S.a`) |
//! |-------------|-----------|----------------------|---------------------------|
//! | `R` | none | `R` | `S.a.R` |
//! | `Nested` | `Outer` | `Outer.Nested` | `S.a.Outer.Nested` |
//! | `Key` | `AuthAccount` | `AuthAccount.Key` | `S.a.AuthAccount.Key` |
//!
//! The table rejects a second declaration with the same `TypeId`, which makes
//! `DefId` equality coincide with nominal identity.
//!
//! ## Identifier cache
//!
//! Qualified identifiers and `TypeId`s are memoized per declaration in a
//! `OnceLock`. The cache is only an optimization: recomputation is pure, so
//! concurrent readers may race on initialization, and invalidating an entry
//! (which needs `&mut` access) always reproduces the same strings.

use crate::diagnostics::TypeError;
use crate::types::{CompositeKind, FunctionType, Type, TypeAnnotation, TypeId};
use indexmap::IndexMap;
use rsl_common::Location;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Rendered for handles that do not belong to the table being queried.
const UNKNOWN_IDENTIFIER: &str = "<unknown>";

// =============================================================================
// DefId
// =============================================================================

/// Handle of a declaration owned by a `DeclarationTable`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }

    const fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some((self.0 - Self::FIRST_VALID) as usize)
        } else {
            None
        }
    }
}

// =============================================================================
// Containers
// =============================================================================

/// Built-in account types that can contain nested declarations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccountKind {
    AuthAccount,
    PublicAccount,
}

impl AccountKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::AuthAccount => "AuthAccount",
            Self::PublicAccount => "PublicAccount",
        }
    }
}

/// Non-owning link from a declaration to its enclosing type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Declared(DefId),
    Account(AccountKind),
}

// =============================================================================
// Members
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Private,
    Contract,
    Account,
    Public,
    PublicSettable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Constant,
    Variable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field(VariableKind),
    Function,
}

/// A declared member of a composite or interface.
///
/// Members are shared through `Arc`: member views (restricted types,
/// references) hand out the declaring type's own `Arc<Member>`, never a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub container: DefId,
    pub access: Access,
    pub identifier: String,
    pub annotation: TypeAnnotation,
    pub kind: MemberKind,
    pub doc_string: Option<String>,
}

impl Member {
    pub fn new(
        container: DefId,
        access: Access,
        identifier: impl Into<String>,
        annotation: TypeAnnotation,
        kind: MemberKind,
    ) -> Self {
        Self {
            container,
            access,
            identifier: identifier.into(),
            annotation,
            kind,
            doc_string: None,
        }
    }

    /// `pub let <identifier>: <ty>`
    pub fn public_constant_field(container: DefId, identifier: impl Into<String>, ty: Type) -> Self {
        Self::new(
            container,
            Access::Public,
            identifier,
            TypeAnnotation::new(ty),
            MemberKind::Field(VariableKind::Constant),
        )
    }

    /// `pub fun <identifier>(...)`
    pub fn public_function(
        container: DefId,
        identifier: impl Into<String>,
        function: FunctionType,
    ) -> Self {
        Self::new(
            container,
            Access::Public,
            identifier,
            TypeAnnotation::new(Type::function(function)),
            MemberKind::Function,
        )
    }

    #[must_use]
    pub fn with_doc_string(mut self, doc_string: impl Into<String>) -> Self {
        self.doc_string = Some(doc_string.into());
        self
    }

    pub const fn is_field(&self) -> bool {
        matches!(self.kind, MemberKind::Field(_))
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Composite,
    Interface,
}

/// Everything needed to register a declaration.
#[derive(Clone, Debug)]
pub struct DeclarationInfo {
    pub kind: DeclarationKind,
    pub composite_kind: CompositeKind,
    pub identifier: String,
    pub location: Option<Location>,
    pub container: Option<Container>,
    /// Interfaces a composite declares conformance to.
    pub conformances: Vec<DefId>,
}

impl DeclarationInfo {
    pub fn composite(
        composite_kind: CompositeKind,
        identifier: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        Self {
            kind: DeclarationKind::Composite,
            composite_kind,
            identifier: identifier.into(),
            location,
            container: None,
            conformances: Vec::new(),
        }
    }

    pub fn interface(
        composite_kind: CompositeKind,
        identifier: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        Self {
            kind: DeclarationKind::Interface,
            ..Self::composite(composite_kind, identifier, location)
        }
    }

    #[must_use]
    pub const fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    #[must_use]
    pub fn with_conformances(mut self, conformances: Vec<DefId>) -> Self {
        self.conformances = conformances;
        self
    }
}

#[derive(Clone, Debug)]
struct CachedIdentifiers {
    qualified_identifier: String,
    type_id: TypeId,
}

/// A registered composite or interface declaration.
#[derive(Debug)]
pub struct DeclaredType {
    pub kind: DeclarationKind,
    pub composite_kind: CompositeKind,
    pub identifier: String,
    pub location: Option<Location>,
    pub container: Option<Container>,
    pub conformances: Vec<DefId>,
    /// Field names in declaration order.
    pub fields: Vec<String>,
    pub members: IndexMap<String, Arc<Member>>,
    pub nested_types: IndexMap<String, DefId>,
    cached_identifiers: OnceLock<CachedIdentifiers>,
}

impl DeclaredType {
    fn from_info(info: DeclarationInfo) -> Self {
        Self {
            kind: info.kind,
            composite_kind: info.composite_kind,
            identifier: info.identifier,
            location: info.location,
            container: info.container,
            conformances: info.conformances,
            fields: Vec::new(),
            members: IndexMap::new(),
            nested_types: IndexMap::new(),
            cached_identifiers: OnceLock::new(),
        }
    }

    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, DeclarationKind::Interface)
    }

    pub fn member(&self, identifier: &str) -> Option<&Arc<Member>> {
        self.members.get(identifier)
    }
}

/// Build the qualified identifier of `identifier` declared inside `container`.
///
/// Walks the container chain outward; each declared container contributes its
/// own (cached) qualified identifier, an account container its fixed name.
pub fn qualified_identifier(
    db: &DeclarationTable,
    identifier: &str,
    container: Option<Container>,
) -> String {
    match container {
        None => identifier.to_string(),
        Some(Container::Declared(outer)) => {
            format!("{}.{identifier}", db.qualified_identifier(outer))
        }
        Some(Container::Account(account)) => format!("{}.{identifier}", account.name()),
    }
}

// =============================================================================
// DeclarationTable
// =============================================================================

/// Owner of all composite and interface declarations of a checking pass.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    declarations: Vec<DeclaredType>,
    by_type_id: FxHashMap<TypeId, DefId>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration and return its handle.
    ///
    /// A declared container must already be registered; the new declaration
    /// is added to the container's nested types.
    pub fn register(&mut self, info: DeclarationInfo) -> Result<DefId, TypeError> {
        if let Some(Container::Declared(outer)) = info.container
            && self.get(outer).is_none()
        {
            return Err(TypeError::UnknownContainer {
                identifier: info.identifier,
            });
        }
        if info.kind == DeclarationKind::Composite {
            for conformance in &info.conformances {
                if !self.get(*conformance).is_some_and(DeclaredType::is_interface) {
                    return Err(TypeError::InvalidConformance {
                        identifier: info.identifier,
                        conformance: self.qualified_identifier(*conformance).to_string(),
                    });
                }
            }
        }

        let declared = DeclaredType::from_info(info);
        let type_id = self.identifiers(&declared).type_id.clone();
        let nested_clash = match declared.container {
            Some(Container::Declared(outer)) => self
                .get(outer)
                .is_some_and(|container| container.nested_types.contains_key(&declared.identifier)),
            _ => false,
        };
        if nested_clash || self.by_type_id.contains_key(&type_id) {
            return Err(TypeError::DuplicateDeclaration {
                type_id: type_id.to_string(),
            });
        }

        let id = DefId(self.declarations.len() as u32 + DefId::FIRST_VALID);
        trace!(
            def_id = id.0,
            type_id = %type_id,
            kind = ?declared.kind,
            composite_kind = ?declared.composite_kind,
            "DeclarationTable::register"
        );

        if let Some(Container::Declared(outer)) = declared.container
            && let Some(container) = self.get_mut(outer)
        {
            container
                .nested_types
                .insert(declared.identifier.clone(), id);
        }
        self.by_type_id.insert(type_id, id);
        self.declarations.push(declared);
        Ok(id)
    }

    /// Declare a field member; the field is also appended to the ordered field list.
    pub fn declare_field(
        &mut self,
        def: DefId,
        access: Access,
        variable_kind: VariableKind,
        identifier: &str,
        annotation: TypeAnnotation,
    ) -> Result<Arc<Member>, TypeError> {
        let member = Member::new(
            def,
            access,
            identifier,
            annotation,
            MemberKind::Field(variable_kind),
        );
        self.insert_member(def, member)
    }

    pub fn declare_function(
        &mut self,
        def: DefId,
        access: Access,
        identifier: &str,
        function: FunctionType,
    ) -> Result<Arc<Member>, TypeError> {
        let member = Member::new(
            def,
            access,
            identifier,
            TypeAnnotation::new(Type::function(function)),
            MemberKind::Function,
        );
        self.insert_member(def, member)
    }

    /// Add a prepared member to a declaration.
    pub fn insert_member(&mut self, def: DefId, member: Member) -> Result<Arc<Member>, TypeError> {
        let qualified = format!("{}.{}", self.qualified_identifier(def), member.identifier);
        let Some(declared) = self.get_mut(def) else {
            return Err(TypeError::UnknownContainer {
                identifier: member.identifier,
            });
        };
        if declared.members.contains_key(&member.identifier) {
            return Err(TypeError::DuplicateDeclaration { type_id: qualified });
        }
        if member.is_field() {
            declared.fields.push(member.identifier.clone());
        }
        let member = Arc::new(member);
        declared
            .members
            .insert(member.identifier.clone(), Arc::clone(&member));
        trace!(member = %qualified, "DeclarationTable::insert_member");
        Ok(member)
    }

    pub fn get(&self, id: DefId) -> Option<&DeclaredType> {
        id.index().and_then(|index| self.declarations.get(index))
    }

    fn get_mut(&mut self, id: DefId) -> Option<&mut DeclaredType> {
        id.index().and_then(|index| self.declarations.get_mut(index))
    }

    /// Find a declaration by its `TypeId`.
    pub fn lookup(&self, type_id: &TypeId) -> Option<DefId> {
        self.by_type_id.get(type_id).copied()
    }

    pub fn nested_type(&self, id: DefId, identifier: &str) -> Option<DefId> {
        self.get(id)
            .and_then(|declared| declared.nested_types.get(identifier).copied())
    }

    /// The `Type` a handle denotes.
    pub fn type_of(&self, id: DefId) -> Option<Type> {
        self.get(id).map(|declared| match declared.kind {
            DeclarationKind::Composite => Type::Composite(id),
            DeclarationKind::Interface => Type::Interface(id),
        })
    }

    fn identifiers<'a>(&'a self, declared: &'a DeclaredType) -> &'a CachedIdentifiers {
        declared.cached_identifiers.get_or_init(|| {
            let qualified_identifier =
                qualified_identifier(self, &declared.identifier, declared.container);
            let type_id = match &declared.location {
                Some(location) => TypeId::new(location.type_id(&qualified_identifier)),
                None => TypeId::new(qualified_identifier.clone()),
            };
            trace!(type_id = %type_id, "DeclarationTable::identifiers - computed");
            CachedIdentifiers {
                qualified_identifier,
                type_id,
            }
        })
    }

    pub fn qualified_identifier(&self, id: DefId) -> &str {
        match self.get(id) {
            Some(declared) => &self.identifiers(declared).qualified_identifier,
            None => UNKNOWN_IDENTIFIER,
        }
    }

    pub fn type_id_of(&self, id: DefId) -> TypeId {
        match self.get(id) {
            Some(declared) => self.identifiers(declared).type_id.clone(),
            None => TypeId::from(UNKNOWN_IDENTIFIER),
        }
    }

    pub fn identifier(&self, id: DefId) -> &str {
        self.get(id)
            .map_or(UNKNOWN_IDENTIFIER, |declared| declared.identifier.as_str())
    }

    /// Drop the memoized identifiers of one declaration.
    pub fn invalidate_identifiers(&mut self, id: DefId) {
        if let Some(declared) = self.get_mut(id) {
            declared.cached_identifiers.take();
        }
    }

    pub fn invalidate_all_identifiers(&mut self) {
        for declared in &mut self.declarations {
            declared.cached_identifiers.take();
        }
    }

    /// Whether the composite `composite` declares conformance to `interface`.
    pub fn conforms_to(&self, composite: DefId, interface: DefId) -> bool {
        self.get(composite)
            .is_some_and(|declared| declared.conformances.contains(&interface))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefId, &DeclaredType)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, declared)| (DefId(index as u32 + DefId::FIRST_VALID), declared))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
