//! Restricted types and the member views they expose.
//!
//! A restricted type `R{I1, I2}` is a value of base type `R` that is only
//! statically known through the interfaces `I1` and `I2`. Its visible members
//! are the union of the restriction interfaces' members; the base
//! composite's own members are never part of that set, even when there are
//! no restrictions at all (`R{}` has no members).
//!
//! ## Name collisions
//!
//! When two restrictions declare a member with the same name, the restriction
//! listed first provides it. `MemberConflictPolicy::Report` turns a collision
//! between differently typed declarations into a construction error instead.
//!
//! ## Deferred resolution
//!
//! Member views hand out `MemberResolver`s rather than members. Resolving at
//! an access site either yields the member object stored on the declaring
//! interface (the same `Arc`, never a copy) or an error attributed to that
//! access site. A name that exists only on the base composite resolves to
//! `InvalidRestrictedTypeMemberAccess`: the member exists on the value but is
//! not statically visible.

use crate::def::{DeclarationTable, DefId, Member, MemberKind};
use crate::diagnostics::TypeError;
use crate::format::TypeFormatter;
use crate::options::{MemberConflictPolicy, SolverOptions};
use crate::types::{CompositeKind, Type};
use indexmap::IndexMap;
use rsl_common::Range;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// MemberResolver
// =============================================================================

type ResolveFn = dyn Fn(&str, Range) -> Result<Arc<Member>, TypeError> + Send + Sync;

/// A member entry whose resolution is deferred to the access site.
#[derive(Clone)]
pub struct MemberResolver {
    pub identifier: String,
    pub kind: MemberKind,
    resolve: Arc<ResolveFn>,
}

impl MemberResolver {
    /// Resolver that yields `member` itself.
    pub fn declared(member: &Arc<Member>) -> Self {
        let member = Arc::clone(member);
        Self {
            identifier: member.identifier.clone(),
            kind: member.kind,
            resolve: Arc::new(move |_, _| Ok(Arc::clone(&member))),
        }
    }

    fn inaccessible(member: &Member, restricted: String) -> Self {
        Self {
            identifier: member.identifier.clone(),
            kind: member.kind,
            resolve: Arc::new(move |identifier, range| {
                Err(TypeError::InvalidRestrictedTypeMemberAccess {
                    member: identifier.to_string(),
                    restricted: restricted.clone(),
                    range,
                })
            }),
        }
    }

    /// Resolve the member for an access at `range`.
    pub fn resolve(&self, range: Range) -> Result<Arc<Member>, TypeError> {
        (self.resolve)(&self.identifier, range)
    }
}

impl fmt::Debug for MemberResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberResolver")
            .field("identifier", &self.identifier)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// RestrictedType
// =============================================================================

/// `Base{I1, I2}`. Restrictions keep declaration order for display but
/// compare as a set.
#[derive(Clone, Debug)]
pub struct RestrictedType {
    base: Type,
    restrictions: SmallVec<[DefId; 2]>,
}

impl RestrictedType {
    /// Validate and build a restricted type with default options.
    pub fn new(
        db: &DeclarationTable,
        base: Type,
        restrictions: impl IntoIterator<Item = DefId>,
    ) -> Result<Self, TypeError> {
        Self::with_options(db, base, restrictions, &SolverOptions::default())
    }

    /// Validate and build a restricted type.
    ///
    /// Checks, in order: the base is a structure or resource (composite or
    /// top type); each restriction is an interface of the base's kind,
    /// listed once, and conformed to by a composite base; under
    /// `MemberConflictPolicy::Report`, no member name is declared
    /// differently by two restrictions. The first failure is returned.
    pub fn with_options(
        db: &DeclarationTable,
        base: Type,
        restrictions: impl IntoIterator<Item = DefId>,
        options: &SolverOptions,
    ) -> Result<Self, TypeError> {
        let formatter = TypeFormatter::new(db);
        let Some(base_kind) = restricted_base_kind(db, &base) else {
            return Err(TypeError::InvalidRestrictedTypeBase {
                base: formatter.qualified_string(&base),
                range: Range::default(),
            });
        };

        let mut validated: SmallVec<[DefId; 2]> = SmallVec::new();
        for restriction in restrictions {
            let name = db.qualified_identifier(restriction).to_string();
            let Some(interface) = db.get(restriction).filter(|declared| declared.is_interface())
            else {
                return Err(TypeError::InvalidRestrictionType {
                    ty: name,
                    range: Range::default(),
                });
            };
            if interface.composite_kind != base_kind {
                return Err(TypeError::RestrictionKindMismatch {
                    restriction: name,
                    expected: base_kind,
                    actual: interface.composite_kind,
                    range: Range::default(),
                });
            }
            if validated.contains(&restriction) {
                return Err(TypeError::DuplicateRestriction {
                    restriction: name,
                    range: Range::default(),
                });
            }
            if let Type::Composite(composite) = &base
                && !db.conforms_to(*composite, restriction)
            {
                return Err(TypeError::NonConformingRestriction {
                    base: formatter.qualified_string(&base),
                    restriction: name,
                    range: Range::default(),
                });
            }
            validated.push(restriction);
        }

        let restricted = Self {
            base,
            restrictions: validated,
        };
        if options.restriction_member_conflicts == MemberConflictPolicy::Report {
            restricted.check_member_conflicts(db)?;
        }
        trace!(
            restrictions = restricted.restrictions.len(),
            "RestrictedType::with_options"
        );
        Ok(restricted)
    }

    fn check_member_conflicts(&self, db: &DeclarationTable) -> Result<(), TypeError> {
        let mut seen: IndexMap<&str, (DefId, &Arc<Member>)> = IndexMap::new();
        for (restriction, member) in self.restriction_members(db) {
            match seen.get(member.identifier.as_str()) {
                Some((first, existing))
                    if existing.annotation != member.annotation || existing.kind != member.kind =>
                {
                    return Err(TypeError::AmbiguousRestrictionMember {
                        member: member.identifier.clone(),
                        first: db.qualified_identifier(*first).to_string(),
                        second: db.qualified_identifier(restriction).to_string(),
                        range: Range::default(),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(member.identifier.as_str(), (restriction, member));
                }
            }
        }
        Ok(())
    }

    pub const fn base(&self) -> &Type {
        &self.base
    }

    /// Restrictions in declaration order.
    pub fn restrictions(&self) -> &[DefId] {
        &self.restrictions
    }

    fn restriction_members<'a>(
        &'a self,
        db: &'a DeclarationTable,
    ) -> impl Iterator<Item = (DefId, &'a Arc<Member>)> + 'a {
        self.restrictions.iter().flat_map(move |&restriction| {
            db.get(restriction)
                .into_iter()
                .flat_map(|interface| interface.members.values())
                .map(move |member| (restriction, member))
        })
    }

    /// Visible members: the union of the restrictions' members, first restriction wins.
    pub fn members(&self, db: &DeclarationTable) -> IndexMap<String, MemberResolver> {
        let mut members: IndexMap<String, MemberResolver> = IndexMap::new();
        for (restriction, member) in self.restriction_members(db) {
            if members.contains_key(&member.identifier) {
                debug!(
                    member = %member.identifier,
                    shadowed_by = %db.qualified_identifier(restriction),
                    "restricted member already provided by an earlier restriction"
                );
                continue;
            }
            members.insert(member.identifier.clone(), MemberResolver::declared(member));
        }
        members
    }

    /// Look up a single member.
    ///
    /// A name only the base composite declares yields a resolver that
    /// reports `InvalidRestrictedTypeMemberAccess`; unknown names yield `None`.
    pub fn lookup_member(&self, db: &DeclarationTable, identifier: &str) -> Option<MemberResolver> {
        if let Some(resolver) = self.members(db).shift_remove(identifier) {
            return Some(resolver);
        }
        let Type::Composite(base) = &self.base else {
            return None;
        };
        let member = db.get(*base)?.member(identifier)?;
        let restricted = TypeFormatter::new(db).qualified_string(&Type::restricted(self.clone()));
        Some(MemberResolver::inaccessible(member, restricted))
    }
}

/// The composite kind a restricted type's base denotes, if it may be restricted.
fn restricted_base_kind(db: &DeclarationTable, base: &Type) -> Option<CompositeKind> {
    match base {
        Type::AnyResource => Some(CompositeKind::Resource),
        Type::AnyStruct => Some(CompositeKind::Structure),
        Type::Composite(id) => db
            .get(*id)
            .map(|declared| declared.composite_kind)
            .filter(|kind| matches!(kind, CompositeKind::Resource | CompositeKind::Structure)),
        _ => None,
    }
}

impl PartialEq for RestrictedType {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.restrictions.len() == other.restrictions.len()
            && self
                .restrictions
                .iter()
                .all(|restriction| other.restrictions.contains(restriction))
    }
}

impl Eq for RestrictedType {}

impl Hash for RestrictedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        let mut sorted = self.restrictions.clone();
        sorted.sort_unstable();
        sorted.hash(state);
    }
}

// =============================================================================
// Member Views
// =============================================================================

/// Members visible on a value of type `ty`.
///
/// Composites and interfaces expose their declared members, restricted types
/// their restriction members, references the members of the referenced type.
pub fn get_members(db: &DeclarationTable, ty: &Type) -> IndexMap<String, MemberResolver> {
    match ty {
        Type::Composite(id) | Type::Interface(id) => db
            .get(*id)
            .map(|declared| {
                declared
                    .members
                    .iter()
                    .map(|(name, member)| (name.clone(), MemberResolver::declared(member)))
                    .collect()
            })
            .unwrap_or_default(),
        Type::Restricted(restricted) => restricted.members(db),
        Type::Reference(reference) => get_members(db, &reference.referenced),
        _ => IndexMap::new(),
    }
}

/// Resolve `identifier` on a value of type `ty` accessed at `range`.
pub fn resolve_member(
    db: &DeclarationTable,
    ty: &Type,
    identifier: &str,
    range: Range,
) -> Result<Arc<Member>, TypeError> {
    let resolver = match ty {
        Type::Restricted(restricted) => restricted.lookup_member(db, identifier),
        Type::Reference(reference) => {
            return resolve_member(db, &reference.referenced, identifier, range);
        }
        _ => get_members(db, ty).shift_remove(identifier),
    };
    match resolver {
        Some(resolver) => resolver.resolve(range),
        None => Err(TypeError::NotDeclaredMember {
            member: identifier.to_string(),
            ty: TypeFormatter::new(db).qualified_string(ty),
            range,
        }),
    }
}

#[cfg(test)]
#[path = "../tests/restricted_tests.rs"]
mod tests;
