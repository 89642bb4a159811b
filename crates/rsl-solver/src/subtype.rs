//! The subtype relation.
//!
//! Types are finite trees (nominal types are handles, never expanded), so
//! the relation is decided by plain structural recursion without cycle
//! detection.

use crate::def::{DeclarationTable, DefId};
use crate::resource::is_resource_type;
use crate::restricted::RestrictedType;
use crate::types::{FunctionType, Type};

/// Whether a value of type `sub` may be used where `sup` is expected.
pub fn is_subtype(db: &DeclarationTable, sub: &Type, sup: &Type) -> bool {
    if sub == sup || sub.is_never() {
        return true;
    }

    match (sub, sup) {
        (_, Type::AnyStruct) => !is_resource_type(db, sub),
        (_, Type::AnyResource) => is_resource_type(db, sub),

        (Type::Numeric(sub), Type::Numeric(sup)) => sup.is_super_type_of(*sub),

        (Type::Optional(sub), Type::Optional(sup)) => is_subtype(db, sub, sup),
        (_, Type::Optional(sup)) => is_subtype(db, sub, sup),

        (Type::VariableSized(sub), Type::VariableSized(sup)) => is_subtype(db, sub, sup),
        (Type::ConstantSized(sub), Type::ConstantSized(sup)) => {
            sub.size == sup.size && is_subtype(db, &sub.element, &sup.element)
        }
        (Type::Dictionary(sub), Type::Dictionary(sup)) => {
            is_subtype(db, &sub.key, &sup.key) && is_subtype(db, &sub.value, &sup.value)
        }

        (Type::Function(sub), Type::Function(sup)) => is_function_subtype(db, sub, sup),

        (Type::Composite(composite), Type::Interface(interface)) => {
            db.conforms_to(*composite, *interface)
        }

        (Type::Restricted(sub), Type::Restricted(sup)) => is_restricted_subtype(db, sub, sup),
        (Type::Restricted(sub), Type::Composite(_)) => sub.base() == sup,
        (Type::Restricted(sub), Type::Interface(interface)) => {
            sub.restrictions().contains(interface)
                || matches!(sub.base(), Type::Composite(base) if db.conforms_to(*base, *interface))
        }
        (Type::Composite(composite), Type::Restricted(sup)) => {
            composite_satisfies(db, *composite, sup)
        }

        (Type::Reference(sub), Type::Reference(sup)) => {
            (sub.authorized || !sup.authorized) && is_subtype(db, &sub.referenced, &sup.referenced)
        }

        (Type::Generic(parameter), _) => parameter
            .bound
            .as_ref()
            .is_some_and(|bound| is_subtype(db, bound, sup)),

        _ => false,
    }
}

fn is_function_subtype(db: &DeclarationTable, sub: &FunctionType, sup: &FunctionType) -> bool {
    // Generic signatures only relate to themselves.
    if sub.is_generic() || sup.is_generic() {
        return false;
    }
    sub.parameters.len() == sup.parameters.len()
        && sub
            .parameters
            .iter()
            .zip(&sup.parameters)
            .all(|(sub, sup)| is_subtype(db, &sup.annotation.ty, &sub.annotation.ty))
        && is_subtype(
            db,
            &sub.return_annotation.ty,
            &sup.return_annotation.ty,
        )
}

/// `R{Is} <: R{Js}` when `Js ⊆ Is`; a composite base may also satisfy
/// a restriction through its own conformances.
fn is_restricted_subtype(db: &DeclarationTable, sub: &RestrictedType, sup: &RestrictedType) -> bool {
    match (sub.base(), sup.base()) {
        (Type::Composite(sub_base), Type::Composite(sup_base)) if sub_base == sup_base => sup
            .restrictions()
            .iter()
            .all(|restriction| sub.restrictions().contains(restriction)),
        (Type::Composite(sub_base), Type::AnyResource | Type::AnyStruct) => {
            is_subtype(db, sub.base(), sup.base())
                && sup.restrictions().iter().all(|restriction| {
                    sub.restrictions().contains(restriction)
                        || db.conforms_to(*sub_base, *restriction)
                })
        }
        (Type::AnyResource, Type::AnyResource) | (Type::AnyStruct, Type::AnyStruct) => sup
            .restrictions()
            .iter()
            .all(|restriction| sub.restrictions().contains(restriction)),
        _ => false,
    }
}

/// `R <: R{Js}` and `R <: AnyResource{Js}` when `R` conforms to every `J`.
fn composite_satisfies(db: &DeclarationTable, composite: DefId, sup: &RestrictedType) -> bool {
    let base_matches = match sup.base() {
        Type::Composite(base) => *base == composite,
        top @ (Type::AnyResource | Type::AnyStruct) => {
            is_subtype(db, &Type::Composite(composite), top)
        }
        _ => false,
    };
    base_matches
        && sup
            .restrictions()
            .iter()
            .all(|restriction| db.conforms_to(composite, *restriction))
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
