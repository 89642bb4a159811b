//! Resource-ness of types and the declaration checks built on it.
//!
//! A type is a resource type when a resource can be reached through it
//! without going through a reference or a function boundary: the value
//! itself is a resource composite, or it *contains* one (optional payload,
//! array element, dictionary key or value). Restricted types inherit the
//! resource-ness of their base.

use crate::def::{DeclarationTable, DefId};
use crate::diagnostics::TypeError;
use crate::format::TypeFormatter;
use crate::types::{CompositeKind, Type, TypeAnnotation};
use rsl_common::Range;
use tracing::trace;

/// Whether values of `ty` are linear.
pub fn is_resource_type(db: &DeclarationTable, ty: &Type) -> bool {
    match ty {
        Type::AnyResource => true,
        Type::Composite(id) | Type::Interface(id) => db
            .get(*id)
            .is_some_and(|declared| declared.composite_kind == CompositeKind::Resource),
        Type::Optional(inner) | Type::VariableSized(inner) => is_resource_type(db, inner),
        Type::ConstantSized(array) => is_resource_type(db, &array.element),
        Type::Dictionary(dictionary) => {
            is_resource_type(db, &dictionary.key) || is_resource_type(db, &dictionary.value)
        }
        Type::Restricted(restricted) => is_resource_type(db, restricted.base()),
        Type::Generic(parameter) => parameter
            .bound
            .as_ref()
            .is_some_and(|bound| is_resource_type(db, bound)),
        // References and functions are copyable even when they mention resources.
        Type::Reference(_) | Type::Function(_) => false,
        Type::Numeric(_)
        | Type::String
        | Type::Character
        | Type::Address
        | Type::Bool
        | Type::Void
        | Type::Never
        | Type::AnyStruct => false,
    }
}

/// Check that the `@` marker is present exactly when the annotated type is a resource.
pub fn check_resource_annotation(
    db: &DeclarationTable,
    annotation: &TypeAnnotation,
    range: Range,
) -> Result<(), TypeError> {
    let is_resource = is_resource_type(db, &annotation.ty);
    if is_resource == annotation.is_resource {
        return Ok(());
    }
    let ty = TypeFormatter::new(db).qualified_string(&annotation.ty);
    if is_resource {
        Err(TypeError::MissingResourceAnnotation { ty, range })
    } else {
        Err(TypeError::InvalidResourceAnnotation { ty, range })
    }
}

/// Report every field of `def` holding a resource while `def` itself cannot own one.
///
/// Resource and contract declarations may own resources; structures, events
/// and enums (and interfaces restricting to them) may not.
pub fn check_resource_fields(db: &DeclarationTable, def: DefId) -> Vec<TypeError> {
    let Some(declared) = db.get(def) else {
        return Vec::new();
    };
    if matches!(
        declared.composite_kind,
        CompositeKind::Resource | CompositeKind::Contract
    ) {
        return Vec::new();
    }

    let formatter = TypeFormatter::new(db);
    let errors: Vec<TypeError> = declared
        .fields
        .iter()
        .filter_map(|field| declared.member(field))
        .filter(|member| is_resource_type(db, &member.annotation.ty))
        .map(|member| TypeError::InvalidResourceField {
            container: db.qualified_identifier(def).to_string(),
            field: member.identifier.clone(),
            ty: formatter.qualified_string(&member.annotation.ty),
        })
        .collect();
    trace!(
        def_id = def.0,
        invalid_fields = errors.len(),
        "check_resource_fields"
    );
    errors
}

#[cfg(test)]
#[path = "../tests/resource_tests.rs"]
mod tests;
