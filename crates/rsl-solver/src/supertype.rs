//! Least common supertype of a set of types.
//!
//! Used to infer the type of array and dictionary literals and of
//! conditional expressions. The computation is total: inputs with no useful
//! common supertype fall back to the matching top type, and resources never
//! share a non-bottom supertype with non-resources (the result is `Never`).
//!
//! Strategy, in order:
//!
//! 1. `Never` inputs are absorbed (nothing left: `Never`)
//! 2. structurally identical inputs: that type
//! 3. all numeric: narrowest numeric ancestor, via the tag join
//! 4. any optional: unwrap one level, recurse, re-wrap
//! 5. all variable-sized arrays, or constant-sized arrays of one size: recurse on elements
//! 6. all dictionaries: recurse on keys and on values
//! 7. top type by resource-ness, `Never` when mixed
//!
//! A `Never` produced by a recursive step from inhabited inner types means
//! they mixed resources and non-resources; it propagates instead of being
//! re-wrapped.

use crate::def::DeclarationTable;
use crate::resource::is_resource_type;
use crate::type_tag::{TypeTag, TypeTagRegistry, join_tags};
use crate::types::Type;
use tracing::trace;

/// The most specific type every element of `types` is a subtype of.
///
/// Dictionaries join keys and values independently, so `{String: String}`
/// and `{String: Bool}` join to `{String: AnyStruct}` rather than `AnyStruct`.
pub fn common_super_type(db: &DeclarationTable, types: &[Type]) -> Type {
    let candidates: Vec<Type> = types.iter().filter(|ty| !ty.is_never()).cloned().collect();

    let Some(first) = candidates.first() else {
        trace!(inputs = types.len(), "common_super_type: no inhabited input");
        return Type::Never;
    };
    if candidates.iter().all(|ty| ty == first) {
        return first.clone();
    }

    let joined = join_tags(&candidates);
    trace!(
        inputs = candidates.len(),
        joined = ?joined,
        "common_super_type"
    );

    if joined.is_numeric()
        && let Some(numeric) = TypeTagRegistry::builtin().numeric_super_type(joined)
    {
        trace!(result = numeric.name(), "common_super_type: numeric ancestor");
        return Type::Numeric(numeric);
    }

    if joined.contains(TypeTag::OPTIONAL) {
        let unwrapped: Vec<Type> = candidates
            .iter()
            .map(|ty| match ty {
                Type::Optional(inner) => inner.as_ref().clone(),
                other => other.clone(),
            })
            .collect();
        return rewrap(db, &unwrapped, Type::optional);
    }

    if joined == TypeTag::VARIABLE_SIZED {
        let elements: Vec<Type> = candidates
            .iter()
            .filter_map(|ty| match ty {
                Type::VariableSized(element) => Some(element.as_ref().clone()),
                _ => None,
            })
            .collect();
        return rewrap(db, &elements, Type::variable_sized);
    }

    if joined == TypeTag::CONSTANT_SIZED
        && let Some(size) = common_constant_size(&candidates)
    {
        let elements: Vec<Type> = candidates
            .iter()
            .filter_map(|ty| match ty {
                Type::ConstantSized(array) => Some(array.element.clone()),
                _ => None,
            })
            .collect();
        return rewrap(db, &elements, |element| Type::constant_sized(element, size));
    }

    if joined == TypeTag::DICTIONARY {
        let (keys, values): (Vec<Type>, Vec<Type>) = candidates
            .iter()
            .filter_map(|ty| match ty {
                Type::Dictionary(dictionary) => {
                    Some((dictionary.key.clone(), dictionary.value.clone()))
                }
                _ => None,
            })
            .unzip();
        let key = common_super_type(db, &keys);
        let value = common_super_type(db, &values);
        if is_mismatch(&keys, &key) || is_mismatch(&values, &value) {
            trace!("common_super_type: dictionary key or value mismatch");
            return Type::Never;
        }
        return Type::dictionary(key, value);
    }

    top_type(db, &candidates)
}

/// `Never` computed from inputs that were not all `Never` themselves.
fn is_mismatch(inputs: &[Type], result: &Type) -> bool {
    result.is_never() && !inputs.iter().all(Type::is_never)
}

fn rewrap(db: &DeclarationTable, inner: &[Type], wrap: impl FnOnce(Type) -> Type) -> Type {
    let result = common_super_type(db, inner);
    if is_mismatch(inner, &result) {
        return Type::Never;
    }
    wrap(result)
}

fn common_constant_size(types: &[Type]) -> Option<u64> {
    let mut sizes = types.iter().map(|ty| match ty {
        Type::ConstantSized(array) => Some(array.size),
        _ => None,
    });
    let size = sizes.next()??;
    sizes.all(|other| other == Some(size)).then_some(size)
}

fn top_type(db: &DeclarationTable, types: &[Type]) -> Type {
    let resources = types.iter().filter(|ty| is_resource_type(db, ty)).count();
    let result = if resources == 0 {
        Type::AnyStruct
    } else if resources == types.len() {
        Type::AnyResource
    } else {
        Type::Never
    };
    trace!(
        resources,
        inputs = types.len(),
        result = ?result,
        "common_super_type: top type"
    );
    result
}

#[cfg(test)]
#[path = "../tests/supertype_tests.rs"]
mod tests;
