use super::*;
use crate::def::DeclarationInfo;
use crate::types::{CompositeKind, NumericType, Parameter, TypeAnnotation, TypeParameter};

struct Fixture {
    db: DeclarationTable,
    vault: DefId,
    receiver: DefId,
    provider: DefId,
    point: DefId,
}

fn fixture() -> Fixture {
    let mut db = DeclarationTable::new();
    let receiver = db
        .register(DeclarationInfo::interface(
            CompositeKind::Resource,
            "Receiver",
            None,
        ))
        .expect("registers");
    let provider = db
        .register(DeclarationInfo::interface(
            CompositeKind::Resource,
            "Provider",
            None,
        ))
        .expect("registers");
    let vault = db
        .register(
            DeclarationInfo::composite(CompositeKind::Resource, "Vault", None)
                .with_conformances(vec![receiver, provider]),
        )
        .expect("registers");
    let point = db
        .register(DeclarationInfo::composite(
            CompositeKind::Structure,
            "Point",
            None,
        ))
        .expect("registers");
    Fixture {
        db,
        vault,
        receiver,
        provider,
        point,
    }
}

fn function(parameter: Type, result: Type) -> Type {
    Type::function(FunctionType::new(
        vec![Parameter::new(TypeAnnotation::new(parameter))],
        TypeAnnotation::new(result),
    ))
}

#[test]
fn test_reflexive_and_bottom() {
    let f = fixture();
    for ty in [
        Type::INT,
        Type::String,
        Type::Composite(f.vault),
        Type::variable_sized(Type::Composite(f.point)),
    ] {
        assert!(is_subtype(&f.db, &ty, &ty));
        assert!(is_subtype(&f.db, &Type::Never, &ty));
    }
}

#[test]
fn test_top_types_split_by_resource_kind() {
    let f = fixture();
    let vault = Type::Composite(f.vault);
    let point = Type::Composite(f.point);

    assert!(is_subtype(&f.db, &point, &Type::AnyStruct));
    assert!(is_subtype(&f.db, &Type::INT, &Type::AnyStruct));
    assert!(!is_subtype(&f.db, &vault, &Type::AnyStruct));
    assert!(is_subtype(&f.db, &vault, &Type::AnyResource));
    assert!(is_subtype(&f.db, &Type::variable_sized(vault), &Type::AnyResource));
    assert!(!is_subtype(&f.db, &point, &Type::AnyResource));
    assert!(!is_subtype(&f.db, &Type::AnyStruct, &Type::AnyResource));
}

#[test]
fn test_numeric_subtyping() {
    let f = fixture();
    let integer = Type::Numeric(NumericType::Integer);
    assert!(is_subtype(&f.db, &Type::UINT8, &integer));
    assert!(is_subtype(&f.db, &Type::INT8, &Type::Numeric(NumericType::SignedNumber)));
    assert!(!is_subtype(&f.db, &integer, &Type::UINT8));
    assert!(!is_subtype(&f.db, &Type::INT8, &Type::INT16));
}

#[test]
fn test_optional_rules() {
    let f = fixture();
    assert!(is_subtype(&f.db, &Type::INT, &Type::optional(Type::INT)));
    assert!(is_subtype(&f.db, &Type::nil(), &Type::optional(Type::String)));
    assert!(is_subtype(
        &f.db,
        &Type::optional(Type::INT8),
        &Type::optional(Type::Numeric(NumericType::SignedInteger))
    ));
    assert!(!is_subtype(&f.db, &Type::optional(Type::INT), &Type::INT));
}

#[test]
fn test_container_covariance() {
    let f = fixture();
    let integer = Type::Numeric(NumericType::Integer);

    assert!(is_subtype(
        &f.db,
        &Type::variable_sized(Type::UINT8),
        &Type::variable_sized(integer.clone())
    ));
    assert!(is_subtype(
        &f.db,
        &Type::constant_sized(Type::UINT8, 2),
        &Type::constant_sized(integer.clone(), 2)
    ));
    assert!(!is_subtype(
        &f.db,
        &Type::constant_sized(Type::UINT8, 2),
        &Type::constant_sized(integer.clone(), 3)
    ));
    assert!(!is_subtype(
        &f.db,
        &Type::constant_sized(Type::UINT8, 2),
        &Type::variable_sized(Type::UINT8)
    ));
    assert!(is_subtype(
        &f.db,
        &Type::dictionary(Type::String, Type::UINT8),
        &Type::dictionary(Type::String, integer)
    ));
}

#[test]
fn test_function_variance() {
    let f = fixture();
    let integer = Type::Numeric(NumericType::Integer);

    // (Integer): UInt8 <: (UInt8): Integer
    assert!(is_subtype(
        &f.db,
        &function(integer.clone(), Type::UINT8),
        &function(Type::UINT8, integer.clone())
    ));
    assert!(!is_subtype(
        &f.db,
        &function(Type::UINT8, Type::UINT8),
        &function(integer, Type::UINT8)
    ));
}

#[test]
fn test_generic_functions_only_relate_to_themselves() {
    let f = fixture();
    let t = TypeParameter::new("T", None);
    let generic = Type::function(
        FunctionType::new(
            vec![Parameter::new(TypeAnnotation::new(Type::generic(t.clone())))],
            TypeAnnotation::new(Type::Void),
        )
        .with_type_parameters(vec![t]),
    );
    assert!(is_subtype(&f.db, &generic, &generic));
    assert!(!is_subtype(&f.db, &generic, &function(Type::INT, Type::Void)));
}

#[test]
fn test_composite_conformance() {
    let f = fixture();
    assert!(is_subtype(
        &f.db,
        &Type::Composite(f.vault),
        &Type::Interface(f.receiver)
    ));
    assert!(!is_subtype(
        &f.db,
        &Type::Interface(f.receiver),
        &Type::Composite(f.vault)
    ));
}

#[test]
fn test_restricted_rules() {
    let f = fixture();
    let vault = Type::Composite(f.vault);
    let both = Type::restricted(
        RestrictedType::new(&f.db, vault.clone(), [f.receiver, f.provider]).expect("valid"),
    );
    let receiver_only = Type::restricted(
        RestrictedType::new(&f.db, vault.clone(), [f.receiver]).expect("valid"),
    );
    let any_receiver = Type::restricted(
        RestrictedType::new(&f.db, Type::AnyResource, [f.receiver]).expect("valid"),
    );

    assert!(is_subtype(&f.db, &both, &vault));
    assert!(is_subtype(&f.db, &both, &receiver_only));
    assert!(!is_subtype(&f.db, &receiver_only, &both));
    assert!(is_subtype(&f.db, &both, &any_receiver));
    assert!(is_subtype(&f.db, &vault, &both));
    assert!(is_subtype(&f.db, &vault, &any_receiver));
    assert!(is_subtype(&f.db, &receiver_only, &Type::Interface(f.receiver)));
    assert!(is_subtype(&f.db, &receiver_only, &Type::Interface(f.provider)));
    assert!(is_subtype(&f.db, &any_receiver, &Type::Interface(f.receiver)));
    assert!(!is_subtype(&f.db, &any_receiver, &vault));
    assert!(is_subtype(&f.db, &both, &Type::AnyResource));
}

#[test]
fn test_reference_authorization() {
    let f = fixture();
    let vault = Type::Composite(f.vault);
    let receiver = Type::Interface(f.receiver);

    assert!(is_subtype(
        &f.db,
        &Type::reference(true, vault.clone()),
        &Type::reference(false, vault.clone())
    ));
    assert!(is_subtype(
        &f.db,
        &Type::reference(false, vault.clone()),
        &Type::reference(false, receiver)
    ));
    assert!(!is_subtype(
        &f.db,
        &Type::reference(false, vault.clone()),
        &Type::reference(true, vault)
    ));
}

#[test]
fn test_generic_parameter_uses_its_bound() {
    let f = fixture();
    let t = Type::generic(TypeParameter::new("T", Some(Type::UINT8)));
    assert!(is_subtype(&f.db, &t, &Type::Numeric(NumericType::Integer)));
    assert!(!is_subtype(&f.db, &t, &Type::String));
}
