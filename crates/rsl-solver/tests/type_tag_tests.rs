use super::*;

#[test]
fn test_builtin_registry_is_consistent() {
    let registry = TypeTagRegistry::builtin();
    for numeric in NumericType::ALL {
        assert_eq!(registry.name_of(numeric.tag()), Some(numeric.name()));
    }
    assert_eq!(registry.name_of(TypeTag::STRING), Some("String"));
}

#[test]
fn test_abstract_tags_contain_their_descendants() {
    assert!(NumericType::SignedInteger.is_super_type_of(NumericType::Int64));
    assert!(NumericType::Integer.is_super_type_of(NumericType::Word8));
    assert!(NumericType::Integer.is_super_type_of(NumericType::SignedInteger));
    assert!(NumericType::FixedPoint.is_super_type_of(NumericType::Fix64));
    assert!(NumericType::SignedNumber.is_super_type_of(NumericType::Fix64));
    assert!(NumericType::Number.is_super_type_of(NumericType::UFix64));
    assert!(!NumericType::SignedNumber.is_super_type_of(NumericType::UInt8));
    assert!(!NumericType::Int8.is_super_type_of(NumericType::Int16));
}

#[test]
fn test_abstract_tag_differs_from_join_of_children() {
    assert_ne!(TypeTag::SIGNED_FIXED_POINT, TypeTag::FIX64);
    let registry = TypeTagRegistry::builtin();
    assert_eq!(
        registry.name_of(TypeTag::SIGNED_FIXED_POINT),
        Some("SignedFixedPoint")
    );
    assert_eq!(registry.name_of(TypeTag::FIX64), Some("Fix64"));
}

#[test]
fn test_numeric_super_type_picks_narrowest() {
    let registry = TypeTagRegistry::builtin();
    assert_eq!(
        registry.numeric_super_type(TypeTag::UINT8),
        Some(NumericType::UInt8)
    );
    assert_eq!(
        registry.numeric_super_type(TypeTag::INT8 | TypeTag::INT16),
        Some(NumericType::SignedInteger)
    );
    assert_eq!(
        registry.numeric_super_type(TypeTag::INT8 | TypeTag::UINT8),
        Some(NumericType::Integer)
    );
    assert_eq!(
        registry.numeric_super_type(TypeTag::INT8 | TypeTag::FIX64),
        Some(NumericType::SignedNumber)
    );
    assert_eq!(
        registry.numeric_super_type(TypeTag::UINT8 | TypeTag::UFIX64),
        Some(NumericType::Number)
    );
    assert_eq!(registry.numeric_super_type(TypeTag::STRING), None);
}

#[test]
fn test_join_tags() {
    let joined = join_tags(&[Type::INT8, Type::String]);
    assert!(joined.contains(TypeTag::INT8));
    assert!(joined.contains(TypeTag::STRING));
    assert!(!joined.is_numeric());
    assert!(join_tags(&[Type::INT8, Type::INT16]).is_numeric());
    assert!(!TypeTag::empty().is_numeric());
}

#[test]
#[should_panic(expected = "duplicate type tag")]
fn test_duplicate_tag_panics() {
    let mut registry = TypeTagRegistry::new();
    registry.register("Fix64", TypeTag::FIX64);
    registry.register("AlsoFix64", TypeTag::FIX64);
}
