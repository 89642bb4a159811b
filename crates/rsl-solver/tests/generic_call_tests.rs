use super::*;
use crate::types::NumericType;
use rsl_common::Position;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn at(line: u32) -> Range {
    Range::new(Position::new(0, line, 0), Position::new(4, line, 4))
}

fn call_range() -> Range {
    at(1)
}

fn type_parameter(name: &str, bound: Option<Type>) -> TypeParameter {
    TypeParameter::new(name, bound)
}

/// `fun save<T: AnyStruct>(_ value: T): T`
fn save() -> FunctionType {
    let t = type_parameter("T", Some(Type::AnyStruct));
    FunctionType::new(
        vec![Parameter::named(
            Some("_"),
            "value",
            TypeAnnotation::new(Type::generic(t.clone())),
        )],
        TypeAnnotation::new(Type::generic(t.clone())),
    )
    .with_type_parameters(vec![t])
}

/// `fun pair<K: Integer, V>(key: K, values: [V]): {K: V}`
fn pair() -> FunctionType {
    let k = type_parameter("K", Some(Type::Numeric(NumericType::Integer)));
    let v = type_parameter("V", None);
    FunctionType::new(
        vec![
            Parameter::named(None, "key", TypeAnnotation::new(Type::generic(k.clone()))),
            Parameter::named(
                None,
                "values",
                TypeAnnotation::new(Type::variable_sized(Type::generic(v.clone()))),
            ),
        ],
        TypeAnnotation::new(Type::dictionary(
            Type::generic(k.clone()),
            Type::generic(v.clone()),
        )),
    )
    .with_type_parameters(vec![k, v])
}

fn arg(ty: Type, line: u32) -> InvocationArgument {
    InvocationArgument::new(ty, at(line))
}

#[test]
fn test_explicit_type_argument_accepts_matching_value() {
    init_tracing();
    let db = DeclarationTable::new();
    let check = check_generic_invocation(
        &db,
        &save(),
        &[arg(Type::INT, 2)],
        &[arg(Type::INT, 3)],
        call_range(),
    );

    assert!(check.is_ok(), "{:?}", check.diagnostics);
    assert_eq!(check.type_arguments["T"], Type::INT);
    assert_eq!(check.parameter_types, vec![Type::INT]);
    assert_eq!(check.return_type, Type::INT);
}

#[test]
fn test_explicit_type_argument_rejects_mismatched_value() {
    init_tracing();
    let db = DeclarationTable::new();
    let check = check_generic_invocation(
        &db,
        &save(),
        &[arg(Type::INT, 2)],
        &[arg(Type::String, 3)],
        call_range(),
    );

    assert_eq!(
        check.diagnostics,
        vec![
            TypeError::TypeParameterTypeMismatch {
                expected: "Int".to_string(),
                actual: "String".to_string(),
                range: at(3),
            },
            TypeError::TypeMismatch {
                expected: "Int".to_string(),
                actual: "String".to_string(),
                range: at(3),
            },
        ]
    );
    assert_eq!(check.type_arguments["T"], Type::INT);
}

#[test]
fn test_type_arguments_are_inferred_from_values() {
    init_tracing();
    let db = DeclarationTable::new();
    let check = check_generic_invocation(
        &db,
        &pair(),
        &[],
        &[arg(Type::UINT8, 2), arg(Type::variable_sized(Type::String), 3)],
        call_range(),
    );

    assert!(check.is_ok(), "{:?}", check.diagnostics);
    let bound: Vec<(&str, &Type)> = check
        .type_arguments
        .iter()
        .map(|(name, ty)| (name.as_str(), ty))
        .collect();
    assert_eq!(bound, vec![("K", &Type::UINT8), ("V", &Type::String)]);
    assert_eq!(check.return_type, Type::dictionary(Type::UINT8, Type::String));
}

#[test]
fn test_later_arguments_must_match_earlier_binding() {
    init_tracing();
    let db = DeclarationTable::new();
    let t = type_parameter("T", None);
    let both = FunctionType::new(
        vec![
            Parameter::new(TypeAnnotation::new(Type::generic(t.clone()))),
            Parameter::new(TypeAnnotation::new(Type::generic(t.clone()))),
        ],
        TypeAnnotation::new(Type::Void),
    )
    .with_type_parameters(vec![t]);

    let check = check_generic_invocation(
        &db,
        &both,
        &[],
        &[arg(Type::INT8, 2), arg(Type::Bool, 3)],
        call_range(),
    );
    assert_eq!(check.diagnostics.len(), 2);
    assert!(matches!(
        check.diagnostics[0],
        TypeError::TypeParameterTypeMismatch { range, .. } if range == at(3)
    ));
    assert!(matches!(check.diagnostics[1], TypeError::TypeMismatch { .. }));

    let widened = check_generic_invocation(
        &db,
        &both,
        &[arg(Type::Numeric(NumericType::SignedInteger), 1)],
        &[arg(Type::INT8, 2), arg(Type::INT16, 3)],
        call_range(),
    );
    assert!(widened.is_ok(), "{:?}", widened.diagnostics);
}

#[test]
fn test_too_many_type_arguments() {
    let db = DeclarationTable::new();
    let check = check_generic_invocation(
        &db,
        &save(),
        &[arg(Type::INT, 2), arg(Type::String, 4)],
        &[arg(Type::INT, 5)],
        call_range(),
    );
    assert_eq!(
        check.diagnostics,
        vec![TypeError::InvalidTypeArgumentCount {
            expected: 1,
            actual: 2,
            range: at(4),
        }]
    );
}

#[test]
fn test_argument_count_mismatch() {
    let db = DeclarationTable::new();
    let check = check_generic_invocation(&db, &pair(), &[], &[arg(Type::UINT8, 2)], call_range());

    assert_eq!(
        check.diagnostics,
        vec![
            TypeError::ArgumentCount {
                expected: 2,
                actual: 1,
                range: call_range(),
            },
            TypeError::TypeParameterTypeInference {
                name: "V".to_string(),
                range: call_range(),
            },
        ]
    );
}

#[test]
fn test_uninferable_parameter_falls_back_to_bound() {
    let db = DeclarationTable::new();
    let bounded = type_parameter("T", Some(Type::Numeric(NumericType::Integer)));
    let open = type_parameter("U", None);
    let make = FunctionType::new(
        Vec::new(),
        TypeAnnotation::new(Type::optional(Type::generic(bounded.clone()))),
    )
    .with_type_parameters(vec![bounded, open]);

    let check = check_generic_invocation(&db, &make, &[], &[], call_range());
    assert_eq!(check.diagnostics.len(), 2);
    assert!(
        check
            .diagnostics
            .iter()
            .all(|error| matches!(error, TypeError::TypeParameterTypeInference { .. }))
    );
    assert_eq!(check.type_arguments["T"], Type::Numeric(NumericType::Integer));
    assert_eq!(check.type_arguments["U"], Type::AnyStruct);
    assert_eq!(
        check.return_type,
        Type::optional(Type::Numeric(NumericType::Integer))
    );
}

#[test]
fn test_bound_violations() {
    let db = DeclarationTable::new();

    let explicit = check_generic_invocation(
        &db,
        &pair(),
        &[arg(Type::String, 2)],
        &[arg(Type::String, 3), arg(Type::variable_sized(Type::Bool), 4)],
        call_range(),
    );
    assert_eq!(
        explicit.diagnostics,
        vec![TypeError::TypeMismatch {
            expected: "Integer".to_string(),
            actual: "String".to_string(),
            range: at(2),
        }]
    );

    let inferred = check_generic_invocation(
        &db,
        &pair(),
        &[],
        &[arg(Type::Bool, 3), arg(Type::variable_sized(Type::Bool), 4)],
        call_range(),
    );
    assert_eq!(
        inferred.diagnostics,
        vec![TypeError::TypeMismatch {
            expected: "Integer".to_string(),
            actual: "Bool".to_string(),
            range: at(3),
        }]
    );
}

#[test]
fn test_non_generic_arguments_are_checked() {
    let db = DeclarationTable::new();
    let takes_int = FunctionType::new(
        vec![Parameter::new(TypeAnnotation::new(Type::INT))],
        TypeAnnotation::new(Type::Void),
    );
    let check = check_generic_invocation(&db, &takes_int, &[], &[arg(Type::Bool, 2)], call_range());
    assert_eq!(
        check.diagnostics,
        vec![TypeError::TypeMismatch {
            expected: "Int".to_string(),
            actual: "Bool".to_string(),
            range: at(2),
        }]
    );
}

#[test]
fn test_substitute() {
    let t = type_parameter("T", None);
    let u = type_parameter("U", None);
    let mut bindings = IndexMap::new();
    bindings.insert("T".to_string(), Type::String);

    let nested = Type::dictionary(
        Type::generic(t.clone()),
        Type::optional(Type::variable_sized(Type::generic(u.clone()))),
    );
    assert_eq!(
        substitute(&nested, &bindings),
        Type::dictionary(
            Type::String,
            Type::optional(Type::variable_sized(Type::generic(u)))
        )
    );

    let callback = Type::function(FunctionType::new(
        vec![Parameter::new(TypeAnnotation::resource(Type::generic(t)))],
        TypeAnnotation::new(Type::Void),
    ));
    assert_eq!(
        substitute(&callback, &bindings),
        Type::function(FunctionType::new(
            vec![Parameter::new(TypeAnnotation::resource(Type::String))],
            TypeAnnotation::new(Type::Void),
        ))
    );
    assert_eq!(substitute(&Type::INT, &bindings), Type::INT);
}
