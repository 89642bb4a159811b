use super::*;
use rayon::prelude::*;

fn location() -> Option<Location> {
    Some(Location::String("a".to_string()))
}

fn resource(identifier: &str) -> DeclarationInfo {
    DeclarationInfo::composite(CompositeKind::Resource, identifier, location())
}

#[test]
fn test_def_id_validity() {
    assert!(!DefId::INVALID.is_valid());
    assert!(DefId(1).is_valid());
    assert_eq!(DefId(7).to_string(), "#7");
}

#[test]
fn test_register_and_get() {
    let mut db = DeclarationTable::new();
    let id = db.register(resource("Vault")).expect("registers");

    assert!(id.is_valid());
    assert_eq!(db.len(), 1);
    let declared = db.get(id).expect("declaration exists");
    assert_eq!(declared.identifier, "Vault");
    assert_eq!(declared.composite_kind, CompositeKind::Resource);
    assert!(!declared.is_interface());
    assert_eq!(db.type_of(id), Some(Type::Composite(id)));
    assert_eq!(db.lookup(&TypeId::from("S.a.Vault")), Some(id));
    assert!(db.get(DefId::INVALID).is_none());
}

#[test]
fn test_qualified_identifier_of_nested_declarations() {
    let mut db = DeclarationTable::new();
    let a = db.register(resource("A")).expect("registers");
    let b = db
        .register(resource("B").with_container(Container::Declared(a)))
        .expect("registers");
    let c = db
        .register(resource("C").with_container(Container::Declared(b)))
        .expect("registers");

    assert_eq!(
        qualified_identifier(&db, "foo", Some(Container::Declared(c))),
        "A.B.C.foo"
    );
    assert_eq!(qualified_identifier(&db, "foo", None), "foo");
    assert_eq!(
        qualified_identifier(
            &db,
            "foo",
            Some(Container::Account(AccountKind::PublicAccount))
        ),
        "PublicAccount.foo"
    );
    assert_eq!(db.qualified_identifier(c), "A.B.C");
    assert_eq!(db.type_id_of(c), TypeId::from("S.a.A.B.C"));
    assert_eq!(db.nested_type(a, "B"), Some(b));
    assert_eq!(db.nested_type(b, "C"), Some(c));
}

#[test]
fn test_account_container_prefix() {
    let mut db = DeclarationTable::new();
    let key = db
        .register(
            DeclarationInfo::composite(CompositeKind::Structure, "Key", location())
                .with_container(Container::Account(AccountKind::AuthAccount)),
        )
        .expect("registers");
    assert_eq!(db.qualified_identifier(key), "AuthAccount.Key");
    assert_eq!(db.type_id_of(key).as_str(), "S.a.AuthAccount.Key");
}

#[test]
fn test_identifiers_are_equal_after_invalidation_at_every_depth() {
    let mut db = DeclarationTable::new();
    let mut chain = vec![db.register(resource("L0")).expect("registers")];
    for depth in 1..12 {
        let outer = chain[depth - 1];
        let id = db
            .register(resource(&format!("L{depth}")).with_container(Container::Declared(outer)))
            .expect("registers");
        chain.push(id);
    }

    let before: Vec<(String, TypeId)> = chain
        .iter()
        .map(|id| (db.qualified_identifier(*id).to_string(), db.type_id_of(*id)))
        .collect();

    for (depth, id) in chain.iter().enumerate() {
        db.invalidate_identifiers(*id);
        assert_eq!(db.qualified_identifier(*id), before[depth].0);
        assert_eq!(db.type_id_of(*id), before[depth].1);
    }

    db.invalidate_all_identifiers();
    let after: Vec<(String, TypeId)> = chain
        .iter()
        .map(|id| (db.qualified_identifier(*id).to_string(), db.type_id_of(*id)))
        .collect();
    assert_eq!(before, after);
    assert_eq!(after[3].0, "L0.L1.L2.L3");
}

#[test]
fn test_identifier_cache_is_safe_to_race() {
    let mut db = DeclarationTable::new();
    let outer = db.register(resource("Outer")).expect("registers");
    let ids: Vec<DefId> = (0..64)
        .map(|index| {
            db.register(
                resource(&format!("Inner{index}")).with_container(Container::Declared(outer)),
            )
            .expect("registers")
        })
        .collect();
    db.invalidate_all_identifiers();

    let computed: Vec<String> = ids
        .par_iter()
        .flat_map_iter(|id| [*id, *id, outer])
        .map(|id| db.qualified_identifier(id).to_string())
        .collect();

    for (index, id) in ids.iter().enumerate() {
        let expected = format!("Outer.Inner{index}");
        assert_eq!(computed[index * 3], expected);
        assert_eq!(computed[index * 3 + 1], expected);
        assert_eq!(db.qualified_identifier(*id), expected);
    }
}

#[test]
fn test_duplicate_declaration_is_rejected() {
    let mut db = DeclarationTable::new();
    db.register(resource("Vault")).expect("registers");
    let error = db.register(resource("Vault")).expect_err("duplicate");
    assert_eq!(
        error,
        TypeError::DuplicateDeclaration {
            type_id: "S.a.Vault".to_string()
        }
    );

    let elsewhere = DeclarationInfo::composite(
        CompositeKind::Resource,
        "Vault",
        Some(Location::String("b".to_string())),
    );
    assert!(db.register(elsewhere).is_ok());
}

#[test]
fn test_nested_identifier_is_unique_within_its_container() {
    let mut db = DeclarationTable::new();
    let vault = db.register(resource("Vault")).expect("registers");
    let receipt = DeclarationInfo::composite(CompositeKind::Structure, "Receipt", location())
        .with_container(Container::Declared(vault));
    let first = db.register(receipt).expect("registers");

    let unlocated = DeclarationInfo::composite(CompositeKind::Structure, "Receipt", None)
        .with_container(Container::Declared(vault));
    let error = db.register(unlocated).expect_err("container already holds Receipt");
    assert_eq!(
        error,
        TypeError::DuplicateDeclaration {
            type_id: "Vault.Receipt".to_string()
        }
    );
    assert_eq!(db.nested_type(vault, "Receipt"), Some(first));
    assert_eq!(db.len(), 2);
}

#[test]
fn test_unknown_container_is_rejected() {
    let mut db = DeclarationTable::new();
    let error = db
        .register(resource("Orphan").with_container(Container::Declared(DefId(42))))
        .expect_err("unknown container");
    assert!(matches!(error, TypeError::UnknownContainer { .. }));
}

#[test]
fn test_conformance_must_name_an_interface() {
    let mut db = DeclarationTable::new();
    let other = db.register(resource("Other")).expect("registers");
    let error = db
        .register(resource("R").with_conformances(vec![other]))
        .expect_err("not an interface");
    assert!(matches!(error, TypeError::InvalidConformance { .. }));

    let interface = db
        .register(DeclarationInfo::interface(
            CompositeKind::Resource,
            "I",
            location(),
        ))
        .expect("registers");
    let r = db
        .register(resource("R").with_conformances(vec![interface]))
        .expect("registers");
    assert!(db.conforms_to(r, interface));
    assert!(!db.conforms_to(other, interface));
}

#[test]
fn test_members_are_shared_and_ordered() {
    let mut db = DeclarationTable::new();
    let r = db.register(resource("R")).expect("registers");
    let balance = db
        .declare_field(
            r,
            Access::Public,
            VariableKind::Variable,
            "balance",
            TypeAnnotation::new(Type::UINT256),
        )
        .expect("declares");
    db.declare_field(
        r,
        Access::Private,
        VariableKind::Constant,
        "owner",
        TypeAnnotation::new(Type::Address),
    )
    .expect("declares");
    db.declare_function(
        r,
        Access::Public,
        "withdraw",
        FunctionType::new(Vec::new(), TypeAnnotation::new(Type::Void)),
    )
    .expect("declares");

    let declared = db.get(r).expect("exists");
    assert_eq!(declared.fields, vec!["balance", "owner"]);
    assert_eq!(declared.members.len(), 3);
    assert!(Arc::ptr_eq(declared.member("balance").expect("member"), &balance));
    assert!(!declared.member("withdraw").expect("member").is_field());
}

#[test]
fn test_duplicate_member_is_rejected() {
    let mut db = DeclarationTable::new();
    let r = db.register(resource("R")).expect("registers");
    db.insert_member(r, Member::public_constant_field(r, "x", Type::INT))
        .expect("declares");
    let error = db
        .insert_member(r, Member::public_constant_field(r, "x", Type::String))
        .expect_err("duplicate");
    assert_eq!(
        error,
        TypeError::DuplicateDeclaration {
            type_id: "R.x".to_string()
        }
    );
}

#[test]
fn test_iter_yields_handles_in_registration_order() {
    let mut db = DeclarationTable::new();
    let first = db.register(resource("First")).expect("registers");
    let second = db.register(resource("Second")).expect("registers");
    let handles: Vec<DefId> = db.iter().map(|(id, _)| id).collect();
    assert_eq!(handles, vec![first, second]);
    assert!(!db.is_empty());
}

#[test]
fn test_unknown_handles_render_placeholder() {
    let db = DeclarationTable::new();
    assert_eq!(db.identifier(DefId(9)), "<unknown>");
    assert_eq!(db.qualified_identifier(DefId(9)), "<unknown>");
}
