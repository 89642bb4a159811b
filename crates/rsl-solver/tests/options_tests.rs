use super::*;

#[test]
fn test_default_options() {
    let options = SolverOptions::default();
    assert_eq!(
        options.restriction_member_conflicts,
        MemberConflictPolicy::FirstWins
    );
}

#[test]
fn test_empty_json_uses_defaults() {
    let options: SolverOptions = serde_json::from_str("{}").expect("valid options");
    assert_eq!(options, SolverOptions::default());
}

#[test]
fn test_json_field_names_are_camel_case() {
    let options: SolverOptions =
        serde_json::from_str(r#"{"restrictionMemberConflicts":"report"}"#).expect("valid options");
    assert_eq!(
        options.restriction_member_conflicts,
        MemberConflictPolicy::Report
    );

    let json = serde_json::to_value(SolverOptions::default()).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({ "restrictionMemberConflicts": "firstWins" })
    );
}

#[test]
fn test_unknown_policy_is_rejected() {
    let result =
        serde_json::from_str::<SolverOptions>(r#"{"restrictionMemberConflicts":"lastWins"}"#);
    assert!(result.is_err());
}

#[test]
fn test_builder() {
    let options =
        SolverOptions::default().with_restriction_member_conflicts(MemberConflictPolicy::Report);
    assert_eq!(
        options.restriction_member_conflicts,
        MemberConflictPolicy::Report
    );
}
