//! Property-based tests for stage lookup
//!
//! - Every string that is not a stage id is rejected with its own name
//! - Known ids always resolve, with a non-empty prompt and navigateStage first
//! - Lookup is pure: repeated lookups serialize identically

use super::tests::test_registry;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_stage_id() -> impl Strategy<Value = StageId> {
    prop_oneof![
        Just(StageId::Greeting),
        Just(StageId::Schedule),
        Just(StageId::Reschedule),
    ]
}

/// Strings that are not exactly one of the stage ids
fn arb_unknown_name() -> impl Strategy<Value = String> {
    "[A-Za-z_ ]{0,20}".prop_filter("must not be a stage id", |s| {
        StageId::ALL.iter().all(|id| id.as_str() != s.as_str())
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn unknown_names_never_resolve(name in arb_unknown_name()) {
        let registry = test_registry();
        let err = registry.lookup(&name).unwrap_err();
        prop_assert_eq!(err.stage_name, name);
    }

    #[test]
    fn known_ids_always_resolve(id in arb_stage_id()) {
        let registry = test_registry();
        let stage = registry.lookup(id.as_str()).unwrap();
        prop_assert_eq!(stage.id, id);
        prop_assert!(!stage.system_prompt.is_empty());
        prop_assert_eq!(stage.tool_names().first().copied(), Some("navigateStage"));
    }

    #[test]
    fn lookup_is_repeatable(id in arb_stage_id()) {
        let registry = test_registry();
        let first = registry.stage(id);
        let second = registry.stage(id);
        prop_assert_eq!(&first.system_prompt, &second.system_prompt);
        prop_assert_eq!(
            serde_json::to_string(&first.selected_tools()).unwrap(),
            serde_json::to_string(&second.selected_tools()).unwrap()
        );
    }
}
