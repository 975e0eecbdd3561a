//! Property-based tests for approval chain transitions
//!
//! This module uses proptest to verify that the engine's transition logic
//! behaves correctly across a wide variety of chain shapes and action
//! prefixes. The level-pointer logic is critical - bugs here corrupt every
//! request routed through the engine.
//!
//! These tests focus on invariants that should hold regardless of chain
//! length or where in the chain an action lands, helping catch edge cases
//! that would be difficult to find with manual test case selection.

use proptest::prelude::*;
use request_approval::{
    actor::{Actor, Role},
    engine::ApprovalEngine,
    request::{RequestRef, WorkflowStatus},
    step::StepStatus,
    utils,
};
use std::sync::{Arc, OnceLock};

// These property tests cover:
//
// 1. Chain shape after creation - levels 1..N, all pending, pointer at 1
// 2. The single-pending-frontier invariant after any approval prefix
// 3. Full sequential approval - validates happy path
// 4. Rejection at an arbitrary level - validates the void cascade
// 5. Monotone level pointer - current_level never decreases
//
// What these tests DON'T cover (deliberately):
//
// - Races between concurrent actors (covered in the concurrency tests)
// - Authorization taxonomy details (covered in scenarios and smoke tests)
//

// One sled db for the whole test binary; each case works on a request with
// a fresh uuid7-based identity, so cases never observe each other.
static ENGINE: OnceLock<(tempfile::TempDir, ApprovalEngine)> = OnceLock::new();

fn engine() -> &'static ApprovalEngine {
    let (_, engine) = ENGINE.get_or_init(|| {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let db = Arc::new(sled::open(temp_dir.path().join("property.db")).expect("sled open"));
        let engine = ApprovalEngine::new(db).expect("engine");
        (temp_dir, engine)
    });
    engine
}

fn fresh_request(kind: &str) -> RequestRef {
    RequestRef::new(kind, utils::fresh_id("req_").expect("request id"))
}

/// Strategy to generate an approver roster (1 to 8 levels)
fn roster_strategy() -> impl Strategy<Value = Vec<Actor>> {
    prop::collection::vec(any::<u32>(), 1..=8).prop_map(|seeds| {
        seeds
            .into_iter()
            .enumerate()
            .map(|(i, seed)| {
                Actor::new(
                    format!("user_{}_{}", i, seed),
                    format!("Approver {}", i + 1),
                )
                .with_role(Role::Staff)
            })
            .collect()
    })
}

fn ids(roster: &[Actor]) -> Vec<String> {
    roster.iter().map(|a| a.id.clone()).collect()
}

// PROPERTY TESTS
proptest! {
    /// Property: creating a chain of N approvers produces exactly N steps
    /// with levels 1..N, all pending, and the pointer at level 1.
    #[test]
    fn prop_created_chain_has_expected_shape(roster in roster_strategy()) {
        let request = fresh_request("leave");

        let state = engine().create_chain(&request, &ids(&roster)).unwrap();

        prop_assert_eq!(state.current_level, 1);
        prop_assert_eq!(state.chain_len, roster.len() as u32);
        prop_assert_eq!(state.status, WorkflowStatus::Pending);

        let chain = engine().chain(&request).unwrap();
        prop_assert_eq!(chain.len(), roster.len());
        for (index, step) in chain.iter().enumerate() {
            prop_assert_eq!(step.level, index as u32 + 1);
            prop_assert_eq!(&step.approver_id, &roster[index].id);
            prop_assert_eq!(step.status, StepStatus::Pending);
            prop_assert!(step.acted_at.is_none());
        }
    }

    /// Property: after any prefix of designated approvals, at most one step
    /// is pending-at-the-frontier; every level below the pointer is
    /// approved and every level at or above it is pending.
    #[test]
    fn prop_single_pending_frontier(
        roster in roster_strategy(),
        prefix_seed in any::<prop::sample::Index>(),
    ) {
        let request = fresh_request("overtime");
        engine().create_chain(&request, &ids(&roster)).unwrap();

        let prefix = prefix_seed.index(roster.len() + 1); // 0..=N approvals
        for approver in roster.iter().take(prefix) {
            engine().approve(&request, approver, None, None).unwrap();
        }

        let state = engine().state(&request).unwrap().unwrap();
        let chain = engine().chain(&request).unwrap();

        if prefix == roster.len() {
            prop_assert_eq!(state.status, WorkflowStatus::Approved);
            prop_assert!(chain.iter().all(|s| s.status == StepStatus::Approved));
        } else {
            prop_assert_eq!(state.status, WorkflowStatus::Pending);
            prop_assert_eq!(state.current_level, prefix as u32 + 1);
            for step in &chain {
                if step.level < state.current_level {
                    prop_assert_eq!(step.status, StepStatus::Approved);
                } else {
                    prop_assert_eq!(step.status, StepStatus::Pending);
                }
            }
            let pending_at_frontier = chain
                .iter()
                .filter(|s| s.status == StepStatus::Pending && s.level == state.current_level)
                .count();
            prop_assert_eq!(pending_at_frontier, 1);
        }
    }

    /// Property: the level pointer never decreases as approvals land.
    #[test]
    fn prop_current_level_is_monotone(roster in roster_strategy()) {
        let request = fresh_request("reimbursement");
        engine().create_chain(&request, &ids(&roster)).unwrap();

        let mut last_level = 1;
        for approver in &roster {
            let outcome = engine().approve(&request, approver, None, None).unwrap();
            prop_assert!(outcome.state.current_level >= last_level);
            last_level = outcome.state.current_level;
        }
    }

    /// Property: rejecting at an arbitrary level k terminates the request,
    /// records the reason at level k, and voids every level above k - no
    /// step anywhere retains pending.
    #[test]
    fn prop_rejection_voids_everything_above(
        roster in roster_strategy(),
        reject_seed in any::<prop::sample::Index>(),
        reason in "[a-z ]{1,40}",
    ) {
        let request = fresh_request("resignation");
        engine().create_chain(&request, &ids(&roster)).unwrap();

        let reject_at = reject_seed.index(roster.len()); // 0-based level index
        for approver in roster.iter().take(reject_at) {
            engine().approve(&request, approver, None, None).unwrap();
        }

        let outcome = engine()
            .reject(&request, &roster[reject_at], &reason)
            .unwrap();
        let level = reject_at as u32 + 1;

        prop_assert_eq!(outcome.state.status, WorkflowStatus::Rejected);
        prop_assert_eq!(
            outcome.state.rejection_reason,
            Some(format!("Rejected at Level {}: {}", level, reason))
        );

        let chain = engine().chain(&request).unwrap();
        prop_assert!(chain.iter().all(|s| s.status != StepStatus::Pending));
        for step in &chain {
            if step.level < level {
                prop_assert_eq!(step.status, StepStatus::Approved);
            } else if step.level == level {
                prop_assert_eq!(step.status, StepStatus::Rejected);
                prop_assert_eq!(step.note.as_deref(), Some(reason.as_str()));
            } else {
                prop_assert_eq!(step.status, StepStatus::Rejected);
                prop_assert_eq!(
                    step.note.as_deref(),
                    Some("Voided due to previous rejection")
                );
            }
        }
    }

    /// Property: an actor who is neither designated nor elevated is refused
    /// and the chain is left byte-for-byte as it was.
    #[test]
    fn prop_strangers_change_nothing(roster in roster_strategy(), seed in any::<u64>()) {
        let request = fresh_request("leave");
        engine().create_chain(&request, &ids(&roster)).unwrap();

        let stranger = Actor::new(format!("stranger_{}", seed), "Stranger")
            .with_role(Role::Staff);

        let before = engine().chain(&request).unwrap();
        prop_assert!(engine().approve(&request, &stranger, None, None).is_err());
        prop_assert!(engine().reject(&request, &stranger, "no").is_err());
        let after = engine().chain(&request).unwrap();

        prop_assert_eq!(before, after);
    }
}
