//! Walkthrough: route a leave request through a three-level chain, then
//! show a second request dying mid-chain with the void cascade.
use request_approval::{
    actor::{Actor, Role},
    engine::ApprovalEngine,
    request::RequestRef,
    step::Signature,
    utils,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let db = Arc::new(sled::open(temp_dir.path().join("walkthrough.db"))?);
    let engine = ApprovalEngine::new(db)?;

    let supervisor = Actor::new(utils::fresh_id("user_")?, "Supervisor").with_role(Role::Staff);
    let manager = Actor::new(utils::fresh_id("user_")?, "Manager").with_role(Role::Staff);
    let hr = Actor::new(utils::fresh_id("user_")?, "HR Desk").with_role(Role::HumanResources);

    let roster = vec![supervisor.id.clone(), manager.id.clone(), hr.id.clone()];

    // first request: everyone signs off
    let request = RequestRef::new("leave", utils::fresh_id("req_")?);
    let state = engine.create_chain(&request, &roster)?;
    println!("created {} with {} levels", request, state.chain_len);

    for actor in [&supervisor, &manager, &hr] {
        let signature = Signature::from_bytes(format!("signed:{}", actor.id).into_bytes());
        let outcome = engine.approve(&request, actor, Some(signature), None)?;
        for event in &outcome.events {
            println!("  event: {:?}", event);
        }
    }

    println!("final state: {:?}", engine.state(&request)?.unwrap().status);

    // second request: the manager kills it at level 2
    let request = RequestRef::new("leave", utils::fresh_id("req_")?);
    engine.create_chain(&request, &roster)?;
    engine.approve(&request, &supervisor, None, None)?;
    let outcome = engine.reject(&request, &manager, "insufficient cover that week")?;

    println!(
        "second request: {:?} ({})",
        outcome.state.status,
        outcome.state.rejection_reason.as_deref().unwrap_or("-")
    );
    for step in engine.chain(&request)? {
        println!(
            "  level {} [{}] {:?}: {}",
            step.level,
            step.approver_id,
            step.status,
            step.note.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
