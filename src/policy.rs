//! Actor authorization policy.
//!
//! A single seam between role taxonomy and the state machine: the engine
//! asks one question, "may this actor approve a step that names someone
//! else", and nothing in the transition logic mentions concrete roles.
//!
//! Rejection deliberately never consults this policy. An elevated actor can
//! approve on a designated approver's behalf but cannot reject on their
//! behalf. Whether rejection should honor the override too is an open
//! product question; until it is answered the asymmetry stands.
use super::actor::{Actor, Role};

pub const ELEVATED_ROLES: [Role; 3] = [Role::TopAdmin, Role::BranchAdmin, Role::HumanResources];

/// True when the actor holds any elevated role and may approve a step
/// without being its designated approver.
pub fn can_act_as_admin(actor: &Actor) -> bool {
    actor.roles.iter().any(|r| ELEVATED_ROLES.contains(r))
}
