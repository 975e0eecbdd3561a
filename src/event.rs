//! Domain events describing what a committed transition did.
//!
//! The engine never calls notification or business-side-effect code. Each
//! operation returns the events it produced, after its transaction has
//! committed; the caller dispatches them. Consumers must tolerate seeing an
//! event more than once (at-least-once delivery is the caller's contract).
use super::request::RequestRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalEvent {
    /// A pending step was approved by (or on behalf of) its approver.
    StepApproved { request: RequestRef, level: u32 },
    /// The chain advanced; `approver_id` names who is now up.
    AdvancedToNextApprover {
        request: RequestRef,
        new_level: u32,
        approver_id: String,
    },
    /// Every level approved. Hook point for business side effects such as
    /// balance deduction, performed by an external listener.
    RequestFullyApproved { request: RequestRef },
    /// The chain terminated at `at_level` with the approver's reason.
    RequestRejected {
        request: RequestRef,
        at_level: u32,
        reason: String,
    },
}
