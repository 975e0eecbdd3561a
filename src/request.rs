//! Request identity and the engine-owned workflow header.
use std::fmt;

/// Identity of an approvable request: `kind` names the concrete business
/// record (leave, overtime, reimbursement, ...), `id` is unique within kind.
/// The engine never looks at the record behind it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub struct RequestRef {
    #[n(0)]
    pub kind: String,
    #[n(1)]
    pub id: String,
}

impl RequestRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum WorkflowStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Approved,
    #[n(2)]
    Rejected,
}

/// The per-request fields the engine owns. Pre-chain states (drafts etc.)
/// stay on the caller's side; a header only exists once a chain does.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct WorkflowState {
    #[n(0)]
    pub current_level: u32,
    #[n(1)]
    pub chain_len: u32, // fixed at creation, levels run 1..=chain_len
    #[n(2)]
    pub status: WorkflowStatus,
    #[n(3)]
    pub rejection_reason: Option<String>,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            WorkflowStatus::Approved | WorkflowStatus::Rejected
        )
    }
}
