//! Approval steps: one ordered unit of a request's chain.
use super::clock::TimeStamp;
use super::request::RequestRef;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum StepStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Approved,
    #[n(2)]
    Rejected,
}

/// Opaque signed-artifact payload attached to an approval, e.g. a signed
/// document reference. The digest gives it a stable handle for audit views.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
#[cbor(array)]
pub struct Signature(#[cbor(n(0), with = "minicbor::bytes")] Vec<u8>);

impl Signature {
    pub fn from_bytes(payload: impl Into<Vec<u8>>) -> Self {
        Self(payload.into())
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    pub fn digest(&self) -> String {
        sha256::digest(self.0.as_slice())
    }
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// A single level of an approval chain. Steps are created pending and make
/// exactly one terminal transition: approved or rejected by their approver,
/// or rejected as a void when an earlier level rejects.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct ApprovalStep {
    #[n(0)]
    pub request: RequestRef,
    #[n(1)]
    pub level: u32, // 1-based position in the chain
    #[n(2)]
    pub approver_id: String,
    #[n(3)]
    pub status: StepStatus,
    #[n(4)]
    pub acted_at: Option<TimeStamp<Utc>>,
    #[n(5)]
    pub note: Option<String>,
    #[n(6)]
    pub signature: Option<Signature>,
    #[n(7)]
    pub created_at: TimeStamp<Utc>,
}

impl ApprovalStep {
    pub fn new(
        request: RequestRef,
        level: u32,
        approver_id: String,
        created_at: TimeStamp<Utc>,
    ) -> Self {
        Self {
            request,
            level,
            approver_id,
            status: StepStatus::Pending,
            acted_at: None,
            note: None,
            signature: None,
            created_at,
        }
    }
}
