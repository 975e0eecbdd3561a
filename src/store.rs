//! Sled-backed persistence for workflow headers and approval steps.
//!
//! Two trees: one holds the per-request workflow header, the other holds the
//! steps. Mutations go through [`StepStore::transaction`], a serializable
//! multi-tree sled transaction scoped to the keys it touches; concurrent
//! writers against the same request serialize there, writers against
//! different requests touch disjoint keys and do not contend.
use super::error::EngineError;
use super::request::{RequestRef, WorkflowState};
use super::step::ApprovalStep;
use sled::Transactional;
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};

const REQUESTS_TREE: &str = "workflow_requests";
const STEPS_TREE: &str = "workflow_steps";

// Composite keys: kind and id joined with NUL (identities never contain
// NUL), with the level appended big-endian so key order is level order.
fn request_key(request: &RequestRef) -> Vec<u8> {
    let mut key = Vec::with_capacity(request.kind.len() + request.id.len() + 2);
    key.extend_from_slice(request.kind.as_bytes());
    key.push(0);
    key.extend_from_slice(request.id.as_bytes());
    key
}

fn step_prefix(request: &RequestRef) -> Vec<u8> {
    let mut key = request_key(request);
    key.push(0);
    key
}

fn step_key(request: &RequestRef, level: u32) -> Vec<u8> {
    let mut key = step_prefix(request);
    key.extend_from_slice(&level.to_be_bytes());
    key
}

fn encode<T>(value: &T) -> Result<Vec<u8>, EngineError>
where
    T: minicbor::Encode<()>,
{
    minicbor::to_vec(value).map_err(|e| EngineError::Codec(e.to_string()))
}

fn decode<T>(bytes: &[u8]) -> Result<T, EngineError>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    minicbor::decode(bytes).map_err(|e| EngineError::Codec(e.to_string()))
}

fn abort<A>(e: EngineError) -> Result<A, ConflictableTransactionError<EngineError>> {
    Err(ConflictableTransactionError::Abort(e))
}

#[derive(Clone)]
pub struct StepStore {
    requests: sled::Tree,
    steps: sled::Tree,
}

impl StepStore {
    pub fn open(db: &sled::Db) -> Result<Self, EngineError> {
        Ok(Self {
            requests: db.open_tree(REQUESTS_TREE)?,
            steps: db.open_tree(STEPS_TREE)?,
        })
    }

    /// Current workflow header, read outside any transaction.
    pub fn workflow_state(&self, request: &RequestRef) -> Result<Option<WorkflowState>, EngineError> {
        match self.requests.get(request_key(request))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Full audit trail for one request, in level order.
    pub fn chain(&self, request: &RequestRef) -> Result<Vec<ApprovalStep>, EngineError> {
        let mut steps = Vec::new();
        for entry in self.steps.scan_prefix(step_prefix(request)) {
            let (_, bytes) = entry?;
            steps.push(decode(&bytes)?);
        }
        Ok(steps)
    }

    /// Run `f` as one serializable transaction over both trees. The closure
    /// may be re-run on contention, so it must derive everything from the
    /// transactional view it is handed.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        F: Fn(&StoreTx<'_>) -> Result<T, ConflictableTransactionError<EngineError>>,
    {
        let result = (&self.requests, &self.steps).transaction(|(requests, steps)| {
            let tx = StoreTx { requests, steps };
            f(&tx)
        });

        match result {
            Ok(value) => Ok(value),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(EngineError::Storage(e)),
        }
    }
}

/// Typed view of the two trees inside one transaction.
pub struct StoreTx<'a> {
    requests: &'a TransactionalTree,
    steps: &'a TransactionalTree,
}

impl StoreTx<'_> {
    pub fn workflow_state(
        &self,
        request: &RequestRef,
    ) -> Result<Option<WorkflowState>, ConflictableTransactionError<EngineError>> {
        match self.requests.get(request_key(request))? {
            Some(bytes) => match decode(&bytes) {
                Ok(state) => Ok(Some(state)),
                Err(e) => abort(e),
            },
            None => Ok(None),
        }
    }

    pub fn put_workflow_state(
        &self,
        request: &RequestRef,
        state: &WorkflowState,
    ) -> Result<(), ConflictableTransactionError<EngineError>> {
        match encode(state) {
            Ok(bytes) => {
                self.requests.insert(request_key(request), bytes)?;
                Ok(())
            }
            Err(e) => abort(e),
        }
    }

    pub fn step(
        &self,
        request: &RequestRef,
        level: u32,
    ) -> Result<Option<ApprovalStep>, ConflictableTransactionError<EngineError>> {
        match self.steps.get(step_key(request, level))? {
            Some(bytes) => match decode(&bytes) {
                Ok(step) => Ok(Some(step)),
                Err(e) => abort(e),
            },
            None => Ok(None),
        }
    }

    pub fn put_step(
        &self,
        step: &ApprovalStep,
    ) -> Result<(), ConflictableTransactionError<EngineError>> {
        match encode(step) {
            Ok(bytes) => {
                self.steps.insert(step_key(&step.request, step.level), bytes)?;
                Ok(())
            }
            Err(e) => abort(e),
        }
    }

    pub fn abort<A>(
        &self,
        e: EngineError,
    ) -> Result<A, ConflictableTransactionError<EngineError>> {
        abort(e)
    }
}
