//! Engine API for approval chain operations.
//!
//! Every operation is one store transaction: read the step the level
//! pointer names, check who is acting, write the terminal step status and
//! the refreshed header together, and hand back the events describing what
//! happened. Nothing is observable half-done.
use super::actor::Actor;
use super::clock::{Clock, SystemClock};
use super::error::EngineError;
use super::event::ApprovalEvent;
use super::policy;
use super::request::{RequestRef, WorkflowState, WorkflowStatus};
use super::step::{ApprovalStep, Signature, StepStatus};
use super::store::StepStore;
use std::sync::Arc;

/// The refreshed header plus the events the committed transition produced,
/// for the caller to dispatch to notification/business listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub state: WorkflowState,
    pub events: Vec<ApprovalEvent>,
}

#[derive(Clone)]
pub struct ApprovalEngine {
    store: StepStore,
    clock: Arc<dyn Clock>,
}

impl ApprovalEngine {
    pub fn new(db: Arc<sled::Db>) -> Result<Self, EngineError> {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<sled::Db>, clock: Arc<dyn Clock>) -> Result<Self, EngineError> {
        Ok(Self {
            store: StepStore::open(&db)?,
            clock,
        })
    }

    /// Materialize the chain for a request: one pending step per approver,
    /// level = 1-based position, and the header pointing at level 1, all in
    /// one transaction. The caller is assumed to be entitled to initiate
    /// the request; no actor check happens here.
    pub fn create_chain(
        &self,
        request: &RequestRef,
        approvers: &[String],
    ) -> Result<WorkflowState, EngineError> {
        if approvers.is_empty() {
            return Err(EngineError::InvalidChain);
        }

        self.store.transaction(|tx| {
            if tx.workflow_state(request)?.is_some() {
                return tx.abort(EngineError::ChainAlreadyExists(request.clone()));
            }

            let created_at = self.clock.now();
            for (index, approver_id) in approvers.iter().enumerate() {
                let step = ApprovalStep::new(
                    request.clone(),
                    index as u32 + 1,
                    approver_id.clone(),
                    created_at.clone(),
                );
                tx.put_step(&step)?;
            }

            let state = WorkflowState {
                current_level: 1,
                chain_len: approvers.len() as u32,
                status: WorkflowStatus::Pending,
                rejection_reason: None,
            };
            tx.put_workflow_state(request, &state)?;

            Ok(state)
        })
    }

    /// Approve the step at the request's current level.
    ///
    /// The actor must be the step's designated approver, unless the
    /// authorization policy grants an elevated override. On success the
    /// chain either advances to the next level or, when this was the last
    /// step, the request becomes approved.
    pub fn approve(
        &self,
        request: &RequestRef,
        actor: &Actor,
        signature: Option<Signature>,
        note: Option<String>,
    ) -> Result<Outcome, EngineError> {
        self.store.transaction(|tx| {
            let Some(mut state) = tx.workflow_state(request)? else {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            };
            if state.is_terminal() {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            }

            let step = tx.step(request, state.current_level)?;
            let Some(mut step) = step.filter(|s| s.status == StepStatus::Pending) else {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            };

            if !policy::can_act_as_admin(actor) && step.approver_id != actor.id {
                return tx.abort(EngineError::Unauthorized {
                    actor: actor.id.clone(),
                    level: step.level,
                });
            }

            step.status = StepStatus::Approved;
            step.acted_at = Some(self.clock.now());
            step.note = Some(
                note.clone()
                    .unwrap_or_else(|| format!("Approved by: {}", actor.display_name)),
            );
            step.signature = signature.clone();
            tx.put_step(&step)?;

            let mut events = vec![ApprovalEvent::StepApproved {
                request: request.clone(),
                level: step.level,
            }];

            if step.level < state.chain_len {
                let Some(next) = tx.step(request, step.level + 1)? else {
                    // chain_len promises this level exists; a hole is a
                    // pointer desync, not an approvable state
                    return tx.abort(EngineError::NoActionableStep(request.clone()));
                };
                state.current_level += 1;
                events.push(ApprovalEvent::AdvancedToNextApprover {
                    request: request.clone(),
                    new_level: next.level,
                    approver_id: next.approver_id,
                });
            } else {
                state.status = WorkflowStatus::Approved;
                events.push(ApprovalEvent::RequestFullyApproved {
                    request: request.clone(),
                });
            }
            tx.put_workflow_state(request, &state)?;

            Ok(Outcome { state, events })
        })
    }

    /// Reject the step at the request's current level and void every level
    /// above it. Only the step's designated approver may reject; elevated
    /// roles get no override here.
    pub fn reject(
        &self,
        request: &RequestRef,
        actor: &Actor,
        reason: &str,
    ) -> Result<Outcome, EngineError> {
        self.store.transaction(|tx| {
            let Some(mut state) = tx.workflow_state(request)? else {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            };
            if state.is_terminal() {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            }

            let step = tx.step(request, state.current_level)?;
            let Some(mut step) = step.filter(|s| s.status == StepStatus::Pending) else {
                return tx.abort(EngineError::NoActionableStep(request.clone()));
            };

            if step.approver_id != actor.id {
                return tx.abort(EngineError::UnauthorizedRejection {
                    actor: actor.id.clone(),
                    level: step.level,
                });
            }

            step.status = StepStatus::Rejected;
            step.acted_at = Some(self.clock.now());
            step.note = Some(reason.to_string());
            tx.put_step(&step)?;

            // Void the unreached levels instead of deleting them, so the
            // audit trail shows a terminal disposition for every level.
            for level in step.level + 1..=state.chain_len {
                let Some(mut voided) = tx.step(request, level)? else {
                    return tx.abort(EngineError::NoActionableStep(request.clone()));
                };
                voided.status = StepStatus::Rejected;
                voided.note = Some("Voided due to previous rejection".to_string());
                tx.put_step(&voided)?;
            }

            state.status = WorkflowStatus::Rejected;
            state.rejection_reason =
                Some(format!("Rejected at Level {}: {}", step.level, reason));
            tx.put_workflow_state(request, &state)?;

            Ok(Outcome {
                state,
                events: vec![ApprovalEvent::RequestRejected {
                    request: request.clone(),
                    at_level: step.level,
                    reason: reason.to_string(),
                }],
            })
        })
    }

    /// Current workflow header, if a chain exists for the request.
    pub fn state(&self, request: &RequestRef) -> Result<Option<WorkflowState>, EngineError> {
        self.store.workflow_state(request)
    }

    /// Full audit trail for the request, in level order.
    pub fn chain(&self, request: &RequestRef) -> Result<Vec<ApprovalStep>, EngineError> {
        self.store.chain(request)
    }
}
