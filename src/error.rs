use super::request::RequestRef;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("an approval chain already exists for {0}")]
    ChainAlreadyExists(RequestRef),
    #[error("approver list must not be empty")]
    InvalidChain,
    #[error("no pending step at the current level for {0}")]
    NoActionableStep(RequestRef),
    #[error("actor {actor} is not the designated approver for level {level}")]
    Unauthorized { actor: String, level: u32 },
    #[error("actor {actor} may not reject at level {level}")]
    UnauthorizedRejection { actor: String, level: u32 },
    #[error("transaction conflict on {0}, safe to retry")]
    Conflict(RequestRef),
    #[error("storage failure: {0}")]
    Storage(#[from] sled::Error),
    #[error("codec failure: {0}")]
    Codec(String),
}

impl EngineError {
    /// Transient failures: the operation committed nothing and may be
    /// retried with backoff. Everything else is a definitive refusal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Storage(_))
    }
}
