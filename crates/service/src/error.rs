//! Typed error enum for the service layer.
//!
//! Unifies gateway, storage and LLM failures so callers can match on the
//! failure mode.

use kotoba_gateway::FetchFailure;
use kotoba_llm::LlmError;
use kotoba_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Remote content call failed.
    #[error("fetch: {0}")]
    Fetch(#[from] FetchFailure),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Speech or AI call failed.
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("background task: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Optional backend (AI, speech) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),
}
