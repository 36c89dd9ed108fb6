//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid user input or malformed records.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid project reference {0:?}: expected NAMESPACE/PROJECT or a numeric id")]
    InvalidProjectRef(String),

    #[error("invalid snippet id: {0:?}")]
    InvalidSnippetId(String),
}
