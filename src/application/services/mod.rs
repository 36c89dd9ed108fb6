//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (SnippetApi, Editor, Pager, etc.)
//! but are themselves concrete structs, not traits.

mod snippet;

pub use snippet::{is_confirmation, Collaborators, DeleteOutcome, SnippetService, DELETE_PROMPT};
