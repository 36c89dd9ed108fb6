//! Manage GitLab project snippets from the command line.
//!
//! Layers, inside out: `domain` (records and value types), `application`
//! (snippet service), `infrastructure` (GitLab client, processes, terminal),
//! `cli` (arguments, dispatch, output).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
