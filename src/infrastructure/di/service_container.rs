//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{Collaborators, SnippetService};
use crate::config::Settings;
use crate::infrastructure::gitlab::GitLabClient;
use crate::infrastructure::traits::{CommandEditor, CommandPager, RealFileSystem, TerminalConsole};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Snippet commands
    pub snippets: SnippetService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let client = Arc::new(GitLabClient::new(&settings)?);
        let io = Collaborators {
            snippets: client.clone(),
            projects: client,
            fs: Arc::new(RealFileSystem),
            editor: Arc::new(CommandEditor::new(settings.editor.clone())),
            pager: Arc::new(CommandPager::new(settings.pager.clone())),
            console: Arc::new(TerminalConsole),
        };
        Ok(Self::with_deps(settings, io))
    }

    /// Create a service container with custom collaborators (for testing).
    pub fn with_deps(settings: Settings, io: Collaborators) -> Self {
        Self {
            snippets: SnippetService::new(io, Arc::new(settings)),
        }
    }
}
