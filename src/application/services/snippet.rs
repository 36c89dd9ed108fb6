//! Snippet service
//!
//! One method per console command. Each resolves the project reference first,
//! then talks to the snippet API with the numeric project id and wraps the
//! response in a [`Snippet`] record carrying its web URL.

use std::path::Path;
use std::sync::Arc;

use tempfile::Builder;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    file_suffix, NewSnippet, Project, ProjectRef, Snippet, SnippetData, SnippetId, SnippetUpdate,
};
use crate::infrastructure::traits::{Console, Editor, FileSystem, Pager, ProjectApi, SnippetApi};

/// Question asked before deleting a snippet.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this snippet? (Yes\\No)";

/// I/O boundaries the snippet service talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub snippets: Arc<dyn SnippetApi>,
    pub projects: Arc<dyn ProjectApi>,
    pub fs: Arc<dyn FileSystem>,
    pub editor: Arc<dyn Editor>,
    pub pager: Arc<dyn Pager>,
    pub console: Arc<dyn Console>,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// User did not confirm; nothing was sent to the server
    Declined,
}

/// True only for a case-insensitive `yes`.
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Service for managing project snippets.
pub struct SnippetService {
    io: Collaborators,
    settings: Arc<Settings>,
}

impl SnippetService {
    /// Create a new snippet service.
    pub fn new(io: Collaborators, settings: Arc<Settings>) -> Self {
        Self { io, settings }
    }

    /// Create a snippet from `file`, or from stdin when no file is given.
    #[instrument(skip(self))]
    pub fn add(
        &self,
        project: &ProjectRef,
        title: &str,
        file_name: &str,
        file: Option<&Path>,
    ) -> ApplicationResult<Snippet> {
        let content = match file {
            Some(path) => self
                .io
                .fs
                .read_to_string(path)
                .with_path_context("read snippet file", path)?,
            None => self
                .io
                .console
                .read_stdin()
                .with_context("read snippet from stdin")?,
        };
        debug!("add: {} bytes of content", content.len());

        let project = self.resolve(project)?;
        let request = NewSnippet {
            title: title.to_string(),
            file_name: file_name.to_string(),
            content,
            visibility: self.settings.visibility.clone(),
        };
        let data = self.io.snippets.create(project.id, &request)?;
        Ok(self.record(data, &project))
    }

    /// Pipe the snippet content through the pager.
    #[instrument(skip(self))]
    pub fn view(&self, project: &ProjectRef, id: &SnippetId) -> ApplicationResult<()> {
        let project = self.resolve(project)?;
        let content = self.io.snippets.content(project.id, id)?;
        self.io
            .pager
            .page(&content)
            .map_err(|e| ApplicationError::PagerFailed {
                message: e.to_string(),
            })
    }

    /// Round-trip the snippet content through the editor and submit the result.
    ///
    /// The temp file lives only for the duration of this call and is removed
    /// on every exit path, including editor and update failures.
    #[instrument(skip(self))]
    pub fn edit(&self, project: &ProjectRef, id: &SnippetId) -> ApplicationResult<Snippet> {
        let project = self.resolve(project)?;
        let current = self.io.snippets.get(project.id, id)?;
        let content = self.io.snippets.content(project.id, id)?;

        let draft = Builder::new()
            .prefix("snippet.")
            .suffix(&file_suffix(&current.file_name))
            .rand_bytes(12)
            .tempfile()
            .with_path_context("create temp file in", &std::env::temp_dir())?;
        let path = draft.path();
        debug!("edit: draft={}", path.display());

        self.io
            .fs
            .write(path, &content)
            .with_path_context("write temp file", path)?;
        self.io
            .editor
            .open(path)
            .map_err(|e| ApplicationError::EditorFailed {
                message: e.to_string(),
            })?;
        let edited = self
            .io
            .fs
            .read_to_string(path)
            .with_path_context("read temp file", path)?;

        let update = SnippetUpdate {
            title: current.title,
            file_name: current.file_name,
            content: edited,
        };
        let data = self.io.snippets.update(project.id, id, &update)?;
        Ok(self.record(data, &project))
    }

    /// Delete a snippet after interactive confirmation.
    ///
    /// The question is asked before any request is made.
    #[instrument(skip(self))]
    pub fn delete(&self, project: &ProjectRef, id: &SnippetId) -> ApplicationResult<DeleteOutcome> {
        let answer = self
            .io
            .console
            .ask(DELETE_PROMPT)
            .with_context("read confirmation")?;
        if !is_confirmation(&answer) {
            debug!("delete: declined with answer {:?}", answer.trim());
            return Ok(DeleteOutcome::Declined);
        }

        let project = self.resolve(project)?;
        self.io.snippets.delete(project.id, id)?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Fetch snippet metadata.
    #[instrument(skip(self))]
    pub fn info(&self, project: &ProjectRef, id: &SnippetId) -> ApplicationResult<Snippet> {
        let project = self.resolve(project)?;
        let data = self.io.snippets.get(project.id, id)?;
        Ok(self.record(data, &project))
    }

    /// Write the snippet content to `target`.
    #[instrument(skip(self))]
    pub fn download(
        &self,
        project: &ProjectRef,
        id: &SnippetId,
        target: &Path,
    ) -> ApplicationResult<()> {
        let project = self.resolve(project)?;
        let content = self.io.snippets.content(project.id, id)?;
        self.io
            .fs
            .write(target, &content)
            .with_path_context("write snippet file", target)
    }

    /// List all snippets of a project.
    #[instrument(skip(self))]
    pub fn list(&self, project: &ProjectRef) -> ApplicationResult<Vec<Snippet>> {
        let project = self.resolve(project)?;
        let snippets = self.io.snippets.list(project.id)?;
        debug!("list: {} snippets", snippets.len());
        Ok(snippets
            .into_iter()
            .map(|data| self.record(data, &project))
            .collect())
    }

    fn resolve(&self, project: &ProjectRef) -> ApplicationResult<Project> {
        let resolved = self.io.projects.project(project)?;
        debug!(
            "resolve: {} -> id={} path={}",
            project, resolved.id, resolved.path_with_namespace
        );
        Ok(resolved)
    }

    fn record(&self, data: SnippetData, project: &Project) -> Snippet {
        Snippet::new(data, project, &self.settings.gitlab_url)
    }
}
