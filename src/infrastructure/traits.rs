//! I/O boundary traits for testability
//!
//! These traits abstract the GitLab API, the filesystem, external programs
//! and the terminal, allowing services to be tested with mock implementations.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::domain::{NewSnippet, Project, ProjectRef, SnippetData, SnippetId, SnippetUpdate};

/// Errors raised by the remote API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{method} {url} failed with HTTP {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Snippet endpoints, keyed by numeric project id and snippet id.
pub trait SnippetApi: Send + Sync {
    /// All snippets of a project.
    fn list(&self, project_id: u64) -> ApiResult<Vec<SnippetData>>;

    /// Snippet metadata.
    fn get(&self, project_id: u64, id: &SnippetId) -> ApiResult<SnippetData>;

    /// Raw snippet content.
    fn content(&self, project_id: u64, id: &SnippetId) -> ApiResult<String>;

    fn create(&self, project_id: u64, snippet: &NewSnippet) -> ApiResult<SnippetData>;

    fn update(
        &self,
        project_id: u64,
        id: &SnippetId,
        update: &SnippetUpdate,
    ) -> ApiResult<SnippetData>;

    fn delete(&self, project_id: u64, id: &SnippetId) -> ApiResult<()>;
}

/// Project lookup.
pub trait ProjectApi: Send + Sync {
    /// Resolve a path or id to the project's id and namespaced path.
    fn project(&self, project: &ProjectRef) -> ApiResult<Project>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Editor abstraction for opening files.
pub trait Editor: Send + Sync {
    /// Open a file in the editor.
    /// Blocks until editor exits.
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Pager abstraction for displaying text.
pub trait Pager: Send + Sync {
    /// Feed `content` to the pager on stdin.
    /// Blocks until the pager exits; a non-zero exit is an error.
    fn page(&self, content: &str) -> io::Result<()>;
}

/// Terminal abstraction for prompts and piped input.
pub trait Console: Send + Sync {
    /// Print `question` and read one line of answer (without the newline).
    fn ask(&self, question: &str) -> io::Result<String>;

    /// Read all of standard input.
    fn read_stdin(&self) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Split a configured command line (`less -R`) into program and arguments.
fn command_line(command: &str) -> io::Result<Command> {
    let mut words = command.split_whitespace();
    let program = words.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "empty command configured")
    })?;
    let mut cmd = Command::new(program);
    cmd.args(words);
    Ok(cmd)
}

/// Real editor implementation running the configured editor command.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Editor for CommandEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        let status = command_line(&self.command)?.arg(path).status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with status: {}", self.command, status),
            ))
        }
    }
}

/// Real pager implementation piping content into the configured pager command.
#[derive(Debug, Clone)]
pub struct CommandPager {
    command: String,
}

impl CommandPager {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Pager for CommandPager {
    fn page(&self, content: &str) -> io::Result<()> {
        let mut child = command_line(&self.command)?
            .stdin(Stdio::piped())
            .spawn()?;

        if let Some(mut child_stdin) = child.stdin.take() {
            // Quitting the pager early closes the pipe; that is not a failure
            match child_stdin.write_all(content.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with status: {}", self.command, status),
            ))
        }
    }
}

/// Real console implementation on the process's standard streams.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn ask(&self, question: &str) -> io::Result<String> {
        use colored::Colorize;

        let mut stdout = io::stdout();
        write!(stdout, "{} ", question.cyan())?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn read_stdin(&self) -> io::Result<String> {
        let mut content = String::new();
        io::stdin().lock().read_to_string(&mut content)?;
        Ok(content)
    }
}
