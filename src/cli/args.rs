//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{ProjectRef, SnippetId};

const PROJECT_HELP: &str = "[PROJECT] may be specified as [NAMESPACE]/[PROJECT] or [PROJECT_ID]. \
[SNIPPET_ID] is the id of the snippet, see 'gitlab snippet list [PROJECT]'.";

/// Manage GitLab project snippets from the command line
#[derive(Parser, Debug)]
#[command(name = "gitlab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: $XDG_CONFIG_HOME/gitlab-cli/config.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage project snippets
    Snippet {
        #[command(subcommand)]
        command: SnippetCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnippetCommands {
    /// Add a snippet
    #[command(long_about = "Add a snippet to a project. Give a file to create the snippet from, \
or pipe content in:\n\n  $ gitlab snippet add namespace/project file1.txt -t Title -n file1.txt\n  \
$ cat file1.txt | gitlab snippet add namespace/project -t Title -n file1.txt")]
    Add {
        /// Project as NAMESPACE/PROJECT or PROJECT_ID
        project: ProjectRef,
        /// File to read the content from (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The title to use for the new snippet
        #[arg(short, long)]
        title: String,
        /// A file name for this snippet
        #[arg(short = 'n', long = "file_name", visible_short_alias = 'f', visible_alias = "file-name")]
        file_name: String,
    },

    /// View a snippet in the pager
    #[command(after_help = PROJECT_HELP)]
    View {
        project: ProjectRef,
        snippet_id: SnippetId,
    },

    /// Edit a snippet in the editor
    #[command(after_help = PROJECT_HELP)]
    Edit {
        project: ProjectRef,
        snippet_id: SnippetId,
    },

    /// Delete a snippet
    #[command(after_help = PROJECT_HELP)]
    Delete {
        project: ProjectRef,
        snippet_id: SnippetId,
    },

    /// View detailed info for a snippet
    #[command(after_help = PROJECT_HELP)]
    Info {
        project: ProjectRef,
        snippet_id: SnippetId,
    },

    /// Download/save a snippet locally
    #[command(visible_alias = "save", after_help = PROJECT_HELP)]
    Download {
        project: ProjectRef,
        snippet_id: SnippetId,
        /// Target file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List the snippets of a project
    #[command(visible_alias = "ls")]
    List {
        project: ProjectRef,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config (token redacted)
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
