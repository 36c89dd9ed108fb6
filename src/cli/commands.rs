//! Command dispatch: maps parsed arguments onto services and prints results

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{DeleteOutcome, SnippetService};
use crate::cli::args::{Cli, Commands, ConfigCommands, SnippetCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

/// Run the parsed command line against real services.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Snippet { command }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings)?;
            let stdout = io::stdout();
            run_snippet(command, &container.snippets, &mut stdout.lock())
        }
        Some(Commands::Config { command }) => {
            run_config(command, cli.config.as_deref(), &RealFileSystem)
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see 'gitlab --help'".to_string(),
        )),
    }
}

/// Run one `snippet` subcommand, writing its output to `out`.
#[instrument(skip(service, out))]
pub fn run_snippet(
    command: &SnippetCommands,
    service: &SnippetService,
    out: &mut dyn Write,
) -> CliResult<()> {
    match command {
        SnippetCommands::Add {
            project,
            file,
            title,
            file_name,
        } => {
            let snippet = service.add(project, title, file_name, file.as_deref())?;
            emit(out, &output::created(&snippet))
        }
        SnippetCommands::View {
            project,
            snippet_id,
        } => Ok(service.view(project, snippet_id)?),
        SnippetCommands::Edit {
            project,
            snippet_id,
        } => {
            let snippet = service.edit(project, snippet_id)?;
            emit(out, &output::updated(&snippet))
        }
        SnippetCommands::Delete {
            project,
            snippet_id,
        } => match service.delete(project, snippet_id)? {
            DeleteOutcome::Deleted => emit(out, "Successfully deleted the snippet.\n"),
            DeleteOutcome::Declined => {
                debug!("delete declined, nothing to do");
                Ok(())
            }
        },
        SnippetCommands::Info {
            project,
            snippet_id,
        } => {
            let snippet = service.info(project, snippet_id)?;
            emit(out, &output::snippet_info(&snippet))
        }
        SnippetCommands::Download {
            project,
            snippet_id,
            file,
        } => {
            service.download(project, snippet_id, file)?;
            emit(out, "Snippet file saved successfully.\n")
        }
        SnippetCommands::List { project } => {
            let snippets = service.list(project)?;
            if snippets.is_empty() {
                output::warning(&format!("no snippets in project {project}"));
            }
            for snippet in &snippets {
                emit(out, &format!("{}\n", output::snippet_line(snippet)))?;
            }
            Ok(())
        }
    }
}

/// Run one `config` subcommand.
pub fn run_config(
    command: &ConfigCommands,
    config_file: Option<&Path>,
    fs: &dyn FileSystem,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config_file)?;
            print!("{}", settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let target = match config_file {
                Some(path) => path.to_path_buf(),
                None => global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine config directory".to_string())
                })?,
            };
            if fs.exists(&target) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    target.display()
                )));
            }
            fs.ensure_parent(&target)
                .map_err(|e| InfraError::io(format!("create {}", target.display()), e))?;
            fs.write(&target, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!("Created {}", target.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => println!("global: {}", path.display()),
                None => println!("global: (unavailable)"),
            }
            if let Some(path) = config_file {
                println!("explicit: {}", path.display());
            }
            Ok(())
        }
    }
}

fn emit(out: &mut dyn Write, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| InfraError::io("write output", e).into())
}
