//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (`$PAGER`/`$EDITOR` seed the programs)
//! 2. Config file: `--config <path>` or `$XDG_CONFIG_HOME/gitlab-cli/config.toml`
//! 3. Environment variables: `GITLAB_CLI_*` prefix
//! 4. `pager` / `editor` environment variables

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "GITLAB_CLI";

/// Placeholder shown instead of the token by `config show`.
const REDACTED: &str = "********";

/// Raw settings for intermediate parsing (every key optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub gitlab_url: Option<String>,
    pub private_token: Option<String>,
    pub pager: Option<String>,
    pub editor: Option<String>,
    pub visibility: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Unified configuration for gitlab-cli.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Web root of the GitLab server (default: https://gitlab.com/)
    pub gitlab_url: String,
    /// Personal access token sent as PRIVATE-TOKEN
    pub private_token: Option<String>,
    /// Pager for `snippet view` (default: $PAGER or "less")
    pub pager: String,
    /// Editor for `snippet edit` (default: $EDITOR or "vi")
    pub editor: String,
    /// Visibility of new snippets: private, internal or public
    pub visibility: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gitlab_url: "https://gitlab.com/".into(),
            private_token: None,
            pager: seed_program(std::env::var("PAGER").ok(), "less"),
            editor: seed_program(std::env::var("EDITOR").ok(), "vi"),
            visibility: "private".into(),
            timeout_secs: 30,
        }
    }
}

/// Default program from `$PAGER`/`$EDITOR`; blank values fall back.
fn seed_program(from_env: Option<String>, fallback: &str) -> String {
    from_env
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Get the XDG config directory for gitlab-cli.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitlab-cli").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in program fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.pager = expand_env_vars(&self.pager);
        self.editor = expand_env_vars(&self.editor);
    }

    /// Overlay config onto self: keys present in the overlay win.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            gitlab_url: overlay
                .gitlab_url
                .clone()
                .unwrap_or_else(|| self.gitlab_url.clone()),
            private_token: overlay
                .private_token
                .clone()
                .or_else(|| self.private_token.clone()),
            pager: overlay.pager.clone().unwrap_or_else(|| self.pager.clone()),
            editor: overlay.editor.clone().unwrap_or_else(|| self.editor.clone()),
            visibility: overlay
                .visibility
                .clone()
                .unwrap_or_else(|| self.visibility.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist when given.
    ///   Without it the global config is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        // 3. GITLAB_CLI_* environment variables
        current = current.apply_env_overrides(Environment::with_prefix(ENV_PREFIX))?;

        // 4. pager / editor environment variables
        current = current.apply_program_overrides(|name| std::env::var(name).ok());

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply `GITLAB_CLI_*` variables from `source` as explicit overrides.
    pub fn apply_env_overrides(mut self, source: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("gitlab_url") {
            self.gitlab_url = val;
        }
        if let Ok(val) = config.get_string("private_token") {
            self.private_token = Some(val);
        }
        if let Ok(val) = config.get_string("pager") {
            self.pager = val;
        }
        if let Ok(val) = config.get_string("editor") {
            self.editor = val;
        }
        if let Ok(val) = config.get_string("visibility") {
            self.visibility = val;
        }
        if let Ok(val) = config.get_string("timeout_secs") {
            self.timeout_secs = val.trim().parse().map_err(|_| ApplicationError::Config {
                message: format!("{ENV_PREFIX}_TIMEOUT_SECS is not a number: {val}"),
            })?;
        }

        Ok(self)
    }

    /// Apply the lowercase `pager` and `editor` variables.
    pub fn apply_program_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(pager) = lookup("pager").filter(|p| !p.trim().is_empty()) {
            self.pager = pager;
        }
        if let Some(editor) = lookup("editor").filter(|e| !e.trim().is_empty()) {
            self.editor = editor;
        }
        self
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let url = Url::parse(&self.gitlab_url).map_err(|e| ApplicationError::Config {
            message: format!("gitlab_url {:?}: {}", self.gitlab_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ApplicationError::Config {
                message: format!("gitlab_url {:?} is not an http(s) URL", self.gitlab_url),
            });
        }
        if !matches!(self.visibility.as_str(), "private" | "internal" | "public") {
            return Err(ApplicationError::Config {
                message: format!(
                    "visibility must be private, internal or public, not {:?}",
                    self.visibility
                ),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML, with the token redacted.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.private_token.is_some() {
            shown.private_token = Some(REDACTED.to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# gitlab-cli configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/gitlab-cli/config.toml (or --config <path>)
#   Env:  GITLAB_CLI_* environment variables (e.g. GITLAB_CLI_PRIVATE_TOKEN)
#   Env:  pager / editor override the programs below

# Web root of your GitLab server
gitlab_url = "https://gitlab.com/"

# Personal access token with the "api" scope
# private_token = "glpat-..."

# Pager for `gitlab snippet view`
# pager = "less"

# Editor for `gitlab snippet edit`
# editor = "vi"

# Visibility of new snippets: private, internal or public
# visibility = "private"

# HTTP request timeout in seconds
# timeout_secs = 30
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
