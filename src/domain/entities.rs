//! Domain entities: core data structures

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Display format for timestamps (`2013-05-01 12:00:00 +0000`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Numeric identifier of a GitLab user.
pub type UserId = u64;

/// Project as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectRef {
    /// Numeric project id, e.g. `10`
    Id(u64),
    /// Namespaced path, e.g. `myns/myproj`
    Path(String),
}

impl FromStr for ProjectRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse()
                .map(ProjectRef::Id)
                .map_err(|_| DomainError::InvalidProjectRef(s.to_string()));
        }

        let path = trimmed.trim_matches('/');
        let mut segments = path.split('/');
        let well_formed = segments.clone().count() >= 2 && segments.all(|seg| !seg.is_empty());
        if well_formed {
            Ok(ProjectRef::Path(path.to_string()))
        } else {
            Err(DomainError::InvalidProjectRef(s.to_string()))
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{id}"),
            ProjectRef::Path(path) => f.write_str(path),
        }
    }
}

/// Opaque snippet identifier; the API sends integers, older servers strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnippetId {
    Number(u64),
    Text(String),
}

impl FromStr for SnippetId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // `.` and `..` are swallowed as path segments and would hit the collection URL
        if trimmed.is_empty() || trimmed.contains('/') || matches!(trimmed, "." | "..") {
            return Err(DomainError::InvalidSnippetId(s.to_string()));
        }
        Ok(trimmed
            .parse()
            .map(SnippetId::Number)
            .unwrap_or_else(|_| SnippetId::Text(trimmed.to_string())))
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetId::Number(id) => write!(f, "{id}"),
            SnippetId::Text(id) => f.write_str(id),
        }
    }
}

/// Project as returned by the project lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
}

/// GitLab user embedded in a snippet response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub name: String,
    #[serde(default)]
    pub blocked: bool,
    /// Account state (`active`, `blocked`, ...), sent by newer servers instead of `blocked`
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_blocked(&self) -> bool {
        self.blocked || self.state.as_deref() == Some("blocked")
    }
}

/// Snippet author: either a bare user id or a fully parsed user.
///
/// Chosen by the JSON shape: objects must parse as a complete [`User`],
/// scalars become [`Author::Unresolved`]. Anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Resolved(User),
    Unresolved(UserId),
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Resolved(user) => match &user.email {
                Some(email) => write!(f, "{} <{}>", user.name, email),
                None => f.write_str(&user.name),
            },
            Author::Unresolved(id) => write!(f, "user #{id}"),
        }
    }
}

/// Snippet as sent over the wire by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetData {
    pub id: SnippetId,
    pub title: String,
    pub file_name: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

/// Request body for creating a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSnippet {
    pub title: String,
    pub file_name: String,
    pub content: String,
    pub visibility: String,
}

/// Request body for updating a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetUpdate {
    pub title: String,
    pub file_name: String,
    pub content: String,
}

/// One code snippet as known to the remote service, decorated with its web URL.
///
/// Built fresh from every API response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    id: SnippetId,
    project_id: u64,
    title: String,
    file_name: String,
    created_at: String,
    updated_at: String,
    expires_at: Option<String>,
    author: Option<Author>,
    view_url: String,
}

impl Snippet {
    /// Build a record from an API response.
    ///
    /// # Arguments
    /// * `data` - Decoded API response
    /// * `project` - Owning project, used for the view URL and as fallback `project_id`
    /// * `base_url` - Web root of the GitLab server
    pub fn new(data: SnippetData, project: &Project, base_url: &str) -> Self {
        let view_url = view_url(base_url, &project.path_with_namespace, &data.id);
        Self {
            project_id: data.project_id.unwrap_or(project.id),
            id: data.id,
            title: data.title,
            file_name: data.file_name,
            created_at: data.created_at,
            updated_at: data.updated_at,
            expires_at: data.expires_at,
            author: data.author,
            view_url,
        }
    }

    pub fn id(&self) -> &SnippetId {
        &self.id
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }

    /// `None` means the snippet never expires.
    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn view_url(&self) -> &str {
        &self.view_url
    }
}

/// Web URL of a snippet: `<base>/<namespace>/<project>/snippets/<id>`.
///
/// The base is treated as a directory whether or not it ends in `/`.
pub fn view_url(base_url: &str, project_path: &str, id: &SnippetId) -> String {
    format!(
        "{}/{}/snippets/{}",
        base_url.trim_end_matches('/'),
        project_path.trim_matches('/'),
        id
    )
}

/// Render an API timestamp for humans.
///
/// Accepts RFC 3339 timestamps and plain dates (`expires_at` on some servers).
/// Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(TIMESTAMP_FORMAT).to_string();
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc().format(TIMESTAMP_FORMAT).to_string();
    }
    raw.to_string()
}

/// Temp-file suffix matching a snippet's file name, so editors pick the right syntax.
pub fn file_suffix(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Expand environment variables and tilde in a command or path.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
