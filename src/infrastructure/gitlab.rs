//! GitLab REST API (v4) client
//!
//! Blocking reqwest client implementing [`SnippetApi`] and [`ProjectApi`].

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::domain::{NewSnippet, Project, ProjectRef, SnippetData, SnippetId, SnippetUpdate};
use crate::infrastructure::traits::{ApiError, ApiResult, ProjectApi, SnippetApi};
use crate::infrastructure::{InfraError, InfraResult};

/// Header carrying the personal access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// API client bound to one GitLab server.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitLabClient {
    /// Create a client from settings (`gitlab_url`, `private_token`, `timeout_secs`).
    pub fn new(settings: &Settings) -> InfraResult<Self> {
        let api_base = api_base_url(&settings.gitlab_url)?;
        let client = Client::builder()
            .user_agent(concat!("gitlab-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| InfraError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_base,
            token: settings.private_token.clone(),
        })
    }

    /// Build an endpoint URL below `/api/v4`; every segment is percent-encoded,
    /// so `myns/myproj` becomes `myns%2Fmyproj`.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let request = self.client.request(method, url.clone());
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    fn send(&self, method: Method, url: &Url, request: RequestBuilder) -> ApiResult<Response> {
        debug!("{} {}", method, url);
        let response = request.send().map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unknown error".to_string());
        Err(ApiError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    fn fetch_json<T: DeserializeOwned>(&self, method: Method, url: Url) -> ApiResult<T> {
        let request = self.request(method.clone(), &url);
        let response = self.send(method, &url, request)?;
        decode(&url, response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.request(method.clone(), &url).json(body);
        let response = self.send(method, &url, request)?;
        decode(&url, response)
    }

    fn snippet_url(&self, project_id: u64, id: &SnippetId, raw: bool) -> Url {
        let project = project_id.to_string();
        let snippet = id.to_string();
        let mut segments = vec!["projects", project.as_str(), "snippets", snippet.as_str()];
        if raw {
            segments.push("raw");
        }
        self.endpoint(&segments)
    }
}

impl SnippetApi for GitLabClient {
    fn list(&self, project_id: u64) -> ApiResult<Vec<SnippetData>> {
        let project = project_id.to_string();
        let url = self.endpoint(&["projects", &project, "snippets"]);
        self.fetch_json(Method::GET, url)
    }

    fn get(&self, project_id: u64, id: &SnippetId) -> ApiResult<SnippetData> {
        self.fetch_json(Method::GET, self.snippet_url(project_id, id, false))
    }

    fn content(&self, project_id: u64, id: &SnippetId) -> ApiResult<String> {
        let url = self.snippet_url(project_id, id, true);
        let request = self.request(Method::GET, &url);
        let response = self.send(Method::GET, &url, request)?;
        let bytes = response.bytes().map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ApiError::Decode {
            url: url.to_string(),
            message: "snippet content is not valid UTF-8".to_string(),
        })
    }

    fn create(&self, project_id: u64, snippet: &NewSnippet) -> ApiResult<SnippetData> {
        let project = project_id.to_string();
        let url = self.endpoint(&["projects", &project, "snippets"]);
        self.send_json(Method::POST, url, snippet)
    }

    fn update(
        &self,
        project_id: u64,
        id: &SnippetId,
        update: &SnippetUpdate,
    ) -> ApiResult<SnippetData> {
        self.send_json(Method::PUT, self.snippet_url(project_id, id, false), update)
    }

    fn delete(&self, project_id: u64, id: &SnippetId) -> ApiResult<()> {
        let url = self.snippet_url(project_id, id, false);
        let request = self.request(Method::DELETE, &url);
        self.send(Method::DELETE, &url, request).map(|_| ())
    }
}

impl ProjectApi for GitLabClient {
    fn project(&self, project: &ProjectRef) -> ApiResult<Project> {
        let key = project.to_string();
        self.fetch_json(Method::GET, self.endpoint(&["projects", &key]))
    }
}

/// `<gitlab_url>/api/v4`, keeping any path prefix of the server URL.
pub fn api_base_url(gitlab_url: &str) -> InfraResult<Url> {
    let invalid = |message: String| InfraError::InvalidUrl {
        url: gitlab_url.to_string(),
        message,
    };

    let mut url = Url::parse(gitlab_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(["api", "v4"]);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Extract the `message` or `error` field of a GitLab error body.
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => {
            let field = json.get("message").or_else(|| json.get("error"))?;
            Some(match field.as_str() {
                Some(text) => text.to_string(),
                None => field.to_string(),
            })
        }
        Err(_) => Some(trimmed.to_string()),
    }
}

fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> ApiResult<T> {
    let body = response.text().map_err(|e| ApiError::Transport {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
