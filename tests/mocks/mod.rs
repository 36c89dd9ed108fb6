//! Mock I/O boundaries shared by the integration tests
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gitlab_cli::application::services::{Collaborators, SnippetService};
use gitlab_cli::config::Settings;
use gitlab_cli::domain::{
    Author, NewSnippet, Project, ProjectRef, SnippetData, SnippetId, SnippetUpdate, User,
};
use gitlab_cli::infrastructure::di::ServiceContainer;
use gitlab_cli::infrastructure::traits::{
    ApiError, ApiResult, Console, Editor, Pager, ProjectApi, RealFileSystem, SnippetApi,
};

pub const BASE_URL: &str = "https://gitlab.example.com/";
pub const PROJECT_ID: u64 = 10;
pub const PROJECT_PATH: &str = "myns/myproj";

/// Every call the API mock received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Project(ProjectRef),
    List(u64),
    Get(u64, SnippetId),
    Content(u64, SnippetId),
    Create(u64, NewSnippet),
    Update(u64, SnippetId, SnippetUpdate),
    Delete(u64, SnippetId),
}

/// In-memory GitLab: one project, one snippet.
pub struct MockGitLab {
    calls: Mutex<Vec<ApiCall>>,
    snippet: SnippetData,
    content: String,
    fail_status: Option<u16>,
}

impl MockGitLab {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            snippet: snippet_data(6),
            content: "puts 'hello'\n".to_string(),
            fail_status: None,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_snippet(mut self, snippet: SnippetData) -> Self {
        self.snippet = snippet;
        self
    }

    /// Every snippet endpoint answers with this HTTP status.
    pub fn failing(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_status {
            Some(status) => Err(ApiError::Status {
                method: "GET".into(),
                url: "mock".into(),
                status,
                message: "mock failure".into(),
            }),
            None => Ok(()),
        }
    }

    /// Echo what the server would store after a create/update.
    fn stored(&self, title: &str, file_name: &str) -> SnippetData {
        SnippetData {
            title: title.to_string(),
            file_name: file_name.to_string(),
            ..self.snippet.clone()
        }
    }
}

impl SnippetApi for MockGitLab {
    fn list(&self, project_id: u64) -> ApiResult<Vec<SnippetData>> {
        self.record(ApiCall::List(project_id))?;
        Ok(vec![self.snippet.clone(), snippet_data(7)])
    }

    fn get(&self, project_id: u64, id: &SnippetId) -> ApiResult<SnippetData> {
        self.record(ApiCall::Get(project_id, id.clone()))?;
        Ok(self.snippet.clone())
    }

    fn content(&self, project_id: u64, id: &SnippetId) -> ApiResult<String> {
        self.record(ApiCall::Content(project_id, id.clone()))?;
        Ok(self.content.clone())
    }

    fn create(&self, project_id: u64, snippet: &NewSnippet) -> ApiResult<SnippetData> {
        self.record(ApiCall::Create(project_id, snippet.clone()))?;
        Ok(self.stored(&snippet.title, &snippet.file_name))
    }

    fn update(
        &self,
        project_id: u64,
        id: &SnippetId,
        update: &SnippetUpdate,
    ) -> ApiResult<SnippetData> {
        self.record(ApiCall::Update(project_id, id.clone(), update.clone()))?;
        Ok(self.stored(&update.title, &update.file_name))
    }

    fn delete(&self, project_id: u64, id: &SnippetId) -> ApiResult<()> {
        self.record(ApiCall::Delete(project_id, id.clone()))
    }
}

impl ProjectApi for MockGitLab {
    fn project(&self, project: &ProjectRef) -> ApiResult<Project> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Project(project.clone()));
        Ok(Project {
            id: PROJECT_ID,
            path_with_namespace: PROJECT_PATH.to_string(),
        })
    }
}

/// Editor that records what it saw and optionally rewrites the file.
pub struct MockEditor {
    replacement: Option<String>,
    should_fail: bool,
    seen: Mutex<Vec<(PathBuf, String)>>,
}

impl MockEditor {
    pub fn new() -> Self {
        Self {
            replacement: None,
            should_fail: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the user replacing the whole buffer.
    pub fn writing(content: &str) -> Self {
        Self {
            replacement: Some(content.to_string()),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// (path, content at open time) for every invocation.
    pub fn seen(&self) -> Vec<(PathBuf, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Editor for MockEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        let before = std::fs::read_to_string(path)?;
        self.seen.lock().unwrap().push((path.to_path_buf(), before));
        if self.should_fail {
            return Err(io::Error::new(io::ErrorKind::Other, "editor failed"));
        }
        if let Some(replacement) = &self.replacement {
            std::fs::write(path, replacement)?;
        }
        Ok(())
    }
}

/// Pager that records the content it was fed.
pub struct MockPager {
    should_fail: bool,
    paged: Mutex<Vec<String>>,
}

impl MockPager {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            paged: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn paged(&self) -> Vec<String> {
        self.paged.lock().unwrap().clone()
    }
}

impl Pager for MockPager {
    fn page(&self, content: &str) -> io::Result<()> {
        self.paged.lock().unwrap().push(content.to_string());
        if self.should_fail {
            Err(io::Error::new(io::ErrorKind::Other, "less exited with status: 1"))
        } else {
            Ok(())
        }
    }
}

/// Console with a canned answer and canned stdin.
pub struct MockConsole {
    answer: String,
    stdin: String,
    questions: Mutex<Vec<String>>,
}

impl MockConsole {
    pub fn new() -> Self {
        Self::answering("")
    }

    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            stdin: String::new(),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn piping(stdin: &str) -> Self {
        Self {
            stdin: stdin.to_string(),
            ..Self::new()
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Console for MockConsole {
    fn ask(&self, question: &str) -> io::Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self.answer.clone())
    }

    fn read_stdin(&self) -> io::Result<String> {
        Ok(self.stdin.clone())
    }
}

/// Mocks wired into a real `SnippetService`.
pub struct Harness {
    pub api: Arc<MockGitLab>,
    pub editor: Arc<MockEditor>,
    pub pager: Arc<MockPager>,
    pub console: Arc<MockConsole>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            MockGitLab::new(),
            MockEditor::new(),
            MockPager::new(),
            MockConsole::new(),
        )
    }

    pub fn with(api: MockGitLab, editor: MockEditor, pager: MockPager, console: MockConsole) -> Self {
        gitlab_cli::util::testing::init_test_setup();
        Self {
            api: Arc::new(api),
            editor: Arc::new(editor),
            pager: Arc::new(pager),
            console: Arc::new(console),
        }
    }

    /// Container wired with the mocks, as the binary wires real implementations.
    pub fn container(&self) -> ServiceContainer {
        let io = Collaborators {
            snippets: self.api.clone(),
            projects: self.api.clone(),
            fs: Arc::new(RealFileSystem),
            editor: self.editor.clone(),
            pager: self.pager.clone(),
            console: self.console.clone(),
        };
        ServiceContainer::with_deps(test_settings(), io)
    }

    pub fn service(&self) -> SnippetService {
        self.container().snippets
    }
}

pub fn test_settings() -> Settings {
    Settings {
        gitlab_url: BASE_URL.to_string(),
        private_token: None,
        pager: "less".to_string(),
        editor: "vi".to_string(),
        visibility: "private".to_string(),
        timeout_secs: 5,
    }
}

pub fn snippet_data(id: u64) -> SnippetData {
    SnippetData {
        id: SnippetId::Number(id),
        title: "Hello".to_string(),
        file_name: "hello.rb".to_string(),
        project_id: Some(PROJECT_ID),
        created_at: "2013-05-01T12:00:00Z".to_string(),
        updated_at: "2013-05-02T08:30:00Z".to_string(),
        expires_at: None,
        author: Some(Author::Resolved(User {
            id: 1,
            username: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            name: "John Doe".to_string(),
            blocked: false,
            state: Some("active".to_string()),
            created_at: None,
        })),
    }
}

pub fn view_url(id: u64) -> String {
    format!("https://gitlab.example.com/{PROJECT_PATH}/snippets/{id}")
}
