//! Terminal output formatting
//!
//! Status lines are colored (respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE
//! automatically); snippet data is printed plain so it can be piped.

use colored::Colorize;

use crate::domain::{format_timestamp, Author, Snippet};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Confirmation after `snippet add`.
pub fn created(snippet: &Snippet) -> String {
    format!(
        "Snippet created.\nID: {}\nURL: {}\n",
        snippet.id(),
        snippet.view_url()
    )
}

/// Confirmation after `snippet edit`.
pub fn updated(snippet: &Snippet) -> String {
    format!("Snippet updated.\nURL: {}\n", snippet.view_url())
}

/// The seven-line metadata block of `snippet info`.
pub fn snippet_info(snippet: &Snippet) -> String {
    let author = match snippet.author() {
        Some(author @ Author::Resolved(user)) if user.is_blocked() => {
            format!("{author} (blocked)")
        }
        Some(author) => author.to_string(),
        None => "Unknown".to_string(),
    };
    let expires = snippet
        .expires_at()
        .map(format_timestamp)
        .unwrap_or_else(|| "Never".to_string());

    format!(
        "Snippet ID: {}\nTitle: {}\nFile Name: {}\nAuthor: {}\nCreated at: {}\nUpdated at: {}\nExpires at: {}\n",
        snippet.id(),
        snippet.title(),
        snippet.file_name(),
        author,
        format_timestamp(snippet.created_at()),
        format_timestamp(snippet.updated_at()),
        expires,
    )
}

/// One line of `snippet list`: id, file name and title separated by tabs.
pub fn snippet_line(snippet: &Snippet) -> String {
    format!(
        "{}\t{}\t{}",
        snippet.id(),
        snippet.file_name(),
        snippet.title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Project, SnippetData, SnippetId, User};
    use rstest::rstest;

    fn snippet(expires_at: Option<&str>, author: Option<Author>) -> Snippet {
        let data = SnippetData {
            id: SnippetId::Number(6),
            title: "Hello".into(),
            file_name: "hello.rb".into(),
            project_id: Some(10),
            created_at: "2013-05-01T12:00:00Z".into(),
            updated_at: "2013-05-02T08:30:00Z".into(),
            expires_at: expires_at.map(str::to_string),
            author,
        };
        let project = Project {
            id: 10,
            path_with_namespace: "myns/myproj".into(),
        };
        Snippet::new(data, &project, "https://gitlab.example.com/")
    }

    fn user() -> Author {
        Author::Resolved(User {
            id: 1,
            username: "jdoe".into(),
            email: Some("jdoe@example.com".into()),
            name: "John Doe".into(),
            blocked: false,
            state: None,
            created_at: None,
        })
    }

    #[test]
    fn given_snippet_without_expiry_when_rendering_info_then_prints_seven_fields_with_never() {
        let info = snippet_info(&snippet(None, Some(user())));

        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Snippet ID: 6",
                "Title: Hello",
                "File Name: hello.rb",
                "Author: John Doe <jdoe@example.com>",
                "Created at: 2013-05-01 12:00:00 +0000",
                "Updated at: 2013-05-02 08:30:00 +0000",
                "Expires at: Never",
            ]
        );
    }

    #[test]
    fn given_snippet_with_expiry_when_rendering_info_then_formats_timestamp() {
        let info = snippet_info(&snippet(Some("2013-07-01T00:00:00Z"), Some(user())));

        assert!(info.ends_with("Expires at: 2013-07-01 00:00:00 +0000\n"));
    }

    #[test]
    fn given_unresolved_or_missing_author_when_rendering_info_then_keeps_label() {
        let unresolved = snippet_info(&snippet(None, Some(Author::Unresolved(17))));
        let missing = snippet_info(&snippet(None, None));

        assert!(unresolved.contains("\nAuthor: user #17\n"));
        assert!(missing.contains("\nAuthor: Unknown\n"));
        assert_eq!(missing.lines().count(), 7);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some("blocked"))]
    fn given_blocked_author_when_rendering_info_then_marks_account(
        #[case] blocked: bool,
        #[case] state: Option<&str>,
    ) {
        let author = Author::Resolved(User {
            blocked,
            state: state.map(str::to_string),
            ..match user() {
                Author::Resolved(u) => u,
                Author::Unresolved(_) => unreachable!(),
            }
        });

        let info = snippet_info(&snippet(None, Some(author)));

        assert!(info.contains("\nAuthor: John Doe <jdoe@example.com> (blocked)\n"));
        assert_eq!(info.lines().count(), 7);
    }

    #[test]
    fn given_snippet_when_rendering_created_then_prints_id_and_url() {
        assert_eq!(
            created(&snippet(None, None)),
            "Snippet created.\nID: 6\nURL: https://gitlab.example.com/myns/myproj/snippets/6\n"
        );
    }
}
