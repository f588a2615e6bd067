use chrono::{DateTime, Utc};

/// Author of a pull request as reported by the hosting platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub is_bot: bool,
    pub url: String,
}

impl Author {
    /// Form used for `$AUTHOR` in change lines
    pub fn display_name(&self) -> String {
        if self.is_bot {
            format!("[{}[bot]]({})", self.login, self.url)
        } else {
            self.login.clone()
        }
    }

    /// Form used in the contributors sentence
    pub fn mention(&self) -> String {
        if self.is_bot {
            self.display_name()
        } else {
            format!("@{}", self.login)
        }
    }
}

/// Git author of a commit, with the platform login when the email maps to an account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub url: Option<String>,
    pub author: Option<Author>,
    /// `owner/name` of the repository the pull request was merged into
    pub base_repository: Option<String>,
    pub base_ref_name: Option<String>,
    pub head_ref_name: Option<String>,
    pub merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

impl PullRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }

    pub fn has_any_label(&self, names: &[String]) -> bool {
        names.iter().any(|name| self.has_label(name))
    }

    /// `$AUTHOR` value, `ghost` for deleted accounts
    pub fn author_display(&self) -> String {
        self.author
            .as_ref()
            .map(Author::display_name)
            .unwrap_or_else(|| "ghost".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub id: String,
    pub committed_date: DateTime<Utc>,
    pub author: CommitAuthor,
    pub associated_pull_requests: Vec<PullRequest>,
}
