use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::domain::Release;
use crate::error::{DrafterError, Result};
use crate::github::{CreateReleaseRequest, GitHubApi, UpdateReleaseRequest};

/// A write the drafter sent to the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Create(CreateReleaseRequest),
    Update(u64, UpdateReleaseRequest),
    AddLabels(u64, Vec<String>),
}

/// History pages keyed by `(path, after)` cursor
type PageKey = (Option<String>, Option<String>);

#[derive(Default)]
struct MockState {
    releases: Vec<Release>,
    requests: Vec<RecordedRequest>,
    graphql_variables: Vec<Value>,
}

/// Mock GitHub for testing without network access
pub struct MockGitHub {
    owner: String,
    repository: String,
    history: HashMap<PageKey, Value>,
    pull_request_files: HashMap<u64, Vec<String>>,
    state: Mutex<MockState>,
}

impl MockGitHub {
    /// Create a new empty mock for `owner/repository`
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        MockGitHub {
            owner: owner.into(),
            repository: repository.into(),
            history: HashMap::new(),
            pull_request_files: HashMap::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Add an existing release
    pub fn add_release(&mut self, release: Release) {
        self.state
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .releases
            .push(release);
    }

    /// Serve `data` for the history query at cursor `after`
    pub fn add_history_page(&mut self, after: Option<&str>, data: Value) {
        self.history.insert((None, after.map(str::to_string)), data);
    }

    /// Serve `data` for the path-scoped history query of `path` at cursor `after`
    pub fn add_path_history_page(&mut self, path: &str, after: Option<&str>, data: Value) {
        self.history
            .insert((Some(path.to_string()), after.map(str::to_string)), data);
    }

    pub fn set_pull_request_files(&mut self, number: u64, files: Vec<String>) {
        self.pull_request_files.insert(number, files);
    }

    /// Current releases, including ones created by the drafter
    pub fn releases(&self) -> Vec<Release> {
        self.lock().map(|s| s.releases.clone()).unwrap_or_default()
    }

    /// Writes received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().map(|s| s.requests.clone()).unwrap_or_default()
    }

    /// Variables of every GraphQL query received so far
    pub fn graphql_variables(&self) -> Vec<Value> {
        self.lock()
            .map(|s| s.graphql_variables.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| DrafterError::remote("mock state poisoned"))
    }

    fn html_url(&self, tag: &str) -> String {
        format!(
            "https://github.com/{}/{}/releases/tag/{}",
            self.owner, self.repository, tag
        )
    }
}

impl GitHubApi for MockGitHub {
    fn graphql(&self, _query: &str, variables: &Value) -> Result<Value> {
        self.lock()?.graphql_variables.push(variables.clone());

        let path = variables
            .get("path")
            .and_then(Value::as_str)
            .map(str::to_string);
        let after = variables
            .get("after")
            .and_then(Value::as_str)
            .map(str::to_string);

        self.history
            .get(&(path.clone(), after.clone()))
            .cloned()
            .ok_or_else(|| {
                DrafterError::remote(format!(
                    "no mock history page for path {:?} after {:?}",
                    path, after
                ))
            })
    }

    fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<Release>> {
        let state = self.lock()?;
        let start = (page.saturating_sub(1) as usize) * per_page as usize;
        Ok(state
            .releases
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release> {
        let mut state = self.lock()?;
        let id = state.releases.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let release = Release {
            id,
            tag_name: request.tag_name.clone(),
            name: Some(request.name.clone()).filter(|n| !n.is_empty()),
            target_commitish: request.target_commitish.clone(),
            body: Some(request.body.clone()),
            draft: request.draft,
            prerelease: request.prerelease,
            created_at: Utc::now(),
            html_url: self.html_url(&request.tag_name),
            upload_url: format!(
                "https://uploads.github.com/repos/{}/{}/releases/{}/assets",
                self.owner, self.repository, id
            ),
        };
        state.releases.push(release.clone());
        state.requests.push(RecordedRequest::Create(request.clone()));
        Ok(release)
    }

    fn update_release(&self, release_id: u64, request: &UpdateReleaseRequest) -> Result<Release> {
        let mut state = self.lock()?;
        state
            .requests
            .push(RecordedRequest::Update(release_id, request.clone()));

        let html_url = request.tag_name.as_deref().map(|tag| self.html_url(tag));
        let release = state
            .releases
            .iter_mut()
            .find(|r| r.id == release_id)
            .ok_or_else(|| DrafterError::remote(format!("release {} not found", release_id)))?;

        if let Some(name) = &request.name {
            release.name = Some(name.clone());
        }
        if let Some(tag) = &request.tag_name {
            release.tag_name = tag.clone();
        }
        if let Some(url) = html_url {
            release.html_url = url;
        }
        if let Some(target) = &request.target_commitish {
            release.target_commitish = target.clone();
        }
        release.body = Some(request.body.clone());
        release.draft = request.draft;
        release.prerelease = request.prerelease;
        Ok(release.clone())
    }

    fn list_pull_request_files(&self, number: u64) -> Result<Vec<String>> {
        Ok(self
            .pull_request_files
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        self.lock()?
            .requests
            .push(RecordedRequest::AddLabels(number, labels.to_vec()));
        Ok(())
    }
}

/// Builders for GraphQL and REST fixtures
pub mod fixtures {
    use super::*;

    /// A release as the REST API would list it
    pub fn release(id: u64, tag: &str, created_at: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            target_commitish: "main".to_string(),
            body: None,
            draft: false,
            prerelease: false,
            created_at: timestamp(created_at),
            html_url: format!("https://github.com/o/r/releases/tag/{}", tag),
            upload_url: String::new(),
        }
    }

    pub fn timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default()
    }

    /// A `data` object holding one page of commit history
    pub fn history_page(nodes: Vec<Value>, end_cursor: Option<&str>) -> Value {
        json!({
            "repository": {
                "object": {
                    "__typename": "Commit",
                    "history": {
                        "pageInfo": {
                            "hasNextPage": end_cursor.is_some(),
                            "endCursor": end_cursor
                        },
                        "nodes": nodes
                    }
                }
            }
        })
    }

    /// A commit node with the given associated pull requests
    pub fn commit(id: &str, committed_date: &str, pull_requests: Vec<Value>) -> Value {
        json!({
            "id": id,
            "committedDate": committed_date,
            "author": { "name": format!("{} author", id), "user": null },
            "associatedPullRequests": { "nodes": pull_requests }
        })
    }

    /// A commit node whose author maps to a platform login
    pub fn commit_by(id: &str, committed_date: &str, login: &str, pull_requests: Vec<Value>) -> Value {
        let mut node = commit(id, committed_date, pull_requests);
        node["author"] = json!({ "name": login, "user": { "login": login } });
        node
    }

    /// A merged pull request into `o/r`
    pub fn pull_request(number: u64, title: &str, author: &str, labels: &[&str]) -> Value {
        json!({
            "number": number,
            "title": title,
            "url": format!("https://github.com/o/r/pull/{}", number),
            "body": format!("Body of #{}", number),
            "author": {
                "login": author,
                "__typename": "User",
                "url": format!("https://github.com/{}", author)
            },
            "baseRepository": { "nameWithOwner": "o/r" },
            "mergedAt": "2024-02-01T00:00:00Z",
            "isCrossRepository": false,
            "labels": { "nodes": labels.iter().map(|l| json!({ "name": l })).collect::<Vec<_>>() },
            "merged": true,
            "baseRefName": "main",
            "headRefName": format!("branch-{}", number)
        })
    }
}
