use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::Release;
use crate::error::{DrafterError, Result};
use crate::github::{CreateReleaseRequest, GitHubApi, UpdateReleaseRequest};

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Public GitHub GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Page size for listing pull request files
const FILES_PER_PAGE: usize = 100;

/// GitHub caps the files listing at 3000 entries
const MAX_FILE_PAGES: u32 = 30;

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// GitHub client for one repository
pub struct GitHubClient {
    http: Client,
    token: String,
    api_url: String,
    graphql_url: String,
    owner: String,
    repository: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub endpoints
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = Client::builder()
            .user_agent(concat!("release-drafter/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            http,
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            owner: owner.into(),
            repository: repository.into(),
        })
    }

    /// Point the client at another deployment (e.g. GitHub Enterprise)
    pub fn with_endpoints(mut self, api_url: impl Into<String>, graphql_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self.graphql_url = graphql_url.into();
        self
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.owner, self.repository, path
        )
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(DrafterError::remote(format!(
                "{} returned {}: {}",
                what, status, error_text
            )));
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.send(request, what)?;
        Ok(response.json()?)
    }
}

impl GitHubApi for GitHubClient {
    fn graphql(&self, query: &str, variables: &Value) -> Result<Value> {
        let request = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }));
        let response: GraphqlResponse = self.send_json(request, "GraphQL query")?;

        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(DrafterError::remote(format!(
                "GraphQL query failed: {}",
                messages.join("; ")
            )));
        }

        response
            .data
            .ok_or_else(|| DrafterError::protocol_shape("GraphQL response has no data"))
    }

    fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<Release>> {
        debug!("Listing releases page {} ({} per page)", page, per_page);
        let request = self
            .http
            .get(self.repo_url("releases"))
            .query(&[("per_page", per_page), ("page", page)]);
        self.send_json(request, "List releases")
    }

    fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release> {
        let request = self.http.post(self.repo_url("releases")).json(request);
        self.send_json(request, "Create release")
    }

    fn update_release(&self, release_id: u64, request: &UpdateReleaseRequest) -> Result<Release> {
        let request = self
            .http
            .patch(self.repo_url(&format!("releases/{}", release_id)))
            .json(request);
        self.send_json(request, "Update release")
    }

    fn list_pull_request_files(&self, number: u64) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for page in 1..=MAX_FILE_PAGES {
            let request = self
                .http
                .get(self.repo_url(&format!("pulls/{}/files", number)))
                .query(&[("per_page", FILES_PER_PAGE as u32), ("page", page)]);
            let batch: Vec<PullRequestFile> = self.send_json(request, "List pull request files")?;
            let done = batch.len() < FILES_PER_PAGE;
            files.extend(batch.into_iter().map(|f| f.filename));
            if done {
                break;
            }
        }
        Ok(files)
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let request = self
            .http
            .post(self.repo_url(&format!("issues/{}/labels", number)))
            .json(&json!({ "labels": labels }));
        self.send(request, "Add labels")?;
        Ok(())
    }
}
