//! Hosting platform abstraction layer
//!
//! The [GitHubApi] trait is the only way the drafter talks to the outside world.
//! Implementations carry the `owner/repository` they operate on.
//!
//! - [client::GitHubClient]: REST and GraphQL over HTTPS using `reqwest`
//! - [mock::MockGitHub]: in-memory implementation for testing
//!
//! Code that drafts releases depends on the trait, never on a concrete client.

pub mod client;
pub mod graphql;
pub mod mock;

pub use client::GitHubClient;
pub use mock::MockGitHub;

use serde::{Deserialize, Serialize};

use crate::domain::{MakeLatest, Release};
use crate::error::Result;

/// Body of a create-release request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReleaseRequest {
    pub tag_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_commitish: String,
    pub draft: bool,
    pub prerelease: bool,
    pub make_latest: MakeLatest,
}

/// Body of an update-release request. `None` fields are left unchanged remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReleaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub make_latest: MakeLatest,
}

/// Remote operations the drafter needs
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// Transport failures and non-success statuses surface as
/// [crate::error::DrafterError::Remote] or [crate::error::DrafterError::Http]
/// and abort the run.
pub trait GitHubApi: Send + Sync {
    /// Run a GraphQL query and return its `data` object
    ///
    /// # Arguments
    /// * `query` - GraphQL document
    /// * `variables` - JSON object of query variables
    fn graphql(&self, query: &str, variables: &serde_json::Value) -> Result<serde_json::Value>;

    /// List one page of releases, newest first
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `per_page` - page size, at most 100
    fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<Release>>;

    fn create_release(&self, request: &CreateReleaseRequest) -> Result<Release>;

    fn update_release(&self, release_id: u64, request: &UpdateReleaseRequest) -> Result<Release>;

    /// Paths touched by a pull request
    fn list_pull_request_files(&self, number: u64) -> Result<Vec<String>>;

    /// Add labels to a pull request, keeping the ones already set
    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateReleaseRequest {
            name: None,
            tag_name: Some("v1.0.0".to_string()),
            target_commitish: None,
            body: "notes".to_string(),
            draft: true,
            prerelease: false,
            make_latest: MakeLatest::True,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("name").is_none());
        assert!(json.get("target_commitish").is_none());
        assert_eq!(json["tag_name"], "v1.0.0");
        assert_eq!(json["make_latest"], "true");
    }

    #[test]
    fn test_create_request_omits_empty_name() {
        let request = CreateReleaseRequest {
            tag_name: "v1.0.0".to_string(),
            name: String::new(),
            body: String::new(),
            target_commitish: "main".to_string(),
            draft: true,
            prerelease: false,
            make_latest: MakeLatest::Legacy,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["target_commitish"], "main");
        assert_eq!(json["make_latest"], "legacy");
    }
}
