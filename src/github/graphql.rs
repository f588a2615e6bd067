//! GraphQL documents and response shapes for commit history.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Author, Commit, CommitAuthor, PullRequest};

/// Commits reachable from a ref, each with the pull requests that introduced it.
///
/// Optional pull request fields are only requested when a template needs them.
pub const HISTORY_QUERY: &str = r#"
query findCommitsWithAssociatedPullRequests(
  $name: String!
  $owner: String!
  $targetCommitish: String!
  $withPullRequestBody: Boolean!
  $withPullRequestURL: Boolean!
  $withBaseRefName: Boolean!
  $withHeadRefName: Boolean!
  $since: GitTimestamp
  $after: String
  $pullRequestLimit: Int!
  $historyLimit: Int!
) {
  repository(name: $name, owner: $owner) {
    object(expression: $targetCommitish) {
      __typename
      ... on Commit {
        history(first: $historyLimit, since: $since, after: $after) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            id
            committedDate
            author {
              name
              user {
                login
              }
            }
            associatedPullRequests(first: $pullRequestLimit) {
              nodes {
                title
                number
                url @include(if: $withPullRequestURL)
                body @include(if: $withPullRequestBody)
                author {
                  login
                  __typename
                  url
                }
                baseRepository {
                  nameWithOwner
                }
                mergedAt
                isCrossRepository
                labels(first: 100) {
                  nodes {
                    name
                  }
                }
                merged
                baseRefName @include(if: $withBaseRefName)
                headRefName @include(if: $withHeadRefName)
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// Ids of commits touching one path
pub const PATH_HISTORY_QUERY: &str = r#"
query findCommitsWithPathChanges(
  $name: String!
  $owner: String!
  $targetCommitish: String!
  $since: GitTimestamp
  $after: String
  $path: String
  $historyLimit: Int!
) {
  repository(name: $name, owner: $owner) {
    object(expression: $targetCommitish) {
      __typename
      ... on Commit {
        history(path: $path, since: $since, after: $after, first: $historyLimit) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            id
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
pub struct QueryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub object: Option<RefObject>,
}

/// Whatever a ref expression resolved to
#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub enum RefObject {
    Commit { history: Option<HistoryConnection> },
    Blob,
    Tree,
    Tag,
}

impl RefObject {
    pub fn kind(&self) -> &'static str {
        match self {
            RefObject::Commit { .. } => "commit",
            RefObject::Blob => "blob",
            RefObject::Tree => "tree",
            RefObject::Tag => "tag",
        }
    }
}

/// One page of history; nodes stay raw until the caller picks a node type
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConnection {
    pub page_info: Option<PageInfo>,
    pub nodes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct PathCommitNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub id: String,
    pub committed_date: DateTime<Utc>,
    pub author: Option<GitActorNode>,
    pub associated_pull_requests: Connection<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub struct GitActorNode {
    pub name: Option<String>,
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
pub struct UserNode {
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    pub url: Option<String>,
    pub body: Option<String>,
    pub author: Option<ActorNode>,
    pub base_repository: Option<RepositoryNameNode>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged: bool,
    pub labels: Option<Connection<LabelNode>>,
    pub base_ref_name: Option<String>,
    pub head_ref_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActorNode {
    pub login: String,
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNameNode {
    pub name_with_owner: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

impl From<ActorNode> for Author {
    fn from(node: ActorNode) -> Self {
        Author {
            is_bot: node.typename.as_deref() == Some("Bot"),
            login: node.login,
            url: node.url.unwrap_or_default(),
        }
    }
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        PullRequest {
            number: node.number,
            title: node.title,
            body: node.body,
            url: node.url,
            author: node.author.map(Author::from),
            base_repository: node.base_repository.map(|r| r.name_with_owner),
            base_ref_name: node.base_ref_name,
            head_ref_name: node.head_ref_name,
            merged: node.merged,
            merged_at: node.merged_at,
            labels: node
                .labels
                .map(|c| c.nodes.into_iter().map(|l| l.name).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<CommitNode> for Commit {
    fn from(node: CommitNode) -> Self {
        let author = node
            .author
            .map(|a| CommitAuthor {
                name: a.name,
                login: a.user.map(|u| u.login),
            })
            .unwrap_or_default();

        Commit {
            id: node.id,
            committed_date: node.committed_date,
            author,
            associated_pull_requests: node
                .associated_pull_requests
                .nodes
                .into_iter()
                .map(PullRequest::from)
                .collect(),
        }
    }
}
