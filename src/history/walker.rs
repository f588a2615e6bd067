use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::domain::Commit;
use crate::error::{DrafterError, Result};
use crate::github::graphql::{
    CommitNode, HistoryConnection, PathCommitNode, QueryData, RefObject, HISTORY_QUERY,
    PATH_HISTORY_QUERY,
};
use crate::github::GitHubApi;

/// Query sizing and optional pull request fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub history_limit: u32,
    pub pull_request_limit: u32,
    pub with_body: bool,
    pub with_url: bool,
    pub with_base_ref_name: bool,
    pub with_head_ref_name: bool,
}

impl WalkOptions {
    /// Fetch only the pull request fields `change-template` references
    pub fn from_config(config: &Config) -> Self {
        WalkOptions {
            history_limit: config.history_limit,
            pull_request_limit: config.pull_request_limit,
            with_body: config.change_template_uses("$BODY"),
            with_url: config.change_template_uses("$URL"),
            with_base_ref_name: config.change_template_uses("$BASE_REF_NAME"),
            with_head_ref_name: config.change_template_uses("$HEAD_REF_NAME"),
        }
    }
}

/// Commit ids touching each scoped path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatches(BTreeMap<String, HashSet<String>>);

impl PathMatches {
    pub fn insert(&mut self, path: impl Into<String>, ids: HashSet<String>) {
        self.0.insert(path.into(), ids);
    }

    /// True when no path saw any commit
    pub fn is_empty(&self) -> bool {
        self.0.values().all(HashSet::is_empty)
    }

    /// Whether `commit_id` touched at least one scoped path
    pub fn contains(&self, commit_id: &str) -> bool {
        self.0.values().any(|ids| ids.contains(commit_id))
    }
}

/// Walks the commit history of one ref through the GraphQL API
pub struct HistoryWalker<'a, G: GitHubApi + ?Sized> {
    api: &'a G,
    owner: &'a str,
    repository: &'a str,
    options: WalkOptions,
}

impl<'a, G: GitHubApi + ?Sized> HistoryWalker<'a, G> {
    pub fn new(api: &'a G, owner: &'a str, repository: &'a str, options: WalkOptions) -> Self {
        HistoryWalker {
            api,
            owner,
            repository,
            options,
        }
    }

    /// Commits reachable from `target_commitish`, newest first.
    ///
    /// With `since` set, only commits after it are returned; the commit dated exactly
    /// `since` belongs to the previous release and is dropped.
    ///
    /// # Errors
    /// - [`DrafterError::ProtocolShape`] if the ref is not a commit or a page is malformed
    /// - [`DrafterError::Remote`] if the query fails
    pub fn commits(
        &self,
        target_commitish: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>> {
        info!(
            "Fetching commit history of {} since {}",
            target_commitish,
            since
                .map(|s| s.to_rfc3339())
                .unwrap_or_else(|| "the beginning".to_string())
        );

        let mut variables = self.base_variables(target_commitish, since);
        variables.insert(
            "pullRequestLimit".to_string(),
            Value::from(self.options.pull_request_limit),
        );
        variables.insert("withPullRequestBody".to_string(), Value::Bool(self.options.with_body));
        variables.insert("withPullRequestURL".to_string(), Value::Bool(self.options.with_url));
        variables.insert(
            "withBaseRefName".to_string(),
            Value::Bool(self.options.with_base_ref_name),
        );
        variables.insert(
            "withHeadRefName".to_string(),
            Value::Bool(self.options.with_head_ref_name),
        );

        let nodes: Vec<CommitNode> = self.paginate(HISTORY_QUERY, variables)?;
        let commits: Vec<Commit> = nodes
            .into_iter()
            .map(Commit::from)
            .filter(|c| Some(c.committed_date) != since)
            .collect();

        info!("Found {} commits", commits.len());
        Ok(commits)
    }

    /// Commit ids touching each of `paths`, one history walk per path
    pub fn path_matches(
        &self,
        target_commitish: &str,
        since: Option<DateTime<Utc>>,
        paths: &[String],
    ) -> Result<PathMatches> {
        let mut matches = PathMatches::default();
        for path in paths {
            let mut variables = self.base_variables(target_commitish, since);
            variables.insert("path".to_string(), Value::String(path.clone()));

            let nodes: Vec<PathCommitNode> = self.paginate(PATH_HISTORY_QUERY, variables)?;
            debug!("{} commits touch {}", nodes.len(), path);
            matches.insert(path.clone(), nodes.into_iter().map(|n| n.id).collect());
        }
        Ok(matches)
    }

    fn base_variables(
        &self,
        target_commitish: &str,
        since: Option<DateTime<Utc>>,
    ) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("owner".to_string(), Value::String(self.owner.to_string()));
        variables.insert("name".to_string(), Value::String(self.repository.to_string()));
        variables.insert(
            "targetCommitish".to_string(),
            Value::String(target_commitish.to_string()),
        );
        variables.insert(
            "since".to_string(),
            since
                .map(|s| Value::String(s.to_rfc3339_opts(SecondsFormat::Secs, true)))
                .unwrap_or(Value::Null),
        );
        variables.insert(
            "historyLimit".to_string(),
            Value::from(self.options.history_limit),
        );
        variables
    }

    /// Follow `endCursor` until the last page, collecting typed nodes
    fn paginate<T: DeserializeOwned>(
        &self,
        query: &str,
        mut variables: Map<String, Value>,
    ) -> Result<Vec<T>> {
        let mut nodes = Vec::new();
        let mut seen_cursors = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            variables.insert(
                "after".to_string(),
                cursor.clone().map(Value::String).unwrap_or(Value::Null),
            );
            let data = self.api.graphql(query, &Value::Object(variables.clone()))?;
            let history = extract_history(data)?;

            let page_info = history
                .page_info
                .ok_or_else(|| DrafterError::protocol_shape("history page has no pageInfo"))?;
            let page_nodes = history
                .nodes
                .ok_or_else(|| DrafterError::protocol_shape("history page has no nodes"))?;

            debug!(
                "Fetched history page after {:?} with {} nodes",
                cursor,
                page_nodes.len()
            );
            for node in page_nodes {
                let node = serde_json::from_value(node).map_err(|e| {
                    DrafterError::protocol_shape(format!("malformed history node: {}", e))
                })?;
                nodes.push(node);
            }

            if !page_info.has_next_page {
                return Ok(nodes);
            }
            let next = page_info.end_cursor.ok_or_else(|| {
                DrafterError::protocol_shape("hasNextPage is set but endCursor is missing")
            })?;
            if !seen_cursors.insert(next.clone()) {
                return Err(DrafterError::protocol_shape(format!(
                    "cursor '{}' was returned twice",
                    next
                )));
            }
            cursor = Some(next);
        }
    }
}

fn extract_history(data: Value) -> Result<HistoryConnection> {
    let data: QueryData = serde_json::from_value(data)
        .map_err(|e| DrafterError::protocol_shape(format!("unexpected query result: {}", e)))?;
    let object = data
        .repository
        .ok_or_else(|| DrafterError::protocol_shape("repository not found"))?
        .object
        .ok_or_else(|| DrafterError::protocol_shape("target ref not found"))?;

    match object {
        RefObject::Commit {
            history: Some(history),
        } => Ok(history),
        RefObject::Commit { history: None } => {
            Err(DrafterError::protocol_shape("commit has no history"))
        }
        other => Err(DrafterError::protocol_shape(format!(
            "target ref resolves to a {}, not a commit",
            other.kind()
        ))),
    }
}
