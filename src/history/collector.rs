use std::collections::HashSet;

use log::debug;

use crate::config::{SortBy, SortDirection};
use crate::domain::{Commit, PullRequest};
use crate::history::walker::PathMatches;

/// Keep only commits that touched a scoped path. No scoping keeps everything.
pub fn scope_commits(commits: Vec<Commit>, path_matches: Option<&PathMatches>) -> Vec<Commit> {
    match path_matches {
        None => commits,
        Some(matches) => {
            let before = commits.len();
            let scoped: Vec<Commit> = commits
                .into_iter()
                .filter(|c| matches.contains(&c.id))
                .collect();
            debug!("Path scoping kept {} of {} commits", scoped.len(), before);
            scoped
        }
    }
}

/// Merged pull requests into `repository` (`owner/name`) carried by `commits`.
///
/// A pull request reached through several commits appears once, in the position
/// of its first sighting.
pub fn collect_pull_requests(commits: &[Commit], repository: &str) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    commits
        .iter()
        .flat_map(|c| c.associated_pull_requests.iter())
        .filter(|pr| seen.insert(pr.number))
        .filter(|pr| pr.merged && pr.base_repository.as_deref() == Some(repository))
        .cloned()
        .collect()
}

/// Order pull requests for the changelog
pub fn sort_pull_requests(pull_requests: &mut [PullRequest], by: SortBy, direction: SortDirection) {
    pull_requests.sort_by(|a, b| {
        let ordering = match by {
            SortBy::MergedAt => a.merged_at.cmp(&b.merged_at),
            SortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
