use std::collections::BTreeSet;

use crate::config::Config;
use crate::domain::{Commit, PullRequest};

/// Names credited in `$CONTRIBUTORS`, sorted and deduplicated
pub fn contributors(commits: &[Commit], pull_requests: &[PullRequest], excluded: &[String]) -> Vec<String> {
    let is_excluded = |login: &str| excluded.iter().any(|e| e == login);
    let mut names = BTreeSet::new();

    for commit in commits {
        match (&commit.author.login, &commit.author.name) {
            (Some(login), _) if !is_excluded(login) => {
                names.insert(format!("@{}", login));
            }
            (None, Some(name)) if !name.is_empty() => {
                names.insert(name.clone());
            }
            _ => {}
        }
    }

    for author in pull_requests.iter().filter_map(|pr| pr.author.as_ref()) {
        if !is_excluded(&author.login) {
            names.insert(author.mention());
        }
    }

    names.into_iter().collect()
}

/// `a, b and c`, or `no-contributors-template` when nobody is credited
pub fn contributors_sentence(commits: &[Commit], pull_requests: &[PullRequest], config: &Config) -> String {
    let names = contributors(commits, pull_requests, &config.exclude_contributors);
    match names.as_slice() {
        [] => config.no_contributors_template.clone(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, CommitAuthor};
    use crate::github::mock::fixtures::timestamp;

    fn commit(login: Option<&str>, name: Option<&str>) -> Commit {
        Commit {
            id: "C".to_string(),
            committed_date: timestamp("2024-01-01T00:00:00Z"),
            author: CommitAuthor {
                name: name.map(str::to_string),
                login: login.map(str::to_string),
            },
            associated_pull_requests: vec![],
        }
    }

    fn pr_by(login: &str, is_bot: bool) -> PullRequest {
        PullRequest {
            number: 1,
            title: String::new(),
            body: None,
            url: None,
            author: Some(Author {
                login: login.to_string(),
                is_bot,
                url: format!("https://github.com/apps/{}", login),
            }),
            base_repository: None,
            base_ref_name: None,
            head_ref_name: None,
            merged: true,
            merged_at: None,
            labels: vec![],
        }
    }

    #[test]
    fn test_sentence_joins_with_and() {
        let commits = vec![commit(Some("zed"), None), commit(None, Some("Ann Smith"))];
        let prs = vec![pr_by("bob", false), pr_by("zed", false)];
        let sentence = contributors_sentence(&commits, &prs, &Config::default());
        assert_eq!(sentence, "@bob, @zed and Ann Smith");
    }

    #[test]
    fn test_single_contributor() {
        let sentence = contributors_sentence(&[commit(Some("solo"), None)], &[], &Config::default());
        assert_eq!(sentence, "@solo");
    }

    #[test]
    fn test_excluded_and_empty() {
        let config = Config {
            exclude_contributors: vec!["robot".to_string()],
            ..Config::default()
        };
        let sentence = contributors_sentence(&[commit(Some("robot"), Some("Robot"))], &[pr_by("robot", false)], &config);
        assert_eq!(sentence, "No contributors");
    }

    #[test]
    fn test_bot_pull_request_author() {
        let names = contributors(&[], &[pr_by("renovate", true)], &[]);
        assert_eq!(names, vec!["[renovate[bot]](https://github.com/apps/renovate)".to_string()]);
    }
}
