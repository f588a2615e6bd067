use std::fmt;

use log::info;

use crate::domain::{Release, ReleasePayload};
use crate::error::Result;
use crate::github::{CreateReleaseRequest, GitHubApi, UpdateReleaseRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    Updated,
}

impl fmt::Display for PublishAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishAction::Created => f.write_str("created"),
            PublishAction::Updated => f.write_str("updated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRelease {
    pub release: Release,
    pub action: PublishAction,
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty())
}

pub fn create_request(payload: &ReleasePayload) -> CreateReleaseRequest {
    CreateReleaseRequest {
        tag_name: payload.tag.clone(),
        name: payload.name.clone(),
        body: payload.body.clone(),
        target_commitish: payload.target_commitish.clone(),
        draft: payload.draft,
        prerelease: payload.prerelease,
        make_latest: payload.make_latest,
    }
}

/// Update request that leaves the remote name, tag and target alone when ours are empty
pub fn update_request(payload: &ReleasePayload) -> UpdateReleaseRequest {
    UpdateReleaseRequest {
        name: non_empty(&payload.name),
        tag_name: non_empty(&payload.tag),
        target_commitish: non_empty(&payload.target_commitish),
        body: payload.body.clone(),
        draft: payload.draft,
        prerelease: payload.prerelease,
        make_latest: payload.make_latest,
    }
}

/// Update `draft` when there is one, otherwise create a new release
pub fn publish_release<G: GitHubApi + ?Sized>(
    api: &G,
    draft: Option<&Release>,
    payload: &ReleasePayload,
) -> Result<PublishedRelease> {
    match draft {
        Some(draft) => {
            info!("Updating existing release {} ({})", draft.id, draft.tag_name);
            let release = api.update_release(draft.id, &update_request(payload))?;
            Ok(PublishedRelease {
                release,
                action: PublishAction::Updated,
            })
        }
        None => {
            info!("Creating new release {}", payload.tag);
            let release = api.create_release(&create_request(payload))?;
            Ok(PublishedRelease {
                release,
                action: PublishAction::Created,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MakeLatest;
    use crate::github::mock::{fixtures, RecordedRequest};
    use crate::github::MockGitHub;

    fn payload(name: &str, tag: &str) -> ReleasePayload {
        ReleasePayload {
            name: name.to_string(),
            tag: tag.to_string(),
            body: "## What's Changed".to_string(),
            target_commitish: String::new(),
            prerelease: false,
            draft: true,
            make_latest: MakeLatest::True,
            resolved_version: None,
        }
    }

    #[test]
    fn test_update_omits_empty_fields() {
        let request = update_request(&payload("", "v1.0.0"));
        assert_eq!(request.name, None);
        assert_eq!(request.tag_name.as_deref(), Some("v1.0.0"));
        assert_eq!(request.target_commitish, None);
    }

    #[test]
    fn test_creates_without_draft() {
        let github = MockGitHub::new("o", "r");
        let published = publish_release(&github, None, &payload("v1.0.0", "v1.0.0")).unwrap();
        assert_eq!(published.action, PublishAction::Created);
        assert!(published.release.draft);
        assert!(matches!(github.requests()[0], RecordedRequest::Create(_)));
    }

    #[test]
    fn test_updates_existing_draft() {
        let mut github = MockGitHub::new("o", "r");
        let mut draft = fixtures::release(7, "v0.9.0", "2024-01-01T00:00:00Z");
        draft.draft = true;
        github.add_release(draft.clone());

        let published = publish_release(&github, Some(&draft), &payload("", "v1.0.0")).unwrap();
        assert_eq!(published.action, PublishAction::Updated);
        assert_eq!(published.release.id, 7);
        assert_eq!(published.release.tag_name, "v1.0.0");
        assert_eq!(published.release.name.as_deref(), Some("v0.9.0"));
        assert_eq!(github.releases().len(), 1);
    }
}
