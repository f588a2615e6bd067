use std::cmp::Ordering;

use log::{debug, info};

use crate::domain::{Commitish, Release, TagPrefix};
use crate::error::Result;
use crate::github::GitHubApi;

/// Releases fetched per page
pub const RELEASES_PER_PAGE: u32 = 100;

/// Upper bound on releases inspected per run
pub const MAX_RELEASES: usize = 1000;

/// Which releases count for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub target_commitish: String,
    pub filter_by_commitish: bool,
    /// Prereleases may be the last release
    pub include_pre_releases: bool,
    /// Prerelease flag the draft we maintain carries
    pub draft_prerelease: bool,
    pub tag_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseLookup {
    pub draft: Option<Release>,
    pub last_release: Option<Release>,
}

/// Order two releases by the semver of their tags, falling back to creation time
pub fn compare_releases(a: &Release, b: &Release, prefix: &TagPrefix) -> Ordering {
    match (prefix.version_of(&a.tag_name), prefix.version_of(&b.tag_name)) {
        (Some(va), Some(vb)) => va.cmp_precedence(&vb),
        _ => a.created_at.cmp(&b.created_at),
    }
}

/// Pick the draft and the last release out of a release listing
pub fn select_releases(releases: Vec<Release>, query: &ReleaseQuery) -> ReleaseLookup {
    let prefix = TagPrefix::new(query.tag_prefix.as_str());
    let target = Commitish::new(&query.target_commitish);

    let candidates: Vec<Release> = releases
        .into_iter()
        .filter(|r| !query.filter_by_commitish || target.matches(&r.target_commitish))
        .filter(|r| prefix.matches(&r.tag_name))
        .collect();

    let draft = candidates
        .iter()
        .find(|r| r.draft && r.prerelease == query.draft_prerelease)
        .cloned();

    let last_release = candidates
        .into_iter()
        .filter(|r| !r.draft && (query.include_pre_releases || !r.prerelease))
        .max_by(|a, b| compare_releases(a, b, &prefix));

    ReleaseLookup {
        draft,
        last_release,
    }
}

/// List releases and find the draft to update and the last release to diff against
pub fn find_releases<G: GitHubApi + ?Sized>(api: &G, query: &ReleaseQuery) -> Result<ReleaseLookup> {
    let mut releases = Vec::new();
    let mut page = 1;
    loop {
        let batch = api.list_releases(page, RELEASES_PER_PAGE)?;
        let done = batch.len() < RELEASES_PER_PAGE as usize;
        releases.extend(batch);
        if done || releases.len() >= MAX_RELEASES {
            break;
        }
        page += 1;
    }
    releases.truncate(MAX_RELEASES);
    debug!("Fetched {} releases", releases.len());

    let lookup = select_releases(releases, query);
    match &lookup.draft {
        Some(draft) => info!("Draft release: {}", draft.tag_name),
        None => info!("No draft release found"),
    }
    match &lookup.last_release {
        Some(last) => info!("Last release: {}", last.tag_name),
        None => info!("No last release found"),
    }
    Ok(lookup)
}
