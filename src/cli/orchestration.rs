//! Main workflow orchestration logic
//!
//! Wires one drafting run together, independent of CLI argument parsing:
//! release lookup, history walk, pull request collection, payload assembly
//! and the final create-or-update.

use log::{info, warn};
use serde::Serialize;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::context::RunContext;
use crate::domain::ReleasePayload;
use crate::error::{DrafterError, Result};
use crate::github::GitHubApi;
use crate::history::{
    collect_pull_requests, scope_commits, sort_pull_requests, HistoryWalker, WalkOptions,
};
use crate::release::{
    build_release_payload, find_releases, publish_release, PublishedRelease, ReleaseInputs,
    ReleaseQuery,
};
use crate::template::compile_replacers;

/// Arguments for the draft workflow
///
/// Mirrors the CLI arguments in a form that can be built without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftWorkflowArgs {
    pub context: RunContext,

    /// Compute the release but do not write it
    pub dry_run: bool,
}

/// Result of a draft workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub payload: ReleasePayload,

    /// The written release; `None` on a dry run
    pub published: Option<PublishedRelease>,

    pub previous_tag: Option<String>,

    pub pull_request_count: usize,

    pub warnings: Vec<BoundaryWarning>,
}

/// Values handed back to the outer runner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseOutputs {
    pub id: Option<u64>,
    pub html_url: Option<String>,
    pub upload_url: Option<String>,
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub resolved_version: Option<String>,
    pub major_version: Option<u64>,
    pub minor_version: Option<u64>,
    pub patch_version: Option<u64>,
}

impl WorkflowResult {
    pub fn outputs(&self) -> ReleaseOutputs {
        let release = self.published.as_ref().map(|p| &p.release);
        let version = self.payload.resolved_version.as_ref();
        ReleaseOutputs {
            id: release.map(|r| r.id),
            html_url: release.map(|r| r.html_url.clone()),
            upload_url: release.map(|r| r.upload_url.clone()),
            tag_name: self.payload.tag.clone(),
            name: self.payload.name.clone(),
            body: self.payload.body.clone(),
            resolved_version: version.map(|v| v.version.clone()),
            major_version: version.map(|v| v.major),
            minor_version: version.map(|v| v.minor),
            patch_version: version.map(|v| v.patch),
        }
    }
}

/// Main draft workflow
///
/// Orchestrates one run:
/// 1. Validate configuration and compile replacers
/// 2. Find the existing draft and the last release
/// 3. Walk history since the last release, optionally scoped to paths
/// 4. Collect and sort merged pull requests
/// 5. Assemble the release payload
/// 6. Create or update the draft (skipped on a dry run)
///
/// # Errors
///
/// Configuration, template, protocol and remote errors abort the run. Recoverable
/// problems are returned as warnings on the result.
pub fn run_draft_workflow<G: GitHubApi + ?Sized>(
    api: &G,
    args: &DraftWorkflowArgs,
    config: &Config,
) -> Result<WorkflowResult> {
    let context = &args.context;
    let config = context.effective_config(config);
    config.validate()?;

    let (replacers, mut warnings) = compile_replacers(&config.replacers);
    let is_prerelease = context.is_prerelease(&config);
    let target_commitish = context.target_commitish(&config);
    if target_commitish.trim().is_empty() {
        return Err(DrafterError::config(
            "No target ref: pass --ref, set GITHUB_REF or configure commitish",
        ));
    }

    let lookup = find_releases(
        api,
        &ReleaseQuery {
            target_commitish: target_commitish.clone(),
            filter_by_commitish: config.filter_by_commitish,
            include_pre_releases: config.include_pre_releases || is_prerelease,
            draft_prerelease: is_prerelease,
            tag_prefix: config.tag_prefix.clone(),
        },
    )?;
    let since = lookup.last_release.as_ref().map(|r| r.created_at);

    let walker = HistoryWalker::new(
        api,
        &context.owner,
        &context.repository,
        WalkOptions::from_config(&config),
    );

    let path_matches = if config.include_paths.is_empty() {
        None
    } else {
        Some(walker.path_matches(&target_commitish, since, &config.include_paths)?)
    };

    let commits = match &path_matches {
        Some(matches) if matches.is_empty() => {
            warn!(
                "No commits found since last release touching: {}",
                config.include_paths.join(", ")
            );
            warnings.push(BoundaryWarning::NoCommitsSinceRelease {
                paths: config.include_paths.clone(),
            });
            Vec::new()
        }
        _ => scope_commits(walker.commits(&target_commitish, since)?, path_matches.as_ref()),
    };

    let mut pull_requests = collect_pull_requests(&commits, &context.name_with_owner());
    sort_pull_requests(&mut pull_requests, config.sort_by, config.sort_direction);
    info!("Collected {} merged pull requests", pull_requests.len());

    let (payload, version_warnings) = build_release_payload(&ReleaseInputs {
        config: &config,
        context,
        commits: &commits,
        pull_requests: &pull_requests,
        last_release: lookup.last_release.as_ref(),
        replacers: &replacers,
    })?;
    warnings.extend(version_warnings);

    let published = if args.dry_run {
        info!("Dry run: not writing release {}", payload.tag);
        None
    } else {
        Some(publish_release(api, lookup.draft.as_ref(), &payload)?)
    };

    Ok(WorkflowResult {
        payload,
        published,
        previous_tag: lookup.last_release.map(|r| r.tag_name),
        pull_request_count: pull_requests.len(),
        warnings,
    })
}
