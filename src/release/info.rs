use log::info;

use crate::analyzer::VersionResolver;
use crate::boundary::BoundaryWarning;
use crate::changelog::{contributors_sentence, ChangelogBuilder};
use crate::config::Config;
use crate::context::RunContext;
use crate::domain::{Commit, MakeLatest, PullRequest, Release, ReleasePayload};
use crate::error::Result;
use crate::template::{render, Replacer, Variables};

/// What the release body is built from
pub struct ReleaseInputs<'a> {
    pub config: &'a Config,
    pub context: &'a RunContext,
    pub commits: &'a [Commit],
    /// Collected and sorted pull requests
    pub pull_requests: &'a [PullRequest],
    pub last_release: Option<&'a Release>,
    pub replacers: &'a [Replacer],
}

/// Assemble the name, tag, body and flags of the draft.
///
/// The body is rendered twice: text content first (with replacers), then version
/// variables, so replacers never rewrite version numbers.
///
/// # Errors
/// Returns [`crate::error::DrafterError::Template`] if a template cannot be rendered.
pub fn build_release_payload(inputs: &ReleaseInputs) -> Result<(ReleasePayload, Vec<BoundaryWarning>)> {
    let ReleaseInputs {
        config,
        context,
        commits,
        pull_requests,
        last_release,
        replacers,
    } = *inputs;

    let is_prerelease = context.is_prerelease(config);
    let resolver = VersionResolver::new(config);
    let increment = resolver.resolve_version_key_increment(pull_requests, is_prerelease);
    let (version_info, warnings) =
        resolver.version_info(last_release, &context.version_input(), increment, is_prerelease)?;
    let version_variables = version_info.to_variables();

    let changes = ChangelogBuilder::new(config)?.build(pull_requests)?;
    let contributors = contributors_sentence(commits, pull_requests, config);

    let template = format!(
        "{}{}{}",
        context.header(config),
        config.template,
        context.footer(config)
    );
    let content = Variables::new()
        .with(
            "$PREVIOUS_TAG",
            last_release.map(|r| r.tag_name.as_str()).unwrap_or(""),
        )
        .with("$CHANGES", changes)
        .with("$CONTRIBUTORS", contributors)
        .with("$OWNER", context.owner.as_str())
        .with("$REPOSITORY", context.repository.as_str());
    let body = render(&template, &content, replacers)?;
    let body = render(&body, &version_variables, &[])?;

    let overrides = &context.overrides;
    let name_template = overrides
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&config.name_template);
    let tag_template = overrides
        .tag
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&config.tag_template);
    let name = render(name_template, &version_variables, &[])?;
    let tag = render(tag_template, &version_variables, &[])?;

    let make_latest = if is_prerelease {
        MakeLatest::False
    } else {
        context.latest(config)
    };

    let payload = ReleasePayload {
        name,
        tag,
        body,
        target_commitish: context.target_commitish(config),
        prerelease: is_prerelease,
        draft: !context.publish(config),
        make_latest,
        resolved_version: version_info.resolved_version(),
    };

    info!(
        "Release {} ({}) with {} pull requests",
        payload.name,
        payload
            .resolved_version
            .as_ref()
            .map(|v| v.version.as_str())
            .unwrap_or("no version"),
        pull_requests.len()
    );
    Ok((payload, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplacerConfig;
    use crate::context::Overrides;
    use crate::domain::Author;
    use crate::github::mock::fixtures;
    use crate::template::compile_replacers;

    fn pr(number: u64, title: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            body: None,
            url: None,
            author: Some(Author {
                login: "mona".to_string(),
                is_bot: false,
                url: String::new(),
            }),
            base_repository: Some("o/r".to_string()),
            base_ref_name: None,
            head_ref_name: None,
            merged: true,
            merged_at: None,
            labels: vec![],
        }
    }

    fn build(config: &Config, context: &RunContext, last: Option<&Release>) -> ReleasePayload {
        let prs = vec![pr(1, "Fix 1.2.3 crash")];
        let (replacers, _) = compile_replacers(&config.replacers);
        let inputs = ReleaseInputs {
            config,
            context,
            commits: &[],
            pull_requests: &prs,
            last_release: last,
            replacers: &replacers,
        };
        build_release_payload(&inputs).unwrap().0
    }

    #[test]
    fn test_body_two_passes() {
        let config = Config {
            name_template: "v$RESOLVED_VERSION".to_string(),
            tag_template: "v$RESOLVED_VERSION".to_string(),
            template: "Since $PREVIOUS_TAG in $OWNER/$REPOSITORY:\n$CHANGES\nNext: $RESOLVED_VERSION\n$CONTRIBUTORS".to_string(),
            ..Config::default()
        };
        let context = RunContext::new("o", "r", "refs/heads/main");
        let last = fixtures::release(1, "v1.2.3", "2024-01-01T00:00:00Z");
        let payload = build(&config, &context, Some(&last));

        assert_eq!(payload.name, "v1.2.4");
        assert_eq!(payload.tag, "v1.2.4");
        assert_eq!(
            payload.body,
            "Since v1.2.3 in o/r:\n* Fix 1.2.3 crash @mona (#1)\nNext: 1.2.4\n@mona"
        );
        assert_eq!(payload.target_commitish, "refs/heads/main");
        assert!(payload.draft);
        assert_eq!(payload.make_latest, MakeLatest::True);
        assert_eq!(payload.resolved_version.unwrap().version, "1.2.4");
    }

    #[test]
    fn test_replacers_do_not_touch_version_pass() {
        let config = Config {
            template: "$CHANGES $RESOLVED_VERSION".to_string(),
            replacers: vec![ReplacerConfig {
                search: "/\\d+\\.\\d+\\.\\d+/g".to_string(),
                replace: "X".to_string(),
            }],
            ..Config::default()
        };
        let context = RunContext::new("o", "r", "main");
        let last = fixtures::release(1, "v1.0.0", "2024-01-01T00:00:00Z");
        let payload = build(&config, &context, Some(&last));
        assert_eq!(payload.body, "* Fix X crash @mona (#1) 1.0.1");
    }

    #[test]
    fn test_header_and_footer_wrap_template() {
        let config = Config {
            header: "HEAD\n".to_string(),
            footer: "\nFOOT".to_string(),
            template: "$CHANGES".to_string(),
            ..Config::default()
        };
        let context = RunContext::new("o", "r", "main");
        let payload = build(&config, &context, None);
        assert_eq!(payload.body, "HEAD\n* Fix 1.2.3 crash @mona (#1)\nFOOT");
        assert_eq!(payload.name, "");
    }

    #[test]
    fn test_overrides_render_version_variables() {
        let config = Config::default();
        let context = RunContext::new("o", "r", "main").with_overrides(Overrides {
            version: Some("2.0.0".to_string()),
            name: Some("Release $INPUT_VERSION".to_string()),
            tag: Some("v$RESOLVED_VERSION".to_string()),
            publish: Some(true),
            ..Overrides::default()
        });
        let payload = build(&config, &context, None);
        assert_eq!(payload.name, "Release 2.0.0");
        assert_eq!(payload.tag, "v2.0.0");
        assert!(!payload.draft);
    }

    #[test]
    fn test_prerelease_is_never_latest() {
        let config = Config {
            prerelease: true,
            prerelease_identifier: "rc".to_string(),
            tag_template: "v$RESOLVED_VERSION".to_string(),
            ..Config::default()
        };
        let context = RunContext::new("o", "r", "main");
        let last = fixtures::release(1, "v1.0.0", "2024-01-01T00:00:00Z");
        let payload = build(&config, &context, Some(&last));
        assert!(payload.prerelease);
        assert_eq!(payload.make_latest, MakeLatest::False);
        assert_eq!(payload.tag, "v1.0.1-rc.0");
    }
}
