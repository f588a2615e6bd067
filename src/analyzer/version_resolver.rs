use std::collections::BTreeMap;

use log::{debug, warn};
use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::changelog::passes_label_filters;
use crate::config::Config;
use crate::domain::{
    Increment, PullRequest, Release, ResolvedVersion, TagPrefix, VersionBump, VersionDescriptor,
};
use crate::error::{DrafterError, Result};
use crate::template::{Variable, Variables};

pub const NEXT_MAJOR_VERSION: &str = "$NEXT_MAJOR_VERSION";
pub const NEXT_MINOR_VERSION: &str = "$NEXT_MINOR_VERSION";
pub const NEXT_PATCH_VERSION: &str = "$NEXT_PATCH_VERSION";
pub const NEXT_PRERELEASE_VERSION: &str = "$NEXT_PRERELEASE_VERSION";
pub const INPUT_VERSION: &str = "$INPUT_VERSION";
pub const RESOLVED_VERSION: &str = "$RESOLVED_VERSION";

/// Identifier used for a first prerelease when none is configured
const DEFAULT_PRERELEASE_IDENTIFIER: &str = "rc";

/// A computed version and the template it renders through
#[derive(Debug, Clone, PartialEq)]
pub struct VersionVariable {
    pub descriptor: VersionDescriptor,
    pub template: String,
}

impl VersionVariable {
    fn new(version: &Version, template: &str) -> Self {
        VersionVariable {
            descriptor: VersionDescriptor::from(version),
            template: template.to_string(),
        }
    }

    pub fn version(&self) -> &str {
        &self.descriptor.raw_version
    }

    /// Composite template variable with `$MAJOR`, `$MINOR`, `$PATCH`, `$PRERELEASE`
    /// and `$COMPLETE` in scope
    pub fn to_variable(&self) -> Variable {
        let d = &self.descriptor;
        Variable::Composite {
            template: self.template.clone(),
            bindings: Variables::new()
                .with("$MAJOR", d.major)
                .with("$MINOR", d.minor)
                .with("$PATCH", d.patch)
                .with("$PRERELEASE", d.prerelease_suffix())
                .with("$COMPLETE", d.raw_version.as_str()),
        }
    }
}

/// Explicit version overrides, highest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInput {
    pub version: Option<String>,
    pub tag: Option<String>,
    pub name: Option<String>,
}

impl VersionInput {
    /// Version of the first override that parses, by priority version > tag > name.
    ///
    /// Tag and name overrides are templates like `v$RESOLVED_VERSION` and are skipped
    /// silently when they hold no version. Only an explicit version that does not parse
    /// is reported.
    fn coerce(&self, prefix: &TagPrefix, warnings: &mut Vec<BoundaryWarning>) -> Option<Version> {
        let candidates = [(&self.version, true), (&self.tag, false), (&self.name, false)];
        for (raw, explicit) in candidates {
            let Some(raw) = raw.as_deref().filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            match prefix.coerce(raw) {
                Some(version) => return Some(version),
                None if explicit => {
                    warn!("Cannot parse a version from override '{}'", raw);
                    warnings.push(BoundaryWarning::UnparsableVersion {
                        input: raw.to_string(),
                    });
                }
                None => debug!("Override '{}' holds no version", raw),
            }
        }
        None
    }
}

/// Every next-version variable for one run
#[derive(Debug, Clone, PartialEq)]
pub struct VersionInfo {
    variables: BTreeMap<String, VersionVariable>,
}

impl VersionInfo {
    pub fn get(&self, token: &str) -> Option<&VersionVariable> {
        self.variables.get(token)
    }

    pub fn resolved(&self) -> Option<&VersionVariable> {
        self.get(RESOLVED_VERSION)
    }

    /// Parts reported to the outer runner
    pub fn resolved_version(&self) -> Option<ResolvedVersion> {
        self.resolved().map(|v| ResolvedVersion {
            version: v.version().to_string(),
            major: v.descriptor.major,
            minor: v.descriptor.minor,
            patch: v.descriptor.patch,
        })
    }

    /// Template scope for the second render pass
    pub fn to_variables(&self) -> Variables {
        let mut variables = Variables::new();
        for (token, value) in &self.variables {
            variables.insert(token.as_str(), value.to_variable());
        }
        variables
    }

    fn insert(&mut self, token: impl Into<String>, version: &Version, template: &str) {
        self.variables
            .insert(token.into(), VersionVariable::new(version, template));
    }

    /// The release and its three part variants
    fn insert_with_parts(&mut self, token: &str, version: &Version, template: &str) {
        self.insert(token, version, template);
        for part in ["MAJOR", "MINOR", "PATCH"] {
            self.insert(format!("{}_{}", token, part), version, &format!("${}", part));
        }
    }
}

/// Computes version bumps from pull request labels and the last release
pub struct VersionResolver<'a> {
    config: &'a Config,
}

impl<'a> VersionResolver<'a> {
    /// Create a new version resolver
    pub fn new(config: &'a Config) -> Self {
        VersionResolver { config }
    }

    /// Highest-priority bump requested by the labels of surviving pull requests
    pub fn resolve_bump(&self, pull_requests: &[PullRequest]) -> VersionBump {
        let resolver = &self.config.version_resolver;
        pull_requests
            .iter()
            .filter(|pr| {
                passes_label_filters(pr, &self.config.exclude_labels, &self.config.include_labels)
            })
            .flat_map(|pr| pr.labels.iter())
            .filter_map(|label| resolver.bump_for_label(label))
            .max()
            .unwrap_or(resolver.default)
    }

    /// Increment to apply, prerelease-typed when prerelease mode has an identifier
    pub fn resolve_version_key_increment(
        &self,
        pull_requests: &[PullRequest],
        is_prerelease: bool,
    ) -> Increment {
        let bump = self.resolve_bump(pull_requests);
        let increment = if is_prerelease && self.config.prerelease_identifier().is_some() {
            Increment::pre(bump)
        } else {
            Increment::release(bump)
        };
        debug!("Resolved version increment {:?}", increment);
        increment
    }

    /// Compute every next-version variable.
    ///
    /// # Errors
    /// Returns a configuration error if the prerelease identifier is not valid semver,
    /// and a version error if the last release cannot be incremented.
    pub fn version_info(
        &self,
        last_release: Option<&Release>,
        input: &VersionInput,
        increment: Increment,
        is_prerelease: bool,
    ) -> Result<(VersionInfo, Vec<BoundaryWarning>)> {
        let prefix = TagPrefix::new(self.config.tag_prefix.as_str());
        let template = self.config.version_template.as_str();
        let identifier = self.config.prerelease_identifier();
        let mut warnings = Vec::new();
        let mut info = VersionInfo {
            variables: BTreeMap::new(),
        };

        let input_version = input.coerce(&prefix, &mut warnings);

        let base = match last_release {
            Some(release) => {
                let parsed = prefix.coerce(&release.tag_name).or_else(|| {
                    release
                        .name
                        .as_deref()
                        .and_then(|name| prefix.coerce(name))
                });
                if parsed.is_none() {
                    warn!(
                        "Cannot parse a version from release '{}', treating as first release",
                        release.tag_name
                    );
                    warnings.push(BoundaryWarning::UnparsableVersion {
                        input: release.tag_name.clone(),
                    });
                }
                parsed
            }
            None => None,
        };

        let resolved = match &base {
            Some(version) => {
                info.insert_with_parts(NEXT_MAJOR_VERSION, &Increment::Major.apply(version, identifier)?, template);
                info.insert_with_parts(NEXT_MINOR_VERSION, &Increment::Minor.apply(version, identifier)?, template);
                info.insert_with_parts(NEXT_PATCH_VERSION, &Increment::Patch.apply(version, identifier)?, template);
                info.insert(
                    NEXT_PRERELEASE_VERSION,
                    &Increment::PreRelease.apply(version, identifier)?,
                    template,
                );

                let effective = if increment.is_pre() && !version.pre.is_empty() {
                    Increment::PreRelease
                } else {
                    increment
                };
                match &input_version {
                    Some(input) => input.clone(),
                    None => effective.apply(version, identifier)?,
                }
            }
            None => {
                let seed_pre = semver::Prerelease::new(&format!(
                    "{}.0",
                    identifier.unwrap_or(DEFAULT_PRERELEASE_IDENTIFIER)
                ))
                .map_err(|e| DrafterError::config(format!("Invalid prerelease identifier: {}", e)))?;
                let mut prerelease_seed = Version::new(0, 1, 0);
                prerelease_seed.pre = seed_pre;

                info.insert_with_parts(NEXT_MAJOR_VERSION, &Version::new(1, 0, 0), template);
                info.insert_with_parts(NEXT_MINOR_VERSION, &Version::new(0, 1, 0), template);
                info.insert_with_parts(NEXT_PATCH_VERSION, &Version::new(0, 1, 0), template);
                info.insert(NEXT_PRERELEASE_VERSION, &prerelease_seed, template);

                match &input_version {
                    Some(input) => input.clone(),
                    None if increment.is_pre() || is_prerelease => prerelease_seed,
                    None => Version::new(0, 1, 0),
                }
            }
        };

        if let Some(input) = &input_version {
            info.insert(INPUT_VERSION, input, template);
        }
        info.insert(RESOLVED_VERSION, &resolved, template);

        debug!(
            "Version info: base {:?}, resolved {}",
            base.as_ref().map(Version::to_string),
            resolved
        );
        Ok((info, warnings))
    }
}
