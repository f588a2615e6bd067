use crate::analyzer::VersionInput;
use crate::config::Config;
use crate::domain::MakeLatest;

/// Values supplied for a single run that take precedence over configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub version: Option<String>,
    pub tag: Option<String>,
    pub name: Option<String>,
    pub commitish: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub prerelease: Option<bool>,
    pub prerelease_identifier: Option<String>,
    pub latest: Option<MakeLatest>,
    pub publish: Option<bool>,
}

/// Everything a run knows about where it executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub owner: String,
    pub repository: String,
    /// Ref the run was triggered for, e.g. `refs/heads/main`
    pub git_ref: String,
    pub overrides: Overrides,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl RunContext {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>, git_ref: impl Into<String>) -> Self {
        RunContext {
            owner: owner.into(),
            repository: repository.into(),
            git_ref: git_ref.into(),
            overrides: Overrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// `owner/repository`
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }

    /// Release target: explicit override, then configured commitish, then the run's ref
    pub fn target_commitish(&self, config: &Config) -> String {
        non_empty(&self.overrides.commitish)
            .or(Some(config.commitish.as_str()).filter(|c| !c.is_empty()))
            .unwrap_or(&self.git_ref)
            .to_string()
    }

    pub fn is_prerelease(&self, config: &Config) -> bool {
        self.overrides.prerelease.unwrap_or(config.prerelease)
    }

    pub fn publish(&self, config: &Config) -> bool {
        self.overrides.publish.unwrap_or(config.publish)
    }

    pub fn latest(&self, config: &Config) -> MakeLatest {
        self.overrides.latest.unwrap_or(config.latest)
    }

    pub fn header<'a>(&'a self, config: &'a Config) -> &'a str {
        non_empty(&self.overrides.header).unwrap_or(&config.header)
    }

    pub fn footer<'a>(&'a self, config: &'a Config) -> &'a str {
        non_empty(&self.overrides.footer).unwrap_or(&config.footer)
    }

    /// Configuration with run overrides that change config-level behavior folded in
    pub fn effective_config(&self, config: &Config) -> Config {
        let mut effective = config.clone();
        if let Some(identifier) = non_empty(&self.overrides.prerelease_identifier) {
            effective.prerelease_identifier = identifier.to_string();
        }
        effective
    }

    pub fn version_input(&self) -> VersionInput {
        VersionInput {
            version: non_empty(&self.overrides.version).map(str::to_string),
            tag: non_empty(&self.overrides.tag).map(str::to_string),
            name: non_empty(&self.overrides.name).map(str::to_string),
        }
    }
}
