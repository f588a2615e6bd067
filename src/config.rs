use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{Category, MakeLatest, VersionBump};
use crate::error::{DrafterError, Result};

/// Project-level config file, relative to the working directory
pub const PROJECT_CONFIG_PATH: &str = ".github/release-drafter.toml";

/// Represents the complete configuration for release-drafter.
///
/// Every key is optional. Keys are kebab-case, so `change-template` in the file
/// maps to [`Config::change_template`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub name_template: String,

    #[serde(default)]
    pub tag_template: String,

    #[serde(default)]
    pub tag_prefix: String,

    #[serde(default = "default_version_template")]
    pub version_template: String,

    #[serde(default = "default_change_template")]
    pub change_template: String,

    /// Characters in `$TITLE` to neutralize before insertion
    #[serde(default)]
    pub change_title_escapes: String,

    #[serde(default = "default_no_changes_template")]
    pub no_changes_template: String,

    #[serde(default = "default_category_template")]
    pub category_template: String,

    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default)]
    pub header: String,

    #[serde(default)]
    pub footer: String,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub exclude_labels: Vec<String>,

    #[serde(default)]
    pub include_labels: Vec<String>,

    #[serde(default)]
    pub exclude_contributors: Vec<String>,

    #[serde(default = "default_no_contributors_template")]
    pub no_contributors_template: String,

    #[serde(default)]
    pub replacers: Vec<ReplacerConfig>,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_direction: SortDirection,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default)]
    pub prerelease_identifier: String,

    #[serde(default)]
    pub include_pre_releases: bool,

    #[serde(default)]
    pub latest: MakeLatest,

    #[serde(default)]
    pub publish: bool,

    #[serde(default)]
    pub commitish: String,

    #[serde(default)]
    pub filter_by_commitish: bool,

    #[serde(default)]
    pub include_paths: Vec<String>,

    #[serde(default = "default_pull_request_limit")]
    pub pull_request_limit: u32,

    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default)]
    pub version_resolver: VersionResolverConfig,

    #[serde(default)]
    pub autolabeler: Vec<AutolabelRule>,
}

fn default_version_template() -> String {
    "$MAJOR.$MINOR.$PATCH$PRERELEASE".to_string()
}

fn default_change_template() -> String {
    "* $TITLE @$AUTHOR (#$NUMBER)".to_string()
}

fn default_no_changes_template() -> String {
    "* No changes".to_string()
}

fn default_category_template() -> String {
    "## $TITLE".to_string()
}

fn default_template() -> String {
    "## What's Changed\n\n$CHANGES".to_string()
}

fn default_no_contributors_template() -> String {
    "No contributors".to_string()
}

fn default_pull_request_limit() -> u32 {
    5
}

fn default_history_limit() -> u32 {
    15
}

/// A search-and-replace rule applied to the release body.
///
/// `search` is a plain string or a `/pattern/flags` regex.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReplacerConfig {
    pub search: String,
    #[serde(default)]
    pub replace: String,
}

/// Labels that request one bump type
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct LabelSet {
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Maps pull request labels to the version bump they request.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct VersionResolverConfig {
    #[serde(default)]
    pub major: LabelSet,

    #[serde(default)]
    pub minor: LabelSet,

    #[serde(default)]
    pub patch: LabelSet,

    /// Bump used when no labelled pull request asks for one
    #[serde(default)]
    pub default: VersionBump,
}

impl VersionResolverConfig {
    /// Bump requested by a single label, if any
    pub fn bump_for_label(&self, label: &str) -> Option<VersionBump> {
        [
            (&self.major, VersionBump::Major),
            (&self.minor, VersionBump::Minor),
            (&self.patch, VersionBump::Patch),
        ]
        .into_iter()
        .find(|(set, _)| set.labels.iter().any(|l| l == label))
        .map(|(_, bump)| bump)
    }
}

/// One autolabeler rule. The label applies when any matcher hits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct AutolabelRule {
    pub label: String,

    /// Gitignore-style globs over changed file paths
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub branch: Vec<String>,

    #[serde(default)]
    pub title: Vec<String>,

    #[serde(default)]
    pub body: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    MergedAt,
    Title,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name_template: String::new(),
            tag_template: String::new(),
            tag_prefix: String::new(),
            version_template: default_version_template(),
            change_template: default_change_template(),
            change_title_escapes: String::new(),
            no_changes_template: default_no_changes_template(),
            category_template: default_category_template(),
            template: default_template(),
            header: String::new(),
            footer: String::new(),
            categories: Vec::new(),
            exclude_labels: Vec::new(),
            include_labels: Vec::new(),
            exclude_contributors: Vec::new(),
            no_contributors_template: default_no_contributors_template(),
            replacers: Vec::new(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            prerelease: false,
            prerelease_identifier: String::new(),
            include_pre_releases: false,
            latest: MakeLatest::default(),
            publish: false,
            commitish: String::new(),
            filter_by_commitish: false,
            include_paths: Vec::new(),
            pull_request_limit: default_pull_request_limit(),
            history_limit: default_history_limit(),
            version_resolver: VersionResolverConfig::default(),
            autolabeler: Vec::new(),
        }
    }
}

impl Config {
    /// Reject configurations that cannot be drafted unambiguously.
    ///
    /// # Errors
    /// - [`DrafterError::AmbiguousConfiguration`] if more than one category has no labels
    /// - [`DrafterError::Config`] if a paging limit is zero
    pub fn validate(&self) -> Result<()> {
        let catch_all: Vec<&str> = self
            .categories
            .iter()
            .filter(|c| c.is_catch_all())
            .map(|c| c.title.as_str())
            .collect();
        if catch_all.len() > 1 {
            return Err(DrafterError::AmbiguousConfiguration(format!(
                "categories {} all have no labels; at most one catch-all category is allowed",
                catch_all
                    .iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        if self.history_limit == 0 {
            return Err(DrafterError::config("history-limit must be at least 1"));
        }
        if self.pull_request_limit == 0 {
            return Err(DrafterError::config("pull-request-limit must be at least 1"));
        }

        Ok(())
    }

    /// Whether `change-template` references `token` (e.g. `$BODY`)
    pub fn change_template_uses(&self, token: &str) -> bool {
        self.change_template.contains(token)
    }

    /// Prerelease identifier, `None` when unset
    pub fn prerelease_identifier(&self) -> Option<&str> {
        Some(self.prerelease_identifier.as_str()).filter(|id| !id.is_empty())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.github/release-drafter.toml` in current directory
/// 3. `release-drafter.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(PROJECT_CONFIG_PATH).exists() {
        fs::read_to_string(PROJECT_CONFIG_PATH)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("release-drafter.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse a TOML document into a [`Config`]
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.change_template, "* $TITLE @$AUTHOR (#$NUMBER)");
        assert_eq!(config.no_changes_template, "* No changes");
        assert_eq!(config.category_template, "## $TITLE");
        assert_eq!(config.version_template, "$MAJOR.$MINOR.$PATCH$PRERELEASE");
        assert_eq!(config.history_limit, 15);
        assert_eq!(config.pull_request_limit, 5);
        assert_eq!(config.sort_by, SortBy::MergedAt);
        assert_eq!(config.sort_direction, SortDirection::Descending);
        assert_eq!(config.latest, MakeLatest::True);
        assert_eq!(config.version_resolver.default, VersionBump::Patch);
    }

    #[test]
    fn test_empty_document_equals_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_kebab_case_keys() {
        let config = parse_config(
            r#"
name-template = "v$RESOLVED_VERSION"
tag-prefix = "app-"
sort-by = "title"
sort-direction = "ascending"
latest = "legacy"
prerelease-identifier = "rc"

[[categories]]
title = "Features"
labels = ["feature", "enhancement"]
collapse-after = 3

[[replacers]]
search = "/JIRA-(\\d+)/g"
replace = "[JIRA-$1]"

[version-resolver]
default = "minor"
major = { labels = ["breaking"] }
"#,
        )
        .unwrap();

        assert_eq!(config.name_template, "v$RESOLVED_VERSION");
        assert_eq!(config.tag_prefix, "app-");
        assert_eq!(config.sort_by, SortBy::Title);
        assert_eq!(config.sort_direction, SortDirection::Ascending);
        assert_eq!(config.latest, MakeLatest::Legacy);
        assert_eq!(config.categories[0].collapse_after, 3);
        assert_eq!(config.replacers[0].search, "/JIRA-(\\d+)/g");
        assert_eq!(config.version_resolver.default, VersionBump::Minor);
        assert_eq!(config.prerelease_identifier(), Some("rc"));
    }

    #[test]
    fn test_bump_for_label() {
        let resolver = VersionResolverConfig {
            major: LabelSet {
                labels: vec!["breaking".to_string()],
            },
            minor: LabelSet {
                labels: vec!["feature".to_string()],
            },
            ..VersionResolverConfig::default()
        };
        assert_eq!(resolver.bump_for_label("breaking"), Some(VersionBump::Major));
        assert_eq!(resolver.bump_for_label("feature"), Some(VersionBump::Minor));
        assert_eq!(resolver.bump_for_label("docs"), None);
    }

    #[test]
    fn test_validate_two_catch_all_categories() {
        let config = Config {
            categories: vec![
                Category {
                    title: "Other".to_string(),
                    ..Category::default()
                },
                Category {
                    title: "Misc".to_string(),
                    ..Category::default()
                },
            ],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DrafterError::AmbiguousConfiguration(_)));
        assert!(err.to_string().contains("'Other'"));
    }

    #[test]
    fn test_validate_single_catch_all_ok() {
        let config = Config {
            categories: vec![Category {
                title: "Other".to_string(),
                ..Category::default()
            }],
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_limit() {
        let config = Config {
            history_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(parse_config("sort-by = \"size\"").is_err());
    }
}
