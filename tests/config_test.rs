// tests/config_test.rs
use release_drafter::config::{load_config, Config, SortBy, SortDirection, PROJECT_CONFIG_PATH};
use release_drafter::domain::{MakeLatest, VersionBump};
use release_drafter::DrafterError;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.template, "## What's Changed\n\n$CHANGES");
    assert_eq!(config.pull_request_limit, 5);
    assert_eq!(config.history_limit, 15);
    assert_eq!(config.sort_by, SortBy::MergedAt);
    assert_eq!(config.sort_direction, SortDirection::Descending);
    assert_eq!(config.latest, MakeLatest::True);
    assert_eq!(config.version_resolver.default, VersionBump::Patch);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
name-template = "v$RESOLVED_VERSION 🌈"
tag-template = "v$RESOLVED_VERSION"
exclude-labels = ["skip-changelog"]
sort-by = "title"
sort-direction = "ascending"
latest = "legacy"

[[categories]]
title = "🚀 Features"
labels = ["feature", "enhancement"]

[[categories]]
title = "🧰 Maintenance"
collapse-after = 3

[version-resolver]
major = { labels = ["major"] }
default = "minor"

[[replacers]]
search = "/CVE-(\\d{4})-(\\d+)/g"
replace = "https://cve.mitre.org/cgi-bin/cvename.cgi?name=CVE-$1-$2"

[[autolabeler]]
label = "documentation"
files = ["*.md"]
branch = ["/docs{0,1}\\/.+/"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.name_template, "v$RESOLVED_VERSION 🌈");
    assert_eq!(config.exclude_labels, vec!["skip-changelog".to_string()]);
    assert_eq!(config.sort_by, SortBy::Title);
    assert_eq!(config.sort_direction, SortDirection::Ascending);
    assert_eq!(config.latest, MakeLatest::Legacy);
    assert_eq!(config.categories.len(), 2);
    assert!(config.categories[1].is_catch_all());
    assert_eq!(config.categories[1].collapse_after, 3);
    assert_eq!(config.version_resolver.default, VersionBump::Minor);
    assert_eq!(
        config.version_resolver.bump_for_label("major"),
        Some(VersionBump::Major)
    );
    assert_eq!(config.replacers.len(), 1);
    assert_eq!(config.autolabeler[0].files, vec!["*.md".to_string()]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let err = load_config(Some(std::path::Path::new("does/not/exist.toml"))).unwrap_err();
    assert!(matches!(err, DrafterError::Io(_)));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"categories = 3").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(matches!(err, DrafterError::Toml(_)));
}

#[test]
fn test_two_catch_all_categories_are_ambiguous() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[[categories]]
title = "Other"

[[categories]]
title = "Misc"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert!(matches!(
        config.validate(),
        Err(DrafterError::AmbiguousConfiguration(_))
    ));
}

#[test]
#[serial]
fn test_project_config_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let github_dir = dir.path().join(".github");
    std::fs::create_dir_all(&github_dir).unwrap();
    std::fs::write(
        dir.path().join(PROJECT_CONFIG_PATH),
        "tag-prefix = \"app-v\"\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    std::env::set_current_dir(original).unwrap();

    assert_eq!(result.unwrap().tag_prefix, "app-v");
}
