//! Label pull requests from their changed files, branch, title and body.

use std::fs;
use std::path::Path;

use glob::Pattern;
use log::{debug, info, warn};
use serde_json::Value;

use crate::boundary::BoundaryWarning;
use crate::config::AutolabelRule;
use crate::error::{DrafterError, Result};
use crate::github::GitHubApi;
use crate::pattern::{compile_search, SearchPattern};

/// The pull request being labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutolabelTarget {
    pub number: u64,
    pub head_ref: String,
    pub title: String,
    pub body: Option<String>,
}

impl AutolabelTarget {
    /// Read the pull request from a webhook event payload
    ///
    /// # Errors
    /// Returns a protocol shape error when the payload carries no pull request.
    pub fn from_event(event: &Value) -> Result<Self> {
        let pr = event
            .get("pull_request")
            .or_else(|| event.get("pull_request_target"))
            .ok_or_else(|| DrafterError::protocol_shape("event payload has no pull_request"))?;

        let number = pr
            .get("number")
            .and_then(Value::as_u64)
            .ok_or_else(|| DrafterError::protocol_shape("pull_request.number is missing"))?;
        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);

        Ok(AutolabelTarget {
            number,
            head_ref: text(pr.pointer("/head/ref")).unwrap_or_default(),
            title: text(pr.get("title")).unwrap_or_default(),
            body: text(pr.get("body")),
        })
    }

    /// Read the event payload file the runner points at
    pub fn from_event_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let event: Value = serde_json::from_str(&content)?;
        Self::from_event(&event)
    }
}

#[derive(Debug)]
struct CompiledRule {
    label: String,
    files: Vec<Pattern>,
    branch: Vec<SearchPattern>,
    title: Vec<SearchPattern>,
    body: Vec<SearchPattern>,
}

impl CompiledRule {
    fn matches(&self, target: &AutolabelTarget, changed_files: &[String]) -> bool {
        if changed_files
            .iter()
            .any(|file| self.files.iter().any(|p| p.matches(file)))
        {
            debug!("Label '{}' matched changed files", self.label);
            return true;
        }
        if self.branch.iter().any(|p| p.is_match(&target.head_ref)) {
            debug!("Label '{}' matched branch {}", self.label, target.head_ref);
            return true;
        }
        if self.title.iter().any(|p| p.is_match(&target.title)) {
            debug!("Label '{}' matched title", self.label);
            return true;
        }
        if let Some(body) = &target.body {
            if self.body.iter().any(|p| p.is_match(body)) {
                debug!("Label '{}' matched body", self.label);
                return true;
            }
        }
        false
    }
}

/// Gitignore-style glob: a bare name matches at any depth, a trailing `/` means everything below
fn compile_glob(glob: &str) -> std::result::Result<Pattern, glob::PatternError> {
    let mut source = glob.trim_start_matches('/').to_string();
    if source.ends_with('/') {
        source.push_str("**");
    }
    if !glob.starts_with('/') && !source.contains('/') {
        source = format!("**/{}", source);
    }
    Pattern::new(&source)
}

/// Compiled autolabeler rules, in configuration order
#[derive(Debug, Default)]
pub struct Autolabeler {
    rules: Vec<CompiledRule>,
}

impl Autolabeler {
    /// Compile rules, discarding each matcher that does not compile
    pub fn compile(rules: &[AutolabelRule]) -> (Self, Vec<BoundaryWarning>) {
        let mut warnings = Vec::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let mut reject = |search: &str, reason: String| {
                warn!(
                    "Bad autolabeler regex '{}' for label '{}': {}",
                    search, rule.label, reason
                );
                warnings.push(BoundaryWarning::BadAutolabelPattern {
                    label: rule.label.clone(),
                    search: search.to_string(),
                    reason,
                });
            };

            let files = rule
                .files
                .iter()
                .filter_map(|glob| match compile_glob(glob) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        reject(glob, e.to_string());
                        None
                    }
                })
                .collect();

            let mut searches = |sources: &[String]| -> Vec<SearchPattern> {
                sources
                    .iter()
                    .filter_map(|search| match compile_search(search) {
                        Ok(pattern) => Some(pattern),
                        Err(e) => {
                            reject(search, e.to_string());
                            None
                        }
                    })
                    .collect()
            };
            let branch = searches(&rule.branch);
            let title = searches(&rule.title);
            let body = searches(&rule.body);

            compiled.push(CompiledRule {
                label: rule.label.clone(),
                files,
                branch,
                title,
                body,
            });
        }

        (Autolabeler { rules: compiled }, warnings)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Labels whose rules match, deduplicated in rule order
    pub fn labels_for(&self, target: &AutolabelTarget, changed_files: &[String]) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&rule.label) && rule.matches(target, changed_files) {
                labels.push(rule.label.clone());
            }
        }
        labels
    }
}

/// Result of one autolabel run
#[derive(Debug, Clone, PartialEq)]
pub struct AutolabelOutcome {
    pub labels: Vec<String>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Compute labels for `target` and add them to the pull request
pub fn run_autolabeler<G: GitHubApi + ?Sized>(
    api: &G,
    rules: &[AutolabelRule],
    target: &AutolabelTarget,
) -> Result<AutolabelOutcome> {
    let (autolabeler, warnings) = Autolabeler::compile(rules);
    if autolabeler.is_empty() {
        info!("No autolabeler rules configured");
        return Ok(AutolabelOutcome {
            labels: Vec::new(),
            warnings,
        });
    }

    let changed_files = api.list_pull_request_files(target.number)?;
    debug!(
        "Pull request #{} changes {} files",
        target.number,
        changed_files.len()
    );

    let labels = autolabeler.labels_for(target, &changed_files);
    if labels.is_empty() {
        info!("No labels to add to #{}", target.number);
    } else {
        info!("Adding labels to #{}: {}", target.number, labels.join(", "));
        api.add_labels(target.number, &labels)?;
    }

    Ok(AutolabelOutcome { labels, warnings })
}
