use regex::Regex;

use crate::changelog::categorizer::categorize;
use crate::config::Config;
use crate::domain::PullRequest;
use crate::error::{DrafterError, Result};
use crate::template::{render, Variables};

/// Renders the `$CHANGES` section
pub struct ChangelogBuilder<'a> {
    config: &'a Config,
    title_escapes: Regex,
}

impl<'a> ChangelogBuilder<'a> {
    /// # Errors
    /// Returns a configuration error if `change-title-escapes` cannot form a character class.
    pub fn new(config: &'a Config) -> Result<Self> {
        let source = if config.change_title_escapes.is_empty() {
            "`.*?`".to_string()
        } else {
            let class: String = config
                .change_title_escapes
                .chars()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            format!("[{}]|`.*?`", class)
        };
        let title_escapes = Regex::new(&source).map_err(|e| {
            DrafterError::config(format!("Invalid change-title-escapes: {}", e))
        })?;

        Ok(ChangelogBuilder {
            config,
            title_escapes,
        })
    }

    /// Neutralize configured characters in a title.
    ///
    /// Code spans in backticks are left as they are. `@` and `#` get an empty HTML
    /// comment appended so they stop mentioning and linking; other characters get a
    /// backslash.
    pub fn escape_title(&self, title: &str) -> String {
        self.title_escapes
            .replace_all(title, |caps: &regex::Captures| {
                let matched = &caps[0];
                if matched.chars().count() > 1 {
                    matched.to_string()
                } else if matched == "@" || matched == "#" {
                    format!("{}<!---->", matched)
                } else {
                    format!("\\{}", matched)
                }
            })
            .into_owned()
    }

    /// Render the categorized change list.
    ///
    /// An empty list, or one where every pull request was filtered out, renders as
    /// `no-changes-template`.
    pub fn build(&self, pull_requests: &[PullRequest]) -> Result<String> {
        if pull_requests.is_empty() {
            return Ok(self.config.no_changes_template.clone());
        }

        let categorized = categorize(pull_requests, self.config);
        let mut sections = Vec::new();

        if !categorized.uncategorized.is_empty() {
            sections.push(self.render_lines(&categorized.uncategorized)?);
        }

        for (category, members) in &categorized.categories {
            if members.is_empty() {
                continue;
            }
            let heading = render(
                &self.config.category_template,
                &Variables::new().with("$TITLE", category.title.as_str()),
                &[],
            )?;
            let lines = self.render_lines(members)?;

            if category.should_collapse(members.len()) {
                sections.push(format!(
                    "{}\n<details>\n<summary>{} changes</summary>\n\n{}\n</details>",
                    heading,
                    members.len(),
                    lines
                ));
            } else {
                sections.push(format!("{}\n\n{}", heading, lines));
            }
        }

        let changes = sections.join("\n\n").trim().to_string();
        if changes.is_empty() {
            Ok(self.config.no_changes_template.clone())
        } else {
            Ok(changes)
        }
    }

    fn render_lines(&self, pull_requests: &[&PullRequest]) -> Result<String> {
        let lines = pull_requests
            .iter()
            .map(|pr| render(&self.config.change_template, &self.line_variables(pr), &[]))
            .collect::<Result<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }

    fn line_variables(&self, pr: &PullRequest) -> Variables {
        Variables::new()
            .with("$TITLE", self.escape_title(&pr.title))
            .with("$NUMBER", pr.number)
            .with("$AUTHOR", pr.author_display())
            .with("$BODY", pr.body.clone().unwrap_or_default())
            .with("$URL", pr.url.clone().unwrap_or_default())
            .with("$BASE_REF_NAME", pr.base_ref_name.clone().unwrap_or_default())
            .with("$HEAD_REF_NAME", pr.head_ref_name.clone().unwrap_or_default())
    }
}
