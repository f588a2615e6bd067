use crate::config::Config;
use crate::domain::{Category, PullRequest};

/// Pull requests grouped for rendering
#[derive(Debug, Default)]
pub struct Categorized<'a> {
    /// Claimed by no category and no catch-all exists; rendered without a heading
    pub uncategorized: Vec<&'a PullRequest>,
    /// Every configured category in configuration order
    pub categories: Vec<(&'a Category, Vec<&'a PullRequest>)>,
}

/// Whether a pull request survives `exclude-labels` and `include-labels`
pub fn passes_label_filters(pr: &PullRequest, exclude: &[String], include: &[String]) -> bool {
    if pr.has_any_label(exclude) {
        return false;
    }
    include.is_empty() || pr.has_any_label(include)
}

/// Place each pull request into every labelled category whose labels it carries.
///
/// A pull request that no labelled category claims goes to the catch-all category
/// when one is configured, otherwise to the uncategorized bucket.
pub fn categorize<'a>(pull_requests: &'a [PullRequest], config: &'a Config) -> Categorized<'a> {
    let mut result = Categorized {
        uncategorized: Vec::new(),
        categories: config.categories.iter().map(|c| (c, Vec::new())).collect(),
    };
    let catch_all = config.categories.iter().position(Category::is_catch_all);

    for pr in pull_requests
        .iter()
        .filter(|pr| passes_label_filters(pr, &config.exclude_labels, &config.include_labels))
    {
        let mut claimed = false;
        for (category, members) in result.categories.iter_mut() {
            if !category.is_catch_all() && pr.has_any_label(&category.labels) {
                members.push(pr);
                claimed = true;
            }
        }

        if !claimed {
            match catch_all {
                Some(index) => result.categories[index].1.push(pr),
                None => result.uncategorized.push(pr),
            }
        }
    }

    result
}
