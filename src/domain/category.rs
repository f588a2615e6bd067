use serde::{Deserialize, Serialize};

/// A changelog section that collects pull requests by label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Category {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Wrap the section in a collapsible block above this many entries; 0 never collapses
    #[serde(default)]
    pub collapse_after: usize,
}

impl Category {
    /// A category without labels receives whatever no other category claims
    pub fn is_catch_all(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn should_collapse(&self, count: usize) -> bool {
        self.collapse_after != 0 && count > self.collapse_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all() {
        assert!(Category::default().is_catch_all());
        let labelled = Category {
            title: "Fixes".to_string(),
            labels: vec!["bug".to_string()],
            collapse_after: 0,
        };
        assert!(!labelled.is_catch_all());
    }

    #[test]
    fn test_collapse_threshold() {
        let category = Category {
            collapse_after: 2,
            ..Category::default()
        };
        assert!(!category.should_collapse(2));
        assert!(category.should_collapse(3));
        assert!(!Category::default().should_collapse(100));
    }
}
