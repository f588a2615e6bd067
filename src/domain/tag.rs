use crate::domain::version::coerce_version;

/// Prefix that scopes tags to one release stream (e.g. `app-` in `app-v1.2.3`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPrefix {
    pub prefix: String,
}

impl TagPrefix {
    /// Create a new tag prefix; an empty prefix matches every tag
    pub fn new(prefix: impl Into<String>) -> Self {
        TagPrefix {
            prefix: prefix.into(),
        }
    }

    /// Check if a tag belongs to this release stream
    pub fn matches(&self, tag: &str) -> bool {
        tag.starts_with(&self.prefix)
    }

    /// Remove the prefix from a tag (e.g. "app-v1.2.3" -> "v1.2.3")
    pub fn strip<'a>(&self, tag: &'a str) -> &'a str {
        tag.strip_prefix(self.prefix.as_str()).unwrap_or(tag)
    }

    /// Semver of a tag after the prefix and a leading `v` are removed
    pub fn version_of(&self, tag: &str) -> Option<semver::Version> {
        let stripped = self.strip(tag).trim_start_matches(['v', 'V', '=']);
        semver::Version::parse(stripped).ok()
    }

    /// Looser version extraction used for version arithmetic
    pub fn coerce(&self, tag: &str) -> Option<semver::Version> {
        coerce_version(tag, &self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prefix_matches_everything() {
        let prefix = TagPrefix::default();
        assert!(prefix.matches("v1.2.3"));
        assert!(prefix.matches("anything"));
        assert_eq!(prefix.strip("v1.2.3"), "v1.2.3");
    }

    #[test]
    fn test_prefix_matches() {
        let prefix = TagPrefix::new("app-");
        assert!(prefix.matches("app-v1.2.3"));
        assert!(!prefix.matches("lib-v1.2.3"));
    }

    #[test]
    fn test_prefix_strip() {
        let prefix = TagPrefix::new("app-");
        assert_eq!(prefix.strip("app-v1.2.3"), "v1.2.3");
        assert_eq!(prefix.strip("v1.2.3"), "v1.2.3");
    }

    #[test]
    fn test_version_of() {
        let prefix = TagPrefix::new("app-");
        assert_eq!(
            prefix.version_of("app-v1.2.3"),
            Some(semver::Version::new(1, 2, 3))
        );
        assert_eq!(prefix.version_of("app-latest"), None);
        assert_eq!(prefix.version_of("app-1.2"), None);
    }

    #[test]
    fn test_coerce_partial_tag() {
        let prefix = TagPrefix::new("app-");
        assert_eq!(prefix.coerce("app-1.2"), Some(semver::Version::new(1, 2, 0)));
    }
}
