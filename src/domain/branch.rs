const HEAD_REF_PREFIX: &str = "refs/heads/";

/// A release target: a branch name, full ref, or commit SHA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitish {
    pub name: String,
}

impl Commitish {
    /// Create a new commitish, dropping a leading `refs/heads/`
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Commitish {
            name: name.strip_prefix(HEAD_REF_PREFIX).unwrap_or(name).to_string(),
        }
    }

    /// Compare against another commitish with `refs/heads/` ignored on both sides
    pub fn matches(&self, other: &str) -> bool {
        self.name == other.strip_prefix(HEAD_REF_PREFIX).unwrap_or(other)
    }
}
