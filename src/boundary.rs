use std::fmt;

/// Non-fatal issues found while drafting a release.
/// These degrade the run instead of aborting it and are reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A replacer search pattern was discarded
    BadReplacer { search: String, reason: String },
    /// An autolabeler matcher was discarded
    BadAutolabelPattern {
        label: String,
        search: String,
        reason: String,
    },
    /// Neither the tag nor the name of a release parses as a version
    UnparsableVersion { input: String },
    /// Path-scoped history found nothing since the last release
    NoCommitsSinceRelease { paths: Vec<String> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BadReplacer { search, reason } => {
                write!(f, "Bad replacer regex '{}': {}", search, reason)
            }
            BoundaryWarning::BadAutolabelPattern {
                label,
                search,
                reason,
            } => {
                write!(
                    f,
                    "Bad autolabeler regex '{}' for label '{}': {}",
                    search, label, reason
                )
            }
            BoundaryWarning::UnparsableVersion { input } => {
                write!(
                    f,
                    "Cannot parse a version from '{}', treating as first release",
                    input
                )
            }
            BoundaryWarning::NoCommitsSinceRelease { paths } => {
                write!(
                    f,
                    "No commits found since last release touching: {}",
                    paths.join(", ")
                )
            }
        }
    }
}
