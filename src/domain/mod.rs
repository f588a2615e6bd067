//! Domain logic - pure release rules independent of the hosting API

pub mod branch;
pub mod category;
pub mod pull_request;
pub mod release;
pub mod tag;
pub mod version;

pub use branch::Commitish;
pub use category::Category;
pub use pull_request::{Author, Commit, CommitAuthor, PullRequest};
pub use release::{MakeLatest, Release, ReleasePayload, ResolvedVersion};
pub use tag::TagPrefix;
pub use version::{coerce_version, Increment, VersionBump, VersionDescriptor};
