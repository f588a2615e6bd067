//! Finding, assembling and writing the draft release

pub mod info;
pub mod publisher;
pub mod resolver;

pub use info::{build_release_payload, ReleaseInputs};
pub use publisher::{publish_release, PublishAction, PublishedRelease};
pub use resolver::{compare_releases, find_releases, select_releases, ReleaseLookup, ReleaseQuery};
