//! Version analysis: which bump the merged pull requests ask for, and what it yields

pub mod version_resolver;

pub use version_resolver::{VersionInfo, VersionInput, VersionResolver, VersionVariable};
