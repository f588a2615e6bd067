//! Commit history since the last release and the pull requests it carries

pub mod collector;
pub mod walker;

pub use collector::{collect_pull_requests, scope_commits, sort_pull_requests};
pub use walker::{HistoryWalker, PathMatches, WalkOptions};
