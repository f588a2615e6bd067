pub mod analyzer;
pub mod autolabel;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod github;
pub mod history;
pub mod pattern;
pub mod release;
pub mod template;
pub mod ui;

pub use error::{DrafterError, Result};
