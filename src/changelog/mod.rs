//! Release body sections: the categorized change list and the contributors sentence

pub mod builder;
pub mod categorizer;
pub mod contributors;

pub use builder::ChangelogBuilder;
pub use categorizer::{categorize, passes_label_filters, Categorized};
pub use contributors::contributors_sentence;
