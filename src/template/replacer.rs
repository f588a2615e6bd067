use log::warn;

use crate::boundary::BoundaryWarning;
use crate::config::ReplacerConfig;
use crate::error::DrafterError;
use crate::pattern::{compile_search, translate_replacement, SearchPattern};

/// A compiled search-and-replace rule applied to rendered text
#[derive(Debug, Clone)]
pub struct Replacer {
    search: SearchPattern,
    replacement: String,
}

impl Replacer {
    /// Rewrite `text` with this rule
    pub fn apply(&self, text: &str) -> String {
        self.search.replace(text, &self.replacement).into_owned()
    }
}

/// Compile configured replacers, dropping the ones whose pattern is rejected.
///
/// Returned replacers keep configuration order. Every dropped rule yields a warning.
pub fn compile_replacers(configs: &[ReplacerConfig]) -> (Vec<Replacer>, Vec<BoundaryWarning>) {
    let mut replacers = Vec::with_capacity(configs.len());
    let mut warnings = Vec::new();

    for config in configs {
        match compile_search(&config.search) {
            Ok(search) => replacers.push(Replacer {
                search,
                replacement: translate_replacement(&config.replace),
            }),
            Err(DrafterError::BadPattern { search, reason }) => {
                warn!("Bad replacer regex: '{}' ({})", search, reason);
                warnings.push(BoundaryWarning::BadReplacer { search, reason });
            }
            Err(other) => {
                warn!("Discarding replacer '{}': {}", config.search, other);
                warnings.push(BoundaryWarning::BadReplacer {
                    search: config.search.clone(),
                    reason: other.to_string(),
                });
            }
        }
    }

    (replacers, warnings)
}
