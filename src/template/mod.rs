//! Placeholder substitution for release text.
//!
//! Templates reference variables as uppercase `$TOKEN`s. A token with no binding is left
//! untouched so the same text can be rendered again later with more variables, which is
//! how the release body gets its content first and its version numbers second.

pub mod replacer;

pub use replacer::{compile_replacers, Replacer};

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{DrafterError, Result};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Z_]+").expect("token pattern is valid"));

/// Composite variables nest through their bindings; anything deeper is treated as runaway
const MAX_DEPTH: usize = 8;

/// Value bound to a `$TOKEN`
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// Inserted as-is
    Leaf(String),
    /// Rendered from its own template with `bindings` as the scope
    Composite { template: String, bindings: Variables },
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::Leaf(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::Leaf(value.to_string())
    }
}

impl From<u64> for Variable {
    fn from(value: u64) -> Self {
        Variable::Leaf(value.to_string())
    }
}

/// A scope of template variables keyed by token, including the leading `$`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(HashMap<String, Variable>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Variable>) {
        self.0.insert(key.into(), value.into());
    }

    /// Bind `key` only when a value is present; `None` leaves the token unresolved
    pub fn insert_opt<V: Into<Variable>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.0.get(key)
    }

    /// Add every binding from `other`, overwriting on conflict
    pub fn extend(&mut self, other: Variables) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Substitute every bound `$TOKEN` in `template`, then apply `replacers` in order.
///
/// # Errors
/// Returns [`DrafterError::Template`] when a composite variable has no template or
/// composites nest deeper than the evaluator allows.
pub fn render(template: &str, variables: &Variables, replacers: &[Replacer]) -> Result<String> {
    let substituted = substitute(template, variables, 0)?;
    Ok(replacers
        .iter()
        .fold(substituted, |text, replacer| replacer.apply(&text)))
}

fn substitute(template: &str, variables: &Variables, depth: usize) -> Result<String> {
    if depth > MAX_DEPTH {
        return Err(DrafterError::template(format!(
            "variables nest deeper than {} levels",
            MAX_DEPTH
        )));
    }

    let mut failure = None;
    let rendered = TOKEN.replace_all(template, |caps: &Captures| {
        let token = &caps[0];
        match variables.get(token) {
            None => token.to_string(),
            Some(Variable::Leaf(value)) => value.clone(),
            Some(Variable::Composite { template, bindings }) => {
                if template.is_empty() {
                    failure.get_or_insert_with(|| {
                        DrafterError::template(format!("{} has no template to render", token))
                    });
                    return token.to_string();
                }
                match substitute(template, bindings, depth + 1) {
                    Ok(value) => value,
                    Err(e) => {
                        failure.get_or_insert(e);
                        token.to_string()
                    }
                }
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}
