//! Compile-or-reject boundary for user-supplied search strings.
//!
//! Replacers and autolabeler rules accept either a plain string, matched literally and
//! globally, or a delimited regex written as `/pattern/flags`. Every search string coming
//! from configuration goes through [`compile_search`]; nothing past this boundary builds
//! a regex from user input.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DrafterError, Result};

static DELIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(.+)/([a-z]*)$").expect("delimited regex syntax pattern is valid")
});

/// A compiled search pattern
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
    global: bool,
}

impl SearchPattern {
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// Replace matches in `haystack`. The replacement must already be in
    /// `regex` syntax (see [`translate_replacement`]).
    pub fn replace<'h>(&self, haystack: &'h str, replacement: &str) -> Cow<'h, str> {
        if self.global {
            self.regex.replace_all(haystack, replacement)
        } else {
            self.regex.replace(haystack, replacement)
        }
    }
}

/// Compile a search string into a [`SearchPattern`].
///
/// `/pattern/flags` compiles as a regex. Supported flags:
/// - `g` replace every match instead of the first
/// - `i`, `m`, `s`, `x` passed through as inline flags
/// - `u`, `d` accepted and ignored
///
/// Anything else is escaped and matched literally, globally.
///
/// # Errors
/// Returns [`DrafterError::BadPattern`] if the regex does not compile or uses an
/// unsupported flag. Callers discard the rule and carry on.
pub fn compile_search(search: &str) -> Result<SearchPattern> {
    let Some(captures) = DELIMITED.captures(search) else {
        let regex = Regex::new(&regex::escape(search))
            .map_err(|e| DrafterError::bad_pattern(search, e.to_string()))?;
        return Ok(SearchPattern {
            regex,
            global: true,
        });
    };

    let body = &captures[1];
    let mut global = false;
    let mut inline = String::new();
    for flag in captures[2].chars() {
        match flag {
            'g' => global = true,
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'u' | 'd' => {}
            other => {
                return Err(DrafterError::bad_pattern(
                    search,
                    format!("unsupported regex flag '{}'", other),
                ))
            }
        }
    }

    let source = if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", inline, body)
    };

    let regex = Regex::new(&source).map_err(|e| DrafterError::bad_pattern(search, e.to_string()))?;
    Ok(SearchPattern { regex, global })
}

/// Convert a replacement string using `$&`, `$1` and `$<name>` references into the
/// `regex` crate's `${...}` syntax. A `$` that starts no reference stays literal.
pub fn translate_replacement(replacement: &str) -> String {
    let chars: Vec<char> = replacement.chars().collect();
    let mut out = String::with_capacity(replacement.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some(c) if c.is_ascii_digit() => {
                let mut end = i + 1;
                while end < chars.len() && end < i + 3 && chars[end].is_ascii_digit() {
                    end += 1;
                }
                let group: String = chars[i + 1..end].iter().collect();
                out.push_str(&format!("${{{}}}", group));
                i = end;
            }
            Some('<') => match chars[i + 2..].iter().position(|c| *c == '>') {
                Some(offset) => {
                    let name: String = chars[i + 2..i + 2 + offset].iter().collect();
                    out.push_str(&format!("${{{}}}", name));
                    i += 3 + offset;
                }
                None => {
                    out.push_str("$$");
                    i += 1;
                }
            },
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }

    out
}
