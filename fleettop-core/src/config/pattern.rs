//! Glob-style host pattern matching
//!
//! Directory keys may be shell-glob patterns (`*`, `?`, bracket classes).
//! Patterns are compiled once, at directory build time, into anchored
//! regular expressions, so an invalid pattern is a load-time error rather
//! than a silent non-match at lookup time.

use regex::Regex;

use crate::error::{ConfigError, ConfigResult};

/// A compiled shell-glob host pattern
#[derive(Debug, Clone)]
pub struct HostPattern {
    text: String,
    regex: Regex,
}

impl HostPattern {
    /// Compiles a glob pattern into a matcher.
    ///
    /// Supported syntax: `*` (any run of characters), `?` (any single
    /// character), `[...]` character classes including ranges and `[!...]`
    /// negation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for malformed patterns,
    /// e.g. an unclosed character class.
    pub fn compile(pattern: &str) -> ConfigResult<Self> {
        let source = glob_to_regex(pattern)?;
        let regex = Regex::new(&source).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            text: pattern.to_string(),
            regex,
        })
    }

    /// Returns true when the host name matches this pattern
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The original pattern text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true when the key contains glob metacharacters.
    ///
    /// Keys without metacharacters are literal host names and belong in
    /// the directory's exact-match table.
    #[must_use]
    pub fn is_glob(key: &str) -> bool {
        key.contains(['*', '?', '['])
    }
}

/// Translates a glob pattern into an anchored regex source string
fn glob_to_regex(pattern: &str) -> ConfigResult<String> {
    let invalid = |reason: &str| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            '[' => {
                source.push('[');
                // Glob negation is `!`; regex uses `^`
                if chars.peek() == Some(&'!') {
                    chars.next();
                    source.push('^');
                } else if chars.peek() == Some(&'^') {
                    chars.next();
                    source.push_str("\\^");
                }
                // A leading `]` is a literal member of the class
                if chars.peek() == Some(&']') {
                    chars.next();
                    source.push_str("\\]");
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        ']' => {
                            source.push(']');
                            closed = true;
                            break;
                        }
                        '\\' => source.push_str("\\\\"),
                        '[' => source.push_str("\\["),
                        other => source.push(other),
                    }
                }
                if !closed {
                    return Err(invalid("unclosed character class"));
                }
            }
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }

    source.push('$');
    Ok(source)
}
