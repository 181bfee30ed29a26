//! File-pattern matching for override blocks.
//!
//! Patterns are compiled with the `glob` crate after expanding the
//! alternative groups it does not understand:
//!
//! - `?(a|b)` matches nothing, `a` or `b`
//! - `@(a|b)` matches `a` or `b`
//! - `{a,b}` matches `a` or `b`
//!
//! A pattern without `/` is matched against the file name only. Patterns
//! are relative to the configuration's directory: a leading `./` is
//! dropped, and absolute patterns or `..` segments are rejected.

use crate::error::ModelError;
use glob::MatchOptions;
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A validated file glob, compiled once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    alternatives: Vec<glob::Pattern>,
    basename_only: bool,
}

impl GlobPattern {
    /// Creates a new glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty, escapes the configuration's
    /// directory, has an unbalanced or unsupported group, or has invalid
    /// glob syntax.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        if pattern.is_empty() {
            return Err(ModelError::EmptyGlobPattern);
        }
        let invalid = |reason: String| ModelError::InvalidGlobPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let relative = strip_dot_prefix(pattern);
        if relative.starts_with('/') {
            return Err(invalid("absolute patterns are not allowed".to_string()));
        }
        if relative.split('/').any(|segment| segment == "..") {
            return Err(invalid("`..` segments are not allowed".to_string()));
        }
        if relative.is_empty() {
            return Err(ModelError::EmptyGlobPattern);
        }

        let mut expanded = expand(relative).map_err(invalid)?;
        expanded.dedup();
        let alternatives = expanded
            .iter()
            .map(|alt| glob::Pattern::new(alt).map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: pattern.to_string(),
            alternatives,
            basename_only: !pattern.contains('/'),
        })
    }

    /// Tests whether a normalized, `/`-separated path matches.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let candidate = if self.basename_only {
            path.rsplit('/').next().unwrap_or(path)
        } else {
            path
        };
        self.alternatives
            .iter()
            .any(|alt| alt.matches_with(candidate, MATCH_OPTIONS) || matches_dir_prefix(alt, candidate))
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// `dir/**` also has to match everything below `dir`.
fn matches_dir_prefix(alt: &glob::Pattern, path: &str) -> bool {
    let Some(prefix) = alt.as_str().strip_suffix("/**") else {
        return false;
    };
    let normalized = prefix.trim_end_matches('/');
    !normalized.contains(['*', '?', '['])
        && path.starts_with(normalized)
        && path.as_bytes().get(normalized.len()) == Some(&b'/')
}

/// Converts a file path into the `/`-separated form patterns match against.
///
/// Absolute paths under `base_dir` become relative to it, and a leading
/// `./` is dropped.
#[must_use]
pub fn normalize_path(path: &Path, base_dir: Option<&Path>) -> String {
    let relative = base_dir
        .filter(|_| path.is_absolute())
        .and_then(|base| path.strip_prefix(base).ok())
        .unwrap_or(path);
    let text = relative.to_string_lossy().replace('\\', "/");
    strip_dot_prefix(&text).to_string()
}

fn strip_dot_prefix(mut text: &str) -> &str {
    while let Some(rest) = text.strip_prefix("./") {
        text = rest;
    }
    text
}

struct Group {
    start: usize,
    end: usize,
    alternatives: Vec<String>,
}

fn expand(pattern: &str) -> Result<Vec<String>, String> {
    let Some(group) = find_group(pattern)? else {
        return Ok(vec![pattern.to_string()]);
    };
    let (head, tail) = (&pattern[..group.start], &pattern[group.end..]);
    let mut out = Vec::new();
    for alt in &group.alternatives {
        out.extend(expand(&format!("{head}{alt}{tail}"))?);
    }
    Ok(out)
}

fn find_group(pattern: &str) -> Result<Option<Group>, String> {
    let mut chars = pattern.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let opens_paren = chars.peek().is_some_and(|&(_, next)| next == '(');
        match c {
            '[' => {
                // Character classes are left to the glob crate.
                for (_, inner) in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                }
            }
            '?' | '@' if opens_paren => {
                let (close, mut alternatives) = split_group(pattern, pos + 2, ')', '|')?;
                if c == '?' {
                    alternatives.insert(0, String::new());
                }
                return Ok(Some(Group {
                    start: pos,
                    end: close + 1,
                    alternatives,
                }));
            }
            '+' | '!' | '*' if opens_paren => {
                return Err(format!("unsupported extglob `{c}(...)`"));
            }
            '{' => {
                let (close, alternatives) = split_group(pattern, pos + 1, '}', ',')?;
                return Ok(Some(Group {
                    start: pos,
                    end: close + 1,
                    alternatives,
                }));
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Splits the body of a group starting at `body_start` on top-level `sep`,
/// returning the index of the closing delimiter and the alternatives.
fn split_group(
    pattern: &str,
    body_start: usize,
    close: char,
    sep: char,
) -> Result<(usize, Vec<String>), String> {
    let mut depth = 0usize;
    let mut segment_start = body_start;
    let mut alternatives = Vec::new();
    for (offset, c) in pattern[body_start..].char_indices() {
        let idx = body_start + offset;
        match c {
            '(' | '{' => depth += 1,
            ')' | '}' if depth > 0 => depth -= 1,
            ')' | '}' => {
                if c != close {
                    return Err(format!("expected `{close}` but found `{c}`"));
                }
                alternatives.push(pattern[segment_start..idx].to_string());
                return Ok((idx, alternatives));
            }
            _ if c == sep && depth == 0 => {
                alternatives.push(pattern[segment_start..idx].to_string());
                segment_start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    Err(format!("unclosed group, expected `{close}`"))
}
