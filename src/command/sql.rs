//! SQL-aware splitting for `bq query` commands
//!
//! A `bq query` tail mixes flags with an SQL body that may contain
//! whitespace, quotes and punctuation. The splitter separates the two
//! without word-splitting the body:
//!
//! 1. If the tail contains a double-quoted span, everything before the
//!    first such span is flags and the span (quotes stripped) is the body.
//!    Text after the closing quote is discarded.
//! 2. Otherwise the tail is tokenized and the first token that is not a
//!    flag, and does not follow a bare `--flag` without `=`, starts the
//!    body. Body tokens are rejoined with single spaces.
//! 3. If no token qualifies, the whole tail is the body and there are no
//!    flags.
//!
//! Case 2 treats any token after a bare `--flag` as that flag's value, so
//! `--nouse_legacy_sql SELECT 1` splits into flags `[--nouse_legacy_sql,
//! SELECT]` and body `1`.

use crate::command::args::tokenize;
use crate::core::error::Result;
use regex::Regex;

/// Flags and body of a `bq query` tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlParts {
    pub flags: Vec<String>,
    pub body: String,
}

/// Split a `bq query` tail into flags and SQL body
pub fn split_query_flags(tail: &str) -> Result<SqlParts> {
    if let Some((start, end)) = quoted_span(tail) {
        let before = tail[..start].trim();
        let flags = if before.is_empty() {
            Vec::new()
        } else {
            tokenize(before)?
        };
        return Ok(SqlParts {
            flags,
            body: tail[start + 1..end].to_string(),
        });
    }

    let parts = tokenize(tail)?;
    match body_start(&parts) {
        Some(idx) => Ok(SqlParts {
            flags: parts[..idx].to_vec(),
            body: parts[idx..].join(" "),
        }),
        None => Ok(SqlParts {
            flags: Vec::new(),
            body: tail.to_string(),
        }),
    }
}

/// Byte offsets of the first `"` and the `"` closing it
fn quoted_span(text: &str) -> Option<(usize, usize)> {
    let start = text.find('"')?;
    let len = text[start + 1..].find('"')?;
    Some((start, start + 1 + len))
}

fn body_start(parts: &[String]) -> Option<usize> {
    parts.iter().enumerate().position(|(i, part)| {
        if part.starts_with("--") {
            return false;
        }
        if i == 0 {
            return true;
        }
        let prev = &parts[i - 1];
        prev.contains('=') || !prev.starts_with("--")
    })
}

/// Wraps `project.dataset.table` references after FROM in backticks
///
/// Project ids may contain hyphens, which BigQuery only accepts inside
/// backtick-quoted identifiers.
#[derive(Debug, Clone)]
pub struct TableRefQuoter {
    pattern: Regex,
}

impl TableRefQuoter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"(?i)(FROM\s+)(\w+[-\w]*\.\w+\.\w+)")?,
        })
    }

    /// Quote every unquoted `FROM a-b.c.d` reference
    ///
    /// Bodies that already contain a backtick anywhere are returned as-is.
    pub fn quote(&self, body: &str) -> String {
        if body.contains('`') || !self.pattern.is_match(body) {
            return body.to_string();
        }
        self.pattern.replace_all(body, "${1}`${2}`").into_owned()
    }
}
