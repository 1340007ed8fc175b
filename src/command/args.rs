//! Argument tokenizing and output-format normalisation

use crate::core::error::{AssistantError, Result};

/// Format flag appended when the caller did not choose one
pub const DEFAULT_FORMAT_FLAG: &str = "--format=json";

const FORMAT_FLAG: &str = "--format";

/// Split a command tail with shell-style quoting rules
///
/// Quotes group words and are removed; nothing is expanded. A `#` is an
/// ordinary character, never the start of a comment.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    shlex::split(&escape_comment_marks(input))
        .ok_or_else(|| AssistantError::Tokenize(format!("unbalanced quotes in `{}`", input)))
}

/// Backslash-escape every `#` that starts a word outside quotes
fn escape_comment_marks(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut word_start = true;

    for ch in input.chars() {
        if escaped {
            escaped = false;
            word_start = false;
            out.push(ch);
            continue;
        }

        match quote {
            Some(q) if ch == q => quote = None,
            Some('"') if ch == '\\' => escaped = true,
            Some(_) => {}
            None => match ch {
                '\\' => escaped = true,
                '\'' | '"' => quote = Some(ch),
                '#' if word_start => out.push('\\'),
                _ => {}
            },
        }

        word_start = quote.is_none() && !escaped && ch.is_whitespace();
        out.push(ch);
    }
    out
}

pub fn is_format_flag(token: &str) -> bool {
    token.starts_with(FORMAT_FLAG)
}

/// Leave exactly one output-format flag in `args`
///
/// The first caller-supplied `--format…` token wins and later ones are
/// dropped. A bare `--format` takes the next token as its value, which
/// travels with it. Without any format flag, `--format=json` is appended.
pub fn ensure_format_flag(args: &mut Vec<String>) {
    let mut seen = false;
    let mut kept = Vec::with_capacity(args.len() + 1);
    let mut tokens = std::mem::take(args).into_iter();

    while let Some(token) = tokens.next() {
        if !is_format_flag(&token) {
            kept.push(token);
            continue;
        }

        let value = if token == FORMAT_FLAG {
            tokens.next()
        } else {
            None
        };

        if seen {
            continue;
        }
        seen = true;
        kept.push(token);
        kept.extend(value);
    }

    if !seen {
        kept.push(DEFAULT_FORMAT_FLAG.to_string());
    }
    *args = kept;
}

/// Count the tokens that select an output format
pub fn count_format_flags(args: &[String]) -> usize {
    args.iter().filter(|arg| is_format_flag(arg)).count()
}
