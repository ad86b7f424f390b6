//! Splitting migration scripts into individual statements

use serde::{Deserialize, Serialize};

/// Statement terminator inside migration scripts.
pub const STATEMENT_SEPARATOR: char = ';';

/// How a script is cut into statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Split on every `;`, with no awareness of quoting (default).
    ///
    /// A `;` inside a string literal cuts the statement in two.
    #[default]
    Naive,
    /// Ignore `;` inside quotes and comments.
    QuoteAware,
}

/// Split `sql` into statements according to `mode`.
///
/// Fragments that are empty after trimming (including the one after a
/// trailing separator) are dropped, as are fragments made only of comments.
pub fn split_statements(sql: &str, mode: SplitMode) -> Vec<&str> {
    match mode {
        SplitMode::Naive => sql
            .split(STATEMENT_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_comments_only(s))
            .collect(),
        SplitMode::QuoteAware => split_quote_aware(sql),
    }
}

/// True when `fragment` holds nothing but whitespace, `--` and `/* */` comments.
fn is_comments_only(fragment: &str) -> bool {
    split_quote_aware(fragment).is_empty()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

fn split_quote_aware(sql: &str) -> Vec<&str> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut state = State::Code;
    let mut start = 0;
    // Whether the current fragment holds anything besides whitespace and comments.
    let mut has_code = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match b {
                b'\'' => {
                    state = State::SingleQuote;
                    has_code = true;
                }
                b'"' => {
                    state = State::DoubleQuote;
                    has_code = true;
                }
                b'-' if next == Some(b'-') => {
                    state = State::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = State::BlockComment;
                    i += 1;
                }
                b';' => {
                    if has_code {
                        statements.push(sql[start..i].trim());
                    }
                    start = i + 1;
                    has_code = false;
                }
                b if !b.is_ascii_whitespace() => has_code = true,
                _ => {}
            },
            // A doubled quote is an escaped quote and keeps us inside the literal.
            State::SingleQuote if b == b'\'' => {
                if next == Some(b'\'') {
                    i += 1;
                } else {
                    state = State::Code;
                }
            }
            State::DoubleQuote if b == b'"' => {
                if next == Some(b'"') {
                    i += 1;
                } else {
                    state = State::Code;
                }
            }
            State::LineComment if b == b'\n' => state = State::Code,
            State::BlockComment if b == b'*' && next == Some(b'/') => {
                state = State::Code;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    if has_code {
        statements.push(sql[start..].trim());
    }
    statements
}
