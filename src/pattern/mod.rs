//! Parsing of Liang's priority-annotated patterns and of exception
//! words written with explicit hyphens.

use crate::constants::WORD_BOUNDARY;
use crate::types::{CharCode, Priority};

/// A pattern split into its characters and inter-character priorities.
///
/// `priorities` always holds `chars.len() + 1` entries: entry `i` is
/// the priority at the slot immediately before `chars[i]`, and the
/// final entry the priority after the last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    /// Pattern characters with the in-band digits removed.
    pub chars: Vec<CharCode>,
    /// Priorities for the `chars.len() + 1` inter-character slots.
    pub priorities: Vec<Priority>,
}

/// Errors raised while parsing a pattern string.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The pattern contains a code point outside the Basic
    /// Multilingual Plane, which the packed entry format cannot carry.
    #[error("character U+{codepoint:06X} in pattern {pattern:?} is outside the Basic Multilingual Plane")]
    OutsideBmp {
        /// The offending pattern, verbatim.
        pattern: String,
        /// The rejected code point.
        codepoint: u32,
    },
}

/// Parses a priority-annotated pattern string such as `.hy3p`.
///
/// ASCII digits set the priority of the slot before the next
/// character; a trailing digit sets the final slot. Every other
/// character, the word boundary `.` included, is taken verbatim.
pub fn parse(pattern: &str) -> Result<ParsedPattern, PatternError> {
    let mut chars = Vec::with_capacity(pattern.len());
    let mut priorities = Vec::with_capacity(pattern.len() + 1);
    let mut pending: Priority = 0;

    for c in pattern.chars() {
        if let Some(digit) = c.to_digit(10) {
            pending = digit as Priority;
        } else {
            let codepoint = u32::from(c);
            if codepoint > u32::from(CharCode::MAX) {
                return Err(PatternError::OutsideBmp {
                    pattern: pattern.to_string(),
                    codepoint,
                });
            }
            priorities.push(pending);
            chars.push(codepoint as CharCode);
            pending = 0;
        }
    }
    priorities.push(pending);

    Ok(ParsedPattern { chars, priorities })
}

/// Rewrites a hyphenated exception word into an equivalent pattern
/// string, e.g. `uni-ver-sity` into `.u8n8i9v8e8r9s8i8t8y.`.
///
/// Hyphen positions become priority 9, every other inter-letter slot
/// priority 8, so the exception overrides pattern-derived priorities.
/// The slots adjacent to the boundary markers stay at 0, and runs of
/// adjacent hyphens collapse to a single 9.
pub fn rewrite_exception(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 2 + 2);
    out.push(WORD_BOUNDARY);

    let mut first = true;
    let mut after_hyphen = false;
    for c in word.chars() {
        if c == '-' {
            after_hyphen = true;
            continue;
        }
        if !first {
            out.push(if after_hyphen { '9' } else { '8' });
        }
        out.push(c);
        first = false;
        after_hyphen = false;
    }

    out.push(WORD_BOUNDARY);
    out
}
