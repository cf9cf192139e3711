//! Pulls the recommendation list out of the scorer's console output.
//!
//! The scorer prints diagnostics mixed with one line holding its result as a
//! Python-style list literal, e.g.
//! `[{'name': 'Honda Civic', 'price': 2000000, 'electric': False}]`.
//! Extraction selects that line, rewrites it into JSON and parses it.

use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::str::Chars;

use crate::error::ExtractionError;
use crate::models::RecommendationEntry;

/// Which candidate line wins when the scorer prints several list literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSelection {
    /// First line that starts with `[` and contains `{`
    #[default]
    First,
    /// Last line that starts with `[`
    Last,
}

impl LineSelection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "first" => Some(LineSelection::First),
            "last" => Some(LineSelection::Last),
            _ => None,
        }
    }
}

pub fn select_record_line(output: &str, selection: LineSelection) -> Option<&str> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    match selection {
        LineSelection::First => lines.find(|l| l.starts_with('[') && l.contains('{')),
        LineSelection::Last => lines.filter(|l| l.starts_with('[')).last(),
    }
}

/// Rewrites a Python literal into JSON text.
///
/// Quoted strings of either kind become JSON double-quoted strings, and the
/// bare words `True`, `False` and `None` outside of strings become `true`,
/// `false` and `null`. Everything else is copied through unchanged.
pub fn normalize_record_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => copy_string(c, &mut chars, &mut out),
            c if is_word_char(c) => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
            }
            other => out.push(other),
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Copies one quoted string (opening `delim` already consumed) as JSON.
fn copy_string(delim: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                // JSON has no \' escape
                Some('\'') => out.push('\''),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            c if c == delim => {
                out.push('"');
                return;
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    // unterminated: leave it for the JSON parser to reject
}

pub fn extract_recommendations(
    output: &str,
    selection: LineSelection,
) -> Result<Vec<RecommendationEntry>, ExtractionError> {
    let line = select_record_line(output, selection).ok_or_else(|| {
        ExtractionError::NoRecommendations {
            raw_output: output.to_string(),
        }
    })?;

    let normalized = normalize_record_literal(line);
    serde_json::from_str(&normalized).map_err(|source| ExtractionError::MalformedPayload {
        raw: line.to_string(),
        normalized,
        source,
    })
}
