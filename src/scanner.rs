//! Finds policy markers in source text and decodes their arguments.
//!
//! A marker starts at the provider definition followed by `:` and runs to the
//! end of the line. Its body is a comma separated list of `key=value` pairs.
//! Values are bare (no commas or whitespace), backtick quoted or double quoted
//! with `\"` and `\\` escapes.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::PolicyError;
use crate::types::{PolicyMarker, Provider};

static ARGUMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*([A-Za-z][A-Za-z0-9]*)\s*=\s*(?:`([^`]*)`|"((?:[^"\\]|\\.)*)"|([^,\s`"]+))\s*(?:,|$)"#,
    )
    .expect("argument pattern compiles")
});

/// Where a marker was found. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub path: PathBuf,
    pub line: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// One decoded marker occurrence, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub marker_text: String,
    pub position: Position,
    pub marker: PolicyMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanner {
    provider: Provider,
}

impl Scanner {
    pub fn new(provider: Provider) -> Self {
        Scanner { provider }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Scan `content` (read from `path`) for markers, in line order.
    ///
    /// A marker whose arguments cannot be decoded fails the whole scan with
    /// [`PolicyError::InvalidMarker`] naming its text and position.
    pub fn scan(&self, path: &Path, content: &str) -> Result<Vec<ScanResult>, PolicyError> {
        let prefix = format!("{}:", self.provider.definition());
        let mut results = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let Some(start) = line.find(&prefix) else {
                continue;
            };
            let marker_text = line[start..].trim_end().to_string();
            let position = Position {
                path: path.to_path_buf(),
                line: index + 1,
            };

            let marker = parse_arguments(&marker_text[prefix.len()..])
                .and_then(|arguments| self.provider.decode(arguments))
                .map_err(|source| PolicyError::InvalidMarker {
                    text: marker_text.clone(),
                    position: position.to_string(),
                    source: Box::new(source),
                })?;

            debug!(event = "Marker", position = %position, text = marker_text.as_str());
            results.push(ScanResult {
                marker_text,
                position,
                marker,
            });
        }

        Ok(results)
    }
}

/// Split a marker body into its `key=value` pairs.
pub fn parse_arguments(body: &str) -> Result<Map<String, Value>, PolicyError> {
    let mut arguments = Map::new();
    let mut rest = body;

    while !rest.trim().is_empty() {
        let captures = ARGUMENT_PATTERN
            .captures(rest)
            .ok_or_else(|| PolicyError::ParseError(format!("malformed argument at [{}]", rest.trim())))?;

        let key = captures[1].to_string();
        let value = if let Some(quoted) = captures.get(2) {
            quoted.as_str().to_string()
        } else if let Some(quoted) = captures.get(3) {
            unescape(quoted.as_str())
        } else {
            captures
                .get(4)
                .map(|bare| bare.as_str().to_string())
                .unwrap_or_default()
        };

        if arguments.contains_key(&key) {
            return Err(PolicyError::ParseError(format!("duplicate argument [{key}]")));
        }
        arguments.insert(key, Value::String(value));

        let consumed = captures.get(0).map(|m| m.end()).unwrap_or(rest.len());
        rest = &rest[consumed..];
    }

    Ok(arguments)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => out.push(escaped),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
