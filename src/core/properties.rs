//! Reader for flat `key=value` properties files
//!
//! Follows the `java.util.Properties` text format so existing
//! `logging.properties` files load unchanged:
//!
//! ```text
//! # comment
//! ! also a comment
//! logLevel = INFO
//! customLogFormatter: simple
//! logFilePath logs/app.log
//! multi = first \
//!         second
//! ```

use super::error::{LoggerError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const BLANKS: [char; 3] = [' ', '\t', '\x0c'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a properties file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read and a parse error if
    /// it contains a malformed escape.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading properties",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::parse(&text)
    }

    /// Parse properties text
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = text.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let trimmed = raw.trim_start_matches(BLANKS);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(BLANKS)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            entries.insert(unescape(key, line_no)?, unescape(value, line_no)?);
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when absent
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for Properties {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped `=`, `:` or blank
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(BLANKS);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(BLANKS);
    }
    (key, rest)
}

fn unescape(text: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => out.push(unicode_escape(&mut chars, line)?),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16> {
    let hex: String = chars.take(4).collect();
    if hex.chars().count() != 4 {
        return Err(LoggerError::properties(line, "truncated \\uXXXX escape"));
    }
    u16::from_str_radix(&hex, 16)
        .map_err(|_| LoggerError::properties(line, format!("malformed \\u{} escape", hex)))
}

fn unicode_escape(chars: &mut std::str::Chars<'_>, line: usize) -> Result<char> {
    let high = code_unit(chars, line)?;
    let mut units = vec![high];
    if (0xD800..0xDC00).contains(&high) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(LoggerError::properties(line, "unpaired surrogate escape"));
        }
        units.push(code_unit(chars, line)?);
    }
    char::decode_utf16(units)
        .next()
        .and_then(|decoded| decoded.ok())
        .ok_or_else(|| LoggerError::properties(line, "invalid unicode escape"))
}
