//! Line-level grammar shared by `.index` and `.title` files.
//!
//! Every meaningful line is `KEY <whitespace> VALUE`. Blank lines and lines whose
//! first non-whitespace character is `#` are skipped.

use thiserror::Error;

/// Longest line (terminator excluded) accepted by either file format.
pub const MAX_LINE_LEN: usize = 8190;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("malformed entry (no value after key)")]
    MissingValue,
    #[error("malformed entry (line too long?)")]
    LineTooLong,
    #[error("expected {expected} integer argument(s), found {found}")]
    ArgCount { expected: usize, found: usize },
    #[error("only integers separated by whitespace are allowed")]
    InvalidCharacter,
    #[error("integer argument out of range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl Directive<'_> {
    #[inline(always)]
    pub fn is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Skip,
    Entry(Directive<'a>),
}

#[inline(always)]
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// Tokenizes one line. `line` must not contain its `\n` terminator; a trailing
/// `\r` left over from CRLF files is treated as part of the terminator.
pub fn parse_line(line: &str) -> Result<Line<'_>, SyntaxError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let bytes = line.as_bytes();

    let start = bytes.iter().position(|&b| !is_space(b));
    let Some(start) = start else {
        return Ok(Line::Skip);
    };
    if bytes[start] == b'#' {
        return Ok(Line::Skip);
    }
    if line.len() > MAX_LINE_LEN {
        return Err(SyntaxError::LineTooLong);
    }

    let key_end = bytes[start..]
        .iter()
        .position(|&b| is_space(b))
        .map_or(bytes.len(), |i| start + i);
    let value_start = bytes[key_end..]
        .iter()
        .position(|&b| !is_space(b))
        .map(|i| key_end + i);
    let Some(value_start) = value_start else {
        return Err(SyntaxError::MissingValue);
    };

    Ok(Line::Entry(Directive {
        key: &line[start..key_end],
        value: &line[value_start..],
    }))
}

#[inline(always)]
fn parse_ascii_digits(bytes: &[u8]) -> Result<u32, SyntaxError> {
    let mut value = 0u32;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return Err(SyntaxError::InvalidCharacter);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or(SyntaxError::Overflow)?;
    }
    Ok(value)
}

/// Parses exactly `N` non-negative decimal integers separated by whitespace.
///
/// Nothing else is tolerated: no signs, no leading or trailing whitespace, and
/// no value that does not fit in a `u32`.
pub fn parse_int_args<const N: usize>(value: &str) -> Result<[u32; N], SyntaxError> {
    let bytes = value.as_bytes();
    if bytes.iter().any(|&b| !b.is_ascii_digit() && !is_space(b))
        || bytes.first().is_some_and(|&b| is_space(b))
        || bytes.last().is_some_and(|&b| is_space(b))
    {
        return Err(SyntaxError::InvalidCharacter);
    }

    let found = value.split_ascii_whitespace().count();
    if found != N {
        return Err(SyntaxError::ArgCount { expected: N, found });
    }

    let mut out = [0u32; N];
    for (slot, token) in out.iter_mut().zip(value.split_ascii_whitespace()) {
        *slot = parse_ascii_digits(token.as_bytes())?;
    }
    Ok(out)
}

/// Walks file contents line by line, yielding 1-based line numbers.
///
/// A final line without a terminator is still parsed.
pub fn lines(content: &str) -> impl Iterator<Item = (usize, Result<Line<'_>, SyntaxError>)> {
    content
        .split_inclusive('\n')
        .enumerate()
        .map(|(i, raw)| (i + 1, parse_line(raw.strip_suffix('\n').unwrap_or(raw))))
}
