//! Column-exact scanning of a single AAG line.
//!
//! The AAG grammar separates fields with exactly one space and allows no leading or
//! trailing whitespace. [`LineScanner`] walks a line byte by byte and reports any
//! deviation at the column where it happens, so every section parser shares the same
//! "check space, read number, advance column" step.
//!
//! Lines are raw bytes: the format itself is ASCII, and anything else is reported
//! where it shows up instead of failing the whole file.

use std::borrow::Cow;

use super::error::{ParseError, ParseErrorKind};

/// A numeric field together with the (0-based) column it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    pub value: u32,
    pub column: usize,
}

/// Whitespace as far as the grammar is concerned, vertical tab included.
pub(crate) fn is_whitespace(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

/// A token for display inside a diagnostic.
pub(crate) fn lossy(token: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(token)
}

pub(crate) struct LineScanner<'a> {
    text: &'a [u8],
    /// 0-based line number, used for diagnostics.
    line: usize,
    /// Byte offset of the next unread byte.
    pos: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(text: &'a [u8], line: usize) -> Self {
        LineScanner { text, line, pos: 0 }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    /// Consumes one byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// The unread part of the line.
    pub fn rest(&self) -> &'a [u8] {
        &self.text[self.pos.min(self.text.len())..]
    }

    pub fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.line, self.pos, kind)
    }

    pub fn error_at(&self, column: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.line, column, kind)
    }

    pub fn error_on_line(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::on_line(self.line, kind)
    }

    /// Lines never start with whitespace.
    pub fn expect_line_start(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(b' ') => Err(self.error_here(ParseErrorKind::ExtraSpace)),
            Some(b) if is_whitespace(b) => {
                Err(self.error_here(ParseErrorKind::IllegalWhitespace(b as u32)))
            }
            _ => Ok(()),
        }
    }

    /// Reads everything up to the next whitespace byte (or the end of the line).
    pub fn next_token(&mut self) -> &'a [u8] {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| is_whitespace(b))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Consumes the single space separating two fields.
    ///
    /// `what` names the field that should follow, for the missing-number diagnostic.
    pub fn expect_separator(&mut self, what: &str) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(self.error_here(ParseErrorKind::MissingNumber(what.to_string()))),
            Some(b' ') => {
                self.pos += 1;
                match self.peek() {
                    None => Err(self.error_here(ParseErrorKind::MissingNumber(what.to_string()))),
                    Some(b' ') => Err(self.error_here(ParseErrorKind::ExtraSpace)),
                    Some(b) if is_whitespace(b) => {
                        Err(self.error_here(ParseErrorKind::IllegalWhitespace(b as u32)))
                    }
                    Some(_) => Ok(()),
                }
            }
            Some(_) => Err(self.error_here(ParseErrorKind::MissingSpace)),
        }
    }

    /// Reads an unsigned decimal number at the current position.
    pub fn number(&mut self, what: &str) -> Result<Field, ParseError> {
        let column = self.pos;
        let token = self.next_token();
        if token.is_empty() {
            return Err(self.error_at(column, ParseErrorKind::MissingNumber(what.to_string())));
        }
        let value = parse_u32(token).ok_or_else(|| {
            self.error_on_line(ParseErrorKind::IllegalNumber(format!(
                "{}({})",
                what,
                lossy(token)
            )))
        })?;
        Ok(Field { value, column })
    }

    /// Reads the `index`-th field of a line of space-separated numbers: the line start
    /// is checked before the first one, the separator before the others.
    pub fn field(&mut self, index: usize, what: &str) -> Result<Field, ParseError> {
        if index == 0 {
            self.expect_line_start()?;
        } else {
            self.expect_separator(what)?;
        }
        self.number(what)
    }

    /// The line must be fully consumed.
    pub fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error_here(ParseErrorKind::MissingNewline)),
        }
    }
}

/// Digits only: no sign, no surrounding whitespace.
pub(crate) fn parse_u32(token: &[u8]) -> Option<u32> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(token).ok()?.parse::<u32>().ok()
}
