use std::io;

use thiserror::Error;

use super::GateId;

/// The result of a circuit operation.
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Error returned when a circuit operation failed.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// The design file could not be read.
    #[error("Cannot open design \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The circuit could not be written out.
    #[error("Cannot write \"{path}\": {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The gate with given id is not defined in the circuit.
    #[error("Cannot find gate ({0})!!")]
    GateDoesNotExist(GateId),

    /// Just forwarding a [`ParseError`].
    #[error("{0}")]
    ParseError(#[from] ParseError),
}

/// A diagnostic produced while reading an AAG file.
///
/// Lines and columns are stored 1-based, the way a user counts them in an editor.
/// Only diagnostics that point at a precise character carry a column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[ERROR] Line {line}{}: {kind}", column_suffix(.column))]
pub struct ParseError {
    pub line: usize,
    pub column: Option<usize>,
    pub kind: ParseErrorKind,
}

fn column_suffix(column: &Option<usize>) -> String {
    match column {
        Some(col) => format!(", Col {}", col),
        None => String::new(),
    }
}

impl ParseError {
    /// Builds an error from 0-based positions, as tracked by the scanner.
    pub(crate) fn at(line: usize, column: usize, kind: ParseErrorKind) -> Self {
        ParseError {
            line: line + 1,
            column: Some(column + 1),
            kind,
        }
    }

    /// Builds an error that only points at a line (0-based).
    pub(crate) fn on_line(line: usize, kind: ParseErrorKind) -> Self {
        ParseError {
            line: line + 1,
            column: None,
            kind,
        }
    }
}

/// Every way an AAG file can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Extra space character is detected!!")]
    ExtraSpace,

    #[error("Missing space character!!")]
    MissingSpace,

    /// A whitespace character other than a plain space, with its code point.
    #[error("Illegal white space char({0}) is detected!!")]
    IllegalWhitespace(u32),

    /// Carries the field description, including the offending token when there is one.
    #[error("Illegal {0}!!")]
    IllegalNumber(String),

    #[error("Illegal identifier \"{0}\"!!")]
    IllegalIdentifier(String),

    #[error("Illegal symbol type ({0})!!")]
    IllegalSymbolType(String),

    /// A non-printable character inside a symbolic name, with its code point.
    #[error("Symbolic name contains un-printable char({0})!!")]
    IllegalSymbolName(u32),

    #[error("Missing {0}!!")]
    MissingNumber(String),

    #[error("Missing \"{0}\"!!")]
    MissingIdentifier(String),

    #[error("A new line is expected here!!")]
    MissingNewline,

    /// A section ended before its declared number of lines.
    #[error("Missing {0} definition!!")]
    MissingDefinition(String),

    #[error("{what} {literal}({}) cannot be inverted!!", .literal / 2)]
    CannotInvert { what: String, literal: u32 },

    #[error("Literal \"{0}\" exceeds maximum valid ID!!")]
    MaxLiteralId(u32),

    #[error(
        "Literal \"{literal}\" is redefined, previously defined as {previous_type} in line {previous_line}!!"
    )]
    RedefinedGate {
        literal: u32,
        previous_type: &'static str,
        previous_line: usize,
    },

    #[error("Symbolic name for \"{kind}{index}\" is redefined!!")]
    RedefinedSymbolicName { kind: char, index: u32 },

    #[error("Cannot redefine constant ({0})!!")]
    RedefinedConstant(u32),

    #[error("{what} is too small ({value})!!")]
    NumberTooSmall { what: String, value: u32 },

    #[error("{what} is too big ({value})!!")]
    NumberTooBig { what: String, value: u32 },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_with_and_without_column() {
        let e = ParseError::at(0, 4, ParseErrorKind::ExtraSpace);
        assert_eq!(
            e.to_string(),
            "[ERROR] Line 1, Col 5: Extra space character is detected!!"
        );

        let e = ParseError::on_line(
            2,
            ParseErrorKind::RedefinedGate {
                literal: 2,
                previous_type: "PI",
                previous_line: 2,
            },
        );
        assert_eq!(
            e.to_string(),
            "[ERROR] Line 3: Literal \"2\" is redefined, previously defined as PI in line 2!!"
        );
    }

    #[test]
    fn display_cannot_invert_halves_literal() {
        let kind = ParseErrorKind::CannotInvert {
            what: "AIG gate".to_string(),
            literal: 7,
        };
        assert_eq!(kind.to_string(), "AIG gate 7(3) cannot be inverted!!");
    }

    #[test]
    fn circuit_error_forwards_parse_error() {
        let e: CircuitError = ParseError::on_line(0, ParseErrorKind::IllegalNumber("latches".into())).into();
        assert_eq!(e.to_string(), "[ERROR] Line 1: Illegal latches!!");
    }
}
