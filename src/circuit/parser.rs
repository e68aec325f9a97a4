use std::{fs, path::Path};

use log::{debug, info, warn};

use super::{
    Circuit, CircuitError, Gate, GateId, GateKind, Result,
    error::{ParseError, ParseErrorKind},
    scanner::{Field, LineScanner, is_whitespace, lossy},
};

const HEADER_FIELDS: [&str; 5] = [
    "number of variables",
    "number of PIs",
    "number of latches",
    "number of POs",
    "number of AIGs",
];

/// Shape of one line of a gate section.
struct SectionFormat {
    /// Name used when the section is cut short.
    name: &'static str,
    /// One description per numeric field of the line.
    fields: &'static [&'static str],
}

const INPUT_LINE: SectionFormat = SectionFormat {
    name: "PI",
    fields: &["PI literal ID"],
};

const OUTPUT_LINE: SectionFormat = SectionFormat {
    name: "PO",
    fields: &["PO literal ID"],
};

const AND_LINE: SectionFormat = SectionFormat {
    name: "AIG",
    fields: &[
        "AIG gate literal ID",
        "AIG input literal ID",
        "AIG input literal ID",
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u32,
    i: u32,
    l: u32,
    o: u32,
    a: u32,
}

impl TryFrom<&[u8]> for Header {
    type Error = ParseError;

    fn try_from(line: &[u8]) -> std::result::Result<Self, Self::Error> {
        let mut s = LineScanner::new(line, 0);
        if s.is_empty() {
            return Err(s.error_on_line(ParseErrorKind::MissingIdentifier("aag".to_string())));
        }
        s.expect_line_start()?;

        let ident = s.next_token();
        if ident != b"aag" {
            // "aag3 ..." is a missing separator rather than an unknown keyword
            if ident.starts_with(b"aag") && ident[3].is_ascii_digit() {
                return Err(s.error_at(3, ParseErrorKind::MissingSpace));
            }
            return Err(s.error_on_line(ParseErrorKind::IllegalIdentifier(
                lossy(ident).into_owned(),
            )));
        }

        let mut values = [0u32; 5];
        for (value, what) in values.iter_mut().zip(HEADER_FIELDS) {
            s.expect_separator(what)?;
            *value = s.number(what)?.value;
        }
        s.expect_end()?;

        let [m, i, l, o, a] = values;
        let header = Header { m, i, l, o, a };

        if (m as u64) < i as u64 + a as u64 {
            return Err(s.error_on_line(ParseErrorKind::NumberTooSmall {
                what: "Number of variables".to_string(),
                value: m,
            }));
        }
        if l != 0 {
            return Err(s.error_on_line(ParseErrorKind::IllegalNumber("latches".to_string())));
        }
        // Output ids follow the variables and must stay representable.
        if m as u64 + o as u64 > GateId::MAX as u64 {
            return Err(s.error_on_line(ParseErrorKind::NumberTooBig {
                what: "Number of POs".to_string(),
                value: o,
            }));
        }

        Ok(header)
    }
}

/// One parsed line of the symbol section.
enum SymbolLine<'a> {
    Name {
        kind: char,
        index: u32,
        name: &'a [u8],
    },
    Comment,
}

/// Splits the file into lines, without the terminators. A final newline does not
/// start an extra empty line.
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

struct Parser<'a> {
    lines: Vec<&'a [u8]>,
    /// 0-based index of the next line to read.
    next: usize,
    header: Header,
    circuit: Circuit,
}

impl<'a> Parser<'a> {
    fn new(bytes: &'a [u8]) -> std::result::Result<Self, ParseError> {
        let lines = split_lines(bytes);
        let header = Header::try_from(lines.first().copied().unwrap_or(b""))?;
        debug!(
            "header: M={} I={} L={} O={} A={}",
            header.m, header.i, header.l, header.o, header.a
        );
        let circuit = Circuit::new(header.m, header.o).map_err(|e| {
            warn!("cannot allocate {} gates: {}", header.m as u64 + header.o as u64 + 1, e);
            ParseError::on_line(
                0,
                ParseErrorKind::NumberTooBig {
                    what: "Number of variables".to_string(),
                    value: header.m,
                },
            )
        })?;
        Ok(Parser {
            lines,
            next: 1,
            header,
            circuit,
        })
    }

    /// Next line of a section which still expects `format` lines.
    fn section_line(
        &mut self,
        format: &SectionFormat,
    ) -> std::result::Result<LineScanner<'a>, ParseError> {
        let line = self.next;
        let text = self.lines.get(line).copied().ok_or_else(|| {
            ParseError::on_line(
                line,
                ParseErrorKind::MissingDefinition(format.name.to_string()),
            )
        })?;
        self.next += 1;
        Ok(LineScanner::new(text, line))
    }

    /// Checks a literal that defines a new input or and-gate, returns its gate id.
    fn check_definition(
        &self,
        s: &LineScanner<'a>,
        field: Field,
        what: &str,
    ) -> std::result::Result<GateId, ParseError> {
        let literal = field.value;
        if literal < 2 {
            return Err(s.error_at(field.column, ParseErrorKind::RedefinedConstant(literal)));
        }
        self.check_reference(s, field)?;
        if literal % 2 != 0 {
            return Err(s.error_at(
                field.column,
                ParseErrorKind::CannotInvert {
                    what: what.to_string(),
                    literal,
                },
            ));
        }
        let id = literal / 2;
        if let Some(previous) = self.circuit.get_gate(id) {
            return Err(s.error_on_line(ParseErrorKind::RedefinedGate {
                literal,
                previous_type: previous.type_str(),
                previous_line: previous.line,
            }));
        }
        Ok(id)
    }

    /// Any literal must stay within the declared variables.
    fn check_reference(
        &self,
        s: &LineScanner<'a>,
        field: Field,
    ) -> std::result::Result<(), ParseError> {
        if field.value / 2 > self.header.m {
            return Err(s.error_at(field.column, ParseErrorKind::MaxLiteralId(field.value)));
        }
        Ok(())
    }

    fn read_inputs(&mut self) -> std::result::Result<(), ParseError> {
        for _ in 0..self.header.i {
            let mut s = self.section_line(&INPUT_LINE)?;
            let field = s.field(0, INPUT_LINE.fields[0])?;
            let id = self.check_definition(&s, field, "PI")?;
            s.expect_end()?;
            self.circuit.define(Gate::new(GateKind::Input, id, self.next));
        }
        Ok(())
    }

    fn read_outputs(&mut self) -> std::result::Result<(), ParseError> {
        for k in 0..self.header.o {
            let mut s = self.section_line(&OUTPUT_LINE)?;
            let field = s.field(0, OUTPUT_LINE.fields[0])?;
            self.check_reference(&s, field)?;
            s.expect_end()?;
            let id = self.header.m + k + 1;
            self.circuit.define(Gate::new(
                GateKind::Output { fanin: field.value },
                id,
                self.next,
            ));
        }
        Ok(())
    }

    /// Each literal is checked as soon as it is read, so the first error on a line is
    /// the leftmost one.
    fn read_ands(&mut self) -> std::result::Result<(), ParseError> {
        for _ in 0..self.header.a {
            let mut s = self.section_line(&AND_LINE)?;
            let gate = s.field(0, AND_LINE.fields[0])?;
            let id = self.check_definition(&s, gate, "AIG gate")?;
            if s.at_end() {
                return Err(s.error_here(ParseErrorKind::MissingSpace));
            }
            // Fanins may name gates defined later, or never.
            let mut fanins = [0; 2];
            for (k, fanin) in fanins.iter_mut().enumerate() {
                let field = s.field(k + 1, AND_LINE.fields[k + 1])?;
                self.check_reference(&s, field)?;
                *fanin = field.value;
            }
            s.expect_end()?;
            let [fanin0, fanin1] = fanins;
            self.circuit.define(Gate::new(
                GateKind::And { fanin0, fanin1 },
                id,
                self.next,
            ));
        }
        Ok(())
    }

    /// Parses one line of the symbol section: `i<idx> <name>`, `o<idx> <name>` or `c`.
    fn symbol_line(
        &self,
        s: &mut LineScanner<'a>,
    ) -> std::result::Result<SymbolLine<'a>, ParseError> {
        if s.is_empty() {
            return Err(s.error_here(ParseErrorKind::IllegalSymbolType(String::new())));
        }
        s.expect_line_start()?;

        let kind = match s.bump() {
            Some(b'c') => {
                // The comment marker stands alone on its line.
                return match s.peek() {
                    None => Ok(SymbolLine::Comment),
                    Some(_) => Err(s.error_here(ParseErrorKind::MissingNewline)),
                };
            }
            Some(kind @ (b'i' | b'o')) => kind as char,
            Some(other) => {
                return Err(s.error_at(
                    0,
                    ParseErrorKind::IllegalSymbolType(lossy(&[other]).into_owned()),
                ));
            }
            None => return Err(s.error_at(0, ParseErrorKind::IllegalSymbolType(String::new()))),
        };

        match s.peek() {
            None => {
                return Err(s.error_here(ParseErrorKind::MissingNumber(
                    "symbol index".to_string(),
                )));
            }
            Some(b' ') => return Err(s.error_here(ParseErrorKind::ExtraSpace)),
            Some(b) if is_whitespace(b) => {
                return Err(s.error_here(ParseErrorKind::IllegalWhitespace(b as u32)));
            }
            Some(_) => (),
        }
        let index = s.number("symbol index")?.value;
        if matches!(s.peek(), Some(b) if b != b' ') {
            return Err(s.error_here(ParseErrorKind::MissingSpace));
        }

        let (what, targets) = match kind {
            'i' => ("PI index", &self.circuit.inputs),
            _ => ("PO index", &self.circuit.outputs),
        };
        let target = targets.get(index as usize).ok_or_else(|| {
            s.error_on_line(ParseErrorKind::NumberTooBig {
                what: what.to_string(),
                value: index,
            })
        })?;
        if self.circuit.gate(*target).name.is_some() {
            return Err(s.error_on_line(ParseErrorKind::RedefinedSymbolicName { kind, index }));
        }

        // The name is everything after the single separating space.
        s.bump();
        let name = s.rest();
        if name.iter().all(|&b| b == b' ') {
            return Err(s.error_on_line(ParseErrorKind::MissingIdentifier(
                "symbolic name".to_string(),
            )));
        }
        let start = s.pos();
        if let Some(offset) = name
            .iter()
            .position(|&b| !(b == b' ' || b.is_ascii_graphic()))
        {
            return Err(s.error_at(
                start + offset,
                ParseErrorKind::IllegalSymbolName(name[offset] as u32),
            ));
        }

        Ok(SymbolLine::Name { kind, index, name })
    }

    /// Reads symbol lines up to the `c` marker or the end of the file.
    /// Anything after the marker is a free-form comment, in any encoding.
    fn read_symbols(&mut self) -> std::result::Result<(), ParseError> {
        while let Some(&text) = self.lines.get(self.next) {
            let mut s = LineScanner::new(text, self.next);
            self.next += 1;
            match self.symbol_line(&mut s)? {
                SymbolLine::Comment => break,
                SymbolLine::Name { kind, index, name } => {
                    let id = match kind {
                        'i' => self.circuit.inputs[index as usize],
                        _ => self.circuit.outputs[index as usize],
                    };
                    // Names are printable ASCII at this point.
                    let name = lossy(name).into_owned();
                    debug!("line {}: {}{} named {:?}", s.line() + 1, kind, index, name);
                    self.circuit.gate_mut(id).name = Some(name);
                }
            }
        }
        Ok(())
    }
}

impl Circuit {
    /// Creates a circuit from the content of an `.aag` file.
    ///
    /// Parsing is strict and stops at the first malformed line; see [`ParseErrorKind`]
    /// for every diagnostic. Latches are not supported.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(bytes)?;
        parser.read_inputs()?;
        parser.read_outputs()?;
        parser.read_ands()?;
        parser.read_symbols()?;

        let mut circuit = parser.circuit;
        circuit.connect();
        info!(
            "read circuit: {} PIs, {} POs, {} AIGs",
            circuit.inputs.len(),
            circuit.outputs.len(),
            circuit.ands.len()
        );
        Ok(circuit)
    }

    /// Same as [`Circuit::from_bytes`], for text already in memory.
    pub fn from_ascii(text: &str) -> Result<Self> {
        Circuit::from_bytes(text.as_bytes())
    }

    /// Creates a circuit from an `.aag` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|source| CircuitError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Circuit::from_bytes(&bytes)
    }
}
