pub mod circuit;
pub mod dfs;
pub mod report;

// Re-exporting symbols and modules.
pub use circuit::{
    Circuit, CircuitError, Gate, GateId, GateKind, Literal, ParseError, ParseErrorKind, Pin,
    Result, Statistics, decode_literal,
};
pub use report::{AagText, Direction};
