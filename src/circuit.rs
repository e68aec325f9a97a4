//! Module defining the [`Circuit`] struct, as well as [`Gate`], [`Pin`] and the parse diagnostics.
//!
//! A circuit is read once from an ASCII AIGER (`aag`) file with [`Circuit::from_file`] or
//! [`Circuit::from_ascii`], then queried through the reports in [`crate::report`].

mod connect;
pub mod error;
pub mod gate;
mod parser;
pub mod pin;
mod scanner;

use std::{cell::RefCell, collections::TryReserveError};

pub use error::{CircuitError, ParseError, ParseErrorKind, Result};
pub use gate::{Gate, GateId, GateKind};
pub use pin::{Literal, Pin, decode_literal};

use crate::dfs::Marks;

/// A whole combinational circuit.
///
/// The circuit owns every gate. Gates live in a table indexed by their id, sized
/// `M + O + 1` where `M` is the declared maximum variable index and `O` the number of
/// outputs: slot 0 holds the constant, `1..=M` inputs and and-gates, and the outputs
/// follow. Slots of ids that were never defined stay empty; edges pointing at them are
/// floating [`Pin`]s.
///
/// Inputs, outputs and and-gates are also kept in declaration order, which is the
/// order every list-style report uses.
#[derive(Debug)]
pub struct Circuit {
    max_var: u32,
    gates: Vec<Option<Gate>>,
    inputs: Vec<GateId>,
    outputs: Vec<GateId>,
    ands: Vec<GateId>,
    /// Sorted ids of gates with at least one floating fanin.
    floating: Vec<GateId>,
    /// Sorted ids of inputs and and-gates nobody reads.
    unused: Vec<GateId>,
    /// Visitation marks shared by all traversals, see [`crate::dfs`].
    pub(crate) marks: RefCell<Marks>,
}

/// Gate counts of a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub pis: usize,
    pub pos: usize,
    pub ands: usize,
}

impl Statistics {
    pub fn total(&self) -> usize {
        self.pis + self.pos + self.ands
    }
}

impl Circuit {
    /// An empty circuit (constant gate only) with room for `max_var` variables and
    /// `n_outputs` outputs.
    ///
    /// Both tables are sized from the header, so the allocation may be refused.
    pub(crate) fn new(
        max_var: u32,
        n_outputs: u32,
    ) -> std::result::Result<Self, TryReserveError> {
        let len = max_var as usize + n_outputs as usize + 1;
        let mut gates = Vec::new();
        gates.try_reserve_exact(len)?;
        gates.resize_with(len, || None);
        gates[0] = Some(Gate::const0());
        let marks = Marks::new(len)?;
        Ok(Circuit {
            max_var,
            gates,
            inputs: Vec::new(),
            outputs: Vec::new(),
            ands: Vec::new(),
            floating: Vec::new(),
            unused: Vec::new(),
            marks: RefCell::new(marks),
        })
    }

    /// Registers a freshly parsed gate. The parser guarantees the slot is free.
    pub(crate) fn define(&mut self, gate: Gate) {
        let id = gate.id;
        match gate.kind {
            GateKind::Input => self.inputs.push(id),
            GateKind::Output { .. } => self.outputs.push(id),
            GateKind::And { .. } => self.ands.push(id),
            GateKind::Const0 => (),
        }
        self.gates[id as usize] = Some(gate);
    }

    /// Retrieves a gate from its id, [`None`] if the id is undefined.
    pub fn get_gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id as usize)?.as_ref()
    }

    pub fn has_gate(&self, id: GateId) -> bool {
        self.get_gate(id).is_some()
    }

    /// Like [`Circuit::get_gate`], for ids reached through resolved pins.
    pub(crate) fn gate(&self, id: GateId) -> &Gate {
        match self.get_gate(id) {
            Some(gate) => gate,
            None => unreachable!("pin points at undefined gate {}", id),
        }
    }

    pub(crate) fn gate_mut(&mut self, id: GateId) -> &mut Gate {
        match self.gates.get_mut(id as usize).and_then(Option::as_mut) {
            Some(gate) => gate,
            None => unreachable!("pin points at undefined gate {}", id),
        }
    }

    /// The declared maximum variable index `M`.
    pub fn get_max_var(&self) -> u32 {
        self.max_var
    }

    /// Primary input ids, in declaration order.
    pub fn get_inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Primary output ids, in declaration order.
    pub fn get_outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// And-gate ids, in declaration order.
    pub fn get_ands(&self) -> &[GateId] {
        &self.ands
    }

    /// Ids of gates with a fanin to an undefined gate, sorted.
    pub fn get_floating(&self) -> &[GateId] {
        &self.floating
    }

    /// Ids of inputs and and-gates without any fanout, sorted.
    pub fn get_unused(&self) -> &[GateId] {
        &self.unused
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            pis: self.inputs.len(),
            pos: self.outputs.len(),
            ands: self.ands.len(),
        }
    }
}
