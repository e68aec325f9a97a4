use log::{debug, warn};

use super::{Circuit, GateId, Pin, decode_literal};

impl Circuit {
    /// Turns the raw fanin literals of every output and and-gate into edges.
    ///
    /// Runs once, after every gate is defined, so and-gates may refer to gates declared
    /// further down the file. For each literal:
    /// - if the gate exists, a fanin pin is added to the reader and a fanout pin with the
    ///   same polarity to the referenced gate;
    /// - otherwise the reader gets a floating fanin pin and is recorded as floating.
    ///
    /// Afterwards, inputs and and-gates without any fanout are recorded as unused.
    pub(crate) fn connect(&mut self) {
        let readers: Vec<GateId> = self
            .outputs
            .iter()
            .chain(self.ands.iter())
            .copied()
            .collect();

        for id in readers {
            let mut floating = false;
            for literal in self.gate(id).get_fanin_literals() {
                let (target, inverted) = decode_literal(literal);
                if self.has_gate(target) {
                    self.gate_mut(id).fanins.push(Pin::new(target, inverted));
                    self.gate_mut(target).fanouts.push(Pin::new(id, inverted));
                } else {
                    self.gate_mut(id).fanins.push(Pin::floating(inverted));
                    floating = true;
                }
            }
            if floating {
                self.floating.push(id);
            }
        }
        self.floating.sort_unstable();

        let unused: Vec<GateId> = self
            .ands
            .iter()
            .chain(self.inputs.iter())
            .copied()
            .filter(|&id| self.gate(id).fanouts.is_empty())
            .collect();
        self.unused = unused;
        self.unused.sort_unstable();

        debug!(
            "connected {} outputs and {} and-gates",
            self.outputs.len(),
            self.ands.len()
        );
        if !self.floating.is_empty() {
            warn!("gates with floating fanin(s): {:?}", self.floating);
        }
        if !self.unused.is_empty() {
            warn!("gates defined but not used: {:?}", self.unused);
        }
    }
}
