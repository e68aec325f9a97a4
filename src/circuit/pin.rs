//! A [`Pin`] is one end of a directed edge between two gates. It can be inverted
//! (indicates the presence of a NOT on the edge) and may point at nothing when the
//! referenced gate was never defined.

use std::ops::Not;

use super::GateId;

/// An encoded gate reference: `2 * id + inverted`.
pub type Literal = u32;

/// Splits a literal into the gate id it refers to and its polarity.
pub fn decode_literal(literal: Literal) -> (GateId, bool) {
    (literal >> 1, literal & 1 == 1)
}

/// An edge endpoint.
///
/// `gate` is [`None`] for a floating reference: the literal named a gate id
/// which has no definition in the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub(crate) gate: Option<GateId>,
    pub(crate) inverted: bool,
}

impl Not for Pin {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.inverted = !self.inverted;
        self
    }
}

impl Pin {
    pub fn new(gate: GateId, inverted: bool) -> Self {
        Pin {
            gate: Some(gate),
            inverted,
        }
    }

    pub fn floating(inverted: bool) -> Self {
        Pin {
            gate: None,
            inverted,
        }
    }

    pub fn get_gate(&self) -> Option<GateId> {
        self.gate
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn is_floating(&self) -> bool {
        self.gate.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_literal_test() {
        assert_eq!(decode_literal(0), (0, false));
        assert_eq!(decode_literal(1), (0, true));
        assert_eq!(decode_literal(6), (3, false));
        assert_eq!(decode_literal(7), (3, true));
    }

    #[test]
    fn pin_not_test() {
        let p = Pin::new(3, false);
        assert_ne!(p, !p);
        assert_eq!(p, !!p);
        assert!((!Pin::floating(false)).is_inverted());
        assert!(Pin::floating(true).is_floating());
        assert_eq!(p.get_gate(), Some(3));
    }
}
