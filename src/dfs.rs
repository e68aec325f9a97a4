//! Depth-first traversals over a [`Circuit`].
//!
//! Every walk needs to know which gates it already visited. Instead of clearing a
//! flag on each gate before every walk, [`Marks`] keeps one stamp per gate and a
//! generation counter: a gate is marked iff its stamp equals the current generation,
//! so starting a new walk is a single increment.
//!
//! [`Circuit`]: crate::Circuit

use std::collections::TryReserveError;

use crate::{Circuit, GateId};

/// Generation-stamped visitation marks, indexed by gate id.
///
/// The counter is 32 bits wide. When it is exhausted, all stamps are zeroed once and
/// counting restarts at 1, so a stale stamp can never be mistaken for a fresh mark.
#[derive(Debug, Clone)]
pub struct Marks {
    generation: u32,
    stamps: Vec<u32>,
}

impl Marks {
    /// Marks for gate ids in `0..len`. Nothing is marked initially.
    pub fn new(len: usize) -> Result<Self, TryReserveError> {
        let mut stamps = Vec::new();
        stamps.try_reserve_exact(len)?;
        stamps.resize(len, 0);
        Ok(Marks {
            generation: 1,
            stamps,
        })
    }

    /// Unmarks every gate in constant time (amortized).
    pub fn clear(&mut self) {
        match self.generation.checked_add(1) {
            Some(generation) => self.generation = generation,
            None => {
                self.stamps.fill(0);
                self.generation = 1;
            }
        }
    }

    pub fn mark(&mut self, id: GateId) {
        self.stamps[id as usize] = self.generation;
    }

    pub fn is_marked(&self, id: GateId) -> bool {
        self.stamps[id as usize] == self.generation
    }

    #[cfg(test)]
    pub(crate) fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }
}

impl Circuit {
    /// Returns every gate reachable from the primary outputs, fanins first.
    ///
    /// Outputs are walked in declaration order and each gate appears exactly once,
    /// after all of its (defined) fanins. Floating fanins are skipped.
    /// The walk uses an explicit stack, so deep circuits cannot overflow the call stack.
    pub fn dfs_postorder(&self) -> Vec<GateId> {
        let mut marks = self.marks.borrow_mut();
        marks.clear();

        let mut order = Vec::new();
        // (gate, index of the next fanin to look at)
        let mut stack: Vec<(GateId, usize)> = Vec::new();

        for &root in self.get_outputs() {
            if marks.is_marked(root) {
                continue;
            }
            marks.mark(root);
            stack.push((root, 0));

            while let Some((id, next)) = stack.last_mut() {
                let gate = self.gate(*id);
                match gate.fanins.get(*next) {
                    Some(pin) => {
                        *next += 1;
                        if let Some(child) = pin.gate {
                            if !marks.is_marked(child) {
                                marks.mark(child);
                                stack.push((child, 0));
                            }
                        }
                    }
                    None => {
                        order.push(*id);
                        stack.pop();
                    }
                }
            }
        }

        order
    }

    /// Number of and-gates reachable from the primary outputs.
    pub fn count_reachable_ands(&self) -> usize {
        self.dfs_postorder()
            .into_iter()
            .filter(|&id| self.gate(id).is_and())
            .count()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn marks_clear_test() {
        let mut marks = Marks::new(4).unwrap();
        assert!(!marks.is_marked(2));
        marks.mark(2);
        assert!(marks.is_marked(2));
        assert!(!marks.is_marked(3));
        marks.clear();
        assert!(!marks.is_marked(2));
    }

    #[test]
    fn marks_survive_counter_exhaustion() {
        let mut marks = Marks::new(3).unwrap();
        marks.mark(0);
        marks.set_generation(u32::MAX);
        marks.mark(1);
        marks.clear();
        // Stamp of gate 0 was written at generation 1, which is current again.
        assert!(!marks.is_marked(0));
        assert!(!marks.is_marked(1));
        marks.mark(2);
        assert!(marks.is_marked(2));
    }

    #[test]
    fn postorder_visits_fanins_first() {
        // o5 = a4 = a3 & !i1 ; a3 = i1 & i2 ; o6 = a3
        let aag = "aag 4 2 0 2 2\n2\n4\n8\n6\n8 6 3\n6 2 4\n";
        let c = Circuit::from_ascii(aag).unwrap();
        let order = c.dfs_postorder();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn postorder_each_gate_once_and_fanins_earlier() {
        let c = Circuit::from_file("assets/circuits/full-adder.aag").unwrap();
        let order = c.dfs_postorder();

        let mut seen = std::collections::HashSet::new();
        for &id in &order {
            assert!(seen.insert(id), "gate {} visited twice", id);
        }

        let position = |id: GateId| order.iter().position(|&x| x == id);
        for (k, &id) in order.iter().enumerate() {
            for pin in c.get_gate(id).unwrap().get_fanins() {
                if let Some(child) = pin.get_gate() {
                    assert!(position(child).unwrap() < k);
                }
            }
        }
    }

    #[test]
    fn postorder_is_repeatable() {
        let c = Circuit::from_file("assets/circuits/full-adder.aag").unwrap();
        assert_eq!(c.dfs_postorder(), c.dfs_postorder());
        assert_eq!(c.count_reachable_ands(), 7);
    }
}
