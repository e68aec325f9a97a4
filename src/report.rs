//! Text reports over a parsed [`Circuit`], and writing it back to the AAG format.
//!
//! ```rust
//! use aigscope::Circuit;
//!
//! let circuit = Circuit::from_file("assets/circuits/half-adder.aag").unwrap();
//! println!("{}", circuit.statistics());
//! print!("{}", circuit.netlist());
//! print!("{}", circuit.report_fanin(4, 2).unwrap());
//! ```
//!
//! All reports have a fixed layout; lists follow declaration order unless stated
//! otherwise.

use std::{
    fmt::{self, Display, Write as _},
    io,
};

use crate::{Circuit, CircuitError, GateId, Pin, Result, circuit::Statistics};

const BANNER_WIDTH: usize = 50;

impl Display for Statistics {
    /// ```text
    /// Circuit Statistics
    /// ==================
    ///   PI          20
    ///   PO          12
    ///   AIG        130
    /// ------------------
    ///   Total      162
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit Statistics")?;
        writeln!(f, "==================")?;
        writeln!(f, "  PI   {:>9}", self.pis)?;
        writeln!(f, "  PO   {:>9}", self.pos)?;
        writeln!(f, "  AIG  {:>9}", self.ands)?;
        writeln!(f, "------------------")?;
        write!(f, "  Total{:>9}", self.total())
    }
}

/// Which edges a cone report follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fanin,
    Fanout,
}

fn id_list(title: &str, ids: &[GateId]) -> String {
    let mut s = title.to_string();
    for id in ids {
        let _ = write!(s, " {}", id);
    }
    s
}

impl Circuit {
    /// `PIs of the circuit: 1 2 ...`
    pub fn report_pis(&self) -> String {
        id_list("PIs of the circuit:", self.get_inputs())
    }

    /// `POs of the circuit: 7 8 ...`
    pub fn report_pos(&self) -> String {
        id_list("POs of the circuit:", self.get_outputs())
    }

    /// Floating and unused gates, one line each. A line is left out when its set is
    /// empty, so a clean circuit yields an empty string.
    pub fn report_floating(&self) -> String {
        let mut s = String::new();
        if !self.get_floating().is_empty() {
            s += &id_list("Gates with floating fanin(s):", self.get_floating());
            s.push('\n');
        }
        if !self.get_unused().is_empty() {
            s += &id_list("Gates defined but not used  :", self.get_unused());
            s.push('\n');
        }
        s
    }

    /// One line per gate reachable from the outputs, in depth-first postorder:
    ///
    /// ```text
    /// [0] PI  1 (a)
    /// [1] PI  2 (b)
    /// [2] AIG 3 1 !2
    /// [3] PO  4 3 (out)
    /// ```
    ///
    /// Fanins are printed as variable ids, prefixed with `*` when floating and `!`
    /// when inverted. Symbolic names follow in parentheses.
    pub fn netlist(&self) -> String {
        let mut s = String::new();
        for (seq, id) in self.dfs_postorder().into_iter().enumerate() {
            let gate = self.gate(id);
            let _ = write!(s, "[{}] {:<4}{}", seq, gate.type_str(), id);
            for (pin, literal) in gate.get_fanins().iter().zip(gate.get_fanin_literals()) {
                s.push(' ');
                if pin.is_floating() {
                    s.push('*');
                }
                if pin.is_inverted() {
                    s.push('!');
                }
                let _ = write!(s, "{}", literal / 2);
            }
            if let Some(name) = gate.get_name() {
                let _ = write!(s, " ({})", name);
            }
            s.push('\n');
        }
        s
    }

    /// A boxed one-gate summary:
    ///
    /// ```text
    /// ==================================================
    /// = PI(1)"a", line 2                               =
    /// ==================================================
    /// ```
    pub fn report_gate(&self, id: GateId) -> Result<String> {
        let gate = self.get_gate(id).ok_or(CircuitError::GateDoesNotExist(id))?;
        let mut title = format!("= {}({})", gate.type_str(), id);
        if let Some(name) = gate.get_name() {
            let _ = write!(title, "\"{}\"", name);
        }
        let _ = write!(title, ", line {}", gate.get_line());

        let rule = "=".repeat(BANNER_WIDTH);
        Ok(format!(
            "{}\n{:<width$}=\n{}\n",
            rule,
            title,
            rule,
            width = BANNER_WIDTH - 1
        ))
    }

    /// The transitive fanin of a gate, up to `level` hops. See [`Circuit::report_cone`].
    pub fn report_fanin(&self, id: GateId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanin)
    }

    /// The transitive fanout of a gate, up to `level` hops. See [`Circuit::report_cone`].
    pub fn report_fanout(&self, id: GateId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanout)
    }

    /// Prints a gate then, in preorder, the gates reachable through its fanins (or
    /// fanouts) up to `level` hops away, indented by two spaces per hop:
    ///
    /// ```text
    /// AIG 6
    ///   !AIG 4
    ///     PI 1
    ///     PI 2
    ///   AIG 4 (*)
    /// ```
    ///
    /// - `!` marks an inverted edge.
    /// - A gate whose cone was already printed in this report is printed again without
    ///   being expanded; and-gates get a `(*)` mark. Gates at the last level are never
    ///   expanded, so they are not considered printed.
    /// - A floating fanin shows as `UNDEF <id>`.
    /// - Fanouts are listed from the last connected to the first.
    pub fn report_cone(&self, id: GateId, level: usize, direction: Direction) -> Result<String> {
        self.get_gate(id).ok_or(CircuitError::GateDoesNotExist(id))?;

        let mut marks = self.marks.borrow_mut();
        marks.clear();

        let mut s = String::new();
        // (gate, depth, number of children already printed)
        let mut stack: Vec<(GateId, usize, usize)> = Vec::new();

        if self.cone_line(&mut s, marks.is_marked(id), id, 0, false, level) {
            stack.push((id, 0, 0));
        }

        while let Some((gid, depth, done)) = stack.last_mut() {
            let gate = self.gate(*gid);
            let children = match direction {
                Direction::Fanin => gate.get_fanins(),
                Direction::Fanout => gate.get_fanouts(),
            };

            if *done == children.len() {
                let finished = *gid;
                stack.pop();
                // Only fully expanded gates count as printed.
                marks.mark(finished);
                continue;
            }

            let index = match direction {
                Direction::Fanin => *done,
                Direction::Fanout => children.len() - 1 - *done,
            };
            let pin: Pin = children[index];
            *done += 1;
            let child_depth = *depth + 1;

            match pin.get_gate() {
                Some(child) => {
                    let seen = marks.is_marked(child);
                    if self.cone_line(&mut s, seen, child, child_depth, pin.is_inverted(), level) {
                        stack.push((child, child_depth, 0));
                    }
                }
                None => {
                    let literal = gate.get_fanin_literals()[index];
                    s += &"  ".repeat(child_depth);
                    if pin.is_inverted() {
                        s.push('!');
                    }
                    let _ = writeln!(s, "UNDEF {}", literal / 2);
                }
            }
        }

        Ok(s)
    }

    /// Prints one line of a cone report, returns whether the gate must be expanded.
    fn cone_line(
        &self,
        s: &mut String,
        seen: bool,
        id: GateId,
        depth: usize,
        inverted: bool,
        level: usize,
    ) -> bool {
        let gate = self.gate(id);
        let repeated = seen && depth < level;

        *s += &"  ".repeat(depth);
        if inverted {
            s.push('!');
        }
        let _ = write!(s, "{} {}", gate.type_str(), id);
        if repeated && gate.is_and() {
            s.push_str(" (*)");
        }
        s.push('\n');

        !repeated && depth < level
    }

    /// Writes the circuit in AAG format, see [`AagText`].
    pub fn write_aag<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{}", AagText(self))
    }

    /// Same as [`Circuit::write_aag`], into a string.
    pub fn to_aag(&self) -> String {
        AagText(self).to_string()
    }
}

/// A circuit rendered in AAG format.
///
/// Variable ids and the header `M` are kept. Only and-gates reachable from an output
/// are written, fanins first, and the header `A` counts them. Symbols follow for
/// every named input and output, then the comment section.
pub struct AagText<'a>(pub &'a Circuit);

impl Display for AagText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let circuit = self.0;
        writeln!(
            f,
            "aag {} {} 0 {} {}",
            circuit.get_max_var(),
            circuit.get_inputs().len(),
            circuit.get_outputs().len(),
            circuit.count_reachable_ands()
        )?;
        for &id in circuit.get_inputs() {
            writeln!(f, "{}", id * 2)?;
        }
        for &id in circuit.get_outputs() {
            writeln!(f, "{}", circuit.gate(id).get_fanin_literals()[0])?;
        }
        for id in circuit.dfs_postorder() {
            let gate = circuit.gate(id);
            if gate.is_and() {
                let literals = gate.get_fanin_literals();
                writeln!(f, "{} {} {}", id * 2, literals[0], literals[1])?;
            }
        }
        for (k, &id) in circuit.get_inputs().iter().enumerate() {
            if let Some(name) = circuit.gate(id).get_name() {
                writeln!(f, "i{} {}", k, name)?;
            }
        }
        for (k, &id) in circuit.get_outputs().iter().enumerate() {
            if let Some(name) = circuit.gate(id).get_name() {
                writeln!(f, "o{} {}", k, name)?;
            }
        }
        writeln!(f, "c")?;
        writeln!(
            f,
            "AAG output by {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;

    const FULL_ADDER: &str = "assets/circuits/full-adder.aag";
    const HALF_ADDER: &str = "assets/circuits/half-adder.aag";
    const FLOATING: &str = "assets/circuits/floating.aag";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn statistics_test() {
        init();
        let c = Circuit::from_file(HALF_ADDER).unwrap();
        let expected = "Circuit Statistics\n\
                        ==================\n  \
                        PI           2\n  \
                        PO           2\n  \
                        AIG          3\n\
                        ------------------\n  \
                        Total        7";
        assert_eq!(c.statistics().to_string(), expected);
    }

    #[test]
    fn pi_po_lists() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        assert_eq!(c.report_pis(), "PIs of the circuit: 1 2 3");
        assert_eq!(c.report_pos(), "POs of the circuit: 11 12");

        let empty = Circuit::from_ascii("aag 0 0 0 0 0\n").unwrap();
        assert_eq!(empty.report_pis(), "PIs of the circuit:");
    }

    #[test]
    fn floating_report() {
        let c = Circuit::from_file(FLOATING).unwrap();
        assert_eq!(
            c.report_floating(),
            "Gates with floating fanin(s): 4 10\nGates defined but not used  : 8\n"
        );

        let c = Circuit::from_file(FULL_ADDER).unwrap();
        assert_eq!(c.report_floating(), "");
    }

    #[test]
    fn netlist_test() {
        let c = Circuit::from_file(HALF_ADDER).unwrap();
        assert_eq!(
            c.netlist(),
            "[0] PI  1 (a)\n\
             [1] PI  2 (b)\n\
             [2] AIG 3 1 2\n\
             [3] AIG 4 !1 !2\n\
             [4] AIG 5 !3 !4\n\
             [5] PO  6 5 (sum)\n\
             [6] PO  7 3 (carry)\n"
        );
    }

    #[test]
    fn netlist_with_floating_fanins() {
        let c = Circuit::from_file(FLOATING).unwrap();
        assert_eq!(
            c.netlist(),
            "[0] PI  1\n\
             [1] PI  2\n\
             [2] AIG 3 1 2\n\
             [3] AIG 4 3 *5\n\
             [4] AIG 6 4 !1\n\
             [5] PO  9 6\n\
             [6] PO  10 *!7\n"
        );
    }

    #[test]
    fn netlist_with_constant() {
        let c = Circuit::from_ascii("aag 2 1 0 1 1\n2\n4\n4 2 1\n").unwrap();
        assert_eq!(
            c.netlist(),
            "[0] PI  1\n[1] CONST0\n[2] AIG 2 1 !0\n[3] PO  3 2\n"
        );
    }

    #[test]
    fn report_gate_test() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        let rule = "=".repeat(50);
        assert_eq!(
            c.report_gate(1).unwrap(),
            format!("{rule}\n= PI(1)\"a\", line 2                               =\n{rule}\n")
        );
        assert_eq!(
            c.report_gate(9).unwrap(),
            format!("{rule}\n= AIG(9), line 12{}=\n{rule}\n", " ".repeat(32))
        );
        assert_eq!(
            c.report_gate(0).unwrap(),
            format!("{rule}\n= CONST(0), line 0{}=\n{rule}\n", " ".repeat(31))
        );
    }

    #[test]
    fn report_missing_gate() {
        let c = Circuit::from_file(FLOATING).unwrap();
        // 5 is referenced but never defined, 99 is out of range.
        for id in [5, 99] {
            assert!(matches!(
                c.report_gate(id),
                Err(CircuitError::GateDoesNotExist(x)) if x == id
            ));
            assert!(c.report_fanin(id, 1).is_err());
            assert!(c.report_fanout(id, 1).is_err());
        }
    }

    #[test]
    fn fanin_cone() {
        init();
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        assert_eq!(
            c.report_fanin(11, 4).unwrap(),
            "PO 11\n  \
             AIG 9\n    \
             !AIG 7\n      \
             AIG 6\n        \
             !AIG 4\n        \
             !AIG 5\n      \
             PI 3\n    \
             !AIG 8\n      \
             !AIG 6 (*)\n      \
             !PI 3\n"
        );
    }

    #[test]
    fn fanin_cone_level_zero() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        assert_eq!(c.report_fanin(11, 0).unwrap(), "PO 11\n");
        assert_eq!(c.report_fanout(1, 0).unwrap(), "PI 1\n");
    }

    #[test]
    fn fanin_cone_with_undefined_gates() {
        let c = Circuit::from_file(FLOATING).unwrap();
        assert_eq!(c.report_fanin(4, 1).unwrap(), "AIG 4\n  AIG 3\n  UNDEF 5\n");
        assert_eq!(c.report_fanin(10, 1).unwrap(), "PO 10\n  !UNDEF 7\n");
        assert_eq!(c.report_fanin(10, 5).unwrap(), "PO 10\n  !UNDEF 7\n");
    }

    #[test]
    fn fanout_cone() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        assert_eq!(
            c.report_fanout(1, 2).unwrap(),
            "PI 1\n  !AIG 5\n    !AIG 6\n  AIG 4\n    !AIG 10\n    !AIG 6\n"
        );
        assert_eq!(
            c.report_fanout(1, 3).unwrap(),
            "PI 1\n  \
             !AIG 5\n    \
             !AIG 6\n      \
             !AIG 8\n      \
             AIG 7\n  \
             AIG 4\n    \
             !AIG 10\n      \
             !PO 12\n    \
             !AIG 6 (*)\n"
        );
    }

    #[test]
    fn cone_marks_do_not_leak_between_reports() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        let first = c.report_fanin(11, 4).unwrap();
        c.netlist();
        c.report_fanout(1, 3).unwrap();
        assert_eq!(c.report_fanin(11, 4).unwrap(), first);
    }

    #[test]
    fn write_aag_test() {
        let c = Circuit::from_file(FULL_ADDER).unwrap();
        let expected = format!(
            "aag 10 3 0 2 7\n2\n4\n6\n18\n21\n\
             8 2 4\n10 3 5\n12 9 11\n14 12 6\n16 13 7\n18 15 17\n20 9 15\n\
             i0 a\ni1 b\ni2 cin\no0 sum\no1 cout\nc\n\
             AAG output by {} {}\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        assert_eq!(c.to_aag(), expected);
    }

    #[test]
    fn write_aag_drops_unreachable_ands() {
        // And-gate 4 is never read.
        let c = Circuit::from_ascii("aag 4 2 0 1 2\n2\n4\n6\n6 2 4\n8 2 5\n").unwrap();
        assert_eq!(c.get_unused(), &[4]);
        let text = c.to_aag();
        assert!(text.starts_with("aag 4 2 0 1 1\n2\n4\n6\n6 2 4\nc\n"));

        let again = Circuit::from_ascii(&text).unwrap();
        assert_eq!(again.get_ands(), &[3]);
        assert_eq!(again.netlist(), c.netlist());
    }

    #[test]
    fn written_and_count_matches_gate_count_walk() {
        let c = Circuit::from_file(FLOATING).unwrap();
        let text = c.to_aag();
        let header = text.lines().next().unwrap();
        assert_eq!(header, format!("aag 8 3 0 2 {}", c.count_reachable_ands()));

        let mut buf = Vec::new();
        c.write_aag(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), text);
        assert_eq!(AagText(&c).to_string(), text);
    }

    #[test]
    fn write_then_read_is_stable() {
        init();
        for path in [FULL_ADDER, HALF_ADDER, FLOATING] {
            let c = Circuit::from_file(path).unwrap();

            let mut file = tempfile::NamedTempFile::new().unwrap();
            c.write_aag(&mut file).unwrap();
            file.flush().unwrap();

            let again = Circuit::from_file(file.path()).unwrap();
            assert_eq!(again.netlist(), c.netlist());
            assert_eq!(again.get_floating(), c.get_floating());
            assert_eq!(again.to_aag(), c.to_aag());
        }
    }
}
