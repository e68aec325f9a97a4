use super::{Literal, Pin};

/// A gate id.
///
/// The constant gate [`GateKind::Const0`] has id 0. Inputs and and-gates use the
/// variable index of their literal, outputs are numbered right after the declared
/// maximum variable index. Ids are unique within a circuit.
pub type GateId = u32;

/// What a gate is, with the raw fanin literals each kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateKind {
    /// The constant low/false signal.
    Const0,
    /// A primary input.
    Input,
    /// A primary output, driven by a single literal of any polarity.
    Output { fanin: Literal },
    /// An AND gate with two fanin literals.
    And { fanin0: Literal, fanin1: Literal },
}

impl GateKind {
    /// The name used in every report.
    pub fn type_str(&self) -> &'static str {
        match self {
            GateKind::Const0 => "CONST",
            GateKind::Input => "PI",
            GateKind::Output { .. } => "PO",
            GateKind::And { .. } => "AIG",
        }
    }
}

/// A gate of the circuit.
///
/// Gates carry both directions of their edges: `fanins` mirror the raw literals once
/// they are resolved, and `fanouts` list every gate reading this one.
/// The two lists are filled by the connection pass only, once every gate exists.
#[derive(Debug, Clone)]
pub struct Gate {
    pub(crate) kind: GateKind,
    pub(crate) id: GateId,
    /// 1-based line the gate was declared on (0 for the constant).
    pub(crate) line: usize,
    pub(crate) name: Option<String>,
    pub(crate) fanins: Vec<Pin>,
    pub(crate) fanouts: Vec<Pin>,
}

impl Gate {
    pub(crate) fn new(kind: GateKind, id: GateId, line: usize) -> Self {
        Gate {
            kind,
            id,
            line,
            name: None,
            fanins: Vec::new(),
            fanouts: Vec::new(),
        }
    }

    pub(crate) fn const0() -> Self {
        Gate::new(GateKind::Const0, 0, 0)
    }

    pub fn get_kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn get_id(&self) -> GateId {
        self.id
    }

    pub fn get_line(&self) -> usize {
        self.line
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn type_str(&self) -> &'static str {
        self.kind.type_str()
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, GateKind::Const0)
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, GateKind::Input)
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, GateKind::Output { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self.kind, GateKind::And { .. })
    }

    /// Raw fanin literals, in declaration order.
    pub fn get_fanin_literals(&self) -> Vec<Literal> {
        match self.kind {
            GateKind::Output { fanin } => vec![fanin],
            GateKind::And { fanin0, fanin1 } => vec![fanin0, fanin1],
            _ => vec![],
        }
    }

    /// Resolved fanin pins, in the same order as [`Gate::get_fanin_literals`].
    pub fn get_fanins(&self) -> &[Pin] {
        &self.fanins
    }

    /// Fanout pins, in the order the connections were resolved.
    pub fn get_fanouts(&self) -> &[Pin] {
        &self.fanouts
    }

    /// True if at least one fanin refers to an undefined gate.
    pub fn has_floating_fanin(&self) -> bool {
        self.fanins.iter().any(Pin::is_floating)
    }
}
