//! Internal tableau symbols.

use std::fmt;

/// The kind of an internal symbol.
///
/// The declaration order matters: the ratio-test tie-break prefers smaller
/// kinds, which keeps dummy symbols out of the basis whenever possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum SymbolKind {
    /// Mirrors a caller variable.
    External,
    /// Converts an inequality into an equality.
    Slack,
    /// Measures a soft constraint's violation, penalized in the objective.
    Error,
    /// Placeholder subject for a required constraint with no other pivot.
    Dummy,
}

/// A uniquely numbered internal unknown, used by the tableau in place of
/// caller-visible variables. The id is a deterministic tie-break in
/// pivoting, never a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Symbol {
    kind: SymbolKind,
    id: u64,
}

impl Symbol {
    pub(crate) fn new(kind: SymbolKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub(crate) fn kind(self) -> SymbolKind {
        self.kind
    }

    pub(crate) fn id(self) -> u64 {
        self.id
    }

    /// Slack and error symbols may be pivoted into the basis freely.
    pub(crate) fn is_pivotable(self) -> bool {
        matches!(self.kind, SymbolKind::Slack | SymbolKind::Error)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self.kind {
            SymbolKind::External => 'v',
            SymbolKind::Slack => 's',
            SymbolKind::Error => 'e',
            SymbolKind::Dummy => 'd',
        };
        write!(f, "{}{}", code, self.id)
    }
}
