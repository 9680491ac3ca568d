//! Sparse linear rows of the simplex tableau.

use indexmap::IndexMap;

use crate::symbol::{Symbol, SymbolKind};

/// Coefficients smaller than this are treated as zero and pruned, keeping
/// floating-point noise from accumulating in the tableau.
pub(crate) const EPSILON: f64 = 1.0e-8;

pub(crate) fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// A linear equation `constant + Σ coefficient · symbol`.
///
/// When stored in the tableau keyed by a basic symbol, the row reads
/// `basic = constant + Σ coefficient · symbol`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Row {
    constant: f64,
    cells: IndexMap<Symbol, f64>,
}

impl Row {
    pub(crate) fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: IndexMap::new(),
        }
    }

    pub(crate) fn constant(&self) -> f64 {
        self.constant
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
        self.cells.iter().map(|(&symbol, &coefficient)| (symbol, coefficient))
    }

    /// Add a value to the row constant, returning the new constant.
    pub(crate) fn add(&mut self, value: f64) -> f64 {
        self.constant += value;
        self.constant
    }

    /// Merge a coefficient into the symbol's cell, removing the cell when
    /// the result is near zero.
    pub(crate) fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let cell = self.cells.entry(symbol).or_insert(0.0);
        *cell += coefficient;
        if near_zero(*cell) {
            self.cells.swap_remove(&symbol);
        }
    }

    /// Merge another row into this one, scaled by `coefficient`.
    pub(crate) fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &c) in &other.cells {
            self.insert_symbol(symbol, c * coefficient);
        }
    }

    pub(crate) fn remove(&mut self, symbol: Symbol) {
        self.cells.swap_remove(&symbol);
    }

    /// Negate the constant and every coefficient.
    pub(crate) fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for cell in self.cells.values_mut() {
            *cell = -*cell;
        }
    }

    /// Solve the row for `symbol`, turning `0 = row` into `symbol = row'`:
    /// the symbol's cell is removed and everything else is divided by the
    /// negated coefficient. The symbol must have a cell in the row.
    pub(crate) fn solve_for(&mut self, symbol: Symbol) {
        let Some(coefficient) = self.cells.swap_remove(&symbol) else {
            debug_assert!(false, "solve_for target missing from row");
            return;
        };
        let factor = -1.0 / coefficient;
        self.constant *= factor;
        for cell in self.cells.values_mut() {
            *cell *= factor;
        }
    }

    /// Solve a row of the form `lhs = rhs-row` for `rhs`: inserts `lhs`
    /// with coefficient −1 and solves for `rhs`. `lhs` must not appear in
    /// the row and `rhs` must.
    pub(crate) fn solve_for_symbols(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    pub(crate) fn coefficient_for(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Wherever `symbol` appears with coefficient `k`, remove it and merge
    /// in `k · row`. No-op when the symbol is absent.
    pub(crate) fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coefficient) = self.cells.swap_remove(&symbol) {
            self.insert_row(row, coefficient);
        }
    }

    /// Whether the row holds no cells at all.
    pub(crate) fn is_constant(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every cell belongs to a dummy symbol.
    pub(crate) fn all_dummies(&self) -> bool {
        self.cells.keys().all(|symbol| symbol.kind() == SymbolKind::Dummy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slack(id: u64) -> Symbol {
        Symbol::new(SymbolKind::Slack, id)
    }

    #[test]
    fn insert_merges_and_prunes() {
        let mut row = Row::new(0.0);
        let s = slack(1);
        row.insert_symbol(s, 2.0);
        row.insert_symbol(s, 3.0);
        assert_eq!(row.coefficient_for(s), 5.0);
        row.insert_symbol(s, -5.0);
        assert_eq!(row.coefficient_for(s), 0.0);
        assert!(row.is_constant());
    }

    #[test]
    fn solve_for_divides_by_negated_coefficient() {
        // 0 = 10 + 2s1 - 4s2, solved for s1: s1 = -5 + 2s2
        let mut row = Row::new(10.0);
        let s1 = slack(1);
        let s2 = slack(2);
        row.insert_symbol(s1, 2.0);
        row.insert_symbol(s2, -4.0);
        row.solve_for(s1);
        assert_eq!(row.constant(), -5.0);
        assert_eq!(row.coefficient_for(s1), 0.0);
        assert_eq!(row.coefficient_for(s2), 2.0);
    }

    #[test]
    fn solve_for_symbols_swaps_basis() {
        // s1 = 4 + 2s2, solved for s2: s2 = -2 + 0.5s1
        let mut row = Row::new(4.0);
        let s1 = slack(1);
        let s2 = slack(2);
        row.insert_symbol(s2, 2.0);
        row.solve_for_symbols(s1, s2);
        assert_eq!(row.constant(), -2.0);
        assert_eq!(row.coefficient_for(s1), 0.5);
    }

    #[test]
    fn substitute_scales_replacement() {
        // row: 1 + 3s1; s1 = 2 + 4s2  =>  7 + 12s2
        let mut row = Row::new(1.0);
        let s1 = slack(1);
        let s2 = slack(2);
        row.insert_symbol(s1, 3.0);
        let mut replacement = Row::new(2.0);
        replacement.insert_symbol(s2, 4.0);
        row.substitute(s1, &replacement);
        assert_eq!(row.constant(), 7.0);
        assert_eq!(row.coefficient_for(s1), 0.0);
        assert_eq!(row.coefficient_for(s2), 12.0);
    }

    #[test]
    fn substitute_is_noop_when_absent() {
        let mut row = Row::new(1.0);
        row.insert_symbol(slack(1), 3.0);
        let replacement = Row::new(2.0);
        row.substitute(slack(9), &replacement);
        assert_eq!(row.constant(), 1.0);
        assert_eq!(row.coefficient_for(slack(1)), 3.0);
    }

    #[test]
    fn reverse_sign_negates_everything() {
        let mut row = Row::new(-3.0);
        row.insert_symbol(slack(1), 2.0);
        row.reverse_sign();
        assert_eq!(row.constant(), 3.0);
        assert_eq!(row.coefficient_for(slack(1)), -2.0);
    }

    #[test]
    fn all_dummies_ignores_constant() {
        let mut row = Row::new(5.0);
        assert!(row.all_dummies());
        row.insert_symbol(Symbol::new(SymbolKind::Dummy, 1), 1.0);
        assert!(row.all_dummies());
        row.insert_symbol(slack(2), 1.0);
        assert!(!row.all_dummies());
    }
}
