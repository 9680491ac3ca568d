//! The incremental constraint solver.
//!
//! The tableau links rows and symbols through id-keyed maps rather than
//! pointer chains: basic symbols key their defining rows, external symbols
//! mirror caller variables, and all pivot decisions are driven by symbol
//! kind and id.

use indexmap::IndexMap;
use strut_core::{Constraint, Expression, RelationalOperator, Strength, Variable};

use crate::error::SolverError;
use crate::row::{near_zero, Row};
use crate::symbol::{Symbol, SymbolKind};

/// The symbol pair created for a constraint, used to track it in the
/// tableau and remove it later.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tag {
    pub(crate) marker: Symbol,
    pub(crate) other: Option<Symbol>,
}

/// Book-keeping for a registered edit variable.
#[derive(Debug)]
pub(crate) struct EditInfo {
    tag: Tag,
    constraint: Constraint,
    constant: f64,
}

/// Which objective row an optimization pass minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objective {
    Main,
    Artificial,
}

/// Outcome of a single primal or dual simplex step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Done,
    Pivoted,
}

/// An incremental Cassowary constraint solver.
///
/// Constraints are added and removed one at a time; required constraints
/// hold exactly while weaker constraints hold as well as their strength
/// allows. Registered edit variables can be driven with
/// [`suggest_value`](Solver::suggest_value), which repairs the tableau with
/// a dual-simplex pass instead of re-solving from scratch. Results are
/// written back to the variables by
/// [`update_variables`](Solver::update_variables).
#[derive(Debug, Default)]
pub struct Solver {
    pub(crate) cns: IndexMap<Constraint, Tag>,
    pub(crate) rows: IndexMap<Symbol, Row>,
    pub(crate) vars: IndexMap<Variable, Symbol>,
    pub(crate) edits: IndexMap<Variable, EditInfo>,
    pub(crate) infeasible_rows: Vec<Symbol>,
    pub(crate) objective: Row,
    artificial: Option<Row>,
    id_tick: u64,
}

impl Solver {
    /// Create an empty solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint to the solver.
    ///
    /// # Errors
    ///
    /// - [`SolverError::DuplicateConstraint`] if this constraint handle has
    ///   already been added.
    /// - [`SolverError::UnsatisfiableConstraint`] if the constraint is
    ///   required and conflicts with the existing required constraints.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<(), SolverError> {
        if self.cns.contains_key(constraint) {
            return Err(SolverError::DuplicateConstraint(constraint.clone()));
        }

        let (mut row, tag) = self.create_row(constraint);
        let mut subject = Self::choose_subject(&row, tag);

        // An all-dummy row with a zero constant is a redundant constraint
        // and the dummy marker can enter the basis; a non-zero constant
        // means the required constraint conflicts with the required set.
        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant()) {
                return Err(SolverError::UnsatisfiableConstraint(constraint.clone()));
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                // The artificial attempt pivots the live tableau; a
                // rejected constraint must leave it exactly as it was.
                let saved_rows = self.rows.clone();
                let saved_objective = self.objective.clone();
                let saved_infeasible = self.infeasible_rows.clone();
                if !self.add_with_artificial_variable(&row)? {
                    self.rows = saved_rows;
                    self.objective = saved_objective;
                    self.infeasible_rows = saved_infeasible;
                    return Err(SolverError::UnsatisfiableConstraint(constraint.clone()));
                }
            }
        }

        self.cns.insert(constraint.clone(), tag);

        // Optimizing after every insertion keeps the average system small
        // and the solver in a consistent state between calls.
        self.optimize(Objective::Main)
    }

    /// Remove a constraint, restoring the tableau to a state numerically
    /// equivalent to one in which the constraint was never added.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownConstraint`] if the constraint is not present.
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), SolverError> {
        let Some(tag) = self.cns.swap_remove(constraint) else {
            return Err(SolverError::UnknownConstraint(constraint.clone()));
        };

        // The error effects must leave the objective *before* pivoting, or
        // substitutions into the objective give incorrect results.
        self.remove_constraint_effects(constraint, tag);

        if self.rows.swap_remove(&tag.marker).is_none() {
            let Some(leaving) = self.marker_leaving_symbol(tag.marker) else {
                return Err(SolverError::InternalSolverError(
                    "failed to find a leaving row for the marker",
                ));
            };
            let Some(mut row) = self.rows.swap_remove(&leaving) else {
                return Err(SolverError::InternalSolverError("leaving row disappeared"));
            };
            row.solve_for_symbols(leaving, tag.marker);
            self.substitute(tag.marker, &row);
        }

        self.optimize(Objective::Main)
    }

    /// Whether the constraint has been added to the solver.
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.cns.contains_key(constraint)
    }

    /// Register `variable` for edits at the given strength.
    ///
    /// Internally adds the soft equality `variable == 0` and records its
    /// tag so [`suggest_value`](Solver::suggest_value) can perturb it.
    ///
    /// # Errors
    ///
    /// - [`SolverError::DuplicateEditVariable`] if already registered.
    /// - [`SolverError::BadRequiredStrength`] if the strength is required;
    ///   an edit is definitionally a hint that required constraints may
    ///   override.
    pub fn add_edit_variable(
        &mut self,
        variable: &Variable,
        strength: Strength,
    ) -> Result<(), SolverError> {
        if self.edits.contains_key(variable) {
            return Err(SolverError::DuplicateEditVariable(variable.clone()));
        }
        let strength = strength.clip();
        if strength.is_required() {
            return Err(SolverError::BadRequiredStrength);
        }

        let constraint = Constraint::new(
            Expression::from_variable(variable.clone()),
            RelationalOperator::Equal,
            strength,
        );
        self.add_constraint(&constraint)?;
        let Some(&tag) = self.cns.get(&constraint) else {
            return Err(SolverError::InternalSolverError("edit constraint lost its tag"));
        };
        self.edits.insert(
            variable.clone(),
            EditInfo {
                tag,
                constraint,
                constant: 0.0,
            },
        );
        Ok(())
    }

    /// Remove an edit variable and its synthetic constraint.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownEditVariable`] if not registered.
    pub fn remove_edit_variable(&mut self, variable: &Variable) -> Result<(), SolverError> {
        let Some(info) = self.edits.swap_remove(variable) else {
            return Err(SolverError::UnknownEditVariable(variable.clone()));
        };
        self.remove_constraint(&info.constraint)
    }

    /// Whether the variable is registered as an edit variable.
    pub fn has_edit_variable(&self, variable: &Variable) -> bool {
        self.edits.contains_key(variable)
    }

    /// Suggest a value for an edit variable.
    ///
    /// Perturbs the constants of the rows carrying the edit's error symbols
    /// by the delta against the previous suggestion, then repairs any
    /// infeasibility with a dual-simplex pass. The cost is proportional to
    /// the rows touched, not the whole system.
    ///
    /// # Errors
    ///
    /// [`SolverError::UnknownEditVariable`] if the variable was never
    /// registered.
    pub fn suggest_value(&mut self, variable: &Variable, value: f64) -> Result<(), SolverError> {
        let Some(info) = self.edits.get_mut(variable) else {
            return Err(SolverError::UnknownEditVariable(variable.clone()));
        };
        let delta = value - info.constant;
        info.constant = value;
        let tag = info.tag;

        self.apply_edit_delta(tag, delta);
        self.dual_optimize()
    }

    /// Write the solved values back to the variables.
    ///
    /// A variable whose symbol is basic takes its row constant; a variable
    /// whose symbol never entered the basis is 0. All values are computed
    /// before any variable is written, so callers never observe a partially
    /// updated set.
    pub fn update_variables(&self) {
        let mut updates: Vec<(&Variable, f64)> = Vec::with_capacity(self.vars.len());
        for (variable, symbol) in &self.vars {
            let value = self.rows.get(symbol).map_or(0.0, Row::constant);
            updates.push((variable, value));
        }
        for (variable, value) in updates {
            variable.set_value(value);
        }
    }

    /// Reset the solver to the empty starting condition, as if no
    /// constraints or edit variables had ever been added.
    pub fn reset(&mut self) {
        self.cns.clear();
        self.rows.clear();
        self.vars.clear();
        self.edits.clear();
        self.infeasible_rows.clear();
        self.objective = Row::default();
        self.artificial = None;
        self.id_tick = 0;
    }

    /// Get the symbol mirroring `variable`, creating one on first sight.
    fn var_symbol(&mut self, variable: &Variable) -> Symbol {
        if let Some(&symbol) = self.vars.get(variable) {
            return symbol;
        }
        let symbol = self.make_symbol(SymbolKind::External);
        self.vars.insert(variable.clone(), symbol);
        symbol
    }

    fn make_symbol(&mut self, kind: SymbolKind) -> Symbol {
        let symbol = Symbol::new(kind, self.id_tick);
        self.id_tick += 1;
        symbol
    }

    /// Translate a constraint into a tableau row plus its tag.
    ///
    /// Terms whose symbol is currently basic are substituted immediately,
    /// so the returned row only holds parametric symbols. Slack, error and
    /// dummy symbols are appended according to the operator and strength,
    /// with error symbols weighted into the objective. The row constant is
    /// normalized to be non-negative.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let expression = constraint.expression();
        let mut row = Row::new(expression.constant());

        for term in expression.terms() {
            if near_zero(term.coefficient()) {
                continue;
            }
            let symbol = self.var_symbol(term.variable());
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, term.coefficient()),
                None => row.insert_symbol(symbol, term.coefficient()),
            }
        }

        let strength = constraint.strength();
        let tag = match constraint.op() {
            RelationalOperator::LessOrEqual | RelationalOperator::GreaterOrEqual => {
                let coefficient = if constraint.op() == RelationalOperator::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let slack = self.make_symbol(SymbolKind::Slack);
                row.insert_symbol(slack, coefficient);
                let other = if strength.is_required() {
                    None
                } else {
                    let error = self.make_symbol(SymbolKind::Error);
                    row.insert_symbol(error, -coefficient);
                    self.objective.insert_symbol(error, strength.value());
                    Some(error)
                };
                Tag { marker: slack, other }
            }
            RelationalOperator::Equal => {
                if strength.is_required() {
                    let dummy = self.make_symbol(SymbolKind::Dummy);
                    row.insert_symbol(dummy, 1.0);
                    Tag {
                        marker: dummy,
                        other: None,
                    }
                } else {
                    // A soft equality may deviate in either direction:
                    // expr = errplus - errminus.
                    let errplus = self.make_symbol(SymbolKind::Error);
                    let errminus = self.make_symbol(SymbolKind::Error);
                    row.insert_symbol(errplus, -1.0);
                    row.insert_symbol(errminus, 1.0);
                    self.objective.insert_symbol(errplus, strength.value());
                    self.objective.insert_symbol(errminus, strength.value());
                    Tag {
                        marker: errplus,
                        other: Some(errminus),
                    }
                }
            }
        };

        if row.constant() < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    /// Choose the subject to solve the new row for: the first external
    /// symbol, else a tag symbol that is pivotable with a negative
    /// coefficient. `None` means only an artificial variable can help.
    fn choose_subject(row: &Row, tag: Tag) -> Option<Symbol> {
        for (symbol, _) in row.cells() {
            if symbol.kind() == SymbolKind::External {
                return Some(symbol);
            }
        }
        if tag.marker.is_pivotable() && row.coefficient_for(tag.marker) < 0.0 {
            return Some(tag.marker);
        }
        if let Some(other) = tag.other {
            if other.is_pivotable() && row.coefficient_for(other) < 0.0 {
                return Some(other);
            }
        }
        None
    }

    /// Insert the row via an artificial variable, minimizing it out of the
    /// basis again. Returns whether the artificial objective reached zero,
    /// i.e. whether the constraint is satisfiable.
    fn add_with_artificial_variable(&mut self, row: &Row) -> Result<bool, SolverError> {
        let art = self.make_symbol(SymbolKind::Slack);
        self.rows.insert(art, row.clone());
        self.artificial = Some(row.clone());

        self.optimize(Objective::Artificial)?;
        let success = self
            .artificial
            .as_ref()
            .is_some_and(|artificial| near_zero(artificial.constant()));
        self.artificial = None;

        // If the artificial variable is still basic, pivot it out.
        if let Some(mut basic_row) = self.rows.swap_remove(&art) {
            if basic_row.is_constant() {
                return Ok(success);
            }
            let Some(entering) = Self::any_pivotable(&basic_row) else {
                return Ok(false);
            };
            basic_row.solve_for_symbols(art, entering);
            self.substitute(entering, &basic_row);
            self.rows.insert(entering, basic_row);
        }

        // Scrub any remaining traces of the artificial variable.
        for tableau_row in self.rows.values_mut() {
            tableau_row.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    fn any_pivotable(row: &Row) -> Option<Symbol> {
        row.cells().map(|(symbol, _)| symbol).find(|symbol| symbol.is_pivotable())
    }

    /// Substitute `symbol` with `row` throughout the tableau and the
    /// objective(s), tracking rows whose constant turns negative.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for (&basic, tableau_row) in self.rows.iter_mut() {
            tableau_row.substitute(symbol, row);
            if basic.kind() != SymbolKind::External && tableau_row.constant() < 0.0 {
                self.infeasible_rows.push(basic);
            }
        }
        self.objective.substitute(symbol, row);
        if let Some(artificial) = self.artificial.as_mut() {
            artificial.substitute(symbol, row);
        }
    }

    fn objective_row(&self, objective: Objective) -> &Row {
        match objective {
            Objective::Main => &self.objective,
            Objective::Artificial => self.artificial.as_ref().unwrap_or(&self.objective),
        }
    }

    /// Minimize the chosen objective with phase-2 simplex pivots until no
    /// improving symbol remains.
    fn optimize(&mut self, objective: Objective) -> Result<(), SolverError> {
        while self.optimize_step(objective)? == Step::Pivoted {}
        Ok(())
    }

    fn optimize_step(&mut self, objective: Objective) -> Result<Step, SolverError> {
        let Some(entering) = self.entering_symbol(objective) else {
            return Ok(Step::Done);
        };
        let Some(leaving) = self.leaving_symbol(entering) else {
            return Err(SolverError::InternalSolverError("the objective is unbounded"));
        };
        let Some(mut row) = self.rows.swap_remove(&leaving) else {
            return Err(SolverError::InternalSolverError("leaving row disappeared"));
        };
        row.solve_for_symbols(leaving, entering);
        self.substitute(entering, &row);
        self.rows.insert(entering, row);
        Ok(Step::Pivoted)
    }

    /// The entering symbol for a primal pivot: the non-dummy symbol with
    /// the most negative objective coefficient, lowest id on ties. `None`
    /// means the objective is at its minimum.
    fn entering_symbol(&self, objective: Objective) -> Option<Symbol> {
        let mut best: Option<(Symbol, f64)> = None;
        for (symbol, coefficient) in self.objective_row(objective).cells() {
            if symbol.kind() == SymbolKind::Dummy || coefficient >= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, c)) => {
                    coefficient < c || (coefficient == c && symbol.id() < current.id())
                }
            };
            if better {
                best = Some((symbol, coefficient));
            }
        }
        best.map(|(symbol, _)| symbol)
    }

    /// The leaving row for a primal pivot: among non-external basic rows
    /// with a negative coefficient for `entering`, the minimum ratio
    /// `-constant / coefficient`; ties prefer the smaller symbol kind
    /// (slack over error over dummy), then the lower id. `None` means the
    /// objective is unbounded.
    fn leaving_symbol(&self, entering: Symbol) -> Option<Symbol> {
        let mut ratio = f64::MAX;
        let mut found: Option<Symbol> = None;
        for (&symbol, row) in &self.rows {
            if symbol.kind() == SymbolKind::External {
                continue;
            }
            let coefficient = row.coefficient_for(entering);
            if coefficient >= 0.0 {
                continue;
            }
            let candidate = -row.constant() / coefficient;
            let better = match found {
                None => true,
                Some(current) => {
                    candidate < ratio
                        || (candidate == ratio
                            && (symbol.kind(), symbol.id()) < (current.kind(), current.id()))
                }
            };
            if better {
                ratio = candidate;
                found = Some(symbol);
            }
        }
        found
    }

    /// Restore feasibility after an edit perturbation: while any infeasible
    /// basic row remains, pivot it against the dual entering symbol.
    fn dual_optimize(&mut self) -> Result<(), SolverError> {
        while self.dual_optimize_step()? == Step::Pivoted {}
        Ok(())
    }

    fn dual_optimize_step(&mut self) -> Result<Step, SolverError> {
        while let Some(leaving) = self.infeasible_rows.pop() {
            // The symbol may have left the basis, or the row may have been
            // repaired by an earlier pivot.
            let entering = match self.rows.get(&leaving) {
                Some(row) if row.constant() < 0.0 => self.dual_entering_symbol(row),
                _ => continue,
            };
            let Some(entering) = entering else {
                return Err(SolverError::InternalSolverError(
                    "dual optimize found no entering symbol",
                ));
            };
            let Some(mut row) = self.rows.swap_remove(&leaving) else {
                continue;
            };
            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
            return Ok(Step::Pivoted);
        }
        Ok(Step::Done)
    }

    /// The entering symbol for a dual pivot: among non-dummy cells with a
    /// positive coefficient, the one minimizing the ratio of its objective
    /// coefficient to its row coefficient, lowest id on ties.
    fn dual_entering_symbol(&self, row: &Row) -> Option<Symbol> {
        let mut ratio = f64::MAX;
        let mut entering: Option<Symbol> = None;
        for (symbol, coefficient) in row.cells() {
            if coefficient <= 0.0 || symbol.kind() == SymbolKind::Dummy {
                continue;
            }
            let candidate = self.objective.coefficient_for(symbol) / coefficient;
            let better = match entering {
                None => true,
                Some(current) => {
                    candidate < ratio || (candidate == ratio && symbol.id() < current.id())
                }
            };
            if better {
                ratio = candidate;
                entering = Some(symbol);
            }
        }
        entering
    }

    /// The basic row to pivot a non-basic marker into, chosen to disturb
    /// the tableau as little as possible: a restricted row with a negative
    /// coefficient and minimal `-constant / coefficient`, else a restricted
    /// row with minimal `constant / coefficient`, else any external row
    /// holding the marker.
    fn marker_leaving_symbol(&self, marker: Symbol) -> Option<Symbol> {
        let mut r1 = f64::MAX;
        let mut r2 = f64::MAX;
        let mut first: Option<Symbol> = None;
        let mut second: Option<Symbol> = None;
        let mut third: Option<Symbol> = None;
        for (&symbol, row) in &self.rows {
            let coefficient = row.coefficient_for(marker);
            if coefficient == 0.0 {
                continue;
            }
            if symbol.kind() == SymbolKind::External {
                third = Some(symbol);
            } else if coefficient < 0.0 {
                let ratio = -row.constant() / coefficient;
                if ratio < r1 {
                    r1 = ratio;
                    first = Some(symbol);
                }
            } else {
                let ratio = row.constant() / coefficient;
                if ratio < r2 {
                    r2 = ratio;
                    second = Some(symbol);
                }
            }
        }
        first.or(second).or(third)
    }

    /// Remove a constraint's error terms from the objective. A basic error
    /// symbol contributes its whole defining row, scaled by the strength.
    fn remove_constraint_effects(&mut self, constraint: &Constraint, tag: Tag) {
        if tag.marker.kind() == SymbolKind::Error {
            self.remove_marker_effects(tag.marker, constraint.strength());
        }
        if let Some(other) = tag.other {
            if other.kind() == SymbolKind::Error {
                self.remove_marker_effects(other, constraint.strength());
            }
        }
    }

    fn remove_marker_effects(&mut self, marker: Symbol, strength: Strength) {
        if let Some(row) = self.rows.get(&marker) {
            self.objective.insert_row(row, -strength.value());
        } else {
            self.objective.insert_symbol(marker, -strength.value());
        }
    }

    /// Shift the constants of the rows carrying the edit's error symbols
    /// by `delta`, recording any that become infeasible.
    fn apply_edit_delta(&mut self, tag: Tag, delta: f64) {
        // Fast path: the positive error symbol is basic.
        if let Some(row) = self.rows.get_mut(&tag.marker) {
            if row.add(-delta) < 0.0 {
                self.infeasible_rows.push(tag.marker);
            }
            return;
        }

        // Fast path: the negative error symbol is basic.
        if let Some(other) = tag.other {
            if let Some(row) = self.rows.get_mut(&other) {
                if row.add(delta) < 0.0 {
                    self.infeasible_rows.push(other);
                }
                return;
            }
        }

        // Otherwise both symbols are parametric: shift every row they
        // appear in by the scaled delta.
        for (&symbol, row) in self.rows.iter_mut() {
            let coefficient = row.coefficient_for(tag.marker);
            if coefficient != 0.0
                && row.add(delta * coefficient) < 0.0
                && symbol.kind() != SymbolKind::External
            {
                self.infeasible_rows.push(symbol);
            }
        }
    }
}
