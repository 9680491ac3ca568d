//! Incremental Cassowary constraint solving for UI layout.
//!
//! Constraints are linear relations over [`Variable`]s, each carrying a
//! [`Strength`]. The [`Solver`] maintains a solution incrementally:
//! constraints can be added and removed one at a time, and registered edit
//! variables can be driven frame by frame with
//! [`suggest_value`](Solver::suggest_value) at a cost proportional to the
//! change rather than the system size.
//!
//! ```
//! use strut_solver::{
//!     Constraint, Expression, RelationalOperator, Solver, Strength, Term, Variable,
//! };
//!
//! let left = Variable::new("left");
//! let width = Variable::new("width");
//!
//! let mut solver = Solver::new();
//! // left >= 0
//! solver.add_constraint(&Constraint::new(
//!     Expression::new(vec![Term::new(left.clone(), 1.0)], 0.0),
//!     RelationalOperator::GreaterOrEqual,
//!     Strength::REQUIRED,
//! ))?;
//! // width == 200 (preferred, not required)
//! solver.add_constraint(&Constraint::new(
//!     Expression::new(vec![Term::new(width.clone(), 1.0)], -200.0),
//!     RelationalOperator::Equal,
//!     Strength::STRONG,
//! ))?;
//!
//! solver.update_variables();
//! assert_eq!(width.value(), 200.0);
//! # Ok::<(), strut_solver::SolverError>(())
//! ```

mod dump;
mod error;
mod row;
mod solver;
mod symbol;

pub use error::SolverError;
pub use solver::Solver;

pub use strut_core::{
    Constraint, Context, Expression, RelationalOperator, Strength, Term, Variable,
};
