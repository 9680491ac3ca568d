//! Solver error taxonomy.

use strut_core::{Constraint, Variable};
use thiserror::Error;

/// Errors reported by solver operations.
///
/// Every failure identifies the offending entity and leaves the solver
/// consistent for subsequent calls; there are no fatal errors.
#[derive(Debug, Clone, Error)]
pub enum SolverError {
    #[error("the constraint has already been added to the solver: {0}")]
    DuplicateConstraint(Constraint),

    #[error("the constraint has not been added to the solver: {0}")]
    UnknownConstraint(Constraint),

    #[error("the required constraint cannot be satisfied: {0}")]
    UnsatisfiableConstraint(Constraint),

    #[error("the variable has already been added as an edit variable: {0}")]
    DuplicateEditVariable(Variable),

    #[error("the variable has not been added as an edit variable: {0}")]
    UnknownEditVariable(Variable),

    #[error("edit variables cannot have a required strength")]
    BadRequiredStrength,

    #[error("internal solver error: {0}")]
    InternalSolverError(&'static str),
}
