//! Value types for the Strut constraint solver.
//!
//! This crate defines the caller-facing data model consumed by
//! `strut-solver`:
//! - [`Variable`] — a named, caller-owned unknown
//! - [`Term`] and [`Expression`] — linear combinations of variables
//! - [`Constraint`] — an expression related to zero at some [`Strength`]
//!
//! Expressions handed to the solver are already normalized to the form
//! `expr OP 0`; constructing them is the caller's job. The solver never
//! mutates these values except for writing variable values back during
//! `update_variables`.

mod constraint;
mod expression;
mod strength;
mod variable;

pub use constraint::{Constraint, RelationalOperator};
pub use expression::{Expression, Term};
pub use strength::Strength;
pub use variable::{Context, Variable};
