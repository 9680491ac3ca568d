//! Constraints relating an expression to zero.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{Expression, Strength};

/// Tolerance used when checking whether a constraint is violated.
const TOLERANCE: f64 = 1.0e-8;

/// The relational operator of a constraint, in the normalized form
/// `expr OP 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOperator {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            RelationalOperator::LessOrEqual => "<=",
            RelationalOperator::Equal => "==",
            RelationalOperator::GreaterOrEqual => ">=",
        };
        f.write_str(op)
    }
}

/// A linear constraint: an expression related to zero at some strength.
///
/// `Constraint` is a cheap handle with identity by allocation: two
/// structurally identical constraints are distinct entities that a solver
/// tracks independently.
#[derive(Debug, Clone)]
pub struct Constraint {
    data: Arc<ConstraintData>,
}

#[derive(Debug)]
struct ConstraintData {
    expression: Expression,
    op: RelationalOperator,
    strength: Strength,
}

impl Constraint {
    /// Create a new constraint. The strength is clipped into the valid
    /// range rather than rejected.
    pub fn new(expression: Expression, op: RelationalOperator, strength: Strength) -> Self {
        Self {
            data: Arc::new(ConstraintData {
                expression,
                op,
                strength: strength.clip(),
            }),
        }
    }

    /// The normalized expression of the constraint.
    pub fn expression(&self) -> &Expression {
        &self.data.expression
    }

    /// The relational operator of the constraint.
    pub fn op(&self) -> RelationalOperator {
        self.data.op
    }

    /// The strength of the constraint.
    pub fn strength(&self) -> Strength {
        self.data.strength
    }

    /// A copy of this constraint with a different strength.
    ///
    /// The copy is a new constraint handle; the original is untouched.
    pub fn with_strength(&self, strength: Strength) -> Constraint {
        Constraint::new(self.data.expression.clone(), self.data.op, strength)
    }

    /// Whether the constraint is violated by the variables' current values,
    /// beyond a small tolerance. Observational only.
    pub fn violated(&self) -> bool {
        let value = self.data.expression.value();
        match self.data.op {
            RelationalOperator::LessOrEqual => value > TOLERANCE,
            RelationalOperator::Equal => value.abs() > TOLERANCE,
            RelationalOperator::GreaterOrEqual => value < -TOLERANCE,
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} 0 | strength = {}",
            self.data.expression, self.data.op, self.data.strength
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Term, Variable};

    fn eq_constraint(variable: &Variable, constant: f64, strength: Strength) -> Constraint {
        Constraint::new(
            Expression::new([Term::new(variable.clone(), 1.0)], constant),
            RelationalOperator::Equal,
            strength,
        )
    }

    #[test]
    fn identity_is_by_handle() {
        let x = Variable::new("x");
        let a = eq_constraint(&x, -10.0, Strength::REQUIRED);
        let b = eq_constraint(&x, -10.0, Strength::REQUIRED);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn with_strength_leaves_original_untouched() {
        let x = Variable::new("x");
        let original = eq_constraint(&x, -10.0, Strength::REQUIRED);
        let weakened = original.with_strength(Strength::WEAK);
        assert_ne!(original, weakened);
        assert_eq!(original.strength(), Strength::REQUIRED);
        assert_eq!(weakened.strength(), Strength::WEAK);
    }

    #[test]
    fn strength_is_clipped_on_construction() {
        let x = Variable::new("x");
        let cn = eq_constraint(&x, 0.0, Strength::create_weighted(1000.0, 1000.0, 1000.0, 2.0));
        assert_eq!(cn.strength(), Strength::REQUIRED);
    }

    #[test]
    fn violated_checks_operator_against_zero() {
        let x = Variable::new("x");
        x.set_value(4.0);
        // x - 4 == 0 holds, x - 10 >= 0 does not, x - 10 <= 0 does.
        assert!(!eq_constraint(&x, -4.0, Strength::REQUIRED).violated());
        let ge = Constraint::new(
            Expression::new([Term::new(x.clone(), 1.0)], -10.0),
            RelationalOperator::GreaterOrEqual,
            Strength::REQUIRED,
        );
        assert!(ge.violated());
        let le = Constraint::new(
            Expression::new([Term::new(x.clone(), 1.0)], -10.0),
            RelationalOperator::LessOrEqual,
            Strength::REQUIRED,
        );
        assert!(!le.violated());
    }

    #[test]
    fn display_matches_dump_format() {
        let x = Variable::new("foo");
        let cn = Constraint::new(
            Expression::new([Term::new(x, 1.0)], -10.0),
            RelationalOperator::GreaterOrEqual,
            Strength::WEAK,
        );
        assert_eq!(cn.to_string(), "1 * foo + -10 >= 0 | strength = 1");
    }
}
