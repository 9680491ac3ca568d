//! Linear expressions over variables.

use std::fmt;

use smallvec::SmallVec;

use crate::Variable;

/// A `coefficient * variable` term.
#[derive(Debug, Clone)]
pub struct Term {
    variable: Variable,
    coefficient: f64,
}

impl Term {
    /// Create a new term.
    pub fn new(variable: Variable, coefficient: f64) -> Self {
        Self {
            variable,
            coefficient,
        }
    }

    /// The variable of the term.
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The coefficient of the term.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Evaluate the term against the variable's current value.
    pub fn value(&self) -> f64 {
        self.coefficient * self.variable.value()
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term::new(variable, 1.0)
    }
}

/// A linear expression: a sum of terms plus a constant.
///
/// Immutable value type; `value()` is `Σ terms + constant` once the
/// variables carry values.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    terms: SmallVec<[Term; 4]>,
    constant: f64,
}

impl Expression {
    /// Create an expression from terms and a constant.
    pub fn new(terms: impl IntoIterator<Item = Term>, constant: f64) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant,
        }
    }

    /// Create a constant expression with no terms.
    pub fn from_constant(constant: f64) -> Self {
        Self::new([], constant)
    }

    /// Create the expression `1 * variable`.
    pub fn from_variable(variable: Variable) -> Self {
        Self::new([Term::from(variable)], 0.0)
    }

    /// The terms of the expression.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The constant of the expression.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Evaluate the expression against the variables' current values.
    pub fn value(&self) -> f64 {
        self.terms.iter().map(Term::value).sum::<f64>() + self.constant
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{} * {} + ", term.coefficient(), term.variable().name())?;
        }
        write!(f, "{}", self.constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_defaults_to_unit_coefficient() {
        let x = Variable::new("x");
        let term = Term::from(x.clone());
        assert_eq!(term.coefficient(), 1.0);
        assert_eq!(term.variable(), &x);
    }

    #[test]
    fn evaluates_terms_and_constant() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        x.set_value(3.0);
        y.set_value(-2.0);
        let expr = Expression::new([Term::new(x, 2.0), Term::new(y, 1.0)], 5.0);
        assert_eq!(expr.value(), 2.0 * 3.0 - 2.0 + 5.0);
    }

    #[test]
    fn display_renders_terms_then_constant() {
        let x = Variable::new("foo");
        let expr = Expression::new([Term::new(x, 2.0)], -1.0);
        assert_eq!(expr.to_string(), "2 * foo + -1");
        assert_eq!(Expression::from_constant(4.0).to_string(), "4");
    }
}
