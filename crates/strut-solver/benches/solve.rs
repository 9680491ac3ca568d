//! Solver benchmarks.

use criterion::{criterion_group, criterion_main, Criterion, black_box};
use strut_solver::{
    Constraint, Expression, RelationalOperator, Solver, Strength, Term, Variable,
};

/// A horizontal chain of `n` boxes: each box is 10 wide and starts where
/// the previous one ends.
fn build_chain(n: usize) -> (Solver, Vec<Variable>) {
    let mut solver = Solver::new();
    let vars: Vec<Variable> = (0..n).map(|i| Variable::new(format!("x{i}"))).collect();

    for pair in vars.windows(2) {
        solver
            .add_constraint(&Constraint::new(
                Expression::new(
                    vec![Term::new(pair[1].clone(), 1.0), Term::new(pair[0].clone(), -1.0)],
                    -10.0,
                ),
                RelationalOperator::Equal,
                Strength::REQUIRED,
            ))
            .unwrap();
    }
    (solver, vars)
}

fn solve_chain(c: &mut Criterion) {
    c.bench_function("solve_chain_100", |b| {
        b.iter(|| {
            let (solver, _vars) = build_chain(black_box(100));
            solver.update_variables();
        })
    });
}

fn edit_loop(c: &mut Criterion) {
    // Drive the head of the chain; every other box follows.
    let (mut solver, vars) = build_chain(50);
    solver.add_edit_variable(&vars[0], Strength::STRONG).unwrap();

    c.bench_function("edit_loop_50", |b| {
        let mut next = 0.0_f64;
        b.iter(|| {
            next += 1.0;
            solver.suggest_value(&vars[0], black_box(next)).unwrap();
            solver.update_variables();
        })
    });
}

criterion_group!(benches, solve_chain, edit_loop);
criterion_main!(benches);
