//! Human-readable dumps of the solver's internal state.

use std::fmt::Write;

use crate::row::Row;
use crate::solver::Solver;

fn render_row(out: &mut String, row: &Row) {
    let _ = write!(out, "{}", row.constant());
    for (symbol, coefficient) in row.cells() {
        let _ = write!(out, " + {} * {}", coefficient, symbol);
    }
    let _ = writeln!(out);
}

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

impl Solver {
    /// Render the internal state as text: the objective row, the tableau,
    /// the infeasible rows, and the symbol assignments. Intended for
    /// debugging pivot behavior; the format is not stable.
    pub fn dumps(&self) -> String {
        let mut out = String::new();

        header(&mut out, "Objective");
        render_row(&mut out, &self.objective);
        let _ = writeln!(&mut out);

        header(&mut out, "Tableau");
        for (symbol, row) in &self.rows {
            let _ = write!(&mut out, "{} | ", symbol);
            render_row(&mut out, row);
        }
        let _ = writeln!(&mut out);

        header(&mut out, "Infeasible");
        for symbol in &self.infeasible_rows {
            let _ = writeln!(&mut out, "{}", symbol);
        }
        let _ = writeln!(&mut out);

        header(&mut out, "Variables");
        for (variable, symbol) in &self.vars {
            let _ = writeln!(&mut out, "{} = {}", variable, symbol);
        }
        let _ = writeln!(&mut out);

        header(&mut out, "Edit Variables");
        for variable in self.edits.keys() {
            let _ = writeln!(&mut out, "{}", variable);
        }
        let _ = writeln!(&mut out);

        header(&mut out, "Constraints");
        for constraint in self.cns.keys() {
            let _ = writeln!(&mut out, "{}", constraint);
        }

        out
    }

    /// Print [`dumps`](Solver::dumps) to stdout.
    pub fn dump(&self) {
        print!("{}", self.dumps());
    }
}
