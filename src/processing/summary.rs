use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::config::Options;
use crate::discretization::grid::Grid2d;
use crate::numerics::solver::SolverResult;

/// End-of-run report: problem setup plus solver outcome, printed to the
/// console and written next to the CSV outputs.
pub struct SimulationSummary {
    lines: Vec<String>,
}

impl SimulationSummary {
    pub fn from_problem(grid: &Grid2d, opts: &Options) -> Self {
        let mut lines = Vec::new();
        lines.push("p-Bratu run summary".to_string());
        lines.push(format!(
            "Grid: {} x {} points ({} unknowns), hx = {:.4e}, hy = {:.4e}",
            grid.mx(),
            grid.my(),
            grid.num_points(),
            grid.hx(),
            grid.hy()
        ));
        lines.push(format!(
            "Parameters: lambda = {}, p = {}, epsilon = {:.1e}",
            opts.params.lambda, opts.params.p, opts.params.epsilon
        ));
        let jac = if opts.analytic_jacobian {
            format!("analytic, jtype {}", opts.jtype.index())
        } else {
            "automatic differentiation".to_string()
        };
        lines.push(format!(
            "Jacobian: {jac}; preallocated pattern: {:?}",
            opts.pattern()
        ));
        Self { lines }
    }

    pub fn add_solver_info(&mut self, result: &SolverResult) {
        self.lines.push(format!(
            "Newton iterations: {}, final residual: {:.3e}",
            result.iterations, result.final_residual
        ));
        let u = result.solution.values();
        let max = u.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        self.lines.push(format!("Solution max: {:.6}", max));
    }

    pub fn add_failure(&mut self, error: &dyn std::error::Error) {
        self.lines.push(format!("Solve failed: {error}"));
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        for line in &self.lines {
            writeln!(file, "{line}")?;
        }
        Ok(())
    }

    pub fn print_to_console(&self) {
        println!();
        for line in &self.lines {
            println!("{line}");
        }
    }
}
