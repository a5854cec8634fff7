use kryst::solver::LinearSolver;
use kryst::{
    parallel::{NoComm, UniverseComm},
    preconditioner::PcSide,
};
use nalgebra::DVector;
use thiserror::Error;

use crate::discretization::field::Field2d;
use crate::discretization::grid::Grid2d;
use crate::numerics::sparse::{AssemblyError, StencilMatrix, StencilShape};
use crate::numerics::timing::{finalize_and_print, record_jacobian, record_linear_solve, reset_timing};
use crate::physics::StencilProblem;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

pub struct NewtonSolver {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 50,
        }
    }
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("linear solve failed")]
    LinearSolveFailed,
    #[error("Newton's method failed to converge")]
    NonConvergence,
    #[error("residual contains NaN or Inf at iteration {0}")]
    NonFiniteResidual(u32),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

pub struct SolverResult {
    pub solution: Field2d,
    pub iterations: u32,
    pub final_residual: f64,
}

impl NewtonSolver {
    /// Newton iteration over the whole grid: residual, Jacobian assembly into
    /// the preallocated pattern, Jacobi row scaling, BiCGStab on the
    /// correction, full step update.
    pub fn solve<P: StencilProblem>(
        &self,
        problem: &P,
        grid: &Grid2d,
        shape: StencilShape,
        initial_guess: Field2d,
        logging: bool,
    ) -> Result<SolverResult, SolverError> {
        reset_timing();
        let solve_start = Instant::now();

        let patch = grid.owned();
        let n = grid.num_points();
        let mut u = initial_guess;
        let mut f = Field2d::zeros(grid);
        let mut jacobian = StencilMatrix::new(grid, shape);

        let mut history: Vec<(u32, f64, f64, f64)> = Vec::new();
        let mut initial_residual = None;
        let mut previous_residual = None;

        if logging {
            println!("{} unknowns \n", n);
            println!("    Iter   | Residual |  Fraction |  Step % |  Initial");
        }

        for i in 0..self.max_iterations {
            problem.calculate_residual(grid, &patch, &u, &mut f);
            let residual = f.values();

            if !residual.iter().all(|x| x.is_finite()) {
                return Err(SolverError::NonFiniteResidual(i));
            }

            let res_norm = residual.norm();
            let init = *initial_residual.get_or_insert(res_norm);
            let fraction = res_norm / init;
            let step_percent =
                previous_residual.map_or(0.0, |prev| (prev - res_norm) / prev * 100.0);
            previous_residual = Some(res_norm);

            log_iteration(
                i,
                self.max_iterations,
                res_norm,
                fraction,
                step_percent,
                init,
                logging,
            );
            history.push((i, res_norm, fraction, step_percent));

            if res_norm < self.tolerance {
                finalize_and_print(solve_start.elapsed());
                write_hist_to_file(history, initial_residual);
                return Ok(SolverResult {
                    solution: u,
                    iterations: i,
                    final_residual: res_norm,
                });
            }

            jacobian.reset();
            record_jacobian(|| problem.assemble_jacobian(grid, &patch, &u, &mut jacobian))?;

            // Jacobi row scaling to improve conditioning before the Krylov
            // solve; boundary rows already sit at 1.0.
            let d: Vec<f64> = (0..n)
                .map(|row| {
                    let diag = jacobian.get(
                        row % grid.mx(),
                        row / grid.mx(),
                        row % grid.mx(),
                        row / grid.mx(),
                    );
                    if diag.abs() < 1e-12 { 1.0 } else { diag }
                })
                .collect();
            for (row, &scale) in d.iter().enumerate() {
                for val in jacobian.row_values_mut(row) {
                    *val /= scale;
                }
            }

            let op = kryst::matrix::op::CsrOp::new(Arc::new(jacobian.to_csr()?));

            // Relax the linear tolerance relative to the Newton residual.
            let linear_tol = (res_norm * 0.1).max(self.tolerance).min(1e-2);
            let mut bicgstab = kryst::solver::bicgstab::BiCgStabSolver::new(linear_tol, 2000);
            let mut workspace = kryst::context::ksp_context::Workspace::new(n);
            bicgstab.setup_workspace(&mut workspace);

            let mut x = DVector::from_element(n, 0.0);
            let b: DVector<f64> =
                DVector::from_iterator(n, (0..n).map(|idx| -residual[idx] / d[idx]));

            let result = record_linear_solve(|| {
                bicgstab.solve(
                    &op,
                    None,
                    b.as_slice(),
                    x.as_mut_slice(),
                    PcSide::Left,
                    &UniverseComm::NoComm(NoComm {}),
                    None,
                    Some(&mut workspace),
                )
            });

            match result {
                Ok(_) => {
                    if !x.iter().all(|val| val.is_finite()) {
                        eprintln!("Error: Linear solver produced NaN/Inf");
                        return Err(SolverError::LinearSolveFailed);
                    }
                }
                Err(e) => {
                    eprintln!("Linear solve failed: {:?}", e);
                    return Err(SolverError::LinearSolveFailed);
                }
            }

            *u.values_mut() += x;
        }

        finalize_and_print(solve_start.elapsed());
        write_hist_to_file(history, initial_residual);
        Err(SolverError::NonConvergence)
    }
}

pub(crate) fn log_iteration(
    i: u32,
    max_iter: u32,
    res_norm: f64,
    fraction: f64,
    step_percent: f64,
    init: f64,
    logging: bool,
) {
    if !logging {
        return;
    }
    if i == 0 {
        println!(
            "{i:>4} | {res_norm:>8.3e} | {fraction:>8.3e} | {step_percent:>6.2}% | {init:>8.3e}"
        );
    } else {
        print!("\x1B[1F\x1B[2K");
        println!(
            "{i:>4}/{max_iter} | {res_norm:>8.3e} | {fraction:>9.3e} | {step_percent:>6.2}% | {init:>8.3e}"
        );
    }
    io::stdout().flush().ok();
}

pub fn write_hist_to_file(history: Vec<(u32, f64, f64, f64)>, initial_residual: Option<f64>) {
    use std::fs::File;
    let init = initial_residual.unwrap_or(0.0);
    if let Ok(mut file) = File::create("output/solver_history.csv") {
        let _ = writeln!(file, "iter,residual,fraction,step_percent,initial");
        for (i, res, frac, step) in history {
            let _ = writeln!(file, "{i},{res},{frac},{step},{init}");
        }
    }
}
