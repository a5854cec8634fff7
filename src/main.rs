use std::fs;

use pbratu_rs::config::{Options, USAGE};
use pbratu_rs::discretization::grid::Grid2d;
use pbratu_rs::numerics::solver::NewtonSolver;
use pbratu_rs::physics::pbratu::{JacobianStrategy, PBratu};
use pbratu_rs::physics::StencilProblem;
use pbratu_rs::processing::csv_writer;
use pbratu_rs::processing::summary::SimulationSummary;

static HELP: &str = "p-Bratu nonlinear PDE in 2d.
Solves the p-Laplacian (nonlinear diffusion) combined with the Bratu
(solid fuel ignition) nonlinearity on the unit square with homogeneous
Dirichlet boundary conditions, by Newton iteration on a flux-form
finite-difference discretization.";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-help" || a == "--help") {
        println!("{HELP}\n\n{USAGE}");
        return;
    }

    let opts = match Options::parse(args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    if !opts.params.lambda_in_bratu_range() {
        eprintln!("WARNING: lambda {} out of range for p=2", opts.params.lambda);
    }

    fs::create_dir_all("output").expect("Failed to create output directory");

    let grid = Grid2d::new(opts.mx, opts.my);
    let strategy = if opts.analytic_jacobian {
        JacobianStrategy::Analytic(opts.jtype)
    } else {
        JacobianStrategy::AutoDiff
    };
    let problem = PBratu::new(opts.params).with_strategy(strategy);
    let mut summary = SimulationSummary::from_problem(&grid, &opts);

    let initial_guess = problem.initial_condition(&grid);
    csv_writer::write_field("output/initial_guess.csv", &grid, &initial_guess)
        .expect("Failed to write initial guess");

    let solver = NewtonSolver::default();
    println!("Running Newton solver...");
    match solver.solve(&problem, &grid, opts.pattern(), initial_guess, true) {
        Ok(result) => {
            println!("Solver finished successfully.\n");
            csv_writer::write_field("output/solution.csv", &grid, &result.solution)
                .expect("Failed to write solution");
            summary.add_solver_info(&result);
        }
        Err(e) => {
            eprintln!("Solver failed: {e}");
            summary.add_failure(&e);
        }
    }

    summary
        .write_to_file("output/simulation_summary.txt")
        .expect("Failed to write summary");
    summary.print_to_console();
    println!("Outputs saved to output/");
}
