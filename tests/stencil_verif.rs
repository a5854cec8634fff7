use approx::assert_relative_eq;
use pbratu_rs::discretization::field::Field2d;
use pbratu_rs::discretization::grid::Grid2d;
use pbratu_rs::physics::pbratu::{PBratu, PBratuParams};
use pbratu_rs::physics::residual::calculate_residual;
use pbratu_rs::physics::StencilProblem;

/// Deterministic non-trivial interior field with zero boundary values.
fn wavy_field(grid: &Grid2d) -> Field2d {
    let mut u = Field2d::zeros(grid);
    for j in 1..grid.my() - 1 {
        for i in 1..grid.mx() - 1 {
            u.set(
                i,
                j,
                0.5 * (1.3 * i as f64 + 0.4).sin() * (0.7 * j as f64 - 0.2).cos(),
            );
        }
    }
    u
}

#[test]
fn boundary_residual_equals_the_field_value() {
    let grid = Grid2d::new(6, 5);
    let par = PBratuParams {
        p: 3.0,
        ..PBratuParams::default()
    };
    let mut u = wavy_field(&grid);
    // Non-zero boundary data must be reproduced verbatim, independent of the
    // interior state.
    for i in 0..grid.mx() {
        u.set(i, 0, 0.1 * i as f64 + 0.5);
        u.set(i, grid.my() - 1, -0.3 * i as f64);
    }
    for j in 0..grid.my() {
        u.set(0, j, (j as f64).sin());
        u.set(grid.mx() - 1, j, 2.0);
    }

    let mut f = Field2d::zeros(&grid);
    calculate_residual(&par, &grid, &grid.owned(), &u, &mut f);

    for j in 0..grid.my() {
        for i in 0..grid.mx() {
            if grid.is_boundary(i, j) {
                assert_eq!(f.get(i, j), u.get(i, j));
            }
        }
    }
}

#[test]
fn p2_residual_reduces_to_the_five_point_laplacian() {
    let grid = Grid2d::new(5, 4);
    let par = PBratuParams::default();
    let sp = grid.spacing();
    let sc = sp.hx * sp.hy * par.lambda;
    let u = wavy_field(&grid);

    let mut f = Field2d::zeros(&grid);
    calculate_residual(&par, &grid, &grid.owned(), &u, &mut f);

    for j in 1..grid.my() - 1 {
        for i in 1..grid.mx() - 1 {
            let c = u.get(i, j);
            let expected = sp.hydhx * (2.0 * c - u.get(i - 1, j) - u.get(i + 1, j))
                + sp.hxdhy * (2.0 * c - u.get(i, j - 1) - u.get(i, j + 1))
                - sc * c.exp();
            assert_relative_eq!(f.get(i, j), expected, max_relative = 1e-12, epsilon = 1e-14);
        }
    }
}

#[test]
fn zero_field_residual_is_pure_reaction() {
    // On the zero field every flux term vanishes and exp(0) = 1, so interior
    // residuals are exactly -sc and boundary residuals are zero.
    for (mx, my) in [(3, 3), (4, 4)] {
        let grid = Grid2d::new(mx, my);
        let par = PBratuParams::default();
        let sc = grid.hx() * grid.hy() * par.lambda;

        let u = Field2d::zeros(&grid);
        let mut f = Field2d::zeros(&grid);
        calculate_residual(&par, &grid, &grid.owned(), &u, &mut f);

        for j in 0..my {
            for i in 0..mx {
                if grid.is_boundary(i, j) {
                    assert_eq!(f.get(i, j), 0.0);
                } else {
                    assert_relative_eq!(f.get(i, j), -sc, max_relative = 1e-15);
                }
            }
        }
    }
}

#[test]
fn initial_guess_is_boundary_compatible() {
    for (mx, my) in [(2, 2), (2, 5), (4, 4), (9, 7)] {
        let grid = Grid2d::new(mx, my);
        let problem = PBratu::new(PBratuParams::default());
        let x = problem.initial_condition(&grid);
        for j in 0..my {
            for i in 0..mx {
                if grid.is_boundary(i, j) {
                    assert_eq!(x.get(i, j), 0.0, "boundary point ({i},{j}) on {mx}x{my}");
                } else {
                    assert!(x.get(i, j) > 0.0, "interior point ({i},{j}) on {mx}x{my}");
                }
            }
        }
    }
}

#[test]
fn patchwise_evaluation_matches_the_whole_domain() {
    let grid = Grid2d::new(8, 7);
    let par = PBratuParams {
        p: 1.5,
        lambda: 4.0,
        ..PBratuParams::default()
    };
    let u = wavy_field(&grid);

    let mut whole = Field2d::zeros(&grid);
    calculate_residual(&par, &grid, &grid.owned(), &u, &mut whole);

    let mut pieced = Field2d::zeros(&grid);
    for patch in grid.partition(3, 2) {
        calculate_residual(&par, &grid, &patch, &u, &mut pieced);
    }

    for j in 0..grid.my() {
        for i in 0..grid.mx() {
            assert_eq!(whole.get(i, j), pieced.get(i, j));
        }
    }
}
