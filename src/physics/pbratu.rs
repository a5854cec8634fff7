use super::autodiff::assemble_jacobian_ad;
use super::jacobian::{assemble_jacobian, JacobianType};
use super::residual::calculate_residual;
use super::StencilProblem;
use crate::discretization::field::Field2d;
use crate::discretization::grid::{Grid2d, Patch};
use crate::numerics::sparse::{AssemblyError, StencilMatrix};

/// Stability guidance for the Bratu parameter when p = 2: outside this range
/// the continuous problem has no (stable) solution, so the driver warns.
pub const BRATU_LAMBDA_MIN: f64 = 0.0;
pub const BRATU_LAMBDA_MAX: f64 = 6.81;

/// Problem parameters, immutable for the lifetime of a solve.
#[derive(Clone, Copy, Debug)]
pub struct PBratuParams {
    /// Bratu reaction coefficient.
    pub lambda: f64,
    /// Exponent in the p-Laplacian; 2 recovers the linear Laplacian.
    pub p: f64,
    /// Strain regularization, must be positive.
    pub epsilon: f64,
}

impl Default for PBratuParams {
    fn default() -> Self {
        Self {
            lambda: 6.0,
            p: 2.0,
            epsilon: 1e-5,
        }
    }
}

impl PBratuParams {
    pub fn lambda_in_bratu_range(&self) -> bool {
        (BRATU_LAMBDA_MIN..=BRATU_LAMBDA_MAX).contains(&self.lambda)
    }
}

/// How the Jacobian is produced: one of the analytic stencil modes, or the
/// dual-number differentiation of the residual kernel.
#[derive(Clone, Copy, Debug)]
pub enum JacobianStrategy {
    Analytic(JacobianType),
    AutoDiff,
}

/// The p-Laplacian / Bratu problem
/// `-div(eta grad u) - lambda exp(u) = 0` on the unit square with
/// homogeneous Dirichlet boundary, discretized in flux form on the grid.
pub struct PBratu {
    pub params: PBratuParams,
    pub strategy: JacobianStrategy,
}

impl PBratu {
    pub fn new(params: PBratuParams) -> Self {
        Self {
            params,
            strategy: JacobianStrategy::Analytic(JacobianType::NewtonBox),
        }
    }

    pub fn with_strategy(mut self, strategy: JacobianStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl StencilProblem for PBratu {
    /// Smooth bump `(1 - xx^2)(1 - yy^2)` over normalized coordinates in
    /// [-1, 1]^2: zero on the boundary by construction, strictly positive
    /// inside.
    fn initial_condition(&self, grid: &Grid2d) -> Field2d {
        let mut x = Field2d::zeros(grid);
        let (mx, my) = (grid.mx(), grid.my());
        for j in 0..my {
            for i in 0..mx {
                if grid.is_boundary(i, j) {
                    x.set(i, j, 0.0);
                } else {
                    let xx = 2.0 * i as f64 / (mx as f64 - 1.0) - 1.0;
                    let yy = 2.0 * j as f64 / (my as f64 - 1.0) - 1.0;
                    x.set(i, j, (1.0 - xx * xx) * (1.0 - yy * yy));
                }
            }
        }
        x
    }

    fn calculate_residual(&self, grid: &Grid2d, patch: &Patch, u: &Field2d, f: &mut Field2d) {
        calculate_residual(&self.params, grid, patch, u, f);
    }

    fn assemble_jacobian(
        &self,
        grid: &Grid2d,
        patch: &Patch,
        u: &Field2d,
        mat: &mut StencilMatrix,
    ) -> Result<(), AssemblyError> {
        match self.strategy {
            JacobianStrategy::Analytic(jtype) => {
                assemble_jacobian(&self.params, jtype, grid, patch, u, mat)
            }
            JacobianStrategy::AutoDiff => assemble_jacobian_ad(&self.params, grid, patch, u, mat),
        }
    }
}
