pub mod autodiff;
pub mod diffusivity;
pub mod jacobian;
pub mod pbratu;
pub mod residual;
pub mod stencil;

use crate::discretization::field::Field2d;
use crate::discretization::grid::{Grid2d, Patch};
use crate::numerics::sparse::{AssemblyError, StencilMatrix};

/// Defines the contract between a grid-stencil problem and the nonlinear
/// solver driving it.
///
/// The solver repeatedly requests residual evaluations and Jacobian
/// assemblies for the current field; both are synchronous, side-effect-free
/// computations that write only the owned points (or rows) of their output.
pub trait StencilProblem {
    /// Compute a boundary-compatible starting approximation.
    fn initial_condition(&self, grid: &Grid2d) -> Field2d;

    /// Evaluate the nonlinear residual F(u) at every point owned by `patch`.
    /// The output field is overwritten, never accumulated into.
    fn calculate_residual(&self, grid: &Grid2d, patch: &Patch, u: &Field2d, f: &mut Field2d);

    /// Assemble the linearized operator around `u`, one row per owned point,
    /// and finalize the matrix.
    fn assemble_jacobian(
        &self,
        grid: &Grid2d,
        patch: &Patch,
        u: &Field2d,
        mat: &mut StencilMatrix,
    ) -> Result<(), AssemblyError>;
}
