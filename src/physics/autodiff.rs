use nalgebra::{Dyn, U1};
use num_dual::{Derivative, DualDVec64};

use super::pbratu::PBratuParams;
use super::residual::residual_at;
use crate::discretization::field::Field2d;
use crate::discretization::grid::{Grid2d, Patch};
use crate::numerics::sparse::{AssemblyError, StencilMatrix, StencilShape};

/// Assemble the Jacobian by differentiating the residual kernel with dual
/// numbers, one row at a time.
///
/// Each interior row seeds the 9 window entries as independent dual
/// directions and evaluates the shared residual kernel once; the derivative
/// part of the result is exactly that row of the Jacobian. This is the
/// fallback when the analytic Jacobian is disabled, and the reference the
/// analytic modes are tested against. It always produces box-stencil rows,
/// so a star allocation is rejected up front.
pub fn assemble_jacobian_ad(
    par: &PBratuParams,
    grid: &Grid2d,
    patch: &Patch,
    u: &Field2d,
    mat: &mut StencilMatrix,
) -> Result<(), AssemblyError> {
    if mat.shape() == StencilShape::Star {
        return Err(AssemblyError::PatternMismatch {
            required: StencilShape::Box,
            allocated: mat.shape(),
        });
    }
    let sp = grid.spacing();
    for j in patch.ys..patch.ys + patch.ym {
        for i in patch.xs..patch.xs + patch.xm {
            if grid.is_boundary(i, j) {
                mat.set_entry(i, j, i, j, 1.0)?;
                continue;
            }
            let w = u.window(i, j);
            let wd: [[DualDVec64; 3]; 3] = std::array::from_fn(|dj| {
                std::array::from_fn(|di| {
                    let eps = Derivative::derivative_generic(Dyn(9), U1, 3 * dj + di);
                    DualDVec64::new(w[dj][di], eps)
                })
            });
            let r = residual_at(par, &sp, &wd);
            let deriv = r.eps.unwrap_generic(Dyn(9), U1);
            for dj in 0..3usize {
                for di in 0..3usize {
                    mat.set_entry(i, j, i + di - 1, j + dj - 1, deriv[(3 * dj + di, 0)])?;
                }
            }
        }
    }
    mat.assembly_begin();
    mat.assembly_end();
    Ok(())
}
