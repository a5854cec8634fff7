use num_dual::DualNum;

use super::pbratu::PBratuParams;

/// Regularized p-Laplacian diffusivity at an edge, from the edge-centered
/// gradient components:
///
/// `eta = (epsilon^2 + (ux^2 + uy^2)/2)^((p-2)/2)`
///
/// `epsilon > 0` keeps the value finite and positive at zero gradient.
/// Generic over the scalar type so the same closure evaluates on `f64` and on
/// dual numbers.
#[inline]
pub fn eta<T: DualNum<f64>>(par: &PBratuParams, ux: T, uy: T) -> T {
    let gamma = (ux.clone() * ux + uy.clone() * uy) * 0.5 + par.epsilon * par.epsilon;
    gamma.powf(0.5 * (par.p - 2.0))
}

/// Derivative of `eta` with respect to `gamma = epsilon^2 + |grad u|^2 / 2`.
/// Identically zero for p = 2, where the diffusivity is constant.
#[inline]
pub fn deta<T: DualNum<f64> + num_traits::Zero>(par: &PBratuParams, ux: T, uy: T) -> T {
    if par.p == 2.0 {
        return T::zero();
    }
    let gamma = (ux.clone() * ux + uy.clone() * uy) * 0.5 + par.epsilon * par.epsilon;
    gamma.powf(0.5 * (par.p - 4.0)) * (0.5 * (par.p - 2.0))
}
