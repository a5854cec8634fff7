use super::diffusivity::{deta, eta};
use super::pbratu::PBratuParams;
use super::stencil::EdgeGradients;
use crate::discretization::field::Field2d;
use crate::discretization::grid::{Grid2d, Patch, Spacing};
use crate::numerics::sparse::{AssemblyError, StencilMatrix, StencilShape};

/// Jacobian fidelity modes, in increasing order of linearization accuracy.
///
/// Modes 1-3 fit a 5-point star pattern; mode 4 needs the 9-point box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JacobianType {
    /// 1: fixed-coefficient Laplacian Jacobian, ignoring the p-Laplacian
    /// nonlinearity entirely.
    Laplacian,
    /// 2: Picard linearization with the edge diffusivities frozen.
    Picard,
    /// 3: full Newton terms restricted to the star, with the cross
    /// derivatives lumped onto the axis entries.
    NewtonStar,
    /// 4: exact Newton linearization with the cross terms at their true
    /// diagonal-neighbor positions.
    NewtonBox,
}

impl JacobianType {
    /// Map the numeric `-jtype` option to a mode. Anything outside 1..=4 is
    /// an unsupported configuration.
    pub fn from_index(v: i64) -> Result<Self, AssemblyError> {
        match v {
            1 => Ok(JacobianType::Laplacian),
            2 => Ok(JacobianType::Picard),
            3 => Ok(JacobianType::NewtonStar),
            4 => Ok(JacobianType::NewtonBox),
            _ => Err(AssemblyError::UnsupportedJacobianType(v)),
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            JacobianType::Laplacian => 1,
            JacobianType::Picard => 2,
            JacobianType::NewtonStar => 3,
            JacobianType::NewtonBox => 4,
        }
    }

    /// The sparsity pattern this mode assembles into.
    pub fn stencil(&self) -> StencilShape {
        match self {
            JacobianType::NewtonBox => StencilShape::Box,
            _ => StencilShape::Star,
        }
    }
}

/// Edge quantities shared by every Jacobian mode: diffusivities, their
/// derivatives, the skew products they induce, and the Newton directional
/// terms.
pub(crate) struct EdgeCoefficients {
    pub e_e: f64,
    pub e_w: f64,
    pub e_n: f64,
    pub e_s: f64,
    pub skew_e: f64,
    pub skew_w: f64,
    pub skew_n: f64,
    pub skew_s: f64,
    pub cross_ew: f64,
    pub cross_ns: f64,
    pub newt_e: f64,
    pub newt_w: f64,
    pub newt_n: f64,
    pub newt_s: f64,
}

impl EdgeCoefficients {
    pub(crate) fn new(par: &PBratuParams, g: &EdgeGradients<f64>) -> Self {
        let e_e = eta(par, g.ux_e, g.uy_e);
        let e_w = eta(par, g.ux_w, g.uy_w);
        let e_n = eta(par, g.ux_n, g.uy_n);
        let e_s = eta(par, g.ux_s, g.uy_s);
        let de_e = deta(par, g.ux_e, g.uy_e);
        let de_w = deta(par, g.ux_w, g.uy_w);
        let de_n = deta(par, g.ux_n, g.uy_n);
        let de_s = deta(par, g.ux_s, g.uy_s);
        let skew_e = de_e * g.ux_e * g.uy_e;
        let skew_w = de_w * g.ux_w * g.uy_w;
        let skew_n = de_n * g.ux_n * g.uy_n;
        let skew_s = de_s * g.ux_s * g.uy_s;
        Self {
            e_e,
            e_w,
            e_n,
            e_s,
            skew_e,
            skew_w,
            skew_n,
            skew_s,
            cross_ew: 0.25 * (skew_e - skew_w),
            cross_ns: 0.25 * (skew_n - skew_s),
            newt_e: e_e + de_e * g.ux_e * g.ux_e,
            newt_w: e_w + de_w * g.ux_w * g.ux_w,
            newt_n: e_n + de_n * g.uy_n * g.uy_n,
            newt_s: e_s + de_s * g.uy_s * g.uy_s,
        }
    }
}

/// One staged Jacobian row: stencil offsets (di, dj) and their values.
pub(crate) struct StencilRow {
    pub len: usize,
    pub off: [(isize, isize); 9],
    pub val: [f64; 9],
}

impl StencilRow {
    fn star(vals: [f64; 5]) -> Self {
        let mut off = [(0, 0); 9];
        let mut val = [0.0; 9];
        off[..5].copy_from_slice(&[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)]);
        val[..5].copy_from_slice(&vals);
        Self { len: 5, off, val }
    }

    fn boxed(vals: [f64; 9]) -> Self {
        Self {
            len: 9,
            off: [
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (0, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
            val: vals,
        }
    }
}

type RowFn = fn(&PBratuParams, &Spacing, f64, &EdgeCoefficients) -> StencilRow;

/// Mode 1: the Jacobian the problem would have for p = 2, with the Bratu
/// reaction term on the diagonal.
fn laplacian_row(par: &PBratuParams, sp: &Spacing, u: f64, _c: &EdgeCoefficients) -> StencilRow {
    let sc = sp.hx * sp.hy * par.lambda;
    StencilRow::star([
        -sp.hxdhy,
        -sp.hydhx,
        2.0 * (sp.hydhx + sp.hxdhy) - sc * u.exp(),
        -sp.hydhx,
        -sp.hxdhy,
    ])
}

/// Mode 2: Picard linearization, edge diffusivities frozen at the current
/// field.
fn picard_row(par: &PBratuParams, sp: &Spacing, u: f64, c: &EdgeCoefficients) -> StencilRow {
    let sc = sp.hx * sp.hy * par.lambda;
    StencilRow::star([
        -sp.hxdhy * c.e_s,
        -sp.hydhx * c.e_w,
        (c.e_w + c.e_e) * sp.hydhx + (c.e_s + c.e_n) * sp.hxdhy - sc * u.exp(),
        -sp.hydhx * c.e_e,
        -sp.hxdhy * c.e_n,
    ])
}

/// Mode 3: full Newton information on the star only. The cross-derivative
/// contributions that belong at the diagonal neighbors are lumped onto the
/// axis entries instead of being dropped.
fn newton_star_row(par: &PBratuParams, sp: &Spacing, u: f64, c: &EdgeCoefficients) -> StencilRow {
    let sc = sp.hx * sp.hy * par.lambda;
    StencilRow::star([
        -sp.hxdhy * c.newt_s + c.cross_ew,
        -sp.hydhx * c.newt_w + c.cross_ns,
        sp.hxdhy * (c.newt_n + c.newt_s) + sp.hydhx * (c.newt_e + c.newt_w) - sc * u.exp(),
        -sp.hydhx * c.newt_e - c.cross_ns,
        -sp.hxdhy * c.newt_n - c.cross_ew,
    ])
}

/// Mode 4: exact Newton linearization,
/// `-div [ eta grad(u) + deta (grad u0 . grad u) grad u0 ] - lambda exp(u0) u`,
/// with the skew terms at their true corner positions.
fn newton_box_row(par: &PBratuParams, sp: &Spacing, u: f64, c: &EdgeCoefficients) -> StencilRow {
    let sc = sp.hx * sp.hy * par.lambda;
    StencilRow::boxed([
        -0.25 * (c.skew_s + c.skew_w),
        -sp.hxdhy * c.newt_s + c.cross_ew,
        0.25 * (c.skew_s + c.skew_e),
        -sp.hydhx * c.newt_w + c.cross_ns,
        sp.hxdhy * (c.newt_n + c.newt_s) + sp.hydhx * (c.newt_e + c.newt_w) - sc * u.exp(),
        -sp.hydhx * c.newt_e - c.cross_ns,
        0.25 * (c.skew_n + c.skew_w),
        -sp.hxdhy * c.newt_n - c.cross_ew,
        -0.25 * (c.skew_n + c.skew_e),
    ])
}

/// Assemble the analytic Jacobian for every row owned by `patch` and close
/// the two-phase assembly.
///
/// Pattern compatibility is checked up front so an incompatible allocation
/// fails before any entry is staged, rather than partway through a row.
pub fn assemble_jacobian(
    par: &PBratuParams,
    jtype: JacobianType,
    grid: &Grid2d,
    patch: &Patch,
    u: &Field2d,
    mat: &mut StencilMatrix,
) -> Result<(), AssemblyError> {
    if jtype.stencil() == StencilShape::Box && mat.shape() == StencilShape::Star {
        return Err(AssemblyError::PatternMismatch {
            required: StencilShape::Box,
            allocated: mat.shape(),
        });
    }
    let row_fn: RowFn = match jtype {
        JacobianType::Laplacian => laplacian_row,
        JacobianType::Picard => picard_row,
        JacobianType::NewtonStar => newton_star_row,
        JacobianType::NewtonBox => newton_box_row,
    };
    let sp = grid.spacing();
    for j in patch.ys..patch.ys + patch.ym {
        for i in patch.xs..patch.xs + patch.xm {
            if grid.is_boundary(i, j) {
                // Identity row, matching the Dirichlet residual.
                mat.set_entry(i, j, i, j, 1.0)?;
            } else {
                let w = u.window(i, j);
                let g = EdgeGradients::new(&w, sp.dhx, sp.dhy);
                let c = EdgeCoefficients::new(par, &g);
                let row = row_fn(par, &sp, u.get(i, j), &c);
                mat.set_row(i, j, &row.off[..row.len], &row.val[..row.len])?;
            }
        }
    }
    mat.assembly_begin();
    mat.assembly_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jtype_indices_round_trip() {
        for v in 1..=4 {
            assert_eq!(JacobianType::from_index(v).unwrap().index(), v);
        }
        let err = JacobianType::from_index(5).unwrap_err();
        assert!(err.to_string().contains('5'));
        assert!(JacobianType::from_index(0).is_err());
    }

    #[test]
    fn only_the_box_mode_needs_the_box_pattern() {
        assert_eq!(JacobianType::Laplacian.stencil(), StencilShape::Star);
        assert_eq!(JacobianType::Picard.stencil(), StencilShape::Star);
        assert_eq!(JacobianType::NewtonStar.stencil(), StencilShape::Star);
        assert_eq!(JacobianType::NewtonBox.stencil(), StencilShape::Box);
    }
}
