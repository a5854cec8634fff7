use num_dual::DualNum;

/// Edge-centered gradient components around one interior point, computed
/// from its 3x3 window.
///
/// The component along each edge is a plain centered difference; the
/// transverse component is the 4-point average of the diagonal differences
/// flanking that edge. Window indexing is `w[1 + dj][1 + di]`, so `w[0][_]`
/// is the southern row and `w[_][0]` the western column.
pub struct EdgeGradients<T> {
    pub ux_e: T,
    pub uy_e: T,
    pub ux_w: T,
    pub uy_w: T,
    pub ux_n: T,
    pub uy_n: T,
    pub ux_s: T,
    pub uy_s: T,
}

impl<T: DualNum<f64>> EdgeGradients<T> {
    pub fn new(w: &[[T; 3]; 3], dhx: f64, dhy: f64) -> Self {
        Self {
            ux_e: (w[1][2].clone() - w[1][1].clone()) * dhx,
            uy_e: (w[2][1].clone() + w[2][2].clone() - w[0][1].clone() - w[0][2].clone())
                * (0.25 * dhy),
            ux_w: (w[1][1].clone() - w[1][0].clone()) * dhx,
            uy_w: (w[2][0].clone() + w[2][1].clone() - w[0][0].clone() - w[0][1].clone())
                * (0.25 * dhy),
            ux_n: (w[1][2].clone() + w[2][2].clone() - w[1][0].clone() - w[2][0].clone())
                * (0.25 * dhx),
            uy_n: (w[2][1].clone() - w[1][1].clone()) * dhy,
            ux_s: (w[0][2].clone() + w[1][2].clone() - w[0][0].clone() - w[1][0].clone())
                * (0.25 * dhx),
            uy_s: (w[1][1].clone() - w[0][1].clone()) * dhy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradients_vanish_on_a_uniform_window() {
        let w = [[3.0f64; 3]; 3];
        let g = EdgeGradients::new(&w, 4.0, 4.0);
        assert_eq!(g.ux_e, 0.0);
        assert_eq!(g.uy_e, 0.0);
        assert_eq!(g.ux_n, 0.0);
        assert_eq!(g.uy_s, 0.0);
    }

    #[test]
    fn linear_field_has_constant_gradients() {
        // u(x, y) = 2x + 3y on unit spacing.
        let w: [[f64; 3]; 3] =
            std::array::from_fn(|dj| std::array::from_fn(|di| 2.0 * di as f64 + 3.0 * dj as f64));
        let g = EdgeGradients::new(&w, 1.0, 1.0);
        assert_eq!(g.ux_e, 2.0);
        assert_eq!(g.ux_w, 2.0);
        assert_eq!(g.ux_n, 2.0);
        assert_eq!(g.uy_e, 3.0);
        assert_eq!(g.uy_n, 3.0);
        assert_eq!(g.uy_s, 3.0);
    }
}
