/// A structured rectangular grid of `mx * my` points on the unit square.
///
/// Spacing is uniform in each direction, `hx = 1/(mx-1)` and `hy = 1/(my-1)`,
/// so the four outermost index lines coincide with the physical boundary.
/// The grid is never reshaped during a solve.
#[derive(Clone, Copy, Debug)]
pub struct Grid2d {
    mx: usize,
    my: usize,
}

/// Precomputed spacing factors shared by the residual and Jacobian kernels.
#[derive(Clone, Copy, Debug)]
pub struct Spacing {
    pub hx: f64,
    pub hy: f64,
    pub dhx: f64,
    pub dhy: f64,
    pub hxdhy: f64,
    pub hydhx: f64,
}

/// A locally-owned rectangular index box: starting indices and extents.
/// Evaluation loops only over owned points; neighbor values are read through
/// the ghosted field view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patch {
    pub xs: usize,
    pub ys: usize,
    pub xm: usize,
    pub ym: usize,
}

impl Patch {
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i >= self.xs && i < self.xs + self.xm && j >= self.ys && j < self.ys + self.ym
    }
}

impl Grid2d {
    /// Create a grid with at least two points per direction.
    pub fn new(mx: usize, my: usize) -> Self {
        assert!(mx >= 2 && my >= 2, "grid needs at least 2 points per direction");
        Self { mx, my }
    }

    pub fn mx(&self) -> usize {
        self.mx
    }

    pub fn my(&self) -> usize {
        self.my
    }

    pub fn num_points(&self) -> usize {
        self.mx * self.my
    }

    pub fn hx(&self) -> f64 {
        1.0 / (self.mx as f64 - 1.0)
    }

    pub fn hy(&self) -> f64 {
        1.0 / (self.my as f64 - 1.0)
    }

    pub fn spacing(&self) -> Spacing {
        let hx = self.hx();
        let hy = self.hy();
        Spacing {
            hx,
            hy,
            dhx: 1.0 / hx,
            dhy: 1.0 / hy,
            hxdhy: hx / hy,
            hydhx: hy / hx,
        }
    }

    /// Physical coordinates of point (i, j).
    pub fn coords(&self, i: usize, j: usize) -> (f64, f64) {
        (i as f64 * self.hx(), j as f64 * self.hy())
    }

    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.mx - 1 || j == self.my - 1
    }

    /// Row index of point (i, j) in the natural (row-major) ordering.
    pub fn row_index(&self, i: usize, j: usize) -> usize {
        j * self.mx + i
    }

    /// The whole domain as a single owned patch (the serial layout).
    pub fn owned(&self) -> Patch {
        Patch {
            xs: 0,
            ys: 0,
            xm: self.mx,
            ym: self.my,
        }
    }

    /// Split the grid into `px * py` disjoint patches covering every point.
    /// Each patch owns a contiguous index box; evaluating patch by patch must
    /// give the same result as evaluating the whole domain at once.
    pub fn partition(&self, px: usize, py: usize) -> Vec<Patch> {
        assert!(px >= 1 && py >= 1 && px <= self.mx && py <= self.my);
        let mut patches = Vec::with_capacity(px * py);
        for q in 0..py {
            let ys = q * self.my / py;
            let ye = (q + 1) * self.my / py;
            for p in 0..px {
                let xs = p * self.mx / px;
                let xe = (p + 1) * self.mx / px;
                patches.push(Patch {
                    xs,
                    ys,
                    xm: xe - xs,
                    ym: ye - ys,
                });
            }
        }
        patches
    }
}
