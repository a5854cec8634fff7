use nalgebra::DVector;

use super::grid::Grid2d;

/// A dense scalar field over the full grid, stored in natural (row-major)
/// ordering. This is the serial ghosted view: every owned point can read its
/// one-layer neighborhood directly.
#[derive(Clone, Debug)]
pub struct Field2d {
    mx: usize,
    my: usize,
    data: DVector<f64>,
}

impl Field2d {
    pub fn zeros(grid: &Grid2d) -> Self {
        Self {
            mx: grid.mx(),
            my: grid.my(),
            data: DVector::zeros(grid.num_points()),
        }
    }

    pub fn from_vector(grid: &Grid2d, data: DVector<f64>) -> Self {
        assert_eq!(data.len(), grid.num_points());
        Self {
            mx: grid.mx(),
            my: grid.my(),
            data,
        }
    }

    pub fn mx(&self) -> usize {
        self.mx
    }

    pub fn my(&self) -> usize {
        self.my
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.mx && j < self.my);
        j * self.mx + i
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.idx(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = self.idx(i, j);
        self.data[idx] = v;
    }

    /// Read the 3x3 window centered at an interior point, indexed as
    /// `window[1 + dj][1 + di]`. This is the only neighbor-access path the
    /// stencil kernels use, keeping them independent of the storage layout.
    #[inline]
    pub fn window(&self, i: usize, j: usize) -> [[f64; 3]; 3] {
        debug_assert!(i >= 1 && j >= 1 && i + 1 < self.mx && j + 1 < self.my);
        std::array::from_fn(|dj| std::array::from_fn(|di| self.get(i + di - 1, j + dj - 1)))
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut DVector<f64> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_centered_on_the_point() {
        let grid = Grid2d::new(4, 4);
        let mut u = Field2d::zeros(&grid);
        for j in 0..4 {
            for i in 0..4 {
                u.set(i, j, (10 * j + i) as f64);
            }
        }
        let w = u.window(2, 1);
        assert_eq!(w[1][1], 12.0);
        assert_eq!(w[0][1], 2.0); // south
        assert_eq!(w[2][1], 22.0); // north
        assert_eq!(w[1][0], 11.0); // west
        assert_eq!(w[2][2], 23.0); // northeast
    }
}
