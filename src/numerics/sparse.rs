use kryst::matrix::sparse::CsrMatrix;
use thiserror::Error;

use crate::discretization::grid::Grid2d;

/// Preallocated sparsity pattern over the grid: 5-point star (axis-aligned
/// neighbors) or 9-point box (star plus diagonal neighbors).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilShape {
    Star,
    Box,
}

impl StencilShape {
    fn offsets(&self) -> &'static [(isize, isize)] {
        // Sorted so each row's column indices come out ascending.
        match self {
            StencilShape::Star => &[(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)],
            StencilShape::Box => &[
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
        }
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Jacobian type {0} not implemented")]
    UnsupportedJacobianType(i64),
    #[error("Jacobian stencil needs a {required:?} pattern but the matrix was allocated {allocated:?}")]
    PatternMismatch {
        required: StencilShape,
        allocated: StencilShape,
    },
    #[error("new nonzero location ({row}, {col}) outside the allocated pattern")]
    NewNonzeroLocation { row: usize, col: usize },
    #[error("matrix accessed before assembly was finalized")]
    NotAssembled,
}

/// Sparse operator with a fixed sparsity pattern preallocated from a
/// [`StencilShape`] over the grid, in CSR layout and natural row ordering.
///
/// Entries are addressed by grid coordinate and staged row by row, then the
/// two-phase assembly is closed with [`assembly_begin`](Self::assembly_begin)
/// and [`assembly_end`](Self::assembly_end). The pattern is locked for the
/// lifetime of the matrix: writing a location outside it is an error, never a
/// silent extension, so repeated assemblies can never grow the pattern.
pub struct StencilMatrix {
    mx: usize,
    shape: StencilShape,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
    assembled: bool,
}

impl StencilMatrix {
    pub fn new(grid: &Grid2d, shape: StencilShape) -> Self {
        let (mx, my) = (grid.mx(), grid.my());
        let n = mx * my;
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::new();
        row_ptr.push(0);
        for j in 0..my {
            for i in 0..mx {
                for &(di, dj) in shape.offsets() {
                    let (ci, cj) = (i as isize + di, j as isize + dj);
                    if ci >= 0 && cj >= 0 && (ci as usize) < mx && (cj as usize) < my {
                        col_idx.push(cj as usize * mx + ci as usize);
                    }
                }
                row_ptr.push(col_idx.len());
            }
        }
        let values = vec![0.0; col_idx.len()];
        Self {
            mx,
            shape,
            row_ptr,
            col_idx,
            values,
            assembled: false,
        }
    }

    pub fn shape(&self) -> StencilShape {
        self.shape
    }

    /// Number of rows (= number of grid points).
    pub fn order(&self) -> usize {
        self.row_ptr.len() - 1
    }

    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    fn find(&self, row: usize, col: usize) -> Option<usize> {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()]
            .binary_search(&col)
            .ok()
            .map(|k| range.start + k)
    }

    /// Stage one entry, addressed by grid coordinates of the row point and
    /// the column point. Insert semantics: the value overwrites.
    pub fn set_entry(
        &mut self,
        i: usize,
        j: usize,
        ci: usize,
        cj: usize,
        v: f64,
    ) -> Result<(), AssemblyError> {
        let row = j * self.mx + i;
        let col = cj * self.mx + ci;
        match self.find(row, col) {
            Some(k) => {
                self.values[k] = v;
                Ok(())
            }
            None => Err(AssemblyError::NewNonzeroLocation { row, col }),
        }
    }

    /// Stage all entries of one row at once, as stencil offsets relative to
    /// the row point. Offsets reaching outside the grid are skipped, matching
    /// the clipped pattern.
    pub fn set_row(
        &mut self,
        i: usize,
        j: usize,
        offsets: &[(isize, isize)],
        vals: &[f64],
    ) -> Result<(), AssemblyError> {
        debug_assert_eq!(offsets.len(), vals.len());
        let my = self.order() / self.mx;
        for (&(di, dj), &v) in offsets.iter().zip(vals) {
            let (ci, cj) = (i as isize + di, j as isize + dj);
            if ci < 0 || cj < 0 || ci as usize >= self.mx || cj as usize >= my {
                continue;
            }
            self.set_entry(i, j, ci as usize, cj as usize, v)?;
        }
        Ok(())
    }

    /// First phase of assembly. Serial staging has nothing to flush, but the
    /// call pair is kept so assembly remains an explicit two-phase protocol.
    pub fn assembly_begin(&mut self) {}

    /// Close assembly; the matrix can now be handed to the linear solver.
    pub fn assembly_end(&mut self) {
        self.assembled = true;
    }

    /// Reset staged values for the next assembly. The pattern stays fixed.
    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.assembled = false;
    }

    /// Read one entry; locations outside the pattern read as structural zero.
    pub fn get(&self, i: usize, j: usize, ci: usize, cj: usize) -> f64 {
        let row = j * self.mx + i;
        let col = cj * self.mx + ci;
        self.find(row, col).map_or(0.0, |k| self.values[k])
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn row_values_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.values[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    /// Export to the linear-solver CSR format. Requires finalized assembly.
    pub fn to_csr(&self) -> Result<CsrMatrix<f64>, AssemblyError> {
        if !self.assembled {
            return Err(AssemblyError::NotAssembled);
        }
        let n = self.order();
        Ok(CsrMatrix::from_csr(
            n,
            n,
            self.row_ptr.clone(),
            self.col_idx.clone(),
            self.values.clone(),
        ))
    }
}
