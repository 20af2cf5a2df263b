//! Dense row-major matrices.

use crate::error::{SplineError, SplineResult};
use num_traits::Float;

/// A dense matrix stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<F> {
    rows: usize,
    cols: usize,
    data: Vec<F>,
}

impl<F: Float> Matrix<F> {
    /// Creates a `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![F::zero(); rows * cols],
        }
    }

    /// Creates the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = F::one();
        }
        m
    }

    /// Creates a matrix from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<F>>) -> SplineResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);
        for row in rows {
            if row.len() != cols {
                return Err(SplineError::LengthMismatch {
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: num_rows,
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the matrix product `self · other`.
    pub fn multiply(&self, other: &Self) -> SplineResult<Self> {
        if self.cols != other.rows {
            return Err(SplineError::LengthMismatch {
                expected: self.cols,
                found: other.rows,
            });
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == F::zero() {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] = out[(i, j)] + a * other[(k, j)];
                }
            }
        }
        Ok(out)
    }

    /// Solves `self · x = b` for a square matrix by LU decomposition with
    /// partial pivoting.
    ///
    /// Returns [`SplineError::SingularMatrix`] when a pivot vanishes.
    pub fn solve(&self, b: &[F]) -> SplineResult<Vec<F>> {
        let n = self.rows;
        if self.cols != n {
            return Err(SplineError::LengthMismatch {
                expected: n,
                found: self.cols,
            });
        }
        if b.len() != n {
            return Err(SplineError::LengthMismatch {
                expected: n,
                found: b.len(),
            });
        }

        let mut lu = self.clone();
        let mut x = b.to_vec();
        let scale = self
            .data
            .iter()
            .fold(F::zero(), |acc, v| acc.max(v.abs()))
            .max(F::one());
        let tiny = F::epsilon() * scale;

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|&i, &j| {
                    lu[(i, k)]
                        .abs()
                        .partial_cmp(&lu[(j, k)].abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(k);
            if !(lu[(pivot_row, k)].abs() > tiny) {
                return Err(SplineError::SingularMatrix);
            }
            if pivot_row != k {
                lu.swap_rows(k, pivot_row);
                x.swap(k, pivot_row);
            }

            let pivot = lu[(k, k)];
            for i in (k + 1)..n {
                let factor = lu[(i, k)] / pivot;
                if factor == F::zero() {
                    continue;
                }
                lu[(i, k)] = factor;
                for j in (k + 1)..n {
                    lu[(i, j)] = lu[(i, j)] - factor * lu[(k, j)];
                }
                x[i] = x[i] - factor * x[k];
            }
        }

        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum = sum - lu[(i, j)] * x[j];
            }
            x[i] = sum / lu[(i, i)];
        }

        if x.iter().all(|v| v.is_finite()) {
            Ok(x)
        } else {
            Err(SplineError::NonFinite)
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }
}

impl<F> std::ops::Index<(usize, usize)> for Matrix<F> {
    type Output = F;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &F {
        &self.data[i * self.cols + j]
    }
}

impl<F> std::ops::IndexMut<(usize, usize)> for Matrix<F> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut F {
        &mut self.data[i * self.cols + j]
    }
}
