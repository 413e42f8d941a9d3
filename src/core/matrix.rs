/// Dense complex matrices of arbitrary shape.
///
/// Gates are applied through the fixed-size [`Matrix2x2`], but descriptors
/// arriving from outside (or built by composing gates) are general matrices.
/// This module holds the checked linear algebra for those: products,
/// conjugate transpose, Kronecker products and unitarity checks.
use super::complex::Complex;
use super::gates::Matrix2x2;
use crate::error::{QsimError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex>,
}

impl ComplexMatrix {
    /// Build from row vectors. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Complex>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(QsimError::DimensionMismatch {
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![Complex::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = Complex::one();
        }
        Self { rows: n, cols: n, data }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Complex {
        self.data[row * self.cols + col]
    }

    /// Matrix product `self · rhs`.
    pub fn mul(&self, rhs: &ComplexMatrix) -> Result<ComplexMatrix> {
        if self.cols != rhs.rows {
            return Err(QsimError::DimensionMismatch {
                expected: self.cols,
                found: rhs.rows,
            });
        }
        let mut data = vec![Complex::zero(); self.rows * rhs.cols];
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut acc = Complex::zero();
                for k in 0..self.cols {
                    acc = acc + self.get(i, k) * rhs.get(k, j);
                }
                data[i * rhs.cols + j] = acc;
            }
        }
        Ok(ComplexMatrix {
            rows: self.rows,
            cols: rhs.cols,
            data,
        })
    }

    /// Matrix-vector product `self · v`.
    pub fn apply(&self, v: &[Complex]) -> Result<Vec<Complex>> {
        if self.cols != v.len() {
            return Err(QsimError::DimensionMismatch {
                expected: self.cols,
                found: v.len(),
            });
        }
        Ok((0..self.rows)
            .map(|i| {
                v.iter()
                    .enumerate()
                    .fold(Complex::zero(), |acc, (k, &x)| acc + self.get(i, k) * x)
            })
            .collect())
    }

    /// Conjugate transpose M†.
    pub fn dagger(&self) -> ComplexMatrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.get(i, j).conjugate());
            }
        }
        ComplexMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Kronecker product `self ⊗ rhs`.
    pub fn tensor(&self, rhs: &ComplexMatrix) -> ComplexMatrix {
        let rows = self.rows * rhs.rows;
        let cols = self.cols * rhs.cols;
        let mut data = vec![Complex::zero(); rows * cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                let a = self.get(i, j);
                for k in 0..rhs.rows {
                    for l in 0..rhs.cols {
                        data[(i * rhs.rows + k) * cols + j * rhs.cols + l] = a * rhs.get(k, l);
                    }
                }
            }
        }
        ComplexMatrix { rows, cols, data }
    }

    /// Entry-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &ComplexMatrix, tolerance: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (*a - *b).modulus() <= tolerance)
    }

    /// `M · M† = I` within `tolerance`. Non-square matrices are never unitary.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        match self.mul(&self.dagger()) {
            Ok(product) => product.approx_eq(&ComplexMatrix::identity(self.rows), tolerance),
            Err(_) => false,
        }
    }

    /// Narrow to a single-qubit gate matrix.
    pub fn to_2x2(&self) -> Result<Matrix2x2> {
        if self.rows != 2 || self.cols != 2 {
            return Err(QsimError::InvalidGateShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok([
            [self.get(0, 0), self.get(0, 1)],
            [self.get(1, 0), self.get(1, 1)],
        ])
    }
}

impl From<Matrix2x2> for ComplexMatrix {
    fn from(m: Matrix2x2) -> Self {
        ComplexMatrix {
            rows: 2,
            cols: 2,
            data: vec![m[0][0], m[0][1], m[1][0], m[1][1]],
        }
    }
}

/// Kronecker product of two state vectors: `a ⊗ b`, `a` on the high bits.
pub fn tensor_vectors(a: &[Complex], b: &[Complex]) -> Vec<Complex> {
    a.iter()
        .flat_map(|&x| b.iter().map(move |&y| x * y))
        .collect()
}
