use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// Rows are examples and columns are features everywhere in this crate, so a
/// batch of 32 four-dimensional inputs is a 32×4 matrix.
///
/// Deserialization goes through `from_vec`, so a stored buffer whose length
/// disagrees with `rows * cols` is rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

/// Unchecked wire form of `Matrix`.
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = Error;

    fn try_from(raw: RawMatrix) -> Result<Matrix> {
        Matrix::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl Matrix {
    // ── Construction ────────────────────────────────────────────────────────

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Wraps a flat row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        match rows.checked_mul(cols) {
            Some(len) if len == data.len() => Ok(Matrix { rows, cols, data }),
            _ => Err(Error::shape("matrix buffer", rows.saturating_mul(cols), data.len())),
        }
    }

    /// Builds a matrix from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::shape("matrix row", cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix { rows: rows.len(), cols, data })
    }

    /// An n×1 column, the usual shape for class-index labels.
    pub fn column(values: Vec<f64>) -> Matrix {
        Matrix { rows: values.len(), cols: 1, data: values }
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// Meant for ReLU-family layers. `rows` is the fan-in because weights are
    /// stored input × output.
    pub fn he(rows: usize, cols: usize, rng: &mut impl Rng) -> Matrix {
        Matrix::gaussian(rows, cols, (2.0 / rows.max(1) as f64).sqrt(), rng)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / rows)).
    ///
    /// Meant for Sigmoid, Tanh and Identity layers.
    pub fn xavier(rows: usize, cols: usize, rng: &mut impl Rng) -> Matrix {
        Matrix::gaussian(rows, cols, (1.0 / rows.max(1) as f64).sqrt(), rng)
    }

    fn gaussian(rows: usize, cols: usize, std_dev: f64, rng: &mut impl Rng) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| sample_standard_normal(rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    // ── Access ──────────────────────────────────────────────────────────────

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Fails with the first differing dimension, rows before columns, with
    /// `self` as the expected side.
    pub fn check_same_shape(&self, other: &Matrix, what: &'static str) -> Result<()> {
        if other.rows != self.rows {
            return Err(Error::shape(what, self.rows, other.rows));
        }
        if other.cols != self.cols {
            return Err(Error::shape(what, self.cols, other.cols));
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Copies the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix { rows: indices.len(), cols: self.cols, data }
    }

    // ── Arithmetic ──────────────────────────────────────────────────────────

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::shape("matmul inner dimension", self.cols, rhs.rows));
        }
        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                let rhs_row = rhs.row(k);
                let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
                for (o, b) in out.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        Ok(res)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "hadamard product", |a, b| a * b)
    }

    /// Adds a 1×cols row to every row, the bias step of a dense layer.
    pub fn add_row_broadcast(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(Error::shape("broadcast row width", self.cols, row.cols));
        }
        let mut res = self.clone();
        for chunk in res.data.chunks_mut(self.cols.max(1)) {
            for (x, b) in chunk.iter_mut().zip(&row.data) {
                *x += b;
            }
        }
        Ok(res)
    }

    // ── Reductions ──────────────────────────────────────────────────────────

    /// Column sums as a 1×cols row.
    pub fn sum_rows(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for chunk in self.data.chunks(self.cols.max(1)) {
            for (acc, x) in res.data.iter_mut().zip(chunk) {
                *acc += x;
            }
        }
        res
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Index of the largest entry in each row.
    pub fn argmax_rows(&self) -> Vec<usize> {
        (0..self.rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(j, _)| j)
                    .unwrap_or(0)
            })
            .collect()
    }

    fn zip_with<F>(&self, rhs: &Matrix, what: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_shape(rhs, what)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| f(a, b)).collect(),
        })
    }
}

/// Box-Muller sample from N(0, 1).
fn sample_standard_normal(rng: &mut impl Rng) -> f64 {
    // Shift to (0, 1] so ln() never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![5.0], vec![6.0]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.as_slice(), &[17.0, 39.0]);
        assert!(b.matmul(&b).is_err());
    }

    #[test]
    fn test_transpose_and_broadcast() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(0), &[1.0, 4.0]);

        let bias = Matrix::from_rows(&[vec![10.0, 20.0, 30.0]]).unwrap();
        let shifted = a.add_row_broadcast(&bias).unwrap();
        assert_eq!(shifted.row(1), &[14.0, 25.0, 36.0]);
        assert_eq!(a.sum_rows().as_slice(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_argmax_rows_and_select() {
        let a = Matrix::from_rows(&[vec![0.1, 0.9], vec![0.7, 0.3], vec![0.2, 0.8]]).unwrap();
        assert_eq!(a.argmax_rows(), vec![1, 0, 1]);
        let picked = a.select_rows(&[2, 0]);
        assert_eq!(picked.row(0), &[0.2, 0.8]);
        assert_eq!(picked.row(1), &[0.1, 0.9]);
    }

    #[test]
    fn test_check_same_shape_names_the_differing_dimension() {
        let a = Matrix::zeros(2, 3);
        assert!(a.check_same_shape(&Matrix::zeros(2, 3), "same").is_ok());
        let err = a.check_same_shape(&Matrix::zeros(3, 2), "transposed").unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, got: 3, .. }));
        let err = a.check_same_shape(&Matrix::zeros(2, 5), "wider").unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 3, got: 5, .. }));
    }

    #[test]
    fn test_deserialize_rejects_short_buffer() {
        let err = serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[1.0]}"#).unwrap_err();
        assert!(err.to_string().contains("expected 4, got 1"));

        let huge = r#"{"rows":18446744073709551615,"cols":2,"data":[]}"#;
        assert!(serde_json::from_str::<Matrix>(huge).is_err());

        let ok: Matrix = serde_json::from_str(r#"{"rows":1,"cols":2,"data":[1.0,2.0]}"#).unwrap();
        assert_eq!(ok.row(0), &[1.0, 2.0]);
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(7));
        let b = Matrix::xavier(4, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|x| x.is_finite()));
    }
}
