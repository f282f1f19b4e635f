use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{NnError, Result, Shape};
use crate::math::vector::Vector;

/// A dense, row-major `rows × cols` matrix.
///
/// Every row holds exactly `cols` values. Matrices built from data or
/// deserialized have at least one row and one column; the sized
/// constructors (`zeros`, `filled`, `identity`, `random`, `column`) take
/// their dimensions as given, so a zero size yields an empty matrix. Arithmetic returns new matrices; only [`Matrix::map_mut`],
/// [`Matrix::randomize`] and indexed writes mutate in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

/// Unchecked wire form; converted through [`Matrix::from_data`] so that
/// deserialized matrices obey the same invariants as constructed ones.
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = NnError;

    fn try_from(raw: RawMatrix) -> Result<Matrix> {
        let m = Matrix::from_data(raw.data)?;
        if m.rows != raw.rows || m.cols != raw.cols {
            return Err(NnError::InvalidShape(format!(
                "declared {}x{} but data is {}x{}",
                raw.rows, raw.cols, m.rows, m.cols
            )));
        }
        Ok(m)
    }
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        }
    }

    pub fn identity(size: usize) -> Matrix {
        let mut res = Matrix::zeros(size, size);
        for i in 0..size {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// A `rows × cols` matrix with every element drawn from `[0, multiplier)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R, multiplier: f64) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.randomize(rng, multiplier, false);
        res
    }

    /// Builds a matrix from row data, rejecting empty or ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(NnError::InvalidShape("matrix must have at least one row and one column".into()));
        }
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(NnError::InvalidShape(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                cols
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A single-column matrix holding `v`.
    pub fn column(v: &Vector) -> Matrix {
        Matrix {
            rows: v.len(),
            cols: 1,
            data: v.iter().map(|x| vec![*x]).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index]
    }

    pub fn column_vector(&self, index: usize) -> Vector {
        Vector::from_fn(self.rows, |r| self.data[r][index])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Reads the matrix column-major back into a flat vector. For a
    /// single-column matrix this undoes [`Matrix::column`].
    pub fn to_vector(&self) -> Vector {
        Vector::from_fn(self.rows * self.cols, |i| self.data[i % self.rows][i / self.rows])
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Standard matrix product. Each output cell `(r, c)` is the dot product
    /// of row `r` of `self` and column `c` of `rhs`; `rhs` is transposed first
    /// so both operands are walked row by row.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::mismatch("matrix multiply", self.shape(), rhs.shape()));
        }

        let rhs_t = rhs.transpose();
        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            let left = &self.data[i];
            for j in 0..res.cols {
                res.data[i][j] = left.iter().zip(rhs_t.data[j].iter()).map(|(a, b)| a * b).sum();
            }
        }

        Ok(res)
    }

    /// Matrix × vector, treating `v` as a single column.
    pub fn mul_vector(&self, v: &Vector) -> Result<Vector> {
        if self.cols != v.len() {
            return Err(NnError::mismatch("matrix-vector multiply", self.shape(), v.shape()));
        }
        Ok(self.matmul(&v.to_column())?.to_vector())
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(NnError::mismatch(op, self.shape(), rhs.shape()));
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| f(*x, *y)).collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix subtract", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product; see [`Matrix::matmul`] for the
    /// matrix product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix element-wise multiply", |a, b| a * b)
    }

    pub fn div(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "matrix divide", |a, b| a / b)
    }

    pub fn scale(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|x| functor(*x)).collect())
                .collect(),
        }
    }

    /// Applies `functor` to every element in place and returns `self`.
    pub fn map_mut<F>(&mut self, mut functor: F) -> &mut Matrix
    where
        F: FnMut(f64) -> f64,
    {
        for row in self.data.iter_mut() {
            for x in row.iter_mut() {
                *x = functor(*x);
            }
        }
        self
    }

    /// Overwrites every element with an independent draw from
    /// `[0, multiplier)`, optionally rounded to the nearest integer.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, multiplier: f64, round: bool) -> &mut Matrix {
        self.map_mut(|_| {
            let v = rng.gen::<f64>() * multiplier;
            if round { v.round() } else { v }
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row][col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix ({}x{})", self.rows, self.cols)?;
        for row in &self.data {
            writeln!(f, "{}", Vector::new(row.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn sized_constructors_allow_empty_but_data_does_not() {
        assert_eq!(Matrix::zeros(0, 3).shape(), Shape::new(0, 3));
        assert!(serde_json::from_str::<Matrix>(r#"{"rows":0,"cols":0,"data":[]}"#).is_err());
    }

    #[test]
    fn from_data_rejects_ragged_and_empty_rows() {
        assert!(matches!(Matrix::from_data(vec![]), Err(NnError::InvalidShape(_))));
        assert!(matches!(Matrix::from_data(vec![vec![]]), Err(NnError::InvalidShape(_))));
        assert!(matches!(
            Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(NnError::InvalidShape(_))
        ));
    }

    #[test]
    fn transpose_swaps_indices_and_round_trips() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = Matrix::random(3, 5, &mut rng, 10.0);
        let t = a.transpose();
        assert_eq!(t.shape(), Shape::new(5, 3));
        for r in 0..3 {
            for c in 0..5 {
                assert_eq!(t[(c, r)], a[(r, c)]);
            }
        }
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn matmul_matches_row_column_dot_products() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);
        let y = a.matmul(&b).unwrap();
        assert_eq!(y, m(vec![vec![58.0, 64.0], vec![139.0, 154.0]]));

        let mut rng = StdRng::seed_from_u64(5);
        let a = Matrix::random(4, 3, &mut rng, 1.0);
        let b = Matrix::random(3, 6, &mut rng, 1.0);
        let y = a.matmul(&b).unwrap();
        assert_eq!(y.shape(), Shape::new(4, 6));
        for r in 0..4 {
            for c in 0..6 {
                let expected = Vector::new(a.row(r).to_vec()).dot(&b.column_vector(c)).unwrap();
                assert!((y[(r, c)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn identity_is_neutral() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(Matrix::identity(3).matmul(&a).unwrap(), a);
        assert_eq!(a.matmul(&Matrix::identity(2)).unwrap(), a);
    }

    #[test]
    fn matrix_times_vector_uses_column_view() {
        let a = m(vec![vec![58.0, 64.0], vec![139.0, 154.0]]);
        let v = Vector::new(vec![1.0, 2.0]);
        assert_eq!(a.mul_vector(&v).unwrap().as_slice(), &[186.0, 447.0]);
        assert!(matches!(
            a.mul_vector(&Vector::zeros(3)),
            Err(NnError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn shape_mismatch_is_an_error_not_a_truncation() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 2);
        assert!(matches!(a.add(&b), Err(NnError::DimensionMismatch { .. })));
        assert!(matches!(a.hadamard(&b), Err(NnError::DimensionMismatch { .. })));
        assert!(matches!(a.matmul(&a), Err(NnError::DimensionMismatch { .. })));
    }

    #[test]
    fn element_wise_ops_and_scale() {
        let a = m(vec![vec![2.0, 4.0], vec![6.0, 8.0]]);
        let b = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(a.sub(&b).unwrap(), b);
        assert_eq!(a.div(&b).unwrap(), Matrix::filled(2, 2, 2.0));
        assert_eq!(b.hadamard(&b).unwrap(), m(vec![vec![1.0, 4.0], vec![9.0, 16.0]]));
        assert_eq!(b.scale(2.0), a);
    }

    #[test]
    fn deserialization_validates_shape() {
        let ok: Matrix = serde_json::from_str(r#"{"rows":1,"cols":2,"data":[[1.0,2.0]]}"#).unwrap();
        assert_eq!(ok.shape(), Shape::new(1, 2));
        assert!(serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[[1.0,2.0],[3.0]]}"#).is_err());
        assert!(serde_json::from_str::<Matrix>(r#"{"rows":3,"cols":2,"data":[[1.0,2.0]]}"#).is_err());
    }

    #[test]
    fn column_round_trips_through_to_vector() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        let c = v.to_column();
        assert_eq!(c.shape(), Shape::new(3, 1));
        assert_eq!(c.to_vector(), v);
    }
}
