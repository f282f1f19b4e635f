use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result, Shape};
use crate::math::matrix::Matrix;

/// A fixed-length sequence of `f64` values.
///
/// Every arithmetic method is pure and returns a new vector. The only
/// mutating primitives are [`Vector::map_mut`], [`Vector::randomize`] and
/// indexed writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    values: Vec<f64>,
}

impl Vector {
    pub fn new(values: Vec<f64>) -> Vector {
        Vector { values }
    }

    pub fn filled(len: usize, value: f64) -> Vector {
        Vector { values: vec![value; len] }
    }

    pub fn zeros(len: usize) -> Vector {
        Vector::filled(len, 0.0)
    }

    /// Builds a vector element by element from its index.
    pub fn from_fn<F>(len: usize, f: F) -> Vector
    where
        F: FnMut(usize) -> f64,
    {
        Vector { values: (0..len).map(f).collect() }
    }

    /// A vector of length `len` with a one at `hot` and zeros elsewhere.
    pub fn one_hot(len: usize, hot: usize) -> Result<Vector> {
        if hot >= len {
            return Err(NnError::InvalidIndex { index: hot, count: len });
        }
        let mut v = Vector::zeros(len);
        v.values[hot] = 1.0;
        Ok(v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn shape(&self) -> Shape {
        Shape::vector(self.len())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Combines two equal-length vectors element by element.
    pub(crate) fn zip_with<F>(&self, other: &Vector, op: &'static str, f: F) -> Result<Vector>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.len() != other.len() {
            return Err(NnError::mismatch(op, self.shape(), other.shape()));
        }
        Ok(Vector {
            values: self.values.iter().zip(other.values.iter()).map(|(a, b)| f(*a, *b)).collect(),
        })
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector subtract", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn mul(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector multiply", |a, b| a * b)
    }

    pub fn div(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "vector divide", |a, b| a / b)
    }

    pub fn scale(&self, scalar: f64) -> Vector {
        self.map(|x| x * scalar)
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        if self.len() != other.len() {
            return Err(NnError::mismatch("dot product", self.shape(), other.shape()));
        }
        Ok(self.values.iter().zip(other.values.iter()).map(|(a, b)| a * b).sum())
    }

    /// Returns a new vector with `f` applied to every element.
    pub fn map<F>(&self, f: F) -> Vector
    where
        F: Fn(f64) -> f64,
    {
        Vector { values: self.values.iter().map(|x| f(*x)).collect() }
    }

    /// Applies `f` to every element in place and returns `self` for chaining.
    pub fn map_mut<F>(&mut self, mut f: F) -> &mut Vector
    where
        F: FnMut(f64) -> f64,
    {
        for x in self.values.iter_mut() {
            *x = f(*x);
        }
        self
    }

    /// Overwrites every element with an independent draw from `[0, multiplier)`,
    /// rounded to the nearest integer when `round` is set.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, multiplier: f64, round: bool) -> &mut Vector {
        self.map_mut(|_| {
            let v = rng.gen::<f64>() * multiplier;
            if round { v.round() } else { v }
        })
    }

    /// Views the vector as a single-column matrix.
    pub fn to_column(&self) -> Matrix {
        Matrix::column(self)
    }

    /// Index of the largest element; `None` for an empty vector.
    pub fn argmax(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.len() as f64
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Vector {
        Vector::new(values)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.values[index]
    }
}

/// Parses a comma-separated list of floats, e.g. `"0.5, 1,-2e-3"`.
impl FromStr for Vector {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Vector> {
        if s.trim().is_empty() {
            return Err(NnError::parse(s, "empty vector"));
        }
        s.split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>().map_err(|e| NnError::parse(part, e))
            })
            .collect::<Result<Vec<f64>>>()
            .map(Vector::new)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn add_is_element_wise() {
        let a = Vector::new(vec![1.0, 2.0, 3.0]);
        let b = Vector::new(vec![0.5, -2.0, 10.0]);
        let sum = a.add(&b).unwrap();
        for i in 0..a.len() {
            assert_eq!(sum[i], a[i] + b[i]);
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = Vector::zeros(3);
        let b = Vector::zeros(4);
        assert!(matches!(a.add(&b), Err(NnError::DimensionMismatch { .. })));
        assert!(matches!(a.mul(&b), Err(NnError::DimensionMismatch { .. })));
        assert!(matches!(a.dot(&b), Err(NnError::DimensionMismatch { .. })));
    }

    #[test]
    fn dot_sums_pairwise_products() {
        let a = Vector::new(vec![1.0, 2.0, 3.0]);
        let b = Vector::new(vec![4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 32.0);
    }

    #[test]
    fn map_mut_chains_and_map_does_not_mutate() {
        let mut v = Vector::new(vec![1.0, 2.0]);
        let doubled = v.map(|x| x * 2.0);
        assert_eq!(v.as_slice(), &[1.0, 2.0]);
        assert_eq!(doubled.as_slice(), &[2.0, 4.0]);

        v.map_mut(|x| x + 1.0).map_mut(|x| x * 10.0);
        assert_eq!(v.as_slice(), &[20.0, 30.0]);
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut v = Vector::zeros(200);
        v.randomize(&mut rng, 5.0, false);
        assert!(v.iter().all(|x| (0.0..5.0).contains(x)));

        v.randomize(&mut rng, 5.0, true);
        assert!(v.iter().all(|x| x.fract() == 0.0 && (0.0..=5.0).contains(x)));
    }

    #[test]
    fn parses_comma_separated_floats() {
        let v: Vector = "0.5, 1,-2e-3".parse().unwrap();
        assert_eq!(v.as_slice(), &[0.5, 1.0, -0.002]);

        assert!(matches!("1,abc".parse::<Vector>(), Err(NnError::Parse { .. })));
        assert!(matches!("".parse::<Vector>(), Err(NnError::Parse { .. })));
    }

    #[test]
    fn one_hot_and_argmax() {
        let v = Vector::one_hot(10, 7).unwrap();
        assert_eq!(v.argmax(), Some(7));
        assert_eq!(v.iter().sum::<f64>(), 1.0);
        assert!(Vector::one_hot(3, 3).is_err());
    }
}
