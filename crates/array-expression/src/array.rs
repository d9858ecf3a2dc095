//! Dense n-dimensional `f64` arrays with elementwise operations.

use crate::error::EvalError;
use std::fmt;

/// Row-major array. A shape of `[]` denotes a 0-d array holding one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Array {
    /// Builds an array, checking that `data` fills `shape` exactly.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, EvalError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(EvalError::InvalidArray {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Array { shape, data })
    }

    /// One-dimensional array over `data`.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Array {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Array {
        Array {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Applies `f` to every element paired with `scalar`, on the side given
    /// by `scalar_on_left`.
    pub fn map_scalar(&self, scalar: f64, scalar_on_left: bool, f: impl Fn(f64, f64) -> f64) -> Array {
        if scalar_on_left {
            self.map(|x| f(scalar, x))
        } else {
            self.map(|x| f(x, scalar))
        }
    }

    /// Elementwise combination of two arrays.
    ///
    /// Shapes must match, unless one side holds a single element, in which
    /// case that element is applied against every element of the other side.
    pub fn broadcast(&self, other: &Array, f: impl Fn(f64, f64) -> f64) -> Result<Array, EvalError> {
        if self.shape == other.shape {
            return Ok(Array {
                shape: self.shape.clone(),
                data: self
                    .data
                    .iter()
                    .zip(other.data.iter())
                    .map(|(&a, &b)| f(a, b))
                    .collect(),
            });
        }
        if other.data.len() == 1 && other.shape.len() <= self.shape.len() {
            return Ok(self.map_scalar(other.data[0], false, f));
        }
        if self.data.len() == 1 && self.shape.len() <= other.shape.len() {
            return Ok(other.map_scalar(self.data[0], true, f));
        }
        Err(EvalError::ShapeMismatch {
            left: self.shape.clone(),
            right: other.shape.clone(),
        })
    }
}

impl From<Vec<f64>> for Array {
    fn from(data: Vec<f64>) -> Self {
        Array::from_vec(data)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(
            f: &mut fmt::Formatter<'_>,
            shape: &[usize],
            data: &[f64],
        ) -> fmt::Result {
            let Some((&n, rest)) = shape.split_first() else {
                return write!(f, "{:?}", data[0]);
            };
            let stride: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..n {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_level(f, rest, &data[i * stride..(i + 1) * stride])?;
            }
            write!(f, "]")
        }
        write_level(f, &self.shape, &self.data)
    }
}
