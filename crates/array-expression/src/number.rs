//! Scalar arithmetic.
//!
//! Integers stay integers through `+ - * %` and non-negative integer powers
//! as long as the result fits in an `i64`; anything else is carried out in
//! `f64`. Division is always true division.

use std::fmt;

#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(i as f64))),
            Number::Float(f) => Number::Float(-f),
        }
    }

    pub fn abs(self) -> Number {
        match self {
            Number::Int(i) => i
                .checked_abs()
                .map(Number::Int)
                .unwrap_or(Number::Float((i as f64).abs())),
            Number::Float(f) => Number::Float(f.abs()),
        }
    }

    pub fn add(self, rhs: Number) -> Number {
        int_or_float(self, rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(self, rhs: Number) -> Number {
        int_or_float(self, rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(self, rhs: Number) -> Number {
        int_or_float(self, rhs, i64::checked_mul, |a, b| a * b)
    }

    pub fn div(self, rhs: Number) -> Number {
        Number::Float(self.as_f64() / rhs.as_f64())
    }

    pub fn rem(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(_), Number::Int(0)) => Number::Float(f64::NAN),
            (Number::Int(a), Number::Int(b)) => match a.checked_rem(b) {
                Some(r) if r != 0 && (r < 0) != (b < 0) => Number::Int(r + b),
                Some(r) => Number::Int(r),
                None => Number::Int(0),
            },
            (a, b) => Number::Float(floor_mod(a.as_f64(), b.as_f64())),
        }
    }

    pub fn pow(self, rhs: Number) -> Number {
        if let (Number::Int(base), Number::Int(exp)) = (self, rhs) {
            if let Ok(exp) = u32::try_from(exp) {
                if let Some(v) = base.checked_pow(exp) {
                    return Number::Int(v);
                }
            }
        }
        Number::Float(self.as_f64().powf(rhs.as_f64()))
    }
}

fn int_or_float(
    lhs: Number,
    rhs: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Number {
    if let (Number::Int(a), Number::Int(b)) = (lhs, rhs) {
        if let Some(v) = int_op(a, b) {
            return Number::Int(v);
        }
    }
    Number::Float(float_op(lhs.as_f64(), rhs.as_f64()))
}

/// Remainder with the sign of the divisor.
pub(crate) fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i64::from(i))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}
