//! Operator, function and constant tables.
//!
//! Names only matter to the scanner; evaluation dispatches on the enums.

use crate::error::EvalError;
use crate::number::{floor_mod, Number};
use crate::value::Value;
use std::fmt;

/// Priority of a prefix `-`.
pub(crate) const NEGATE_PRIORITY: i32 = 5;
/// Priority of a named function (`sqrt`, `abs`, ...).
pub(crate) const FUNCTION_PRIORITY: i32 = 9;
/// Base priority of a call marker, relative to the bias inside its parentheses.
pub(crate) const CALL_PRIORITY: i32 = -1;
/// Bias added per open parenthesis.
pub(crate) const PAREN_BIAS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Sqrt,
    Abs,
    Ln,
    Log10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Infix operator symbols, longest first where prefixes overlap.
pub(crate) const OPERATORS: &[(&str, i32, BinaryOp)] = &[
    ("**", 8, BinaryOp::Power),
    ("^", 8, BinaryOp::Power),
    ("%", 6, BinaryOp::Modulo),
    ("/", 6, BinaryOp::Divide),
    ("\u{2219}", 5, BinaryOp::Multiply),
    ("\u{2022}", 5, BinaryOp::Multiply),
    ("*", 5, BinaryOp::Multiply),
    ("+", 4, BinaryOp::Add),
    ("-", 4, BinaryOp::Subtract),
];

/// Two-argument function table, keyed the same way the infix table is.
const BINARY_FUNCTIONS: &[(&str, BinaryOp)] = &[
    ("+", BinaryOp::Add),
    ("-", BinaryOp::Subtract),
    ("*", BinaryOp::Multiply),
    ("/", BinaryOp::Divide),
    ("%", BinaryOp::Modulo),
    ("^", BinaryOp::Power),
    ("**", BinaryOp::Power),
];

const UNARY_FUNCTIONS: &[(&str, UnaryOp)] = &[
    ("sqrt", UnaryOp::Sqrt),
    ("abs", UnaryOp::Abs),
    ("ln", UnaryOp::Ln),
    ("log10", UnaryOp::Log10),
];

pub(crate) const CONSTANTS: &[(&str, f64)] = &[
    ("E", std::f64::consts::E),
    ("PI", std::f64::consts::PI),
];

impl UnaryOp {
    /// Looks up a named one-argument function, ignoring case.
    pub fn from_name(name: &str) -> Option<UnaryOp> {
        UNARY_FUNCTIONS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|&(_, op)| op)
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Abs => "abs",
            UnaryOp::Ln => "ln",
            UnaryOp::Log10 => "log10",
        }
    }

    fn apply_f64(self, x: f64) -> f64 {
        match self {
            UnaryOp::Negate => -x,
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Abs => x.abs(),
            UnaryOp::Ln => x.ln(),
            UnaryOp::Log10 => x.log10(),
        }
    }

    fn apply_number(self, n: Number) -> Number {
        match self {
            UnaryOp::Negate => n.neg(),
            UnaryOp::Abs => n.abs(),
            _ => Number::Float(self.apply_f64(n.as_f64())),
        }
    }

    /// Applies the function to a scalar, or to every element of an array.
    pub fn apply(self, operand: Value) -> Result<Value, EvalError> {
        match operand {
            Value::Scalar(n) => Ok(Value::Scalar(self.apply_number(n))),
            Value::Array(a) => Ok(Value::Array(a.map(|x| self.apply_f64(x)))),
            Value::Function(f) => Err(EvalError::UnsupportedOperand {
                op: self.name(),
                operand: f.name().to_string(),
            }),
        }
    }
}

impl BinaryOp {
    /// Looks up a two-argument function by table key, ignoring case.
    pub fn from_name(name: &str) -> Option<BinaryOp> {
        BINARY_FUNCTIONS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|&(_, op)| op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "^",
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Modulo => floor_mod(a, b),
            BinaryOp::Power => a.powf(b),
        }
    }

    fn apply_number(self, a: Number, b: Number) -> Number {
        match self {
            BinaryOp::Add => a.add(b),
            BinaryOp::Subtract => a.sub(b),
            BinaryOp::Multiply => a.mul(b),
            BinaryOp::Divide => a.div(b),
            BinaryOp::Modulo => a.rem(b),
            BinaryOp::Power => a.pow(b),
        }
    }

    /// Applies the operator, broadcasting scalars over arrays.
    pub fn apply(self, left: Value, right: Value) -> Result<Value, EvalError> {
        let f = |a: f64, b: f64| self.apply_f64(a, b);
        match (left, right) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(self.apply_number(a, b))),
            (Value::Array(a), Value::Scalar(b)) => {
                Ok(Value::Array(a.map_scalar(b.as_f64(), false, f)))
            }
            (Value::Scalar(a), Value::Array(b)) => {
                Ok(Value::Array(b.map_scalar(a.as_f64(), true, f)))
            }
            (Value::Array(a), Value::Array(b)) => a.broadcast(&b, f).map(Value::Array),
            (Value::Function(func), _) | (_, Value::Function(func)) => {
                Err(EvalError::UnsupportedOperand {
                    op: self.symbol(),
                    operand: func.name().to_string(),
                })
            }
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
