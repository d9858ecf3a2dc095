use crate::array::Array;
use crate::error::EvalError;
use crate::number::Number;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync;

/// A caller-supplied callable bound to a variable name.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    f: Arc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Function {
            name: Arc::from(name),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.f)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

/// Anything that can sit on the evaluation stack or be bound to a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Number),
    Array(Array),
    Function(Function),
}

impl Value {
    pub fn function<F>(name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, f))
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Scalar(n) => Some(*n),
            _ => None,
        }
    }

    /// Scalar value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Converts a JSON number or a rectangular, arbitrarily nested JSON array
    /// of numbers.
    pub fn from_json(json: &Json) -> Result<Value, EvalError> {
        match json {
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Scalar(Number::Int(i))),
                None => Ok(Value::Scalar(Number::Float(n.as_f64().unwrap_or(f64::NAN)))),
            },
            Json::Array(_) => {
                let mut shape = Vec::new();
                let mut cursor = json;
                while let Json::Array(items) = cursor {
                    shape.push(items.len());
                    match items.first() {
                        Some(first) => cursor = first,
                        None => break,
                    }
                }
                let mut data = Vec::with_capacity(shape.iter().product());
                flatten_json(json, &shape, &mut data)?;
                Ok(Value::Array(Array::new(shape, data)?))
            }
            other => Err(EvalError::InvalidValue(other.to_string())),
        }
    }

    /// Converts back to JSON. Callables have no JSON form. Non-finite floats
    /// become `null`.
    pub fn to_json(&self) -> Option<Json> {
        match self {
            Value::Scalar(Number::Int(i)) => Some(Json::from(*i)),
            Value::Scalar(Number::Float(f)) => Some(float_to_json(*f)),
            Value::Array(a) => {
                fn build(shape: &[usize], data: &[f64]) -> Json {
                    match shape.split_first() {
                        None => float_to_json(data[0]),
                        Some((&n, rest)) => {
                            let stride: usize = rest.iter().product();
                            Json::Array(
                                (0..n)
                                    .map(|i| build(rest, &data[i * stride..(i + 1) * stride]))
                                    .collect(),
                            )
                        }
                    }
                }
                Some(build(a.shape(), a.data()))
            }
            Value::Function(_) => None,
        }
    }

    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Scalar(n) => n.to_string(),
            Value::Array(a) => format!("array{:?}", a.shape()),
            Value::Function(f) => f.name().to_string(),
        }
    }
}

fn float_to_json(f: f64) -> Json {
    serde_json::Number::from_f64(f)
        .map(Json::Number)
        .unwrap_or(Json::Null)
}

fn flatten_json(json: &Json, shape: &[usize], out: &mut Vec<f64>) -> Result<(), EvalError> {
    match (json, shape.split_first()) {
        (Json::Array(items), Some((&n, rest))) if items.len() == n => {
            for item in items {
                flatten_json(item, rest, out)?;
            }
            Ok(())
        }
        (Json::Number(n), None) => {
            out.push(n.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        (other, _) => Err(EvalError::InvalidValue(other.to_string())),
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Scalar(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Number::Float(f))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Number::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Number::from(i))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<f64>> for Value {
    fn from(data: Vec<f64>) -> Self {
        Value::Array(Array::from_vec(data))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(n) => write!(f, "{}", n),
            Value::Array(a) => write!(f, "{}", a),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(3)).unwrap(), Value::from(3));
        assert_eq!(Value::from_json(&json!(2.5)).unwrap(), Value::from(2.5));
    }

    #[test]
    fn test_from_json_nested_array() {
        let v = Value::from_json(&json!([[1, 2, 3], [4, 5, 6]])).unwrap();
        let a = v.as_array().unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_json_rejects_ragged_and_non_numeric() {
        assert!(matches!(
            Value::from_json(&json!([[1, 2], [3]])),
            Err(EvalError::InvalidValue(_))
        ));
        assert!(matches!(
            Value::from_json(&json!("abc")),
            Err(EvalError::InvalidValue(_))
        ));
        assert!(matches!(
            Value::from_json(&json!([1, null])),
            Err(EvalError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_from_json_empty_array() {
        let v = Value::from_json(&json!([])).unwrap();
        assert_eq!(v.as_array().unwrap().shape(), &[0]);
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::from(4).to_json(), Some(json!(4)));
        assert_eq!(Value::from(f64::NAN).to_json(), Some(json!(null)));
        let a = Array::new(vec![2, 1], vec![1.5, 2.5]).unwrap();
        assert_eq!(Value::from(a).to_json(), Some(json!([[1.5], [2.5]])));
        let f = Value::function("f", |_| Ok(Value::from(1)));
        assert_eq!(f.to_json(), None);
    }

    #[test]
    fn test_function_identity() {
        let f = Function::new("f", |_| Ok(Value::from(1)));
        let g = Function::new("f", |_| Ok(Value::from(1)));
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
        assert_eq!(f.call(&[]).unwrap(), Value::from(1));
    }
}
