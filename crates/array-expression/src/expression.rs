//! Compiled expressions and the stack machine that runs them.

use crate::array::Array;
use crate::error::EvalError;
use crate::token::{Literal, Token};
use crate::value::Value;
use crate::vars::Bindings;
use std::fmt;

/// A parsed formula: an immutable postfix program.
///
/// Evaluation only reads the token list, so one `Expression` can be shared
/// across threads and evaluated against any number of bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    tokens: Vec<Token>,
}

/// Stack slot: a value, or the empty argument list of a nullary call.
enum Operand {
    Value(Value),
    NoArgs,
}

/// Pops an operand as a value. An empty argument list outside a call reads
/// as an empty array.
fn pop_value(stack: &mut Vec<Operand>) -> Result<Value, EvalError> {
    match stack.pop() {
        Some(Operand::Value(v)) => Ok(v),
        Some(Operand::NoArgs) => Ok(Value::Array(Array::from_vec(Vec::new()))),
        None => Err(EvalError::InvalidExpression("stack underflow")),
    }
}

impl Expression {
    /// Wraps a postfix token list. Lists not produced by the parser are
    /// checked during evaluation.
    pub fn new(tokens: Vec<Token>) -> Self {
        Expression { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Distinct variable names, in order of first occurrence.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Variable(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Runs the program against `bindings`.
    pub fn evaluate<B>(&self, bindings: &B) -> Result<Value, EvalError>
    where
        B: Bindings + ?Sized,
    {
        let result = self.run(bindings);
        match &result {
            Ok(value) => log::trace!("{} => {}", self, value),
            Err(e) => log::debug!("evaluating {} failed: {}", self, e),
        }
        result
    }

    fn run<B>(&self, bindings: &B) -> Result<Value, EvalError>
    where
        B: Bindings + ?Sized,
    {
        let mut stack: Vec<Operand> = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            match token {
                Token::Number(Literal::Number(n)) => stack.push(Operand::Value(Value::Scalar(*n))),
                Token::Number(Literal::NoArgs) => stack.push(Operand::NoArgs),
                Token::Variable(name) => {
                    let value = bindings
                        .lookup(name)
                        .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
                    stack.push(Operand::Value(value.clone()));
                }
                Token::UnaryOp(op) => {
                    let operand = pop_value(&mut stack)?;
                    stack.push(Operand::Value(op.apply(operand)?));
                }
                Token::BinaryOp(op) => {
                    let right = pop_value(&mut stack)?;
                    let left = pop_value(&mut stack)?;
                    stack.push(Operand::Value(op.apply(left, right)?));
                }
                Token::Call => {
                    let arg = stack
                        .pop()
                        .ok_or(EvalError::InvalidExpression("stack underflow"))?;
                    let f = match pop_value(&mut stack)? {
                        Value::Function(f) => f,
                        other => return Err(EvalError::NotAFunction(other.describe())),
                    };
                    let result = match arg {
                        Operand::NoArgs => f.call(&[])?,
                        Operand::Value(v) => f.call(std::slice::from_ref(&v))?,
                    };
                    stack.push(Operand::Value(result));
                }
            }
        }
        match stack.len() {
            1 => pop_value(&mut stack),
            0 => Err(EvalError::InvalidExpression("empty")),
            _ => Err(EvalError::InvalidExpression("parity")),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
