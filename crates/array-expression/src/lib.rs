//! Infix formula parser and elementwise evaluator.
//!
//! # Overview
//!
//! Formulas such as `a + sqrt(b) * 2.5e-1` are parsed once into an
//! [`Expression`], a postfix program, and then evaluated any number of times
//! against variable bindings. Variables may be bound to scalars or to whole
//! numeric arrays; every operator and function works elementwise.
//!
//! # Example
//!
//! ```
//! use array_expression::{Parser, Value, Vars};
//!
//! let expr = Parser::new().parse("a * 2 + b").unwrap();
//! assert_eq!(expr.variables(), vec!["a", "b"]);
//!
//! let mut vars = Vars::new();
//! vars.set("a", vec![1.0, 2.0, 3.0]);
//! vars.set("b", 0.5);
//!
//! let result = expr.evaluate(&vars).unwrap();
//! assert_eq!(result, Value::from(vec![2.5, 4.5, 6.5]));
//! ```

pub mod array;
pub mod error;
pub mod expression;
pub mod number;
pub mod operators;
pub mod parser;
mod scanner;
pub mod token;
pub mod value;
pub mod vars;

pub use array::Array;
pub use error::{Error, EvalError, ParseError, ParseErrorKind};
pub use expression::Expression;
pub use number::Number;
pub use operators::{BinaryOp, UnaryOp};
pub use parser::{Parser, ParserOptions};
pub use token::{Literal, Token};
pub use value::{Function, Value};
pub use vars::{Bindings, Vars};
