use thiserror::Error;

/// Which stage of parsing rejected the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unknown character or malformed number.
    Lex,
    /// Token in a position the grammar does not allow, unmatched
    /// parentheses, or an operator/operand count mismatch.
    Syntax,
}

/// A rejected expression source.
///
/// `column` is a 0-based character offset into `expression`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("parse error [column {column}]: {message}, expression: {expression}")]
pub struct ParseError {
    kind: ParseErrorKind,
    column: usize,
    message: String,
    expression: String,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        column: usize,
        message: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        ParseError {
            kind,
            column,
            message: message.into(),
            expression: expression.into(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_lex(&self) -> bool {
        self.kind == ParseErrorKind::Lex
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ParseErrorKind::Syntax
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("{0} is not a function")]
    NotAFunction(String),

    #[error("invalid expression ({0})")]
    InvalidExpression(&'static str),

    #[error("operands could not be broadcast together with shapes {left:?} {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("array of shape {shape:?} needs {expected} elements, got {actual}")]
    InvalidArray {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported operand for {op}: {operand}")]
    UnsupportedOperand { op: &'static str, operand: String },

    #[error("cannot bind {0} as a numeric value")]
    InvalidValue(String),

    #[error("{0}")]
    Function(String),
}

/// Either stage failing in a one-shot parse-and-evaluate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
