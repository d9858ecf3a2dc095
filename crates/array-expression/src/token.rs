use crate::number::Number;
use crate::operators::{BinaryOp, UnaryOp};
use std::fmt;

/// Payload of a [`Token::Number`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Number),
    /// Empty argument list of a nullary call such as `f()`.
    NoArgs,
}

/// One instruction of a compiled postfix program.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Literal),
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    Variable(String),
    /// Applies the callable below the top of the stack to the value on top.
    Call,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(Literal::Number(n)) => write!(f, "{}", n),
            Token::Number(Literal::NoArgs) => f.write_str("()"),
            Token::UnaryOp(op) => write!(f, "{}", op),
            Token::BinaryOp(op) => write!(f, "{}", op),
            Token::Variable(name) => f.write_str(name),
            Token::Call => f.write_str("CALL"),
        }
    }
}
