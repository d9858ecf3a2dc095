//! Shunting-yard parser producing postfix [`Expression`]s.

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::expression::Expression;
use crate::number::Number;
use crate::operators::{
    BinaryOp, UnaryOp, CALL_PRIORITY, FUNCTION_PRIORITY, NEGATE_PRIORITY, PAREN_BIAS,
};
use crate::scanner::{Lexeme, Scanner};
use crate::token::{Literal, Token};
use crate::value::Value;
use crate::vars::Bindings;
use bitflags::bitflags;

bitflags! {
    /// Token classes allowed at the current position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Expected: u8 {
        const PRIMARY = 1;
        const OPERATOR = 1 << 1;
        const FUNCTION = 1 << 2;
        const LPAREN = 1 << 3;
        const RPAREN = 1 << 4;
        const SIGN = 1 << 5;
        const CALL = 1 << 6;
        const NULLARY_CALL = 1 << 7;
    }
}

impl Expected {
    /// Start of an operand.
    const OPERAND: Expected = Expected::PRIMARY
        .union(Expected::LPAREN)
        .union(Expected::FUNCTION)
        .union(Expected::SIGN);
}

/// Options for [`Parser`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// Characters that would delimit string literals. Accepted for interface
    /// compatibility; string literals are not part of the grammar.
    pub string_literal_quotes: Vec<char>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            string_literal_quotes: vec!['\'', '"'],
        }
    }
}

/// Compiles infix formulas into reusable [`Expression`]s.
///
/// A `Parser` holds no scan state between calls, so one instance can parse
/// any number of sources, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Parser { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `src` into a postfix program.
    pub fn parse(&self, src: &str) -> Result<Expression, ParseError> {
        let result = ShuntingYard::new(src).run();
        match &result {
            Ok(expr) => log::debug!(
                "parsed {:?} into {} tokens ({} variables)",
                src,
                expr.tokens().len(),
                expr.variables().len()
            ),
            Err(e) => log::debug!("{}", e),
        }
        result
    }

    /// Parses `src` and evaluates it once against `bindings`.
    pub fn evaluate<B>(&self, src: &str, bindings: &B) -> Result<Value, Error>
    where
        B: Bindings + ?Sized,
    {
        Ok(self.parse(src)?.evaluate(bindings)?)
    }
}

/// Operator waiting on the operator stack.
struct Pending {
    token: Token,
    priority: i32,
}

/// State of a single parse.
struct ShuntingYard<'a> {
    scanner: Scanner<'a>,
    output: Vec<Token>,
    operators: Vec<Pending>,
    /// Open parentheses.
    depth: usize,
    expected: Expected,
    /// Operands consumed by the operators emitted so far.
    arity: usize,
}

impl<'a> ShuntingYard<'a> {
    fn new(src: &'a str) -> Self {
        ShuntingYard {
            scanner: Scanner::new(src),
            output: Vec::new(),
            operators: Vec::new(),
            depth: 0,
            expected: Expected::OPERAND,
            arity: 0,
        }
    }

    fn bias(&self) -> i32 {
        PAREN_BIAS * self.depth as i32
    }

    fn syntax_error(&self, byte_pos: usize, message: &str) -> ParseError {
        self.scanner.error(ParseErrorKind::Syntax, byte_pos, message)
    }

    fn expect(&self, class: Expected, byte_pos: usize, message: &str) -> Result<(), ParseError> {
        if self.expected.intersects(class) {
            Ok(())
        } else {
            Err(self.syntax_error(byte_pos, message))
        }
    }

    fn emit(&mut self, token: Token) {
        log::trace!("emit {}", token);
        self.output.push(token);
    }

    /// Moves every pending operator that binds at least as tightly as
    /// `priority` to the output, then queues `token`.
    fn add_operator(&mut self, token: Token, priority: i32) {
        let priority = priority + self.bias();
        while let Some(top) = self.operators.last() {
            if top.priority < priority {
                break;
            }
            if let Some(top) = self.operators.pop() {
                self.emit(top.token);
            }
        }
        self.operators.push(Pending { token, priority });
    }

    fn run(mut self) -> Result<Expression, ParseError> {
        while let Some(spanned) = self.scanner.next() {
            let spanned = spanned?;
            let start = spanned.start;
            match spanned.lexeme {
                Lexeme::Operator { symbol, priority, op } => {
                    self.operator(start, symbol, priority, op)?
                }
                Lexeme::Number(n) => {
                    self.expect(Expected::PRIMARY, start, "unexpected number")?;
                    self.emit(Token::Number(Literal::Number(n)));
                    self.expected = Expected::OPERATOR | Expected::RPAREN;
                }
                Lexeme::Constant(value) => {
                    self.expect(Expected::PRIMARY, start, "unexpected constant")?;
                    self.emit(Token::Number(Literal::Number(Number::Float(value))));
                    self.expected = Expected::OPERATOR | Expected::RPAREN;
                }
                Lexeme::LeftParen => self.left_paren(start)?,
                Lexeme::RightParen => self.right_paren(start)?,
                Lexeme::BinaryFunction(op) => {
                    self.expect(Expected::FUNCTION, start, "unexpected function")?;
                    self.add_operator(Token::BinaryOp(op), FUNCTION_PRIORITY);
                    self.arity += 2;
                    self.expected = Expected::LPAREN;
                }
                Lexeme::UnaryFunction(op) => {
                    self.expect(Expected::FUNCTION, start, "unexpected function")?;
                    self.add_operator(Token::UnaryOp(op), FUNCTION_PRIORITY);
                    self.arity += 1;
                    self.expected = Expected::LPAREN;
                }
                Lexeme::Variable(name) => {
                    self.expect(Expected::PRIMARY, start, "unexpected variable")?;
                    self.emit(Token::Variable(name.to_string()));
                    self.expected = Expected::OPERATOR | Expected::RPAREN | Expected::CALL;
                }
            }
        }
        self.finish()
    }

    fn operator(
        &mut self,
        start: usize,
        symbol: &str,
        priority: i32,
        op: BinaryOp,
    ) -> Result<(), ParseError> {
        if self.expected.contains(Expected::SIGN) && (symbol == "-" || symbol == "+") {
            // Prefix operators have no left operand to resolve against.
            if symbol == "-" {
                self.operators.push(Pending {
                    token: Token::UnaryOp(UnaryOp::Negate),
                    priority: NEGATE_PRIORITY + self.bias(),
                });
                self.arity += 1;
            }
        } else {
            self.expect(Expected::OPERATOR, start, "unexpected operator")?;
            self.add_operator(Token::BinaryOp(op), priority);
            self.arity += 2;
        }
        self.expected = Expected::OPERAND;
        Ok(())
    }

    fn left_paren(&mut self, start: usize) -> Result<(), ParseError> {
        self.expect(Expected::LPAREN | Expected::CALL, start, "unexpected \"(\"")?;
        self.depth += 1;
        if self.expected.contains(Expected::CALL) {
            self.add_operator(Token::Call, CALL_PRIORITY);
            self.arity += 2;
        }
        self.expected = Expected::OPERAND | Expected::NULLARY_CALL;
        Ok(())
    }

    fn right_paren(&mut self, start: usize) -> Result<(), ParseError> {
        if self.depth == 0 {
            return Err(self.syntax_error(start, "unmatched \")\""));
        }
        self.depth -= 1;
        if self.expected.contains(Expected::NULLARY_CALL) {
            self.emit(Token::Number(Literal::NoArgs));
        } else {
            self.expect(Expected::RPAREN, start, "unexpected \")\"")?;
        }
        self.expected = Expected::OPERATOR | Expected::RPAREN | Expected::LPAREN | Expected::CALL;
        Ok(())
    }

    fn finish(mut self) -> Result<Expression, ParseError> {
        let end = self.scanner.source().len();
        if self.depth > 0 {
            return Err(self.syntax_error(end, "unmatched \"()\""));
        }
        while let Some(pending) = self.operators.pop() {
            self.emit(pending.token);
        }
        if self.arity + 1 != self.output.len() {
            return Err(self.syntax_error(end, "parity"));
        }
        Ok(Expression::new(self.output))
    }
}
