//! Lexeme classification.
//!
//! At each position the classes are tried in a fixed order and the first
//! match wins: operator, number, `(`, `)`, constant, two-argument function
//! name, one-argument function name, variable, whitespace.

use crate::error::{ParseError, ParseErrorKind};
use crate::number::Number;
use crate::operators::{BinaryOp, UnaryOp, CONSTANTS, OPERATORS};
use regex::Regex;
use std::sync::OnceLock;

fn scientific_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)[eE][-+]?[0-9]+")
            .expect("scientific number pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lexeme<'a> {
    Operator {
        symbol: &'static str,
        priority: i32,
        op: BinaryOp,
    },
    Number(Number),
    LeftParen,
    RightParen,
    Constant(f64),
    BinaryFunction(BinaryOp),
    UnaryFunction(UnaryOp),
    Variable(&'a str),
}

/// A lexeme and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned<'a> {
    pub start: usize,
    pub lexeme: Lexeme<'a>,
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Character column of a byte offset.
    pub fn column(&self, byte_pos: usize) -> usize {
        self.src[..byte_pos].chars().count()
    }

    pub fn error(&self, kind: ParseErrorKind, byte_pos: usize, message: &str) -> ParseError {
        ParseError::new(kind, self.column(byte_pos), message, self.src)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn operator(&mut self) -> Option<Lexeme<'a>> {
        let rest = self.rest();
        let &(symbol, priority, op) = OPERATORS.iter().find(|(sym, _, _)| rest.starts_with(sym))?;
        self.pos += symbol.len();
        Some(Lexeme::Operator {
            symbol,
            priority,
            op,
        })
    }

    fn number(&mut self) -> Result<Option<Lexeme<'a>>, ParseError> {
        let rest = self.rest();
        if rest.starts_with('E') {
            return Ok(None);
        }
        if let Some(m) = scientific_regex().find(rest) {
            let value = m
                .as_str()
                .parse::<f64>()
                .map_err(|_| self.error(ParseErrorKind::Lex, self.pos, "malformed number"))?;
            self.pos += m.end();
            return Ok(Some(Lexeme::Number(Number::Float(value))));
        }

        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Ok(None);
        }
        let text = &rest[..len];
        let number = match text.matches('.').count() {
            0 => text
                .parse::<i64>()
                .map(Number::Int)
                .unwrap_or_else(|_| Number::Float(text.parse::<f64>().unwrap_or(f64::INFINITY))),
            // A bare "." reads as "0.".
            1 if text == "." => Number::Float(0.0),
            1 => Number::Float(
                text.parse::<f64>()
                    .map_err(|_| self.error(ParseErrorKind::Lex, self.pos, "malformed number"))?,
            ),
            _ => return Err(self.error(ParseErrorKind::Lex, self.pos, "malformed number")),
        };
        self.pos += len;
        Ok(Some(Lexeme::Number(number)))
    }

    fn constant(&mut self) -> Option<Lexeme<'a>> {
        let rest = self.rest();
        for &(name, value) in CONSTANTS {
            if !rest.starts_with(name) {
                continue;
            }
            match rest[name.len()..].chars().next() {
                Some(c) if c.is_alphanumeric() || c == '_' => continue,
                _ => {
                    self.pos += name.len();
                    return Some(Lexeme::Constant(value));
                }
            }
        }
        None
    }

    /// A letter followed by letters, ASCII digits and `_`.
    fn word(&self) -> &'a str {
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let ok = c.is_alphabetic() || (i > 0 && (c == '_' || c.is_ascii_digit()));
            if !ok {
                break;
            }
            end = i + c.len_utf8();
        }
        &rest[..end]
    }

    fn function(&mut self) -> Option<Lexeme<'a>> {
        let word = self.word();
        if word.is_empty() {
            return None;
        }
        let lexeme = match BinaryOp::from_name(word) {
            Some(op) => Lexeme::BinaryFunction(op),
            None => Lexeme::UnaryFunction(UnaryOp::from_name(word)?),
        };
        self.pos += word.len();
        Some(lexeme)
    }

    fn variable(&mut self) -> Option<Lexeme<'a>> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(Lexeme::Variable(&rest[..len]))
    }

    fn classify(&mut self) -> Result<Option<Lexeme<'a>>, ParseError> {
        if let Some(lexeme) = self.operator() {
            return Ok(Some(lexeme));
        }
        if let Some(lexeme) = self.number()? {
            return Ok(Some(lexeme));
        }
        match self.rest().chars().next() {
            Some('(') => {
                self.pos += 1;
                return Ok(Some(Lexeme::LeftParen));
            }
            Some(')') => {
                self.pos += 1;
                return Ok(Some(Lexeme::RightParen));
            }
            _ => {}
        }
        Ok(self
            .constant()
            .or_else(|| self.function())
            .or_else(|| self.variable()))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Spanned<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let c = self.rest().chars().next()?;
            let start = self.pos;
            match self.classify() {
                Ok(Some(lexeme)) => return Some(Ok(Spanned { start, lexeme })),
                Ok(None) if c.is_whitespace() => self.pos += c.len_utf8(),
                Ok(None) => {
                    return Some(Err(self.error(ParseErrorKind::Lex, start, "unknown character")))
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Lexeme<'_>> {
        Scanner::new(src)
            .map(|r| r.map(|s| s.lexeme))
            .collect::<Result<_, _>>()
            .unwrap_or_else(|e| panic!("lex({:?}) failed: {}", src, e))
    }

    fn lex_err(src: &str) -> ParseError {
        Scanner::new(src)
            .find_map(Result::err)
            .unwrap_or_else(|| panic!("expected lex error for {:?}", src))
    }

    #[test]
    fn test_operators_longest_match() {
        let lexemes = lex("2**3");
        assert_eq!(
            lexemes[1],
            Lexeme::Operator {
                symbol: "**",
                priority: 8,
                op: BinaryOp::Power
            }
        );
        assert_eq!(lexemes.len(), 3);
    }

    #[test]
    fn test_unicode_multiplication_dots() {
        for src in ["2\u{2219}3", "2\u{2022}3"] {
            match &lex(src)[1] {
                Lexeme::Operator { op, priority, .. } => {
                    assert_eq!(*op, BinaryOp::Multiply);
                    assert_eq!(*priority, 5);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_integer_and_float_literals() {
        assert_eq!(lex("42"), vec![Lexeme::Number(Number::Int(42))]);
        assert_eq!(lex("4.5"), vec![Lexeme::Number(Number::Float(4.5))]);
        assert_eq!(lex(".5"), vec![Lexeme::Number(Number::Float(0.5))]);
        assert_eq!(lex("3."), vec![Lexeme::Number(Number::Float(3.0))]);
        assert!(matches!(lex("42")[0], Lexeme::Number(Number::Int(_))));
        assert!(matches!(lex("4.0")[0], Lexeme::Number(Number::Float(_))));
    }

    #[test]
    fn test_scientific_literals() {
        assert_eq!(lex("2.5e-1"), vec![Lexeme::Number(Number::Float(0.25))]);
        assert_eq!(lex("1E3"), vec![Lexeme::Number(Number::Float(1000.0))]);
        assert_eq!(lex(".5e1"), vec![Lexeme::Number(Number::Float(5.0))]);
    }

    #[test]
    fn test_malformed_number() {
        let err = lex_err("1.2.3");
        assert!(err.is_lex());
        assert_eq!(err.message(), "malformed number");
        assert_eq!(err.column(), 0);

        let err = lex_err("2 + ..");
        assert_eq!(err.message(), "malformed number");
        assert_eq!(err.column(), 4);
    }

    #[test]
    fn test_bare_dot_is_zero() {
        assert_eq!(lex("."), vec![Lexeme::Number(Number::Float(0.0))]);
        assert!(matches!(
            lex("2 + .")[2],
            Lexeme::Number(Number::Float(f)) if f == 0.0
        ));
    }

    #[test]
    fn test_constants_need_a_boundary() {
        assert_eq!(lex("E"), vec![Lexeme::Constant(std::f64::consts::E)]);
        assert_eq!(lex("PI"), vec![Lexeme::Constant(std::f64::consts::PI)]);
        assert_eq!(lex("E1"), vec![Lexeme::Variable("E1")]);
        assert_eq!(lex("PI_2"), vec![Lexeme::Variable("PI_2")]);
        assert_eq!(lex("Ex"), vec![Lexeme::Variable("Ex")]);
    }

    #[test]
    fn test_function_names_ignore_case() {
        assert_eq!(lex("sqrt"), vec![Lexeme::UnaryFunction(UnaryOp::Sqrt)]);
        assert_eq!(lex("ABS"), vec![Lexeme::UnaryFunction(UnaryOp::Abs)]);
        assert_eq!(lex("Log10"), vec![Lexeme::UnaryFunction(UnaryOp::Log10)]);
        assert_eq!(lex("ln"), vec![Lexeme::UnaryFunction(UnaryOp::Ln)]);
    }

    #[test]
    fn test_variables() {
        assert_eq!(lex("sqrtx"), vec![Lexeme::Variable("sqrtx")]);
        assert_eq!(lex("well.A_1"), vec![Lexeme::Variable("well.A_1")]);
        assert_eq!(lex("e"), vec![Lexeme::Variable("e")]);
        assert_eq!(lex("größe"), vec![Lexeme::Variable("größe")]);
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(lex("  a \t"), vec![Lexeme::Variable("a")]);
    }

    #[test]
    fn test_unknown_character() {
        let err = lex_err("a $ b");
        assert!(err.is_lex());
        assert_eq!(err.message(), "unknown character");
        assert_eq!(err.column(), 2);
    }

    #[test]
    fn test_column_counts_characters() {
        let err = lex_err("\u{2022}\u{2022} #");
        assert_eq!(err.column(), 3);
    }
}
