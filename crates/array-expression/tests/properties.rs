//! Property tests: parsed formulas agree with a direct tree evaluation.

use array_expression::{Parser, Value, Vars};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Ast {
    Num(i64),
    X,
    Neg(Box<Ast>),
    Abs(Box<Ast>),
    Bin(char, Box<Ast>, Box<Ast>),
}

/// Intermediate results beyond this are skipped: integer and float
/// evaluation stop agreeing exactly.
const LIMIT: f64 = 1e12;

fn in_range(v: f64) -> Option<f64> {
    (v.is_finite() && v.abs() <= LIMIT).then_some(v)
}

fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl Ast {
    /// Reference value at `x`, or `None` when some subtree leaves the range
    /// where the comparison is meaningful.
    fn eval(&self, x: f64) -> Option<f64> {
        let v = match self {
            Ast::Num(n) => *n as f64,
            Ast::X => x,
            Ast::Neg(a) => -a.eval(x)?,
            Ast::Abs(a) => a.eval(x)?.abs(),
            Ast::Bin(op, l, r) => {
                let (l, r) = (l.eval(x)?, r.eval(x)?);
                match op {
                    '+' => l + r,
                    '-' => l - r,
                    '*' => l * r,
                    '/' => l / r,
                    '%' => floor_mod(l, r),
                    '^' => l.powf(r),
                    _ => unreachable!(),
                }
            }
        };
        in_range(v)
    }

    /// Every subexpression wrapped in parentheses.
    fn render_full(&self) -> String {
        match self {
            Ast::Num(n) => n.to_string(),
            Ast::X => "x".to_string(),
            Ast::Neg(a) => format!("(-({}))", a.render_full()),
            Ast::Abs(a) => format!("abs({})", a.render_full()),
            Ast::Bin(op, l, r) => format!("({} {} {})", l.render_full(), op, r.render_full()),
        }
    }

    /// Binding strength as the parser sees it. A prefix `-` sits at the
    /// multiplication level: `/ % ^` bind inside it, `* + -` pop it.
    fn precedence(&self) -> u8 {
        match self {
            Ast::Bin('+' | '-', _, _) => 4,
            Ast::Bin('*', _, _) | Ast::Neg(_) => 5,
            Ast::Bin('/' | '%', _, _) => 6,
            Ast::Bin(_, _, _) => 8,
            Ast::Num(_) | Ast::X | Ast::Abs(_) => 10,
        }
    }

    /// Only the parentheses precedence and left associativity require.
    fn render_minimal(&self) -> String {
        match self {
            Ast::Num(n) => n.to_string(),
            Ast::X => "x".to_string(),
            Ast::Neg(a) => match **a {
                Ast::Bin(..) => format!("-({})", a.render_minimal()),
                _ => format!("-{}", a.render_minimal()),
            },
            Ast::Abs(a) => format!("abs({})", a.render_minimal()),
            Ast::Bin(op, l, r) => {
                let p = self.precedence();
                let left = if l.precedence() < p {
                    format!("({})", l.render_minimal())
                } else {
                    l.render_minimal()
                };
                let right = if r.precedence() <= p {
                    format!("({})", r.render_minimal())
                } else {
                    r.render_minimal()
                };
                format!("{} {} {}", left, op, right)
            }
        }
    }
}

fn ast() -> impl Strategy<Value = Ast> {
    let leaf = prop_oneof![(0i64..10).prop_map(Ast::Num), Just(Ast::X)];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|a| Ast::Neg(Box::new(a))),
            inner.clone().prop_map(|a| Ast::Abs(Box::new(a))),
            (
                prop::sample::select(vec!['+', '-', '*', '/', '%']),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, l, r)| Ast::Bin(op, Box::new(l), Box::new(r))),
            // Small literal exponents keep powers in range.
            (inner, 0i64..4)
                .prop_map(|(base, e)| Ast::Bin('^', Box::new(base), Box::new(Ast::Num(e)))),
        ]
    })
}

const XS: [f64; 4] = [-2.0, 0.5, 1.5, 3.0];

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

fn assert_matches(src: &str, tree: &Ast) -> Result<(), TestCaseError> {
    let expected: Vec<f64> = match XS.iter().map(|&x| tree.eval(x)).collect() {
        Some(values) => values,
        None => return Err(TestCaseError::reject("out of range")),
    };
    let expr = Parser::new()
        .parse(src)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let mut vars = Vars::new();
    vars.set("x", XS.to_vec());
    let result = expr
        .evaluate(&vars)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let actual: Vec<f64> = match result {
        Value::Array(a) => a.into_data(),
        Value::Scalar(n) => vec![n.as_f64(); XS.len()],
        Value::Function(_) => return Err(TestCaseError::fail("callable result")),
    };
    for (i, &x) in XS.iter().enumerate() {
        prop_assert!(
            close(actual[i], expected[i]),
            "{} at x = {}: got {}, expected {}",
            src,
            x,
            actual[i],
            expected[i]
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn fully_parenthesized_matches_reference(tree in ast()) {
        assert_matches(&tree.render_full(), &tree)?;
    }

    #[test]
    fn minimal_parentheses_match_reference(tree in ast()) {
        assert_matches(&tree.render_minimal(), &tree)?;
    }

    #[test]
    fn redundant_parentheses_are_transparent(tree in ast(), depth in 1usize..6) {
        let src = format!("{}{}{}", "(".repeat(depth), tree.render_minimal(), ")".repeat(depth));
        assert_matches(&src, &tree)?;
    }

    #[test]
    fn reparsing_is_deterministic(tree in ast()) {
        let src = tree.render_minimal();
        let parser = Parser::new();
        let first = parser.parse(&src).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = parser.parse(&src).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(first, second);
    }
}
