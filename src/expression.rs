//! Restricted arithmetic for amount fields.
//!
//! Input such as `50*1.2` is parsed into an [`Expr`] tree and only literal,
//! unary sign and the four binary operators are ever evaluated. Anything else
//! (names, calls, strings, comparisons, `**`, `//`) is rejected while parsing.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```

use crate::error::ExprError;

/// Deepest allowed nesting of signs and parentheses.
const MAX_DEPTH: usize = 256;

/// Longest accepted token stream. Bounds how deep a chain like `1+1+...` can
/// make the tree, since `eval` and `Drop` both recurse over it.
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self) -> Result<f64, ExprError> {
        match self {
            Expr::Literal(value) => Ok(*value),
            Expr::Unary(UnaryOp::Plus, operand) => operand.eval(),
            Expr::Unary(UnaryOp::Minus, operand) => Ok(-operand.eval()?),
            Expr::Binary(op, left, right) => {
                let left = left.eval()?;
                let right = right.eval()?;
                match op {
                    BinaryOp::Add => Ok(left + right),
                    BinaryOp::Sub => Ok(left - right),
                    BinaryOp::Mul => Ok(left * right),
                    BinaryOp::Div if right == 0.0 => Err(ExprError::DivisionByZero),
                    BinaryOp::Div => Ok(left / right),
                }
            }
        }
    }
}

/// Parses and evaluates `input`. Whitespace anywhere in the input is ignored.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    parse(input)?.eval()
}

pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::invalid("empty expression"));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(ExprError::invalid("expression too long"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ExprError::invalid(format!("unexpected {token}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let compact: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < compact.len() {
        let c = compact[i];
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let start = i;
                while i < compact.len() && (compact[i].is_ascii_digit() || compact[i] == '.') {
                    i += 1;
                }
                let literal: String = compact[start..i].iter().collect();
                tokens.push(Token::Number(parse_number(&literal)?));
                continue;
            }
            other => {
                return Err(ExprError::invalid(format!("unsupported character {other:?}")));
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<f64, ExprError> {
    if literal.matches('.').count() > 1 || !literal.chars().any(|c| c.is_ascii_digit()) {
        return Err(ExprError::invalid(format!("bad number {literal:?}")));
    }
    let value: f64 = literal
        .parse()
        .map_err(|_| ExprError::invalid(format!("bad number {literal:?}")))?;
    if !value.is_finite() {
        return Err(ExprError::invalid(format!("number out of range {literal:?}")));
    }
    Ok(value)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.factor()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn factor(&mut self) -> Result<Expr, ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::invalid("expression nested too deeply"));
        }
        let factor = self.nested_factor();
        self.depth -= 1;
        factor
    }

    fn nested_factor(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::Plus) => Ok(Expr::Unary(UnaryOp::Plus, Box::new(self.factor()?))),
            Some(Token::Minus) => Ok(Expr::Unary(UnaryOp::Minus, Box::new(self.factor()?))),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(ExprError::invalid(format!("expected ')', found {token}"))),
                    None => Err(ExprError::invalid("unclosed '('")),
                }
            }
            Some(token) => Err(ExprError::invalid(format!("unexpected {token}"))),
            None => Err(ExprError::invalid("unexpected end of input")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(input: &str) -> bool {
        matches!(evaluate(input), Err(ExprError::InvalidExpression { .. }))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("-5+2").unwrap(), -3.0);
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(evaluate("10-4-3").unwrap(), 3.0);
        assert_eq!(evaluate("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn test_decimal_amounts() {
        assert!((evaluate("50*1.2").unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(evaluate(".5+1.").unwrap(), 1.5);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(evaluate("2*-3").unwrap(), -6.0);
        assert_eq!(evaluate("--4").unwrap(), 4.0);
        assert_eq!(evaluate("+7").unwrap(), 7.0);
        assert_eq!(evaluate("-(1+2)").unwrap(), -3.0);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(evaluate("  1 + 2 * 3 ").unwrap(), 7.0);
        assert_eq!(evaluate("1 000").unwrap(), 1000.0);
    }

    #[test]
    fn test_rejects_code_and_names() {
        assert!(invalid("__import__('os')"));
        assert!(invalid("1 and 2"));
        assert!(invalid("a+1"));
        assert!(invalid("abs(-1)"));
        assert!(invalid("'5'"));
        assert!(invalid("1<2"));
        assert!(invalid("1&2"));
        assert!(invalid("x.y"));
        assert!(invalid("[1][0]"));
    }

    #[test]
    fn test_rejects_non_whitelisted_operators() {
        assert!(invalid("2**3"));
        assert!(invalid("7//2"));
        assert!(invalid("7%2"));
        assert!(invalid("1e3"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(invalid(""));
        assert!(invalid("   "));
        assert!(invalid("1+"));
        assert!(invalid("(1+2"));
        assert!(invalid("1+2)"));
        assert!(invalid("()"));
        assert!(invalid("1.2.3"));
        assert!(invalid("."));
    }

    #[test]
    fn test_rejects_deep_nesting() {
        assert!(invalid(&format!("{}1", "-".repeat(100_000))));
        assert!(invalid(&format!(
            "{}1{}",
            "(".repeat(100_000),
            ")".repeat(100_000)
        )));
        assert!(invalid(&format!("{}1{}", "(".repeat(300), ")".repeat(300))));
        assert!(invalid(&format!("{}1", "-".repeat(MAX_DEPTH))));
        assert_eq!(evaluate(&format!("{}1", "-".repeat(MAX_DEPTH - 1))).unwrap(), -1.0);
    }

    #[test]
    fn test_rejects_long_chains() {
        assert!(invalid(&vec!["1"; 100_000].join("+")));
        assert_eq!(evaluate(&vec!["1"; 500].join("+")).unwrap(), 500.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("5/0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn test_parse_builds_tree() {
        let tree = parse("1-2*3").unwrap();
        assert_eq!(
            tree,
            Expr::Binary(
                BinaryOp::Sub,
                Box::new(Expr::Literal(1.0)),
                Box::new(Expr::Binary(
                    BinaryOp::Mul,
                    Box::new(Expr::Literal(2.0)),
                    Box::new(Expr::Literal(3.0)),
                )),
            )
        );
    }
}
