//! Recursive descent parser from tokens to canonical expressions.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | <implicit>) unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | '(' expr ')' | identifier
//! ```
//!
//! Juxtaposition multiplies (`2x`, `(x+1)(x-1)`), and a function name applies to
//! the operand that follows it (`sin x^2` is `sin(x^2)`).

use crate::error::ParseError;
use crate::expr::{Constant, Expr, Func};
use crate::lexer::{Token, TokenKind, tokenize};

const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

/// Parses `source` into a canonical expression.
///
/// # Errors
/// Returns [`ParseError`] for empty input, unknown characters, unbalanced
/// parentheses, dangling operators and trailing tokens.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::new(0, "empty expression"));
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        end: source.len(),
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) if token.kind == TokenKind::RParen => Err(ParseError::new(
            token.position,
            "unbalanced parenthesis",
        )),
        Some(token) => Err(ParseError::new(token.position, "unexpected token")),
    }
}

/// One piece of an identifier after splitting.
enum Word {
    Function(Func),
    SquareRoot,
    Value(Expr),
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn starts_operand(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Number(_) | TokenKind::Ident(_) | TokenKind::LParen)
        )
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.term()?;
        loop {
            if self.eat(&TokenKind::Plus) {
                acc = acc + self.term()?;
            } else if self.eat(&TokenKind::Minus) {
                acc = acc - self.term()?;
            } else {
                return Ok(acc);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.unary()?;
        loop {
            if self.eat(&TokenKind::Star) {
                acc = acc * self.unary()?;
            } else if self.eat(&TokenKind::Slash) {
                acc = acc / self.unary()?;
            } else if self.starts_operand() {
                acc = acc * self.unary()?;
            } else {
                return Ok(acc);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Minus) {
            return Ok(-self.unary()?);
        }
        if self.eat(&TokenKind::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.eat(&TokenKind::Caret) {
            let exp = self.unary()?;
            return Ok(Expr::power(base, exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let position = self.position();
        let Some(token) = self.advance() else {
            return Err(ParseError::new(position, "unexpected end of input"));
        };
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::LParen => self.parenthesized(position),
            TokenKind::Ident(name) => self.identifier(&name, position),
            TokenKind::RParen => Err(ParseError::new(position, "unbalanced parenthesis")),
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Caret => Err(ParseError::new(position, "expected an operand")),
        }
    }

    /// Rest of a parenthesized group, after the opening parenthesis.
    fn parenthesized(&mut self, open: usize) -> Result<Expr, ParseError> {
        let inner = self.expr()?;
        if self.eat(&TokenKind::RParen) {
            Ok(inner)
        } else if self.peek().is_none() {
            Err(ParseError::new(open, "unbalanced parenthesis"))
        } else {
            Err(ParseError::new(self.position(), "expected ')'"))
        }
    }

    fn identifier(&mut self, name: &str, position: usize) -> Result<Expr, ParseError> {
        let words = split_identifier(name);
        let count = words.len();
        let mut factors = Vec::with_capacity(count);
        for (i, word) in words.into_iter().enumerate() {
            let value = match word {
                Word::Value(expr) => expr,
                Word::Function(func) if i + 1 == count => Expr::apply(func, self.argument(name)?),
                Word::SquareRoot if i + 1 == count => self.argument(name)?.sqrt(),
                Word::Function(_) | Word::SquareRoot => {
                    return Err(ParseError::new(position, format!("'{name}' needs an argument")));
                }
            };
            factors.push(value);
        }
        Ok(Expr::product(factors))
    }

    /// Argument of a function: a parenthesized group or the next power-level operand.
    fn argument(&mut self, name: &str) -> Result<Expr, ParseError> {
        let position = self.position();
        if self.eat(&TokenKind::LParen) {
            return self.parenthesized(position);
        }
        if !self.starts_operand() {
            return Err(ParseError::new(
                position,
                format!("function '{name}' needs an argument"),
            ));
        }
        self.power()
    }
}

fn function_named(name: &str) -> Option<Word> {
    let func = match name {
        "sin" => Func::Sin,
        "cos" => Func::Cos,
        "tan" => Func::Tan,
        "asin" | "arcsin" => Func::Asin,
        "acos" | "arccos" => Func::Acos,
        "atan" | "arctan" => Func::Atan,
        "sinh" => Func::Sinh,
        "cosh" => Func::Cosh,
        "tanh" => Func::Tanh,
        "exp" => Func::Exp,
        "log" | "ln" => Func::Log,
        "abs" | "Abs" => Func::Abs,
        "sqrt" => return Some(Word::SquareRoot),
        _ => return None,
    };
    Some(Word::Function(func))
}

fn constant_named(name: &str) -> Option<Expr> {
    match name {
        "pi" => Some(Expr::pi()),
        "E" => Some(Expr::Constant(Constant::E)),
        "I" => Some(Expr::imaginary_unit()),
        "zoo" => Some(Expr::complex_infinity()),
        "nan" => Some(Expr::nan()),
        _ => None,
    }
}

/// Splits an identifier into functions, constants and single-letter symbols.
///
/// Known names stay whole. Anything else becomes one symbol per letter, with
/// digits and underscores attached to the letter before them: `xy` is `x*y`,
/// `x2y` is `x2*y`.
fn split_identifier(name: &str) -> Vec<Word> {
    if let Some(word) = function_named(name) {
        return vec![word];
    }
    if let Some(constant) = constant_named(name) {
        return vec![Word::Value(constant)];
    }
    if GREEK_LETTERS.contains(&name) {
        return vec![Word::Value(Expr::symbol(name))];
    }

    let mut pieces: Vec<String> = Vec::new();
    for c in name.chars() {
        match pieces.last_mut() {
            Some(last) if !c.is_ascii_alphabetic() => last.push(c),
            _ => pieces.push(c.to_string()),
        }
    }
    pieces
        .into_iter()
        .map(|piece| Word::Value(constant_named(&piece).unwrap_or_else(|| Expr::symbol(piece))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_respects_precedence() {
        let parsed = parse("1 + 2*3^2").unwrap();
        assert_eq!(parsed, Expr::integer(19));
        let parsed = parse("2^3^2").unwrap();
        assert_eq!(parsed, Expr::integer(512));
        let parsed = parse("-2^2").unwrap();
        assert_eq!(parsed, Expr::integer(-4));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(
            parse("2x").unwrap(),
            Expr::product([Expr::integer(2), x()])
        );
        assert_eq!(
            parse("xy").unwrap(),
            Expr::product([x(), Expr::symbol("y")])
        );
        assert_eq!(parse("x2").unwrap(), Expr::symbol("x2"));
    }

    #[test]
    fn test_function_application() {
        let expected = Expr::apply(Func::Sin, x());
        assert_eq!(parse("sin(x)").unwrap(), expected);
        assert_eq!(parse("sin x").unwrap(), expected);
        assert_eq!(
            parse("sqrt(x)").unwrap(),
            Expr::power(x(), Expr::rational(1, 2))
        );
    }

    #[test]
    fn test_constants_are_not_symbols() {
        let parsed = parse("2pi").unwrap();
        assert!(parsed.free_symbols().is_empty());
        assert_eq!(parse("I^2").unwrap(), Expr::integer(-1));
    }

    #[test]
    fn test_reports_errors() {
        assert_eq!(parse("").unwrap_err().position, 0);
        assert_eq!(parse("   ").unwrap_err().message, "empty expression");
        assert!(parse("(x + 1").is_err());
        assert!(parse("x + 1)").is_err());
        assert!(parse("x +").is_err());
        assert!(parse("* x").is_err());
        assert!(parse("sin").is_err());
    }
}
