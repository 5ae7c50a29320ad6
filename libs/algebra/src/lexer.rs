//! Tokenizer for equation text, built on `nom` combinators.

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, digit0, digit1, multispace0, one_of, satisfy};
use nom::combinator::{map_opt, opt, recognize, value};
use nom::error::VerboseError;
use nom::sequence::{pair, preceded};
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::error::ParseError;
use crate::numeric::{self, Rational};

type LexResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Number(Rational),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the source text.
    pub position: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    loop {
        let (after_ws, _) = skip_whitespace(rest);
        rest = after_ws;
        if rest.is_empty() {
            return Ok(tokens);
        }
        let position = source.len() - rest.len();
        match token(rest) {
            Ok((next, kind)) => {
                tokens.push(Token { kind, position });
                rest = next;
            }
            Err(_) => {
                let found = rest.chars().next().unwrap_or(' ');
                return Err(ParseError::new(
                    position,
                    format!("unexpected character '{found}'"),
                ));
            }
        }
    }
}

fn skip_whitespace(input: &str) -> (&str, &str) {
    let parsed: LexResult<'_, &str> = multispace0(input);
    parsed.unwrap_or((input, ""))
}

fn token(input: &str) -> LexResult<'_, TokenKind> {
    alt((number, identifier, operator))(input)
}

fn operator(input: &str) -> LexResult<'_, TokenKind> {
    alt((
        value(TokenKind::Caret, tag("**")),
        value(TokenKind::Caret, char('^')),
        value(TokenKind::Star, char('*')),
        value(TokenKind::Slash, char('/')),
        value(TokenKind::Plus, char('+')),
        value(TokenKind::Minus, char('-')),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
    ))(input)
}

fn identifier(input: &str) -> LexResult<'_, TokenKind> {
    let (rest, name) = recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)?;
    Ok((rest, TokenKind::Ident(name.to_owned())))
}

/// Integer or decimal literal with an optional exponent: `12`, `1.5`, `2.`,
/// `.5`, `1e5`, `2.5E-3`. An `e` not followed by digits is left for the
/// identifier lexer, so `2exp(x)` still reads as `2*exp(x)`.
fn number(input: &str) -> LexResult<'_, TokenKind> {
    map_opt(
        pair(
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(preceded(
                one_of("eE"),
                recognize(pair(opt(one_of("+-")), digit1)),
            )),
        ),
        |(mantissa, exponent): (&str, Option<&str>)| {
            let value = decimal_to_rational(mantissa);
            let Some(exponent) = exponent else {
                return Some(TokenKind::Number(value));
            };
            let exponent: i64 = exponent.parse().ok()?;
            let scale = numeric::checked_pow(&numeric::integer(10), &BigInt::from(exponent))?;
            Some(TokenKind::Number(value * scale))
        },
    )(input)
}

/// Exact value of a decimal literal, so `0.1` is `1/10` rather than a float.
fn decimal_to_rational(text: &str) -> Rational {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = format!("{whole}{fraction}");
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10).unwrap_or_else(BigInt::zero);
    let denom = num_traits::pow(BigInt::from(10), fraction.len());
    if denom.is_one() {
        Rational::from_integer(numer)
    } else {
        Rational::new(numer, denom)
    }
}
