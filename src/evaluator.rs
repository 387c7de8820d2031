//! Precedence-climbing evaluator over the pull-based lexer.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! expression := sum ( ")" | END )
//! sum        := product ( ("+" | "-") product )*
//! product    := power ( ("*" | "/") power )*
//! power      := primary ( "^" primary )*
//! primary    := NUMBER | ("-" | "+") primary | "(" expression ")"
//!             | VARIABLE ( "=" expression )?
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use tracing::debug;

use crate::lexer::{LexError, LexErrorKind, Lexer};
use crate::token::{Span, TokenKind};

/// Variable holding the result of the last successful evaluation.
pub const ANSWER: &str = "$ans";

/// Deepest chain of parentheses, unary signs and assignments accepted
/// in one expression.
pub const MAX_NESTING: usize = 256;

/// Classifies an evaluation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// A number, variable, sign or `(` was required.
    PrimaryExpected,
    /// A token that cannot continue the expression.
    Syntax,
    /// Right operand of `/` is zero.
    DivideByZero,
    /// `(` without a matching `)`.
    MissingClosingParenthesis,
    /// `)` without a matching `(`.
    UnexpectedRightParenthesis,
    /// Parentheses, signs or assignments nested beyond
    /// [`MAX_NESTING`].
    TooDeep,
    /// The lexer rejected the input.
    Lex(LexErrorKind),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryExpected => write!(f, "primary expected"),
            Self::Syntax => write!(f, "syntax error"),
            Self::DivideByZero => write!(f, "divide by zero"),
            Self::MissingClosingParenthesis => write!(f, "')' expected"),
            Self::UnexpectedRightParenthesis => write!(f, "unexpected ')'"),
            Self::TooDeep => write!(f, "expression nested too deeply"),
            Self::Lex(kind) => write!(f, "{kind}"),
        }
    }
}

/// Error produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

impl From<LexError> for EvalError {
    fn from(err: LexError) -> Self {
        Self {
            kind: EvalErrorKind::Lex(err.kind),
            span: err.span,
        }
    }
}

/// Named values that persist across evaluations.
///
/// Names include the `$` sigil. Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    values: BTreeMap<String, f64>,
}

impl VariableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, if it has ever been assigned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Assign `value` to `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Evaluates arithmetic expressions against a persistent
/// [`VariableStore`].
///
/// Not meant for concurrent use: `evaluate` takes `&mut self`, so
/// callers sharing an evaluator must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    variables: VariableStore,
}

type EvalResult = Result<f64, EvalError>;

impl Evaluator {
    /// Create an evaluator with no variables defined.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator seeded with `variables`.
    #[must_use]
    pub const fn with_variables(variables: VariableStore) -> Self {
        Self { variables }
    }

    #[must_use]
    pub const fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Value of a single variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name)
    }

    /// Evaluate `expression`. On success the result is also stored
    /// in [`ANSWER`].
    ///
    /// # Errors
    ///
    /// Returns the first lexical, syntax or arithmetic error found.
    /// Nothing is stored in [`ANSWER`] on failure, although
    /// assignments completed before the error are kept.
    pub fn evaluate(&mut self, expression: &str) -> EvalResult {
        self.run(&mut Lexer::new(expression))
    }

    /// Read an expression from `reader` and evaluate it.
    ///
    /// # Errors
    ///
    /// As [`Evaluator::evaluate`], plus a read error when `reader`
    /// fails.
    pub fn evaluate_reader<R: Read>(&mut self, reader: R) -> EvalResult {
        self.run(&mut Lexer::from_reader(reader)?)
    }

    fn run(&mut self, lexer: &mut Lexer) -> EvalResult {
        let value = self.expression(lexer, Level::default())?;
        self.variables.set(ANSWER, value);
        debug!(value, "evaluated expression");
        Ok(value)
    }

    /// Top level: a sum followed by `)` (inside parentheses) or the
    /// end of input.
    fn expression(&mut self, lexer: &mut Lexer, level: Level) -> EvalResult {
        let value = self.sum(lexer, level)?;

        match lexer.current() {
            TokenKind::RParen if level.parens == 0 => {
                Err(error(EvalErrorKind::UnexpectedRightParenthesis, lexer))
            }
            TokenKind::RParen | TokenKind::End => Ok(value),
            TokenKind::Bad(kind) => Err(error(EvalErrorKind::Lex(kind.clone()), lexer)),
            _ => Err(error(EvalErrorKind::Syntax, lexer)),
        }
    }

    fn sum(&mut self, lexer: &mut Lexer, level: Level) -> EvalResult {
        let mut left = self.product(lexer, level)?;

        loop {
            match lexer.current() {
                TokenKind::Plus => left += self.product(lexer, level)?,
                TokenKind::Minus => left -= self.product(lexer, level)?,
                _ => return Ok(left),
            }
        }
    }

    fn product(&mut self, lexer: &mut Lexer, level: Level) -> EvalResult {
        let mut left = self.power(lexer, level)?;

        loop {
            match lexer.current() {
                TokenKind::Multiply => left *= self.power(lexer, level)?,
                TokenKind::Divide => {
                    let span = lexer.span();
                    let right = self.power(lexer, level)?;
                    if right == 0.0 {
                        return Err(EvalError {
                            kind: EvalErrorKind::DivideByZero,
                            span,
                        });
                    }
                    left /= right;
                }
                _ => return Ok(left),
            }
        }
    }

    fn power(&mut self, lexer: &mut Lexer, level: Level) -> EvalResult {
        let mut left = self.primary(lexer, level)?;

        while *lexer.current() == TokenKind::Power {
            let exponent = self.primary(lexer, level)?;
            left = left.powf(exponent);
        }

        Ok(left)
    }

    /// Pulls its own token, and leaves the token after the primary
    /// current for the caller.
    fn primary(&mut self, lexer: &mut Lexer, level: Level) -> EvalResult {
        match lexer.next_token().clone() {
            TokenKind::Number => {
                let value = lexer.number();
                lexer.next_token();
                Ok(value)
            }
            TokenKind::Minus => {
                let inner = level.nested(lexer)?;
                Ok(-self.primary(lexer, inner)?)
            }
            TokenKind::Plus => {
                let inner = level.nested(lexer)?;
                self.primary(lexer, inner)
            }
            TokenKind::Variable => {
                let name = lexer.text().to_owned();
                if *lexer.next_token() != TokenKind::Assign {
                    return Ok(self.variables.get(&name).unwrap_or(0.0));
                }

                // The right-hand side is parsed as a new top-level
                // expression, so a `)` ends it with an error.
                let inner = Level {
                    parens: 0,
                    ..level.nested(lexer)?
                };
                let value = self.expression(lexer, inner)?;
                debug!(%name, value, "assigned variable");
                self.variables.set(name, value);
                Ok(value)
            }
            TokenKind::LParen => {
                let inner = Level {
                    parens: level.parens + 1,
                    ..level.nested(lexer)?
                };
                let value = self.expression(lexer, inner)?;
                if *lexer.current() != TokenKind::RParen {
                    return Err(error(EvalErrorKind::MissingClosingParenthesis, lexer));
                }
                lexer.next_token();
                Ok(value)
            }
            TokenKind::Bad(kind) => Err(error(EvalErrorKind::Lex(kind), lexer)),
            _ => Err(error(EvalErrorKind::PrimaryExpected, lexer)),
        }
    }
}

/// Position of the descent: open parentheses, and recursive steps
/// (signs, parentheses, assignments) taken to get here.
#[derive(Debug, Clone, Copy, Default)]
struct Level {
    parens: usize,
    nesting: usize,
}

impl Level {
    /// One recursive step deeper.
    const fn nested(self, lexer: &Lexer) -> Result<Self, EvalError> {
        if self.nesting >= MAX_NESTING {
            return Err(error(EvalErrorKind::TooDeep, lexer));
        }
        Ok(Self {
            nesting: self.nesting + 1,
            ..self
        })
    }
}

/// Error located at the lexer's current token.
const fn error(kind: EvalErrorKind, lexer: &Lexer) -> EvalError {
    EvalError {
        kind,
        span: lexer.span(),
    }
}
