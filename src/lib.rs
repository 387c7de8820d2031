//! Interactive arithmetic expression evaluator.
//!
//! A pull-based lexer and a precedence-climbing evaluator with
//! persistent `$variables`, binary/octal/hexadecimal literals, and
//! a small set of commands that switch how results are displayed.
//!
//! # Quick start
//!
//! ## Evaluate expressions
//!
//! ```
//! use radix_calc::Evaluator;
//!
//! let mut evaluator = Evaluator::new();
//! assert_eq!(evaluator.evaluate("2 * (3 + (1 / 2))").unwrap(), 7.0);
//! assert_eq!(evaluator.evaluate("$a = h$ff + 1").unwrap(), 256.0);
//! assert_eq!(evaluator.evaluate("$ans / 2").unwrap(), 128.0);
//! ```
//!
//! ## Drive a session line by line
//!
//! ```
//! use radix_calc::{Outcome, Session};
//!
//! let mut session = Session::new();
//! session.process_line("hex").unwrap();
//! assert_eq!(
//!     session.process_line("b$1010 * 2").unwrap(),
//!     Outcome::Value("00000014".to_string()),
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod command;
pub mod evaluator;
pub mod formatter;
pub mod lexer;
pub mod session;
pub mod token;

pub use command::{Command, CommandError, CommandParser, Invocation};
pub use evaluator::{ANSWER, EvalError, EvalErrorKind, Evaluator, VariableStore};
pub use formatter::{OutputMode, ResultFormatter};
pub use lexer::{Base, LexError, LexErrorKind, Lexer, tokenize};
pub use session::{Outcome, Session};
pub use token::{Span, Token, TokenKind};

/// Unified error type covering lexing, evaluation and commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// An evaluation error.
    #[error("{0}")]
    Eval(#[from] EvalError),
    /// A command error.
    #[error("{0}")]
    Command(#[from] CommandError),
}

/// Evaluate a single expression with a fresh evaluator.
pub fn evaluate(expression: &str) -> Result<f64, Error> {
    Ok(Evaluator::new().evaluate(expression)?)
}
