use crate::lexer::LexErrorKind;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Location of the first rune of an input.
    pub const START: Self = Self { line: 1, column: 1 };
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input. Once reached, the lexer keeps returning it.
    End,
    /// Malformed input, carrying the reason.
    Bad(LexErrorKind),
    /// Opening parenthesis `(`.
    LParen,
    /// Closing parenthesis `)`.
    RParen,
    /// Assignment `=`.
    Assign,
    /// Addition or unary plus `+`.
    Plus,
    /// Subtraction or unary minus `-`.
    Minus,
    /// Multiplication `*`.
    Multiply,
    /// Division `/`.
    Divide,
    /// Exponentiation `^`.
    Power,
    /// Variable reference `$name`.
    Variable,
    /// Decimal or base-prefixed numeric literal.
    Number,
    /// Bare identifier, used for command names.
    Identifier,
}

/// A single token with its kind, payload, and source location.
///
/// `text` is only meaningful for [`TokenKind::Variable`] (the name,
/// including the `$` sigil) and [`TokenKind::Identifier`]; `number`
/// only for [`TokenKind::Number`]. Other kinds carry an empty string
/// and `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub number: f64,
    pub span: Span,
}

impl Token {
    pub(crate) const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            text: String::new(),
            number: 0.0,
            span,
        }
    }
}
