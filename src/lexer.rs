use std::fmt;
use std::io::Read;

use tracing::trace;

use crate::token::{Span, Token, TokenKind};

/// Integer base selected by a `b$`, `o$` or `h$` literal prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Binary,
    Octal,
    Hexadecimal,
}

impl Base {
    const fn from_prefix(letter: char) -> Option<Self> {
        match letter {
            'b' => Some(Self::Binary),
            'o' => Some(Self::Octal),
            'h' => Some(Self::Hexadecimal),
            _ => None,
        }
    }

    /// Numeric radix of the base.
    #[must_use]
    pub const fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Hexadecimal => 16,
        }
    }

    const fn accepts(self, ch: char) -> bool {
        match self {
            Self::Binary => matches!(ch, '0' | '1'),
            Self::Octal => matches!(ch, '0'..='7'),
            Self::Hexadecimal => ch.is_ascii_hexdigit(),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Octal => write!(f, "octal"),
            Self::Hexadecimal => write!(f, "hexadecimal"),
        }
    }
}

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Rune that cannot start any token.
    UnexpectedCharacter(char),
    /// `$` or a base prefix not followed by a valid identifier or
    /// digit run.
    IdentifierSyntax,
    /// Decimal digit run that is not a number (a lone `.`).
    InvalidNumber(String),
    /// Base-prefixed literal above the unsigned 32-bit range.
    Overflow(Base),
    /// The underlying input could not be read.
    Read(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
            Self::IdentifierSyntax => {
                write!(
                    f,
                    "identifiers must begin with a letter \
                     and have a non-zero length"
                )
            }
            Self::InvalidNumber(text) => {
                write!(f, "invalid number: {text}")
            }
            Self::Overflow(base) => {
                write!(f, "{base} value too large")
            }
            Self::Read(reason) => {
                write!(f, "general error reading input: {reason}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a whole expression into a sequence of tokens, excluding
/// the final end token.
///
/// # Errors
///
/// Returns `LexError` for the first malformed token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        lexer.next_token();
        let token = lexer.token().clone();
        match token.kind {
            TokenKind::End => return Ok(tokens),
            TokenKind::Bad(kind) => {
                return Err(LexError {
                    kind,
                    span: token.span,
                });
            }
            _ => tokens.push(token),
        }
    }
}

/// Saved cursor state, restored by [`Lexer::unread_rune`].
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    col: usize,
}

/// Pull-based lexical analyzer over one input string.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; the lexer
/// remembers the last one so a parser can inspect it repeatedly
/// without rescanning.
#[derive(Debug)]
pub struct Lexer {
    input: String,
    pos: usize,
    line: usize,
    col: usize,
    last: Option<Mark>,
    current: Token,
}

impl Lexer {
    /// Create a lexer bound to `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
            pos: 0,
            line: 1,
            col: 1,
            last: None,
            current: Token::new(TokenKind::End, Span::START),
        }
    }

    /// Create a lexer over everything `reader` yields.
    ///
    /// # Errors
    ///
    /// Returns a [`LexErrorKind::Read`] error when the reader fails or
    /// the input is not valid UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LexError> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .map_err(|e| LexError {
                kind: LexErrorKind::Read(e.to_string()),
                span: Span::START,
            })?;
        Ok(Self::new(&input))
    }

    /// The last token produced.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.current
    }

    /// Kind of the last token produced.
    #[must_use]
    pub const fn current(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Text payload of the current token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.current.text
    }

    /// Numeric payload of the current token.
    #[must_use]
    pub const fn number(&self) -> f64 {
        self.current.number
    }

    /// Location of the current token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.current.span
    }

    /// Scan the next token and make it current.
    ///
    /// A bad token consumes the runes that made it bad, so calling
    /// again resumes after them.
    pub fn next_token(&mut self) -> &TokenKind {
        let (ch, span) = loop {
            let span = self.cursor_span();
            match self.read_rune() {
                None => {
                    self.current = Token::new(TokenKind::End, span);
                    return &self.current.kind;
                }
                Some(c) if c.is_whitespace() => {}
                Some(c) => break (c, span),
            }
        };

        let mut token = Token::new(TokenKind::End, span);
        token.kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Assign,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Multiply,
            '/' => TokenKind::Divide,
            '^' => TokenKind::Power,
            '$' => match self.read_identifier(None) {
                Ok(name) => {
                    token.text = format!("${name}");
                    TokenKind::Variable
                }
                Err(kind) => TokenKind::Bad(kind),
            },
            '0'..='9' | '.' => {
                self.unread_rune();
                match self.read_decimal() {
                    Ok(value) => {
                        token.number = value;
                        TokenKind::Number
                    }
                    Err(kind) => TokenKind::Bad(kind),
                }
            }
            c if c.is_alphabetic() => self.read_word(c, &mut token),
            c => TokenKind::Bad(LexErrorKind::UnexpectedCharacter(c)),
        };

        trace!(kind = ?token.kind, line = span.line, column = span.column, "token");
        self.current = token;
        &self.current.kind
    }

    const fn cursor_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn read_rune(&mut self) -> Option<char> {
        let Some(ch) = self.input[self.pos..].chars().next() else {
            self.last = None;
            return None;
        };
        self.last = Some(Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        });
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Push the last rune back. Only one rune of pushback is kept.
    fn unread_rune(&mut self) {
        if let Some(mark) = self.last.take() {
            self.pos = mark.pos;
            self.line = mark.line;
            self.col = mark.col;
        }
    }

    /// Read runes while `accept` holds, leaving the first rejected
    /// rune in the stream.
    fn read_while(&mut self, out: &mut String, mut accept: impl FnMut(char) -> bool) {
        while let Some(ch) = self.read_rune() {
            if !accept(ch) {
                self.unread_rune();
                break;
            }
            out.push(ch);
        }
    }

    fn read_decimal(&mut self) -> Result<f64, LexErrorKind> {
        let mut text = String::new();
        let mut seen_point = false;
        self.read_while(&mut text, |ch| {
            if ch == '.' {
                // A second point ends the literal.
                !std::mem::replace(&mut seen_point, true)
            } else {
                ch.is_ascii_digit()
            }
        });

        text.parse::<f64>()
            .map_err(|_| LexErrorKind::InvalidNumber(text))
    }

    fn read_radix(&mut self, base: Base) -> Result<f64, LexErrorKind> {
        let mut digits = String::new();
        self.read_while(&mut digits, |ch| base.accepts(ch));

        if digits.is_empty() {
            return Err(LexErrorKind::IdentifierSyntax);
        }

        // Every rune was checked against the base, so the only
        // possible failure is a value wider than 64 bits.
        let wide =
            u64::from_str_radix(&digits, base.radix()).map_err(|_| LexErrorKind::Overflow(base))?;
        let narrow = u32::try_from(wide).map_err(|_| LexErrorKind::Overflow(base))?;

        // Reinterpret the bit pattern as two's complement so that
        // e.g. `h$ffffffff` reads as -1.
        Ok(f64::from(i32::from_ne_bytes(narrow.to_ne_bytes())))
    }

    fn read_identifier(&mut self, first: Option<char>) -> Result<String, LexErrorKind> {
        let mut name = String::new();
        match first {
            Some(ch) => name.push(ch),
            None => match self.read_rune() {
                Some(ch) if ch.is_alphabetic() => name.push(ch),
                Some(_) => {
                    self.unread_rune();
                    return Err(LexErrorKind::IdentifierSyntax);
                }
                None => return Err(LexErrorKind::IdentifierSyntax),
            },
        }
        self.read_while(&mut name, char::is_alphanumeric);
        Ok(name)
    }

    /// A letter starts either a base-prefixed literal or an identifier.
    fn read_word(&mut self, first: char, token: &mut Token) -> TokenKind {
        if let Some(base) = Base::from_prefix(first) {
            if self.read_rune() == Some('$') {
                return match self.read_radix(base) {
                    Ok(value) => {
                        token.number = value;
                        TokenKind::Number
                    }
                    Err(kind) => TokenKind::Bad(kind),
                };
            }
            self.unread_rune();
        }

        match self.read_identifier(Some(first)) {
            Ok(name) => {
                token.text = name;
                TokenKind::Identifier
            }
            Err(kind) => TokenKind::Bad(kind),
        }
    }
}
