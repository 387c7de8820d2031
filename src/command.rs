//! Mode-setting commands recognized ahead of expression evaluation.
//!
//! A line is a command when its first token is an identifier. The
//! remaining tokens are collected as arguments and checked against
//! the command's accepted signatures.

use std::collections::BTreeMap;

use tracing::debug;

use crate::formatter::{MAX_PRECISION, OutputMode};
use crate::lexer::Lexer;
use crate::session::{Outcome, Session};
use crate::token::{Token, TokenKind};

/// Default precision of `fix` and `sci` without an argument.
pub const DEFAULT_PRECISION: usize = 2;

/// Error produced while recognizing or running a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The leading identifier names no command.
    #[error("command not found: {0}")]
    NotFound(String),
    /// More arguments than the longest signature allows.
    #[error("too many arguments")]
    TooManyArguments,
    /// Arguments match none of the command's signatures.
    #[error("command arguments are invalid")]
    InvalidArguments,
    /// An argument could not be tokenized.
    #[error("general error parsing command: {0}")]
    BadArgument(String),
}

/// Accepted argument kinds, in order.
pub type Signature = &'static [TokenKind];

const NO_ARGS: &[Signature] = &[&[]];
const OPTIONAL_PRECISION: &[Signature] = &[&[], &[TokenKind::Number]];

/// The closed set of commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Command {
    Exit,
    Fix,
    Real,
    Sci,
    Bin,
    Oct,
    Hex,
    Vars,
    Help,
}

impl Command {
    pub const ALL: [Self; 9] = [
        Self::Exit,
        Self::Fix,
        Self::Real,
        Self::Sci,
        Self::Bin,
        Self::Oct,
        Self::Hex,
        Self::Vars,
        Self::Help,
    ];

    /// Keyword that invokes the command.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Fix => "fix",
            Self::Real => "real",
            Self::Sci => "sci",
            Self::Bin => "bin",
            Self::Oct => "oct",
            Self::Hex => "hex",
            Self::Vars => "vars",
            Self::Help => "help",
        }
    }

    #[must_use]
    pub const fn signatures(self) -> &'static [Signature] {
        match self {
            Self::Fix | Self::Real | Self::Sci => OPTIONAL_PRECISION,
            Self::Exit | Self::Bin | Self::Oct | Self::Hex | Self::Vars | Self::Help => NO_ARGS,
        }
    }

    /// Syntax and one-line description, as shown by `help`.
    #[must_use]
    pub const fn usage(self) -> (&'static str, &'static str) {
        match self {
            Self::Exit => ("exit", "Exit the calculator."),
            Self::Fix => (
                "fix <precision>",
                "Set fix point output mode with optional precision.",
            ),
            Self::Real => (
                "real <precision>",
                "Set real output mode with optional precision.",
            ),
            Self::Sci => (
                "sci <precision>",
                "Set scientific output mode with optional precision.",
            ),
            Self::Bin => ("bin", "Set binary output mode."),
            Self::Oct => ("oct", "Set octal output mode."),
            Self::Hex => ("hex", "Set hexadecimal output mode."),
            Self::Vars => ("vars", "List defined variables."),
            Self::Help => ("help", "Show help."),
        }
    }

    fn max_arguments(self) -> usize {
        self.signatures().iter().map(|s| s.len()).max().unwrap_or(0)
    }

    fn matches(self, arguments: &[Token]) -> bool {
        self.signatures().iter().any(|signature| {
            signature.len() == arguments.len()
                && signature
                    .iter()
                    .zip(arguments)
                    .all(|(kind, arg)| *kind == arg.kind)
        })
    }

    /// Apply the command to `session`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArguments`] when a precision is
    /// not a whole number in `0..=MAX_PRECISION`.
    pub fn execute(
        self,
        arguments: &[Token],
        session: &mut Session,
    ) -> Result<Outcome, CommandError> {
        debug!(command = self.name(), args = arguments.len(), "executing command");

        match self {
            Self::Exit => return Ok(Outcome::Exit),
            Self::Fix => {
                let precision = precision(arguments, Some(DEFAULT_PRECISION))?;
                set_mode(session, OutputMode::Fixed, precision);
            }
            Self::Real => {
                let precision = precision(arguments, None)?;
                set_mode(session, OutputMode::Real, precision);
            }
            Self::Sci => {
                let precision = precision(arguments, Some(DEFAULT_PRECISION))?;
                set_mode(session, OutputMode::Scientific, precision);
            }
            Self::Bin => session.formatter_mut().set_mode(OutputMode::Binary),
            Self::Oct => session.formatter_mut().set_mode(OutputMode::Octal),
            Self::Hex => session.formatter_mut().set_mode(OutputMode::Hexadecimal),
            Self::Vars => return Ok(Outcome::Message(list_variables(session))),
            Self::Help => return Ok(Outcome::Message(help())),
        }

        Ok(Outcome::Empty)
    }
}

fn set_mode(session: &mut Session, mode: OutputMode, precision: Option<usize>) {
    let formatter = session.formatter_mut();
    formatter.set_mode(mode);
    formatter.set_precision(precision);
}

/// Precision from the optional single argument.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn precision(arguments: &[Token], default: Option<usize>) -> Result<Option<usize>, CommandError> {
    let Some(arg) = arguments.first() else {
        return Ok(default);
    };

    let value = arg.number;
    if value.fract() != 0.0 || !(0.0..=f64::from(MAX_PRECISION)).contains(&value) {
        return Err(CommandError::InvalidArguments);
    }

    Ok(Some(value as usize))
}

fn list_variables(session: &Session) -> String {
    let variables = session.evaluator().variables();
    if variables.is_empty() {
        return "No variables defined!".to_string();
    }

    let formatter = session.formatter();
    let lines: Vec<String> = variables
        .iter()
        .map(|(name, value)| format!("{name} => {}", formatter.format_value(value)))
        .collect();
    format!("Variables:\n{}", lines.join("\n"))
}

fn help() -> String {
    let width = Command::ALL
        .iter()
        .map(|c| c.usage().0.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<String> = CommandParser::new()
        .commands
        .values()
        .map(|command| {
            let (syntax, description) = command.usage();
            format!("{syntax:<width$} : {description}")
        })
        .collect();
    format!("Commands:\n{}", lines.join("\n"))
}

/// A recognized command with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub arguments: Vec<Token>,
}

impl Invocation {
    /// Run the command against `session`.
    ///
    /// # Errors
    ///
    /// See [`Command::execute`].
    pub fn execute(&self, session: &mut Session) -> Result<Outcome, CommandError> {
        self.command.execute(&self.arguments, session)
    }
}

/// Name-keyed table of commands.
#[derive(Debug, Clone)]
pub struct CommandParser {
    commands: BTreeMap<&'static str, Command>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Command::ALL.iter().map(|c| (c.name(), *c)).collect(),
        }
    }

    /// Look a command up by keyword.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// Recognize `line` as a command.
    ///
    /// Returns `Ok(None)` when the line does not start with an
    /// identifier, i.e. it should be evaluated as an expression.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for unknown commands and for arguments
    /// that do not fit any signature.
    pub fn parse(&self, line: &str) -> Result<Option<Invocation>, CommandError> {
        let mut lexer = Lexer::new(line);
        if *lexer.next_token() != TokenKind::Identifier {
            return Ok(None);
        }

        let name = lexer.text();
        let command = self
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;

        let arguments = collect_arguments(&mut lexer, command.max_arguments())?;
        if !command.matches(&arguments) {
            return Err(CommandError::InvalidArguments);
        }

        debug!(command = command.name(), "recognized command");
        Ok(Some(Invocation { command, arguments }))
    }
}

fn collect_arguments(lexer: &mut Lexer, max: usize) -> Result<Vec<Token>, CommandError> {
    let mut arguments = Vec::new();

    loop {
        match lexer.next_token() {
            TokenKind::End => return Ok(arguments),
            TokenKind::Bad(kind) => return Err(CommandError::BadArgument(kind.to_string())),
            _ => {}
        }

        if arguments.len() == max {
            return Err(CommandError::TooManyArguments);
        }
        arguments.push(lexer.token().clone());
    }
}
