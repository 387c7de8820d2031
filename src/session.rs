//! One interactive calculator session: evaluator, output format and
//! command table together.

use tracing::debug;

use crate::Error;
use crate::command::CommandParser;
use crate::evaluator::Evaluator;
use crate::formatter::ResultFormatter;

/// What processing one input line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A formatted evaluation result.
    Value(String),
    /// Informational text from a command, possibly multi-line.
    Message(String),
    /// The user asked to leave.
    Exit,
    /// Nothing to show (blank line or a mode change).
    Empty,
}

/// Evaluator plus result formatter plus command table.
#[derive(Debug, Clone, Default)]
pub struct Session {
    evaluator: Evaluator,
    formatter: ResultFormatter,
    commands: CommandParser,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over an existing evaluator and formatter.
    #[must_use]
    pub fn with_parts(evaluator: Evaluator, formatter: ResultFormatter) -> Self {
        Self {
            evaluator,
            formatter,
            commands: CommandParser::new(),
        }
    }

    #[must_use]
    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    #[must_use]
    pub const fn formatter(&self) -> &ResultFormatter {
        &self.formatter
    }

    pub const fn formatter_mut(&mut self) -> &mut ResultFormatter {
        &mut self.formatter
    }

    /// Run one line: a command if it starts with a known keyword,
    /// otherwise an expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] for malformed commands and
    /// [`Error::Eval`] for failed expressions.
    pub fn process_line(&mut self, line: &str) -> Result<Outcome, Error> {
        if line.trim().is_empty() {
            return Ok(Outcome::Empty);
        }

        if let Some(invocation) = self.commands.parse(line)? {
            return Ok(invocation.execute(self)?);
        }

        let value = self.evaluator.evaluate(line)?;
        let formatted = self.formatter.format_value(value);
        debug!(%formatted, mode = %self.formatter.mode(), "formatted result");
        Ok(Outcome::Value(formatted))
    }
}
