//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use radix_calc::formatter::MAX_PRECISION;
use radix_calc::{OutputMode, ResultFormatter};

/// rcalc - arithmetic calculator with variables and radix literals
#[derive(Parser, Debug)]
#[command(name = "rcalc", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive calculator (default)
    Repl,

    /// Evaluate expressions and print their results
    Eval(EvalArgs),

    /// Process a file of calculator input, one line at a time
    Run(RunArgs),
}

/// Arguments for the `eval` command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expressions to evaluate, in order, sharing variables
    #[arg(required = true)]
    pub expressions: Vec<String>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input file, or `-` for standard input
    pub path: PathBuf,
}

/// Initial output format.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Output mode for results
    #[arg(long, global = true, value_enum, default_value_t = Mode::Real)]
    pub mode: Mode,

    /// Digits of precision, 0 to 64 (meaning depends on the mode)
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u16).range(0..=i64::from(MAX_PRECISION))
    )]
    pub precision: Option<u16>,
}

impl FormatArgs {
    #[must_use]
    pub fn formatter(&self) -> ResultFormatter {
        let mut formatter = ResultFormatter::new();
        formatter.set_mode(self.mode.into());
        formatter.set_precision(self.precision.map(usize::from));
        formatter
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Fixed,
    #[default]
    Real,
    Sci,
    Bin,
    Oct,
    Hex,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Fixed => Self::Fixed,
            Mode::Real => Self::Real,
            Mode::Sci => Self::Scientific,
            Mode::Bin => Self::Binary,
            Mode::Oct => Self::Octal,
            Mode::Hex => Self::Hexadecimal,
        }
    }
}
