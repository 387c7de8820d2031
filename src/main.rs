//! rcalc - interactive calculator with variables and radix literals.

mod cli;

use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command, EvalArgs, RunArgs};
use radix_calc::{Error, Evaluator, Outcome, Session};
use tracing::{debug, warn};

const PROMPT: &str = "rcalc >> ";

fn main() -> ExitCode {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level, WARN when unset.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let session = Session::with_parts(Evaluator::new(), cli.format.formatter());

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => repl(session, io::stdin().lock(), io::stdout().lock()),
        Command::Eval(args) => Ok(eval(session, &args)),
        Command::Run(args) => run(session, &args),
    };

    result.unwrap_or_else(|e| {
        eprintln!("rcalc: {e}");
        ExitCode::FAILURE
    })
}

/// Text shown for a failed line, prefixed by its kind.
fn describe(err: &Error) -> String {
    match err {
        Error::Command(_) => format!("COMMAND ERROR: {err}"),
        Error::Lex(_) | Error::Eval(_) => format!("ERROR: {err}"),
    }
}

/// Read-eval-print loop. Errors are reported and the loop continues;
/// it ends on `exit` or end of input.
fn repl<R: BufRead, W: Write>(
    mut session: Session,
    mut input: R,
    mut out: W,
) -> io::Result<ExitCode> {
    writeln!(
        out,
        "rcalc version {}\n\nType 'exit' and ENTER to quit.",
        env!("CARGO_PKG_VERSION")
    )?;

    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(ExitCode::SUCCESS);
        }

        match session.process_line(&line) {
            Ok(Outcome::Value(text) | Outcome::Message(text)) => writeln!(out, "{text}")?,
            Ok(Outcome::Exit) => return Ok(ExitCode::SUCCESS),
            Ok(Outcome::Empty) => {}
            Err(e) => {
                debug!(error = %e, "line failed");
                writeln!(out, "{}", describe(&e))?;
            }
        }
    }
}

/// Process each argument in one session, stopping at the first error.
fn eval(mut session: Session, args: &EvalArgs) -> ExitCode {
    for expression in &args.expressions {
        match session.process_line(expression) {
            Ok(Outcome::Value(text) | Outcome::Message(text)) => println!("{text}"),
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Empty) => {}
            Err(e) => {
                eprintln!("{expression}: {}", describe(&e));
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Process a file (or stdin for `-`) line by line without prompts.
fn run(mut session: Session, args: &RunArgs) -> io::Result<ExitCode> {
    let display = args.path.display().to_string();
    let content = if display == "-" {
        io::read_to_string(io::stdin())?
    } else {
        match fs::read_to_string(&args.path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{display}: {e}");
                return Ok(ExitCode::from(2));
            }
        }
    };

    let mut out = io::stdout().lock();
    for (index, line) in content.lines().enumerate() {
        match session.process_line(line) {
            Ok(Outcome::Value(text) | Outcome::Message(text)) => writeln!(out, "{text}")?,
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Empty) => {}
            Err(e) => {
                warn!(line = index + 1, "stopping at failed line");
                eprintln!("{display}:{}: {}", index + 1, describe(&e));
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(input: &str) -> String {
        let mut out = Vec::new();
        repl(Session::new(), input.as_bytes(), &mut out).expect("repl failed");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn repl_evaluates_until_exit() {
        let out = transcript("1 + 2\nexit\n3 + 4\n");
        assert!(out.contains(&format!("{PROMPT}3\n")));
        assert!(!out.contains('7'));
    }

    #[test]
    fn repl_reports_errors_and_continues() {
        let out = transcript("1 / 0\nbogus\n$x = 5\n");
        assert!(out.contains("ERROR: divide by zero at line 1, column 3"));
        assert!(out.contains("COMMAND ERROR: command not found: bogus"));
        assert!(out.contains(&format!("{PROMPT}5\n")));
    }

    #[test]
    fn repl_ends_at_eof() {
        let out = transcript("");
        assert!(out.starts_with("rcalc version"));
        assert!(out.ends_with(&format!("{PROMPT}\n")));
    }
}
