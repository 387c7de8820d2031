//! Session tests: commands and expressions interleaved the way the
//! interactive shell feeds them.

use radix_calc::{
    Command, CommandError, CommandParser, Error, EvalErrorKind, Evaluator, OutputMode, Outcome,
    ResultFormatter, Session,
};

fn value(session: &mut Session, line: &str) -> String {
    match session.process_line(line) {
        Ok(Outcome::Value(text)) => text,
        other => panic!("expected a value for {line:?}, got {other:?}"),
    }
}

fn message(session: &mut Session, line: &str) -> String {
    match session.process_line(line) {
        Ok(Outcome::Message(text)) => text,
        other => panic!("expected a message for {line:?}, got {other:?}"),
    }
}

#[test]
fn default_output_is_real() {
    let mut session = Session::new();
    assert_eq!(value(&mut session, "1234.56789"), "1234.56789");
    assert_eq!(value(&mut session, "1 / 3"), "0.3333333333333333");
}

#[test]
fn fix_with_and_without_precision() {
    let mut session = Session::new();
    session.process_line("fix").unwrap();
    assert_eq!(value(&mut session, "1 / 3"), "0.33");

    session.process_line("fix 4").unwrap();
    assert_eq!(session.formatter().mode(), OutputMode::Fixed);
    assert_eq!(session.formatter().precision(), Some(4));
    assert_eq!(value(&mut session, "1 / 3"), "0.3333");
}

#[test]
fn sci_and_real_precision() {
    let mut session = Session::new();
    session.process_line("sci").unwrap();
    assert_eq!(value(&mut session, "1234.56789"), "1.23e+03");

    session.process_line("sci 3").unwrap();
    assert_eq!(value(&mut session, "1234.56789"), "1.235e+03");

    session.process_line("real 4").unwrap();
    assert_eq!(value(&mut session, "3.14159"), "3.142");

    session.process_line("real").unwrap();
    assert_eq!(session.formatter().precision(), None);
}

#[test]
fn radix_modes() {
    let mut session = Session::new();
    session.process_line("bin").unwrap();
    assert_eq!(
        value(&mut session, "123456789"),
        "00000111010110111100110100010101"
    );
    session.process_line("oct").unwrap();
    assert_eq!(value(&mut session, "123456789"), "000726746425");
    session.process_line("hex").unwrap();
    assert_eq!(value(&mut session, "123456789"), "075bcd15");
    assert_eq!(value(&mut session, "h$ffffffff"), "ffffffff");
}

#[test]
fn mode_change_keeps_variables() {
    let mut session = Session::new();
    session.process_line("$a = 255").unwrap();
    session.process_line("hex").unwrap();
    assert_eq!(value(&mut session, "$a"), "000000ff");
    assert_eq!(session.evaluator().variable("$a"), Some(255.0));
}

#[test]
fn vars_uses_current_format() {
    let mut session = Session::new();
    session.process_line("$x = 10").unwrap();
    session.process_line("hex").unwrap();
    assert_eq!(
        message(&mut session, "vars"),
        "Variables:\n$ans => 0000000a\n$x => 0000000a"
    );
}

#[test]
fn help_lists_every_command() {
    let mut session = Session::new();
    let text = message(&mut session, "help");
    for command in Command::ALL {
        let (syntax, description) = command.usage();
        assert!(text.contains(syntax), "missing {syntax}");
        assert!(text.contains(description), "missing {description}");
    }
}

#[test]
fn command_errors() {
    let mut session = Session::new();
    assert_eq!(
        session.process_line("fix 2 5"),
        Err(Error::Command(CommandError::TooManyArguments))
    );
    assert_eq!(
        session.process_line("hex 2"),
        Err(Error::Command(CommandError::TooManyArguments))
    );
    assert_eq!(
        session.process_line("fix 2.5"),
        Err(Error::Command(CommandError::InvalidArguments))
    );
    assert_eq!(
        session.process_line("sci 100"),
        Err(Error::Command(CommandError::InvalidArguments))
    );
    assert_eq!(
        session.process_line("cos 1"),
        Err(Error::Command(CommandError::NotFound("cos".to_string())))
    );
    // Failed commands leave the format alone.
    assert_eq!(*session.formatter(), ResultFormatter::new());
}

#[test]
fn expression_errors() {
    let mut session = Session::new();
    let err = session.process_line("2 * (3 + 1").unwrap_err();
    assert!(matches!(
        err,
        Error::Eval(ref e) if e.kind == EvalErrorKind::MissingClosingParenthesis
    ));
    assert_eq!(err.to_string(), "')' expected at line 1, column 11");
}

#[test]
fn session_from_parts() {
    let mut formatter = ResultFormatter::new();
    formatter.set_mode(OutputMode::Hexadecimal);
    let mut evaluator = Evaluator::new();
    evaluator.evaluate("$seed = 16").unwrap();

    let mut session = Session::with_parts(evaluator, formatter);
    assert_eq!(value(&mut session, "$seed"), "00000010");
}

#[test]
fn parser_is_reusable() {
    let parser = CommandParser::new();
    assert!(parser.parse("oct").unwrap().is_some());
    assert!(parser.parse("oct").unwrap().is_some());
    assert!(parser.parse("8 * 8").unwrap().is_none());
}
