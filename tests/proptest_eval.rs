//! Property-based tests with proptest.
//!
//! Generate random literals and operator chains, render them as text,
//! and check the evaluator agrees with direct `f64` arithmetic.

mod common;

use common::assert_close;
use proptest::prelude::*;
use radix_calc::evaluator::MAX_NESTING;
use radix_calc::{EvalErrorKind, Evaluator, LexErrorKind};

/// Small positive integers keep sums and products exact.
fn operand() -> impl Strategy<Value = u32> {
    1u32..1000
}

fn additive_chain() -> impl Strategy<Value = (u32, Vec<(bool, u32)>)> {
    (operand(), prop::collection::vec((any::<bool>(), operand()), 0..12))
}

proptest! {
    #[test]
    fn addition_and_subtraction_fold_left((first, rest) in additive_chain()) {
        let mut text = first.to_string();
        let mut expected = f64::from(first);
        for (plus, n) in &rest {
            text.push_str(if *plus { " + " } else { " - " });
            text.push_str(&n.to_string());
            if *plus {
                expected += f64::from(*n);
            } else {
                expected -= f64::from(*n);
            }
        }

        let actual = Evaluator::new().evaluate(&text).unwrap();
        prop_assert!((actual - expected).abs() < f64::EPSILON, "{text}");
    }

    #[test]
    fn division_folds_left(values in prop::collection::vec(operand(), 1..6)) {
        let text = values
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        let expected = values[1..]
            .iter()
            .fold(f64::from(values[0]), |acc, n| acc / f64::from(*n));

        let actual = Evaluator::new().evaluate(&text).unwrap();
        assert_close(actual, expected);
    }

    #[test]
    fn radix_literals_reinterpret_as_i32(bits in any::<u32>()) {
        let expected = f64::from(i32::from_ne_bytes(bits.to_ne_bytes()));
        let mut evaluator = Evaluator::new();

        for text in [
            format!("b${bits:b}"),
            format!("o${bits:o}"),
            format!("h${bits:x}"),
            format!("h${bits:X}"),
        ] {
            let actual = evaluator.evaluate(&text).unwrap();
            prop_assert!((actual - expected).abs() < f64::EPSILON, "{text}");
        }
    }

    #[test]
    fn radix_literals_above_u32_overflow(value in (u64::from(u32::MAX) + 1)..=u64::MAX) {
        let text = format!("h${value:x}");
        let err = Evaluator::new().evaluate(&text).unwrap_err();
        prop_assert!(
            matches!(err.kind, EvalErrorKind::Lex(LexErrorKind::Overflow(_))),
            "{text}"
        );
    }

    #[test]
    fn parentheses_do_not_change_a_value(n in operand(), depth in 0usize..20) {
        let text = format!("{}{n}{}", "(".repeat(depth), ")".repeat(depth));
        let actual = Evaluator::new().evaluate(&text).unwrap();
        prop_assert!((actual - f64::from(n)).abs() < f64::EPSILON);
    }

    #[test]
    fn nesting_beyond_the_limit_is_rejected(
        depth in (MAX_NESTING + 1)..(MAX_NESTING * 40),
        sign in any::<bool>(),
    ) {
        let text = if sign {
            format!("{}7", "-".repeat(depth))
        } else {
            format!("{}7{}", "(".repeat(depth), ")".repeat(depth))
        };
        let err = Evaluator::new().evaluate(&text).unwrap_err();
        prop_assert_eq!(err.kind, EvalErrorKind::TooDeep);
    }

    #[test]
    fn division_by_zero_never_yields_infinity(n in operand(), depth in 0usize..5) {
        let text = format!("{}{n} / 0{}", "(".repeat(depth), ")".repeat(depth));
        let err = Evaluator::new().evaluate(&text).unwrap_err();
        prop_assert_eq!(err.kind, EvalErrorKind::DivideByZero);
    }

    #[test]
    fn evaluation_is_idempotent((first, rest) in additive_chain()) {
        let mut text = first.to_string();
        for (plus, n) in &rest {
            text.push_str(if *plus { " * " } else { " / " });
            text.push_str(&n.to_string());
        }

        let mut evaluator = Evaluator::new();
        let once = evaluator.evaluate(&text).unwrap();
        let twice = evaluator.evaluate(&text).unwrap();
        prop_assert!(once.to_bits() == twice.to_bits());
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,40}") {
        let _ = Evaluator::new().evaluate(&input);
    }
}
