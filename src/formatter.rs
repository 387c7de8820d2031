//! Renders evaluation results in a chosen notation or radix.

use std::fmt;

/// How [`ResultFormatter::format_value`] renders a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Fixed-point decimal notation.
    Fixed,
    /// Decimal or scientific, whichever is shorter (`%g` style).
    #[default]
    Real,
    /// Scientific notation, `d.ddde+XX`.
    Scientific,
    /// 32-bit two's-complement binary.
    Binary,
    /// 32-bit two's-complement octal.
    Octal,
    /// 32-bit two's-complement hexadecimal.
    Hexadecimal,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fixed => "fixed",
            Self::Real => "real",
            Self::Scientific => "scientific",
            Self::Binary => "binary",
            Self::Octal => "octal",
            Self::Hexadecimal => "hexadecimal",
        };
        f.write_str(name)
    }
}

/// Decimal exponent from which `Real` output without a precision
/// switches to scientific notation.
const REAL_EXPONENT_LIMIT: i32 = 6;

/// Largest precision a formatter uses. Larger requests are clamped.
pub const MAX_PRECISION: u16 = 64;

/// Output mode plus precision.
///
/// A precision of `None` means the shortest representation that
/// reads back as the same `f64`. For `Fixed` and `Scientific` the
/// precision counts digits after the point; for `Real` it counts
/// significant digits. Radix modes ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultFormatter {
    mode: OutputMode,
    precision: Option<usize>,
}

impl ResultFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    #[must_use]
    pub const fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// Set the precision, clamped to [`MAX_PRECISION`].
    pub fn set_precision(&mut self, precision: Option<usize>) {
        self.precision = precision.map(|p| p.min(usize::from(MAX_PRECISION)));
    }

    /// Format `value` according to the current mode and precision.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        if !value.is_finite() && !self.is_radix() {
            return value.to_string();
        }

        match self.mode {
            OutputMode::Fixed => match self.precision {
                Some(p) => format!("{value:.p$}"),
                None => value.to_string(),
            },
            OutputMode::Real => format_real(value, self.precision),
            OutputMode::Scientific => {
                let raw = match self.precision {
                    Some(p) => format!("{value:.p$e}"),
                    None => format!("{value:e}"),
                };
                normalize_exponent(&raw)
            }
            OutputMode::Binary => format!("{:032b}", bit_pattern(value)),
            OutputMode::Octal => format!("{:012o}", bit_pattern(value)),
            OutputMode::Hexadecimal => format!("{:08x}", bit_pattern(value)),
        }
    }

    const fn is_radix(&self) -> bool {
        matches!(
            self.mode,
            OutputMode::Binary | OutputMode::Octal | OutputMode::Hexadecimal
        )
    }
}

/// Bit pattern of `value` truncated toward zero.
///
/// Integers that fit in 32 bits, signed or unsigned, give their 32-bit
/// pattern so `-1` is `ffffffff`. Anything wider gives the full 64-bit
/// two's-complement pattern. Values outside the `i64` range saturate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bit_pattern(value: f64) -> u64 {
    let integer = value as i64;
    if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&integer) {
        u64::from(integer as u32)
    } else {
        integer as u64
    }
}

fn format_real(value: f64, precision: Option<usize>) -> String {
    let significant = precision.map(|p| p.max(1));
    let raw = match significant {
        Some(p) => format!("{:.*e}", p - 1, value),
        None => format!("{value:e}"),
    };
    let (mantissa, exponent) = split_exponent(&raw);
    let limit = significant.map_or(REAL_EXPONENT_LIMIT, |p| {
        i32::try_from(p).unwrap_or(i32::MAX)
    });

    if exponent < -4 || exponent >= limit {
        let mantissa = trim_fraction(mantissa);
        return format!("{mantissa}{}", exponent_suffix(exponent));
    }

    match significant {
        None => value.to_string(),
        Some(_) => {
            // Here -4 <= exponent < limit, so this is never negative.
            let decimals = usize::try_from(limit - 1 - exponent).unwrap_or(0);
            trim_fraction(&format!("{value:.decimals$}")).to_string()
        }
    }
}

/// Split Rust's `1.5e-7` exponent form into mantissa and exponent.
fn split_exponent(raw: &str) -> (&str, i32) {
    raw.split_once('e').map_or((raw, 0), |(mantissa, exp)| {
        (mantissa, exp.parse().unwrap_or(0))
    })
}

/// Rewrite `1.5e7` as `1.5e+07`.
fn normalize_exponent(raw: &str) -> String {
    let (mantissa, exponent) = split_exponent(raw);
    format!("{mantissa}{}", exponent_suffix(exponent))
}

fn exponent_suffix(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{sign}{:02}", exponent.unsigned_abs())
}

/// Drop trailing zeros after a decimal point, and the point itself
/// if nothing is left behind it.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
