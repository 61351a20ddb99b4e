//! Parsing of durations for command line flags.

use std::time::Duration;

/// An error that may occur when parsing a duration.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DurationError {
    /// The duration is empty.
    #[error("The duration is empty")]
    Empty,

    /// The duration is not valid.
    #[error("The duration {input:?} is invalid")]
    Invalid {
        /// The input string.
        input: String,
    },

    /// A component of the duration is missing a unit.
    #[error("The duration {input:?} is missing a unit")]
    MissingUnit {
        /// The input string.
        input: String,
    },

    /// A component of the duration uses an unknown unit.
    #[error("The duration {input:?} uses the unknown unit {unit:?}")]
    UnknownUnit {
        /// The unknown unit.
        unit: String,
        /// The input string.
        input: String,
    },

    /// The duration is negative.
    #[error("The duration {input:?} is negative")]
    Negative {
        /// The input string.
        input: String,
    },

    /// The duration is too large.
    #[error("The duration {input:?} is too large")]
    Overflow {
        /// The input string.
        input: String,
    },
}

/// Returns the number of nanoseconds in `unit`.
fn nanos_per_unit(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => 1,
        "us" | "\u{00b5}s" | "\u{03bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => return None,
    })
}

/// Parses a duration from a sequence of decimal numbers, each with a unit suffix.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
/// Numbers may have a fraction (e.g. `1.5h`) and a lone `0` requires no unit.
///
/// # Errors
///
/// Returns an error if
/// - `input` is empty,
/// - a number or unit is missing,
/// - a unit is unknown,
/// - the duration is negative,
/// - or the duration is too large to be represented.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use signstar_flags::parse_duration;
///
/// # fn main() -> testresult::TestResult {
/// assert_eq!(parse_duration("3h20m")?, Duration::from_secs(3 * 3600 + 20 * 60));
/// assert_eq!(parse_duration("0")?, Duration::ZERO);
/// assert!(parse_duration("12").is_err());
/// # Ok(())
/// # }
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid {
        input: input.to_string(),
    };
    let overflow = || DurationError::Overflow {
        input: input.to_string(),
    };

    let mut rest = input;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if rest.starts_with('-') {
        return Err(DurationError::Negative {
            input: input.to_string(),
        });
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(if input.is_empty() {
            DurationError::Empty
        } else {
            invalid()
        });
    }

    let mut nanos: u64 = 0;
    while !rest.is_empty() {
        let bytes = rest.as_bytes();
        if !(bytes[0].is_ascii_digit() || bytes[0] == b'.') {
            return Err(invalid());
        }

        // integer part
        let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        let mut value: u64 = 0;
        for digit in &bytes[..int_len] {
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(u64::from(digit - b'0')))
                .ok_or_else(overflow)?;
        }
        let mut consumed = int_len;

        // fractional part, digits beyond what fits are ignored
        let mut fraction: u64 = 0;
        let mut scale: f64 = 1.0;
        let mut frac_len = 0;
        if bytes.get(consumed) == Some(&b'.') {
            consumed += 1;
            frac_len = bytes[consumed..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            for digit in &bytes[consumed..consumed + frac_len] {
                if let Some(next) = fraction
                    .checked_mul(10)
                    .and_then(|fraction| fraction.checked_add(u64::from(digit - b'0')))
                {
                    fraction = next;
                    scale *= 10.0;
                }
            }
            consumed += frac_len;
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid());
        }

        let unit_len = bytes[consumed..]
            .iter()
            .take_while(|b| !(b.is_ascii_digit() || **b == b'.'))
            .count();
        if unit_len == 0 {
            return Err(DurationError::MissingUnit {
                input: input.to_string(),
            });
        }
        let unit = &rest[consumed..consumed + unit_len];
        let Some(unit_nanos) = nanos_per_unit(unit) else {
            return Err(DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            });
        };
        rest = &rest[consumed + unit_len..];

        let mut component = value.checked_mul(unit_nanos).ok_or_else(overflow)?;
        if fraction > 0 {
            let fraction_nanos = (fraction as f64 * (unit_nanos as f64 / scale)) as u64;
            component = component.checked_add(fraction_nanos).ok_or_else(overflow)?;
        }
        nanos = nanos.checked_add(component).ok_or_else(overflow)?;
    }

    Ok(Duration::from_nanos(nanos))
}
