//! Duration strings such as `"300ms"`, `"1.5s"` or `"1h15m"`.
//!
//! A duration is an optional sign followed by one or more `<decimal><unit>`
//! groups. Valid units are `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`.
//! The bare string `"0"` is accepted without a unit.

use crate::ProbeError;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest representable duration, matching a signed 64-bit nanosecond count.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this do not change the result at nanosecond
/// resolution for any unit.
const MAX_FRACTION_DIGITS: u32 = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Splits the leading run of ASCII digits off `s`.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s.split_at(end)
}

pub fn parse_duration(input: &str) -> Result<Duration, ProbeError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ProbeError::invalid_duration(input, "empty duration"));
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let (whole, tail) = split_digits(rest);
        rest = tail;

        let (fraction, tail) = match rest.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", rest),
        };
        let had_dot = rest.starts_with('.');
        rest = tail;

        if whole.is_empty() && fraction.is_empty() {
            return Err(ProbeError::invalid_duration(input, "expected a number"));
        }

        let unit_end = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        let (unit, tail) = rest.split_at(unit_end);
        rest = tail;

        if unit.is_empty() {
            return Err(ProbeError::invalid_duration(input, "missing unit"));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| ProbeError::invalid_duration(input, format!("unknown unit {unit:?}")))?;

        let overflow = || ProbeError::invalid_duration(input, "duration out of range");

        let whole_value = if whole.is_empty() {
            0
        } else {
            whole.parse::<u128>().map_err(|_| overflow())?
        };
        let mut group = whole_value.checked_mul(scale).ok_or_else(overflow)?;

        if had_dot && !fraction.is_empty() {
            let kept = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS as usize)];
            let numerator: u128 = kept.parse().map_err(|_| overflow())?;
            let denominator = 10u128.pow(kept.len() as u32);
            group += numerator * scale / denominator;
        }

        total = total.checked_add(group).ok_or_else(overflow)?;
        if total > MAX_NANOS {
            return Err(overflow());
        }
    }

    if negative && total != 0 {
        return Err(ProbeError::invalid_duration(
            input,
            "negative durations are not allowed",
        ));
    }

    Ok(Duration::from_nanos(total as u64))
}
