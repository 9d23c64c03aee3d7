//! Constraint pipeline shared by every way a field value can change.
//!
//! A raw candidate value is normalized, constrained for its [`TransformKind`],
//! optionally snapped to an increment and finally rounded to the field's
//! display precision. Rounding is half away from zero (`f64::round`).

use crate::field::TransformKind;
use crate::increment_lock::IncrementPolicy;

/// Smallest scale a field may hold. Zero and negative scales are rectified.
pub const MIN_SCALE: f64 = 0.0001;

/// Position fields are clamped to `-POSITION_LIMIT..=POSITION_LIMIT`.
pub const POSITION_LIMIT: f64 = 1_000_000.0;

/// Upper bound on decimal digits; more than this exceeds what an f64 can
/// round-trip for typical magnitudes.
pub const MAX_PRECISION: usize = 12;

/// Applies the full constraint pipeline to `raw`.
///
/// Non-finite input becomes the kind default before anything else runs. The
/// kind constraint is applied again after snapping and rounding, so the
/// result always satisfies it and `apply(apply(x)) == apply(x)`. The result
/// is always finite.
pub fn apply(raw: f64, kind: TransformKind, precision: usize, policy: IncrementPolicy) -> f64 {
    let value = if raw.is_finite() {
        raw
    } else {
        kind.default_value()
    };

    let constrained = constrain(value, kind);
    // value / step overflows for huge values; such a value is left unsnapped.
    let snapped = match policy.snap(constrained) {
        snapped if snapped.is_finite() => snapped,
        _ => constrained,
    };
    let rounded = round_to_precision(snapped, precision);
    constrain(rounded, kind)
}

/// Kind-specific range constraint.
///
/// Rotation is intentionally left unwrapped: values such as 270 or -720 are kept.
pub fn constrain(value: f64, kind: TransformKind) -> f64 {
    match kind {
        TransformKind::Scale => value.abs().max(MIN_SCALE),
        TransformKind::Rotation => value,
        TransformKind::Position => value.clamp(-POSITION_LIMIT, POSITION_LIMIT),
    }
}

/// Rounds to `precision` decimal digits, half away from zero.
///
/// Negative zero is normalized to positive zero so it never displays as `-0.00`.
pub fn round_to_precision(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    let rounded = (value * factor).round() / factor;
    if !rounded.is_finite() {
        // Magnitude too large to scale; it has no fractional digits anyway.
        return value;
    }
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Formats a committed value the way fields display it.
pub fn format_value(value: f64, precision: usize) -> String {
    format!("{:.prec$}", value, prec = precision.min(MAX_PRECISION))
}

/// Parses the longest numeric prefix of `text`, like JavaScript's `parseFloat`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with at
/// most one decimal point, and an optional exponent. Returns `None` when no
/// digits are found, e.g. for `""`, `"-"` or `"."`.
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        if digit_count > 0 {
            end = frac_end;
        }
    }
    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFF: IncrementPolicy = IncrementPolicy::DISABLED;

    fn is_multiple(value: f64, step: f64) -> bool {
        let ratio = value / step;
        (ratio - ratio.round()).abs() < 1e-6
    }

    #[test]
    fn non_finite_input_becomes_kind_default() {
        assert_eq!(apply(f64::NAN, TransformKind::Position, 3, OFF), 0.0);
        assert_eq!(apply(f64::NAN, TransformKind::Rotation, 1, OFF), 0.0);
        assert_eq!(apply(f64::NAN, TransformKind::Scale, 3, OFF), 1.0);
        assert_eq!(apply(f64::INFINITY, TransformKind::Scale, 3, OFF), 1.0);
    }

    #[test]
    fn scale_never_drops_below_floor() {
        for raw in [-5.0, -0.00001, 0.0, 0.00001, 0.0004, 0.03, 2.5] {
            let value = apply(raw, TransformKind::Scale, 3, OFF);
            assert!(value >= MIN_SCALE, "{raw} -> {value}");
        }
        // Snapping to a coarse step would otherwise produce zero.
        let locked = IncrementPolicy::new(true, 0.1);
        assert!(apply(0.03, TransformKind::Scale, 3, locked) >= MIN_SCALE);
    }

    #[test]
    fn scale_rectifies_sign() {
        assert_eq!(apply(-2.5, TransformKind::Scale, 3, OFF), 2.5);
    }

    #[test]
    fn rotation_is_not_wrapped() {
        assert_eq!(apply(270.0, TransformKind::Rotation, 1, OFF), 270.0);
        assert_eq!(apply(-720.0, TransformKind::Rotation, 1, OFF), -720.0);
    }

    #[test]
    fn position_is_clamped() {
        assert_eq!(apply(2e6, TransformKind::Position, 3, OFF), POSITION_LIMIT);
        assert_eq!(apply(-2e6, TransformKind::Position, 3, OFF), -POSITION_LIMIT);
    }

    #[test]
    fn locked_values_are_multiples_of_step() {
        let policy = IncrementPolicy::new(true, 0.25);
        for raw in [-3.3, -0.1, 0.0, 0.13, 1.9, 7.77, 123.456] {
            let value = apply(raw, TransformKind::Position, 3, policy);
            assert!(is_multiple(value, 0.25), "{raw} -> {value}");
        }
    }

    #[test]
    fn snapping_never_overflows_to_infinity() {
        let tenth = IncrementPolicy::new(true, 0.1);
        assert_eq!(apply(1e308, TransformKind::Rotation, 1, tenth), 1e308);
        assert_eq!(apply(-1e308, TransformKind::Rotation, 1, tenth), -1e308);

        let fine = IncrementPolicy::new(true, 1e-3);
        assert!(apply(1e308, TransformKind::Scale, 3, fine).is_finite());

        // Subnormal steps are unusable and snap like the fallback step.
        let tiny = IncrementPolicy::new(true, 1e-320);
        assert_eq!(apply(10.0, TransformKind::Rotation, 1, tiny), 10.0);
        assert_eq!(apply(10.4, TransformKind::Scale, 3, tiny), 10.0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_precision(0.125, 2), 0.13);
        assert_eq!(round_to_precision(-0.125, 2), -0.13);
        assert_eq!(round_to_precision(2.5, 0), 3.0);
        assert_eq!(round_to_precision(-2.5, 0), -3.0);
    }

    #[test]
    fn negative_zero_is_normalized() {
        let value = round_to_precision(-0.0001, 2);
        assert!(value.is_sign_positive());
        assert_eq!(format_value(value, 2), "0.00");
    }

    #[test]
    fn apply_is_idempotent() {
        let cases = [
            (12.34567, TransformKind::Position, 3, OFF),
            (0.00001, TransformKind::Scale, 3, OFF),
            (0.03, TransformKind::Scale, 3, IncrementPolicy::new(true, 0.1)),
            (33.3, TransformKind::Rotation, 1, IncrementPolicy::new(true, 15.0)),
            (0.77, TransformKind::Position, 1, IncrementPolicy::new(true, 0.25)),
            (5e6, TransformKind::Position, 3, OFF),
            (f64::NAN, TransformKind::Scale, 2, OFF),
        ];
        for (raw, kind, precision, policy) in cases {
            let once = apply(raw, kind, precision, policy);
            let twice = apply(once, kind, precision, policy);
            assert_eq!(once, twice, "{raw} {kind:?}");
        }
    }

    #[test]
    fn parse_float_takes_numeric_prefix() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("  -2"), Some(-2.0));
        assert_eq!(parse_float("+.5"), Some(0.5));
        assert_eq!(parse_float("1."), Some(1.0));
        assert_eq!(parse_float("3abc"), Some(3.0));
        assert_eq!(parse_float("2e3"), Some(2000.0));
        assert_eq!(parse_float("2e"), Some(2.0));
        assert_eq!(parse_float("1.2.3"), Some(1.2));
    }

    #[test]
    fn parse_float_rejects_missing_digits() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("-."), None);
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn format_uses_precision() {
        assert_eq!(format_value(1.0, 3), "1.000");
        assert_eq!(format_value(-12.5, 1), "-12.5");
    }
}
