//! `D.HH:MM:SS` duration strings used throughout the protocol schema.

use super::error::ProtocolError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Parse `D.HH:MM:SS`, `HH:MM:SS`, `MM:SS` or `SS` into whole seconds.
///
/// Surrounding whitespace is ignored and an empty string is zero. A leading
/// `D.` is only a day count when everything before the dot is digits.
///
/// # Examples
/// ```
/// use fyt_core::protocol::duration::parse_seconds;
///
/// assert_eq!(parse_seconds("1.02:00:30").unwrap(), 86_400 + 7_230);
/// assert_eq!(parse_seconds("05:00").unwrap(), 300);
/// ```
///
/// # Errors
/// `InvalidDuration` for non-numeric fields, more than three `:` groups, or
/// a total that does not fit in `u64`.
pub fn parse_seconds(input: &str) -> Result<u64, ProtocolError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let invalid = || ProtocolError::InvalidDuration {
        value: input.to_string(),
    };

    let (days, rest) = match trimmed.split_once('.') {
        Some((days, rest)) if !days.is_empty() && days.bytes().all(|b| b.is_ascii_digit()) => {
            (days.parse::<u64>().map_err(|_| invalid())?, rest)
        }
        _ => (0, trimmed),
    };

    let fields = rest
        .split(':')
        .map(|field| parse_field(field.trim()).ok_or_else(invalid))
        .collect::<Result<Vec<_>, _>>()?;
    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        [s] => (0, 0, *s),
        _ => return Err(invalid()),
    };

    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|total| total.checked_add(hours.checked_mul(SECONDS_PER_HOUR)?))
        .and_then(|total| total.checked_add(minutes.checked_mul(SECONDS_PER_MINUTE)?))
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(invalid)
}

// Empty fields count as zero, matching hand-edited files like "00::30".
fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() {
        return Some(0);
    }
    field.parse::<u64>().ok()
}

/// Format whole seconds as `HH:MM:SS`, prefixed with `D.` when days > 0.
///
/// # Examples
/// ```
/// use fyt_core::protocol::duration::format_seconds;
///
/// assert_eq!(format_seconds(59), "00:00:59");
/// assert_eq!(format_seconds(90_061), "1.01:01:01");
/// ```
pub fn format_seconds(total: u64) -> String {
    let days = total / SECONDS_PER_DAY;
    let rem = total % SECONDS_PER_DAY;
    let hms = format!(
        "{:02}:{:02}:{:02}",
        rem / SECONDS_PER_HOUR,
        rem % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        rem % SECONDS_PER_MINUTE
    );
    if days > 0 { format!("{days}.{hms}") } else { hms }
}

#[cfg(test)]
mod tests {
    use super::{format_seconds, parse_seconds};
    use crate::protocol::error::ProtocolError;

    #[test]
    fn parse_all_shapes() {
        assert_eq!(parse_seconds("").unwrap(), 0);
        assert_eq!(parse_seconds("  ").unwrap(), 0);
        assert_eq!(parse_seconds("45").unwrap(), 45);
        assert_eq!(parse_seconds("02:03").unwrap(), 123);
        assert_eq!(parse_seconds("12:00:00").unwrap(), 43_200);
        assert_eq!(parse_seconds(" 2.00:00:01 ").unwrap(), 172_801);
    }

    #[test]
    fn parse_tolerates_empty_fields() {
        assert_eq!(parse_seconds("00::30").unwrap(), 30);
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["ab:cd", "1:2:3:4", "x.01:00:00", "-5"] {
            let err = parse_seconds(input).unwrap_err();
            assert!(matches!(err, ProtocolError::InvalidDuration { .. }), "{input}");
        }
    }

    #[test]
    fn format_preserves_days() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(43_200), "12:00:00");
        assert_eq!(format_seconds(86_400), "1.00:00:00");
    }

    #[test]
    fn format_then_parse_is_stable() {
        for seconds in [0, 1, 59, 3_600, 86_399, 86_400, 1_000_000] {
            assert_eq!(parse_seconds(&format_seconds(seconds)).unwrap(), seconds);
        }
    }
}
