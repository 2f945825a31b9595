/* src/validate.rs */

use once_cell::sync::Lazy;
use regex::Regex;

static TIME_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]*[wWdDhHmMsS]?$").expect("time literal pattern"));

static MX_PRIORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{0,2}$").expect("mx priority pattern"));

/// A DNS duration: digits without a leading zero, optionally followed by a
/// single unit letter (w, d, h, m or s, either case).
pub fn is_valid_time_literal(value: &str) -> bool {
    TIME_LITERAL.is_match(value)
}

/// Dotted-quad check: exactly four parts of 1-3 digits, each no greater than 255.
/// Leading zeros are accepted as long as the part stays within three digits.
pub fn is_valid_ipv4(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        (1..=3).contains(&part.len())
            && part.bytes().all(|b| b.is_ascii_digit())
            && part.parse::<u16>().map_or(false, |n| n <= 255)
    })
}

/// MX preference in the range 1-999, written without leading zeros.
pub fn parse_mx_priority(value: &str) -> Option<u16> {
    if !MX_PRIORITY.is_match(value) {
        return None;
    }
    value.parse().ok()
}
