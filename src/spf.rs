/* src/spf.rs */

use crate::errors::SpfError;
use crate::validate::is_valid_ipv4;
use once_cell::sync::Lazy;
use regex::Regex;

static DOTTED_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)+$").expect("dotted numeric pattern"));

const DEFAULT_QUALIFIER: char = '?';

/// Builds an SPF policy from a criteria list such as `10.0.0.1,mail.example.net[~]`.
///
/// Numeric items become `ip4:` terms, everything else an `include:`. The optional
/// `[x]` suffix picks the qualifier of the closing `all` term (`?` when absent).
/// The result is unquoted.
pub fn build_spf_record(criteria: &str) -> Result<String, SpfError> {
    let (criteria, qualifier) = split_qualifier(criteria)?;

    let mut components = vec!["v=spf1".to_string()];

    if !criteria.is_empty() {
        for item in criteria.split(',').map(str::trim) {
            if DOTTED_NUMERIC.is_match(item) {
                if !is_valid_ipv4(item) {
                    return Err(SpfError::InvalidIpv4(item.to_string()));
                }
                components.push(format!("ip4:{}", item));
            } else {
                components.push(format!("include:{}", item));
            }
        }
    }

    // "+all" is the SPF default, written without the prefix.
    let all = match qualifier {
        '+' => "all".to_string(),
        q => format!("{}all", q),
    };
    components.push(all);

    Ok(components.join(" "))
}

fn split_qualifier(criteria: &str) -> Result<(&str, char), SpfError> {
    let Some(inner) = criteria.strip_suffix(']') else {
        return Ok((criteria, DEFAULT_QUALIFIER));
    };

    let mut chars = inner.chars();
    let (Some(qualifier), Some('[')) = (chars.next_back(), chars.next_back()) else {
        return Ok((criteria, DEFAULT_QUALIFIER));
    };

    if !matches!(qualifier, '+' | '?' | '~' | '-') {
        return Err(SpfError::InvalidQualifier(qualifier));
    }

    Ok((chars.as_str().trim(), qualifier))
}
