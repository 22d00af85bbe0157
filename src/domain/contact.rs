//! Outbound contact deep links.
//!
//! Phone numbers are reduced to digits-only international form before they
//! are embedded in `tel:` or WhatsApp links.

use url::Url;

use crate::domain::foundation::ValidationError;

/// Length of a national number written without any prefix.
const LOCAL_NUMBER_LEN: usize = 10;

/// Digits-only international form of `raw`, or `None` when it has no digits.
///
/// - `+44 20 ...` keeps its digits as written
/// - `0044 20 ...` drops the `00` international prefix
/// - `020 ...` swaps the trunk `0` for `default_country_code`
/// - a bare ten-digit national number gets `default_country_code` prepended
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Option<String> {
    let explicit_international = raw.trim_start().starts_with('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let country: String = default_country_code
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let normalized = if explicit_international {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", country, rest)
    } else if digits.len() == LOCAL_NUMBER_LEN {
        format!("{}{}", country, digits)
    } else {
        digits
    };
    Some(normalized).filter(|n| !n.is_empty())
}

pub fn tel_link(raw: &str, default_country_code: &str) -> Result<String, ValidationError> {
    let digits = require_phone(raw, default_country_code)?;
    Ok(format!("tel:+{}", digits))
}

pub fn mailto_link(email: &str, subject: Option<&str>) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ValidationError::invalid_format("email", "not an email address"));
    }
    let base = format!("mailto:{}", email);
    let url = match subject {
        Some(subject) => Url::parse_with_params(&base, &[("subject", subject)]),
        None => Url::parse(&base),
    }
    .map_err(|e| ValidationError::invalid_format("email", e.to_string()))?;
    Ok(url.to_string())
}

/// `https://wa.me/<digits>?text=<message>`.
pub fn whatsapp_link(
    raw: &str,
    default_country_code: &str,
    text: &str,
) -> Result<String, ValidationError> {
    let digits = require_phone(raw, default_country_code)?;
    let url = Url::parse_with_params(&format!("https://wa.me/{}", digits), &[("text", text)])
        .map_err(|e| ValidationError::invalid_format("phone", e.to_string()))?;
    Ok(url.to_string())
}

fn require_phone(raw: &str, default_country_code: &str) -> Result<String, ValidationError> {
    normalize_phone(raw, default_country_code)
        .ok_or_else(|| ValidationError::invalid_format("phone", "no digits"))
}
