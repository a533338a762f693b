// Utility modules

/// Canonicalize a Nigerian phone number to international `234...` digit form.
///
/// Accepted shapes: 11 digits starting with `0` (local), 10 digits (local
/// without the leading zero), 13 digits starting with `234` (already
/// international). Anything else is not a phone number and yields `None`.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 if digits.starts_with('0') => Some(format!("234{}", &digits[1..])),
        10 => Some(format!("234{digits}")),
        13 if digits.starts_with("234") => Some(digits),
        _ => None,
    }
}

/// Parse an env-style on/off flag the same way across the codebase.
pub fn flag_is_set(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_phone_number_handles_local_form() {
        assert_eq!(
            normalize_phone_number("08012345678").as_deref(),
            Some("2348012345678")
        );
    }

    #[test]
    fn normalize_phone_number_prefixes_ten_digits() {
        assert_eq!(
            normalize_phone_number("8012345678").as_deref(),
            Some("2348012345678")
        );
    }

    #[test]
    fn normalize_phone_number_keeps_international_form() {
        assert_eq!(
            normalize_phone_number("2348012345678").as_deref(),
            Some("2348012345678")
        );
    }

    #[test]
    fn normalize_phone_number_strips_formatting() {
        assert_eq!(
            normalize_phone_number("+234 801 234 5678").as_deref(),
            Some("2348012345678")
        );
    }

    #[test]
    fn normalize_phone_number_rejects_short_input() {
        assert_eq!(normalize_phone_number("123"), None);
    }

    #[test]
    fn normalize_phone_number_rejects_eleven_digits_without_zero() {
        assert_eq!(normalize_phone_number("18012345678"), None);
    }

    #[test]
    fn flag_is_set_accepts_common_forms() {
        assert!(flag_is_set("1"));
        assert!(flag_is_set(" TRUE "));
        assert!(flag_is_set("yes"));
        assert!(!flag_is_set("0"));
        assert!(!flag_is_set("off"));
    }
}
