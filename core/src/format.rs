//! Length bounds implied by string formats.

/// Formats whose values have a fixed structure that a pattern cannot refine.
const PATTERNED_FORMATS: &[&str] = &["date", "date-time", "email", "uuid", "ipv4", "ipv6", "hostname"];

/// Returns the minimum length of strings with the given format.
///
/// # Examples
///
/// ```
/// use valuegen_core::format::{string_format_max, string_format_min};
///
/// assert_eq!(string_format_min(Some("date")), Some(10));
/// assert_eq!(string_format_max(Some("uuid")), Some(36));
/// assert_eq!(string_format_min(Some("password")), None);
/// assert_eq!(string_format_max(None), None);
/// ```
pub fn string_format_min(format: Option<&str>) -> Option<i64> {
    match format? {
        "date" => Some(10),
        "date-time" => Some(20),
        "uuid" => Some(36),
        "email" => Some(3),
        "ipv4" => Some(7),
        "ipv6" => Some(2),
        "hostname" => Some(1),
        _ => None,
    }
}

/// Returns the maximum length of strings with the given format.
pub fn string_format_max(format: Option<&str>) -> Option<i64> {
    match format? {
        "date" => Some(10),
        "date-time" => Some(35),
        "uuid" => Some(36),
        "email" => Some(320),
        "ipv4" => Some(15),
        "ipv6" => Some(39),
        "hostname" => Some(253),
        _ => None,
    }
}

/// Returns `true` if values of this format have their own fixed structure.
pub fn is_patterned_format(format: Option<&str>) -> bool {
    format.is_some_and(|f| PATTERNED_FORMATS.contains(&f))
}
