use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Renders `at` in local time with a strftime-style pattern.
pub fn format_local(at: SystemTime, format_str: &str) -> String {
    DateTime::<Local>::from(at).format(format_str).to_string()
}

pub fn current_local_timestamp_str(format_str: &str) -> String {
    format_local(SystemTime::now(), format_str)
}

/// False when the pattern contains a specifier chrono cannot render.
/// Formatting such a pattern panics, so configs are checked up front.
pub fn is_valid_timestamp_format(format_str: &str) -> bool {
    !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
}
