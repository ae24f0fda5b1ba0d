//! Field helpers for structured logging

/// Characters kept in a prompt preview.
pub const PREVIEW_CHARS: usize = 100;

/// Truncate a prompt for logging (privacy-safe).
///
/// Returns None unless content logging is enabled. Otherwise returns the
/// first 100 characters, with "..." appended when the prompt was cut.
///
/// # Examples
///
/// ```
/// use sogum::logging::truncate_prompt;
///
/// assert_eq!(truncate_prompt("hello", false), None);
/// assert_eq!(truncate_prompt("hello", true).as_deref(), Some("hello"));
/// ```
pub fn truncate_prompt(prompt: &str, enabled: bool) -> Option<String> {
    if !enabled {
        return None;
    }

    let mut preview: String = prompt.chars().take(PREVIEW_CHARS).collect();
    if prompt.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}
