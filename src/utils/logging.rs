use serde::Serialize;

/// Longest rendering handed to a debug log line.
const PRETTY_JSON_MAX_CHARS: usize = 4096;

/// Pretty-prints `value` for a DEBUG event, skipping the serialization entirely when DEBUG is
/// off. Oversized output is cut and suffixed with `…`.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize + ?Sized,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    if pretty_json.chars().count() > PRETTY_JSON_MAX_CHARS {
        let mut cut: String = pretty_json.chars().take(PRETTY_JSON_MAX_CHARS).collect();
        cut.push('…');
        log_action(cut.as_str());
    } else {
        log_action(pretty_json.as_str());
    }
}
