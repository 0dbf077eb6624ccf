//! Best-effort scrubbing of telemetry payloads.
//!
//! Error messages routinely embed file paths and credential material, so
//! every message is passed through `sanitize` before it reaches disk. This
//! is a heuristic scrubber, not a redaction guarantee — short secrets and
//! unusual path shapes can slip through.

use once_cell::sync::Lazy;
use regex::Regex;

/// Stored messages are capped at this many characters.
const MAX_MESSAGE_CHARS: usize = 500;

/// Path-like substrings: two or more `/segment` components in a row.
static PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\S+/\S+").expect("regex: path"));

/// Contiguous alphanumeric runs of 20+ characters — tokens, keys, hashes.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]{20,}").expect("regex: token"));

/// Scrub `message` for storage: paths → `<path>`, long alphanumeric runs →
/// `<redacted>`, then truncate to 500 characters.
pub fn sanitize(message: &str) -> String {
    let scrubbed = PATH_PATTERN.replace_all(message, "<path>");
    let scrubbed = TOKEN_PATTERN.replace_all(&scrubbed, "<redacted>");

    if scrubbed.chars().count() > MAX_MESSAGE_CHARS {
        scrubbed.chars().take(MAX_MESSAGE_CHARS).collect()
    } else {
        scrubbed.into_owned()
    }
}
