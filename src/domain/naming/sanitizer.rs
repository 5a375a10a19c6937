use chrono::{DateTime, Utc};

use super::collision::split_extension;

/// Longest name the sanitizer emits, leaving room for `(n)` collision suffixes.
pub const MAX_NAME_LEN: usize = 200;

const FALLBACK_PREFIX: &str = "uploaded_file_";

/// Final path segment of `raw`, splitting on both `/` and `\`.
pub fn basename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or_default()
}

/// Turns an untrusted client filename into a storable one.
pub fn sanitize(raw: &str) -> String {
    sanitize_at(raw, Utc::now())
}

/// Same as [`sanitize`] with an explicit clock for the fallback name.
pub fn sanitize_at(raw: &str, now: DateTime<Utc>) -> String {
    let filtered: String = basename(raw)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let capped = cap_length(filtered);
    if capped.chars().all(|c| c == '.') {
        return fallback_name(now);
    }

    capped
}

fn fallback_name(now: DateTime<Utc>) -> String {
    format!("{}{}", FALLBACK_PREFIX, now.format("%Y%m%d%H%M%S%6f"))
}

// Input is ASCII by now, so byte offsets are char boundaries.
fn cap_length(name: String) -> String {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }

    let (stem, extension) = split_extension(&name);
    if extension.len() >= MAX_NAME_LEN {
        return name[..MAX_NAME_LEN].to_string();
    }

    format!("{}{}", &stem[..MAX_NAME_LEN - extension.len()], extension)
}
