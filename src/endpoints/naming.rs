//! Best-effort API naming from a directory name.
//!
//! `confluence-api` becomes "Confluence API" and `billing_service` becomes
//! "Billing Service API". The result is a guess; it is neither unique nor
//! guaranteed to be meaningful.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"));

/// Guess a display name for the API rooted at `dir`.
pub fn guess_api_name(dir: &Path) -> String {
    let base = dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let words: Vec<String> = NON_ALPHANUMERIC
        .split(base)
        .map(str::to_lowercase)
        .filter(|word| !word.is_empty() && !word.contains("api"))
        .map(|word| capitalize(&word))
        .collect();

    if words.is_empty() {
        "API".to_string()
    } else {
        format!("{} API", words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_api_name() {
        let cases = [
            ("/repo/apps/confluence-api", "Confluence API"),
            ("/repo/billing_service", "Billing Service API"),
            ("/repo/GitHub.App", "Github App API"),
            ("/repo/webapi", "API"),
            ("/repo/core-APIs-v2", "Core V2 API"),
            ("/", "API"),
        ];
        for (dir, expected) in cases {
            assert_eq!(guess_api_name(Path::new(dir)), expected, "for {dir}");
        }
    }
}
