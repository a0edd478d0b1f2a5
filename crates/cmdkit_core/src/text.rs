//! Pure text helpers with no host dependencies.

use once_cell::sync::Lazy;
use regex::Regex;

static INVALID_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("filename pattern must compile"));

/// Returns whether `filename` is non-blank and free of reserved characters.
pub fn is_valid_filename(filename: &str) -> bool {
    if filename.trim().is_empty() {
        return false;
    }
    !INVALID_FILENAME_CHARS.is_match(filename)
}

/// Builds a greeting, defaulting to the world when `name` is blank.
pub fn create_greeting(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "Hello World!".to_string();
    }
    format!("Hello {name}!")
}

/// Counts whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Last `/`- or `\`-separated segment of a path, or `Unknown`.
pub fn display_file_name(path: &str) -> &str {
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::{count_words, create_greeting, display_file_name, is_valid_filename};

    #[test]
    fn filename_validation() {
        assert!(is_valid_filename("notes.txt"));
        assert!(is_valid_filename("my file-1.md"));
        assert!(!is_valid_filename(""));
        assert!(!is_valid_filename("   "));
        for bad in ["a<b", "a>b", "a:b", "a\"b", "a/b", "a\\b", "a|b", "a?b", "a*b"] {
            assert!(!is_valid_filename(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn greeting_trims_and_defaults() {
        assert_eq!(create_greeting(""), "Hello World!");
        assert_eq!(create_greeting("  "), "Hello World!");
        assert_eq!(create_greeting("  Ada "), "Hello Ada!");
    }

    #[test]
    fn word_count_ignores_runs_of_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
        assert_eq!(count_words("one  two\nthree\tfour "), 4);
    }

    #[test]
    fn file_name_takes_last_segment() {
        assert_eq!(display_file_name("/home/me/project/main.rs"), "main.rs");
        assert_eq!(display_file_name("C:\\work\\lib.rs"), "lib.rs");
        assert_eq!(display_file_name("plain.txt"), "plain.txt");
        assert_eq!(display_file_name("/trailing/"), "Unknown");
    }
}
