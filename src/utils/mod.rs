//! Utility functions and helpers

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Generate a short hash of the given content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// `PrimaryButton`, `primary button`, `primary_button` → `primary-button`
pub fn dash_case(input: &str) -> String {
    let split = WORD_BOUNDARY.replace_all(input, "$1-$2");
    NON_ALPHANUMERIC
        .replace_all(&split, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// `primary-button`, `primary button` → `PrimaryButton`
pub fn upper_camel_case(input: &str) -> String {
    dash_case(input)
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Name suitable for a package manifest
pub fn slugify(input: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&input.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Relative module prefix from one output folder to another.
///
/// Folders are given as path segments from the project root. The result
/// always starts with `.`: `"."` when both folders coincide, `"./x"` when
/// descending and `"../x"` when ascending.
pub fn relative_prefix(from: &[String], to: &[String]) -> String {
    let from: PathBuf = from.iter().collect();
    let to: PathBuf = to.iter().collect();

    let relative = pathdiff::diff_paths(&to, &from)
        .map(|p| p.display().to_string().replace('\\', "/"))
        .unwrap_or_default();

    if relative.is_empty() {
        ".".to_string()
    } else if relative.starts_with("..") {
        relative
    } else {
        format!("./{}", relative)
    }
}

/// Join a module prefix and a file path without doubling separators
pub fn join_module_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches("./").trim_start_matches('/');
    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Prefix a root-relative asset path; absolute URLs and relative paths are left alone
pub fn prefix_assets_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() || Url::parse(path).is_ok() || !path.starts_with('/') {
        return path.to_string();
    }
    format!("{}{}", prefix.trim_end_matches('/'), path)
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.0}ms", secs * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hash_content() {
        let hash = hash_content(b"hello world");
        assert_eq!(hash.len(), 16);
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(dash_case("PrimaryButton"), "primary-button");
        assert_eq!(dash_case("about us_page"), "about-us-page");
        assert_eq!(dash_case("backgroundColor"), "background-color");
        assert_eq!(upper_camel_case("primary-button"), "PrimaryButton");
        assert_eq!(upper_camel_case("Home"), "Home");
        assert_eq!(upper_camel_case("my page"), "MyPage");
        assert_eq!(slugify("My Great Project!"), "my-great-project");
    }

    #[test]
    fn test_relative_prefix() {
        let components = segments(&["src", "components"]);
        assert_eq!(relative_prefix(&segments(&["src", "views"]), &components), "../components");
        assert_eq!(
            relative_prefix(&segments(&["src", "views", "blog"]), &components),
            "../../components"
        );
        assert_eq!(relative_prefix(&components, &components), ".");
        assert_eq!(relative_prefix(&segments(&["src"]), &components), "./components");
        assert_eq!(relative_prefix(&[], &[]), ".");
    }

    #[test]
    fn test_join_module_path() {
        assert_eq!(join_module_path(".", "card"), "./card");
        assert_eq!(join_module_path("../components/", "./card"), "../components/card");
    }

    #[test]
    fn test_prefix_assets_path() {
        assert_eq!(prefix_assets_path("/static", "/logo.png"), "/static/logo.png");
        assert_eq!(
            prefix_assets_path("/static", "https://cdn.example.com/logo.png"),
            "https://cdn.example.com/logo.png"
        );
        assert_eq!(prefix_assets_path("", "/logo.png"), "/logo.png");
        assert_eq!(prefix_assets_path("/static", "logo.png"), "logo.png");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
    }
}
