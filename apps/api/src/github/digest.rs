//! Digest building: language summary, file selection, and size-bounded bundling.

use std::collections::HashMap;

/// Per-file byte budget inside a digest.
pub const MAX_FILE_BYTES: usize = 8000;
/// Maximum number of files bundled per repository.
pub const MAX_FILES: usize = 4;
const MAX_LANGUAGES: usize = 5;
const TRUNCATION_MARKER: &str = "\n...(truncated)...";

/// Conventional top-level files worth showing the model.
pub const INTERESTING_FILES: &[&str] = &[
    "README.md",
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "main.py",
    "app.py",
    "server.js",
    "index.js",
    "App.tsx",
    "index.html",
    "go.mod",
    "Cargo.toml",
];

const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "go.mod",
    "Cargo.toml",
];

/// Sort class: README first, manifests second, everything else last.
fn priority(name: &str) -> u8 {
    if name.starts_with("README") {
        0
    } else if MANIFEST_FILES.contains(&name) {
        1
    } else {
        2
    }
}

/// Picks up to `MAX_FILES` allow-listed names, ordered by priority class.
/// Listing order is preserved within a class.
pub fn select_interesting_files<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut found: Vec<&str> = names
        .into_iter()
        .filter(|name| INTERESTING_FILES.contains(name))
        .collect();
    found.sort_by_key(|name| priority(name));
    found.truncate(MAX_FILES);
    found
}

/// Cuts `content` to `MAX_FILE_BYTES` on a char boundary and marks the cut.
pub fn truncate_content(content: &str) -> String {
    if content.len() <= MAX_FILE_BYTES {
        return content.to_string();
    }
    let mut end = MAX_FILE_BYTES;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &content[..end], TRUNCATION_MARKER)
}

/// "Rust 80%, Shell 20%": top five languages by byte count.
pub fn language_summary(bytes_by_language: &HashMap<String, u64>) -> String {
    let total: u64 = bytes_by_language.values().sum();
    if total == 0 {
        return String::new();
    }

    let mut languages: Vec<(&String, &u64)> = bytes_by_language.iter().collect();
    languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    languages
        .into_iter()
        .take(MAX_LANGUAGES)
        .map(|(language, bytes)| {
            let percent = (*bytes as f64 / total as f64 * 100.0).round();
            format!("{language} {percent}%")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `FILE:` block of the prompt bundle.
pub fn bundle_entry(path: &str, content: &str) -> String {
    format!("FILE: {path}\n{}\n\n", truncate_content(content))
}
