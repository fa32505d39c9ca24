//! Repository reference parsing from free-form user input.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::RepoRef;

/// `owner/repo`, bare or after a `github.com/` host. GitHub caps owner names at 39 chars.
static REPO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:github\.com/|^)([A-Za-z0-9-]{1,39})/([A-Za-z0-9_.-]+)")
        .expect("repository pattern is valid")
});

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("separator pattern is valid"));

/// Extracts repository references, deduplicated by canonical URL in first-seen order.
/// Tokens that do not look like a repository are dropped.
pub fn parse_repo_references(input: &str) -> Vec<RepoRef> {
    let mut seen = HashSet::new();

    SEPARATORS
        .split(input)
        .filter_map(parse_token)
        .filter(|repo| seen.insert(repo.url.clone()))
        .collect()
}

fn parse_token(token: &str) -> Option<RepoRef> {
    let clean = token.trim().trim_end_matches('/');
    if clean.is_empty() {
        return None;
    }

    let captures = REPO_PATTERN.captures(clean)?;
    let owner = captures.get(1)?.as_str();
    let name = captures.get(2)?.as_str();
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    Some(RepoRef::new(owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(refs: &[RepoRef]) -> Vec<String> {
        refs.iter()
            .map(|r| format!("{}/{}", r.owner, r.name))
            .collect()
    }

    #[test]
    fn test_mixed_separators_and_duplicates() {
        let refs = parse_repo_references("https://github.com/alice/proj1, bob/proj2 bob/proj2");
        assert_eq!(slugs(&refs), vec!["alice/proj1", "bob/proj2"]);
        assert_eq!(refs[0].url, "https://github.com/alice/proj1");
    }

    #[test]
    fn test_url_and_bare_forms_collapse_to_one() {
        let refs = parse_repo_references("bob/proj2\nhttps://github.com/bob/proj2/");
        assert_eq!(slugs(&refs), vec!["bob/proj2"]);
    }

    #[test]
    fn test_deep_links_and_git_suffix() {
        let refs = parse_repo_references(
            "https://github.com/tokio-rs/tokio/tree/master/tokio https://github.com/serde-rs/json.git",
        );
        assert_eq!(slugs(&refs), vec!["tokio-rs/tokio", "serde-rs/json"]);
    }

    #[test]
    fn test_non_repository_tokens_are_dropped() {
        let refs = parse_repo_references("hello, world https://example.com  ,,  ");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_repo_references("").is_empty());
    }

    #[test]
    fn test_dotted_repository_names() {
        let refs = parse_repo_references("someone/someone.github.io");
        assert_eq!(slugs(&refs), vec!["someone/someone.github.io"]);
    }
}
