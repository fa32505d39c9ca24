// Shared prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Replaces `{key}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so user text containing something
/// like `{github_summary}` reaches the model verbatim. Unknown placeholders are
/// left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let matched = values.iter().find_map(|(key, value)| {
            tail.strip_prefix('{')?
                .strip_prefix(*key)?
                .strip_prefix('}')
                .map(|after| (*value, after))
        });

        match matched {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
