use std::sync::OnceLock;

use regex::Regex;

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A placeholder names an environment variable, optionally with a default
/// used when the variable is unset. An unset variable without a default is
/// an error. Lines starting with `#` (TOML comments) are passed through
/// unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut failure: Option<String> = None;
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let expanded = placeholder().replace_all(line, |captures: &regex::Captures<'_>| {
            let key = &captures[1];
            let fallback = captures.get(2).map(|m| m.as_str());

            match key.strip_prefix("env.") {
                Some(var) if !var.is_empty() && !var.contains('.') => match std::env::var(var) {
                    Ok(value) => value,
                    Err(_) => fallback.map_or_else(
                        || {
                            failure.get_or_insert_with(|| format!("environment variable not found: `{var}`"));
                            String::new()
                        },
                        str::to_string,
                    ),
                },
                _ => {
                    failure.get_or_insert_with(|| format!("only variables scoped with 'env.' are supported: `{key}`"));
                    String::new()
                }
            }
        });
        output.push_str(&expanded);
    }

    if let Some(err) = failure {
        return Err(err);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
