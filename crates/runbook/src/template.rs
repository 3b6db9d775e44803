// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command templates

use jx_core::JobParams;
use regex::Regex;
use std::sync::LazyLock;

// Regex pattern for {param_name}
#[allow(clippy::expect_used)]
static PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_-]*)\}").expect("constant regex pattern is valid")
});

// Regex pattern for ${VAR:-default} environment variable expansion
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+):-([^}]*)\}").expect("constant regex pattern is valid"));

/// Render a shell command from its template
///
/// `${VAR:-default}` is expanded from the environment first. Then every
/// `{param}` is replaced by the parameter's value, shell-quoted so it
/// stays a single word. Unknown placeholders are left as-is.
pub fn interpolate(template: &str, params: &JobParams) -> String {
    let expanded = ENV_PATTERN.replace_all(template, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[2].to_string())
    });

    PARAM_PATTERN
        .replace_all(&expanded, |caps: &regex::Captures| match params.get(&caps[1]) {
            Some(value) => shell_quote(&value.to_string()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of the `{param}` placeholders in a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PARAM_PATTERN.captures_iter(template) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Quote `value` for `sh` unless it is made only of safe characters
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
