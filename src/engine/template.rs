use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("placeholder pattern is valid")
});

/// Template processor for `{{VAR}}` substitution in engine command lines.
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Replace every `{{VAR}}` whose name is in `vars`.
    ///
    /// Substitution is a single pass, so values are never re-expanded.
    /// Unknown placeholders are left as they are.
    pub fn process(content: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
