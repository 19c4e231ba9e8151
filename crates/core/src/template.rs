//! `{{path}}` template substitution
//!
//! The first placeholder is resolved against the value map with
//! [`crate::path::resolve`] and replaced by the value's string form, then the
//! result is scanned again from the start. Rendering stops once no placeholder
//! is left, so placeholders produced by a substituted value are expanded too.
//! A value that keeps producing placeholders (`{"a": "{{a}}"}`) fails after
//! [`MAX_SUBSTITUTIONS`].

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

use crate::error::TemplateError;
use crate::path;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+(?:\.\w+|\[\w+\])*)\}\}").unwrap());

/// Substitutions allowed in one render.
pub const MAX_SUBSTITUTIONS: usize = 10_000;

/// Render `template` against `values`.
pub fn render(template: &str, values: &Value) -> Result<String, TemplateError> {
    let mut output = template.to_string();
    let mut substitutions = 0;

    while let Some(placeholder) = PLACEHOLDER.find(&output) {
        if substitutions == MAX_SUBSTITUTIONS {
            return Err(TemplateError {
                limit: MAX_SUBSTITUTIONS,
            });
        }

        let range = placeholder.range();
        let path = &placeholder.as_str()[2..placeholder.len() - 2];
        let value = path::resolve(values, path)
            .map(stringify)
            .unwrap_or_default();

        output.replace_range(range, &value);
        substitutions += 1;
    }

    Ok(output)
}

/// String form of a leaf value.
///
/// Strings are used verbatim and booleans become `true`/`false`. Numbers use
/// their JSON representation, except that integral floats drop the fraction
/// (`640.0` renders as `640`). `null`, arrays and objects are not valid
/// leaves and render as the empty string.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(f) if number.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => number.to_string(),
    }
}
