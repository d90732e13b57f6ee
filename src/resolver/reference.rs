//! Reference rules
//!
//! A rule is a minijinja template rendered against `Name` and `Value`. An
//! empty rendering means "not a reference"; anything else is the parameter
//! name to fetch.

use minijinja::{context, Environment, UndefinedBehavior};

use crate::error::ReferenceRuleError;

const TEMPLATE_NAME: &str = "reference";

/// Compiled reference rule
#[derive(Debug)]
pub struct ReferenceRule {
    env: Environment<'static>,
}

impl ReferenceRule {
    /// Compile a rule expression.
    ///
    /// The rule is also rendered once against empty inputs so that calls to
    /// unknown helpers or variables fail here instead of on the first entry.
    pub fn new(expression: impl Into<String>) -> Result<Self, ReferenceRuleError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        register_helpers(&mut env);
        env.add_template_owned(TEMPLATE_NAME, expression.into())
            .map_err(ReferenceRuleError::Compile)?;

        let rule = Self { env };
        rule.render("", "").map_err(ReferenceRuleError::Compile)?;

        Ok(rule)
    }

    /// Extract the parameter name referenced by `value`, if any
    pub fn parameter(&self, name: &str, value: &str) -> Result<Option<String>, ReferenceRuleError> {
        let rendered = self
            .render(name, value)
            .map_err(|source| ReferenceRuleError::Render {
                name: name.to_string(),
                source,
            })?;

        if rendered.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rendered))
        }
    }

    fn render(&self, name: &str, value: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template(TEMPLATE_NAME)?
            .render(context! { Name => name, Value => value })
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    env.add_function("contains", contains);
    env.add_function("has_prefix", has_prefix);
    env.add_function("has_suffix", has_suffix);
    env.add_function("trim_prefix", trim_prefix);
    env.add_function("trim_suffix", trim_suffix);
    env.add_function("trim_space", trim_space);
    env.add_function("trim", trim);
    env.add_function("trim_left", trim_left);
    env.add_function("trim_right", trim_right);
    env.add_function("title", title);
    env.add_function("to_title", to_title);
    env.add_function("to_lower", to_lower);
    env.add_function("to_upper", to_upper);
}

fn contains(value: &str, substr: &str) -> bool {
    value.contains(substr)
}

fn has_prefix(value: &str, prefix: &str) -> bool {
    value.starts_with(prefix)
}

fn has_suffix(value: &str, suffix: &str) -> bool {
    value.ends_with(suffix)
}

fn trim_prefix(value: &str, prefix: &str) -> String {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
}

fn trim_suffix(value: &str, suffix: &str) -> String {
    value.strip_suffix(suffix).unwrap_or(value).to_string()
}

fn trim_space(value: &str) -> String {
    value.trim().to_string()
}

// Without a cutset these trim whitespace.
fn trim(value: &str, cutset: Option<&str>) -> String {
    match cutset {
        Some(cutset) => value.trim_matches(|c: char| cutset.contains(c)).to_string(),
        None => value.trim().to_string(),
    }
}

fn trim_left(value: &str, cutset: Option<&str>) -> String {
    match cutset {
        Some(cutset) => value.trim_start_matches(|c: char| cutset.contains(c)).to_string(),
        None => value.trim_start().to_string(),
    }
}

fn trim_right(value: &str, cutset: Option<&str>) -> String {
    match cutset {
        Some(cutset) => value.trim_end_matches(|c: char| cutset.contains(c)).to_string(),
        None => value.trim_end().to_string(),
    }
}

/// Upper-case the first letter of every word
fn title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

fn to_title(value: &str) -> String {
    value.to_uppercase()
}

fn to_lower(value: &str) -> String {
    value.to_lowercase()
}

fn to_upper(value: &str) -> String {
    value.to_uppercase()
}
