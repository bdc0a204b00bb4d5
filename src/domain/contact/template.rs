//! HTML email template rendering
//!
//! Placeholders use the `${var:name}` syntax. Every substituted value is
//! HTML-escaped, so user input can never introduce markup.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match placeholders: ${var:name}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z][a-zA-Z0-9_-]*)\}").expect("placeholder pattern is valid")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed HTML template
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    content: String,
    variables: Vec<String>,
}

impl HtmlTemplate {
    /// Parse a template string and collect its placeholder names
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut seen = HashSet::new();
        let mut variables = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();

            if seen.insert(name.clone()) {
                variables.push(name);
            }
        }

        Self { content, variables }
    }

    /// Placeholder names in order of first appearance
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Render with every value HTML-escaped
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures<'_>| {
            values
                .get(&cap[1])
                .map(|value| escape_html(value))
                .unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

/// Escape the five HTML-significant characters
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        let template = HtmlTemplate::parse("<p>${var:name}</p><a href=\"mailto:${var:email}\">${var:email}</a>");
        assert_eq!(template.variables(), &["name".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_render_substitutes_all_occurrences() {
        let template = HtmlTemplate::parse("${var:email} / ${var:email}");
        let values = HashMap::from([("email", "a@x.com")]);

        assert_eq!(template.render(&values).unwrap(), "a@x.com / a@x.com");
    }

    #[test]
    fn test_render_escapes_values() {
        let template = HtmlTemplate::parse("<p>${var:message}</p>");
        let values = HashMap::from([("message", "<script>alert('x') & \"y\"</script>")]);

        let rendered = template.render(&values).unwrap();
        assert_eq!(
            rendered,
            "<p>&lt;script&gt;alert(&#x27;x&#x27;) &amp; &quot;y&quot;&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_render_missing_variable() {
        let template = HtmlTemplate::parse("Hello ${var:name}");
        let values = HashMap::new();

        assert_eq!(
            template.render(&values),
            Err(TemplateError::MissingVariable {
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("Hello, world"), "Hello, world");
    }

    #[test]
    fn test_placeholder_in_value_is_not_expanded() {
        let template = HtmlTemplate::parse("${var:name}|${var:message}");
        let values = HashMap::from([("name", "${var:message}"), ("message", "hi")]);

        assert_eq!(template.render(&values).unwrap(), "${var:message}|hi");
    }
}
