//! Message templates with named placeholders.
//!
//! `{name}` is replaced by the value supplied for `name`; `{{` and `}}` are
//! literal braces. Placeholders are checked against the names a rule
//! provides when the template is parsed, so rendering never fails.

use tracing::warn;

use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template, accepting only placeholders listed in `allowed`.
    pub fn parse(source: &str, allowed: &[&str]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            match ch {
                '{' if chars.peek().is_some_and(|(_, next)| *next == '{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().is_some_and(|(_, next)| *next == '}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed || name.contains('{') {
                        return Err(TemplateError::UnbalancedBrace {
                            position,
                            template: source.to_string(),
                        });
                    }
                    let name = name.trim().to_string();
                    if !allowed.contains(&name.as_str()) {
                        return Err(TemplateError::UnknownPlaceholder {
                            name,
                            template: source.to_string(),
                        });
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(TemplateError::UnbalancedBrace {
                        position,
                        template: source.to_string(),
                    });
                }
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Use `custom` when it parses, otherwise fall back to `default`.
    ///
    /// A caller-supplied template that references an unknown placeholder or
    /// has unbalanced braces is logged and replaced by the default wording.
    pub fn custom_or_default(custom: Option<&str>, default: &str, allowed: &[&str]) -> Self {
        if let Some(custom) = custom {
            match Self::parse(custom, allowed) {
                Ok(template) => return template,
                Err(error) => warn!(%error, "falling back to default message template"),
            }
        }
        Self::parse(default, allowed).unwrap_or_else(|_| Self::literal(default))
    }

    fn literal(text: &str) -> Self {
        Self {
            source: text.to_string(),
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute placeholders; names missing from `values` render empty.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some((_, value)) = values.iter().find(|(key, _)| *key == name.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}
