//! Shared `{field}`-style delimited placeholder template engine, used by
//! both the sidecar generator's custom-template feature and the file
//! organizer's destination-path patterns (spec.md §4.6/§4.7 both call for
//! "string templates with delimited placeholders" — one mechanism, two
//! consumers). Generalizes
//! `pipeline_common::utils::files::{expand_filename_template,
//! sanitize_filename}` from `%X`-style FFmpeg codes to named `{field}`
//! placeholders pulled from a record.

use std::collections::HashMap;

use thiserror::Error;

/// Named values a template may reference. Typically built from a
/// `MergedRecord`'s fields (performers joined, identifier, title, year)
/// by the caller — this crate knows nothing about that type.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unbalanced '{{' at byte offset {0}")]
    UnterminatedPlaceholder(usize),
    #[error("empty placeholder '{{}}' at byte offset {0}")]
    EmptyPlaceholder(usize),
    #[error("unexpected '}}' with no matching '{{' at byte offset {0}")]
    UnmatchedClose(usize),
}

/// Checks a template string is well-formed (every `{` has a matching `}`,
/// no empty `{}`) without needing a `TemplateContext` yet. Spec.md §4.6:
/// "template validation must succeed before first use."
pub fn validate(template: &str) -> Result<(), TemplateError> {
    let mut chars = template.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                let start = pos;
                let mut name = String::new();
                let mut closed = false;
                for (_, c2) in chars.by_ref() {
                    if c2 == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c2);
                }
                if !closed {
                    return Err(TemplateError::UnterminatedPlaceholder(start));
                }
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder(start));
                }
            }
            '}' => return Err(TemplateError::UnmatchedClose(pos)),
            _ => {}
        }
    }
    Ok(())
}

/// Substitutes every `{field}` placeholder with its value from `ctx`. A
/// placeholder with no entry in `ctx` is replaced with an empty string
/// rather than left literal, so a caller never has to special-case a
/// stray `{year}` surviving into a filename; an unrecognized non-`{}`
/// sequence is passed through untouched. Assumes `validate` already
/// succeeded — malformed templates are rendered best-effort.
pub fn render(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        let mut closed = false;
        for c2 in chars.by_ref() {
            if c2 == '}' {
                closed = true;
                break;
            }
            name.push(c2);
        }
        if closed {
            out.push_str(ctx.get(&name).unwrap_or(""));
        } else {
            out.push('{');
            out.push_str(&name);
        }
    }
    out
}

const DEFAULT_FILENAME: &str = "untitled";
const MAX_COMPONENT_LEN: usize = 200;

/// Sanitizes a string for use as a single filename or directory component:
/// strips characters invalid on common filesystems, trims leading/trailing
/// dots and spaces, falls back to a default name when empty, and caps
/// length.
pub fn sanitize_filename(input: &str) -> String {
    const INVALID: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        if INVALID.contains(&c) || c.is_control() {
            result.push('_');
        } else {
            result.push(c);
        }
    }

    let trimmed = result
        .trim_start_matches(['.', ' '])
        .trim_end_matches(['.', ' '])
        .to_string();

    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else if trimmed.chars().count() > MAX_COMPONENT_LEN {
        let mut truncated: String = trimmed.chars().take(MAX_COMPONENT_LEN).collect();
        truncated.push_str("...");
        truncated
    } else {
        trimmed
    }
}

/// Renders `template`, then sanitizes each `/`-separated component
/// independently — suitable for a path pattern that should be allowed to
/// contain directory separators (e.g. `organize.folder_pattern`) while
/// still rejecting invalid characters within each segment.
pub fn render_path(template: &str, ctx: &TemplateContext) -> String {
    render(template, ctx)
        .split('/')
        .map(sanitize_filename)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.insert("identifier", "ABC-123");
        ctx.insert("title", "Example Title");
        ctx.insert("year", "2024");
        ctx
    }

    #[test]
    fn renders_known_placeholders() {
        let rendered = render("{year}/{identifier} - {title}", &ctx());
        assert_eq!(rendered, "2024/ABC-123 - Example Title");
    }

    #[test]
    fn unknown_placeholder_becomes_empty() {
        let rendered = render("{identifier}-{missing}", &ctx());
        assert_eq!(rendered, "ABC-123-");
    }

    #[test]
    fn validate_rejects_unterminated_and_empty_placeholders() {
        assert!(validate("{identifier}").is_ok());
        assert_eq!(
            validate("{identifier"),
            Err(TemplateError::UnterminatedPlaceholder(0))
        );
        assert_eq!(validate("{}"), Err(TemplateError::EmptyPlaceholder(0)));
        assert_eq!(validate("abc}"), Err(TemplateError::UnmatchedClose(3)));
    }

    #[test]
    fn sanitize_filename_strips_invalid_characters() {
        assert_eq!(sanitize_filename("a/b:c*d"), "a_b_c_d");
        assert_eq!(sanitize_filename("  .leading"), "leading");
        assert_eq!(sanitize_filename(""), "untitled");
    }

    #[test]
    fn render_path_sanitizes_each_segment() {
        let mut ctx = TemplateContext::new();
        ctx.insert("performer", "A/B: Co");
        let rendered = render_path("Studio/{performer}", &ctx);
        assert_eq!(rendered, "Studio/A_B_ Co");
    }
}
