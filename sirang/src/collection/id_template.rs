use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use crate::errors::{ErrorKind, SirangError, SirangResult};

// `{{` / `}}` escapes, a positional slot `{}` / `{0}` with an optional
// `:[0]width[d]` spec, or a stray brace
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{0?(?::(0?)(\d+)d?)?\}|\{|\}").expect("valid id template pattern")
});

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot { zero_pad: bool, width: usize },
}

/// A format string with exactly one positional slot, used to mint `_id`s.
///
/// The slot is written `{}` or `{0}`, optionally with a width such as
/// `{:03}` or `{:03d}`. Literal braces are written `{{` and `}}`.
///
/// ```rust,ignore
/// let template = IdTemplate::parse("run-{:03}")?;
/// assert_eq!(template.format(7), "run-007");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl IdTemplate {
    /// Parses `template`.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::InvalidTemplate] if the template has no slot, more
    /// than one slot, or an unmatched brace.
    pub fn parse(template: &str) -> SirangResult<IdTemplate> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut slots = 0;
        let mut last = 0;

        for captures in TOKEN.captures_iter(template) {
            let token = match captures.get(0) {
                Some(token) => token,
                None => continue,
            };
            literal.push_str(&template[last..token.start()]);
            last = token.end();

            match token.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => {
                    log::error!("Unmatched brace in id template {:?}", template);
                    return Err(SirangError::new(
                        &format!("Unmatched brace in id template {:?}", template),
                        ErrorKind::InvalidTemplate,
                    ));
                }
                _ => {
                    slots += 1;
                    let zero_pad = captures.get(1).is_some_and(|m| m.as_str() == "0");
                    let width = match captures.get(2) {
                        Some(width) => width.as_str().parse::<usize>().map_err(|err| {
                            SirangError::new(
                                &format!("Invalid slot width in id template {:?}: {}", template, err),
                                ErrorKind::InvalidTemplate,
                            )
                        })?,
                        None => 0,
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot { zero_pad, width });
                }
            }
        }
        literal.push_str(&template[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if slots != 1 {
            log::error!(
                "Id template {:?} must contain exactly one positional slot, found {}",
                template,
                slots
            );
            return Err(SirangError::new(
                &format!(
                    "Id template {:?} must contain exactly one positional slot, found {}",
                    template, slots
                ),
                ErrorKind::InvalidTemplate,
            ));
        }

        Ok(IdTemplate {
            source: template.to_string(),
            segments,
        })
    }

    /// Substitutes `counter` into the slot.
    pub fn format(&self, counter: i64) -> String {
        let mut out = String::with_capacity(self.source.len() + 8);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot { zero_pad: true, width } => {
                    out.push_str(&format!("{:0width$}", counter, width = *width))
                }
                Segment::Slot { zero_pad: false, width } => {
                    out.push_str(&format!("{:>width$}", counter, width = *width))
                }
            }
        }
        out
    }

    /// Returns the template as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Display for IdTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_slot() {
        let template = IdTemplate::parse("doc-{}").unwrap();
        assert_eq!(template.format(0), "doc-0");
        assert_eq!(template.format(12), "doc-12");
    }

    #[test]
    fn formats_indexed_slot() {
        let template = IdTemplate::parse("{0}_res").unwrap();
        assert_eq!(template.format(5), "5_res");
    }

    #[test]
    fn formats_zero_padded_width() {
        let template = IdTemplate::parse("run-{:03d}").unwrap();
        assert_eq!(template.format(7), "run-007");
        let template = IdTemplate::parse("run-{0:04}").unwrap();
        assert_eq!(template.format(42), "run-0042");
    }

    #[test]
    fn formats_space_padded_width() {
        let template = IdTemplate::parse("[{:3}]").unwrap();
        assert_eq!(template.format(7), "[  7]");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let template = IdTemplate::parse("{{x}}-{}").unwrap();
        assert_eq!(template.format(1), "{x}-1");
    }

    #[test]
    fn negative_counter_is_formatted() {
        let template = IdTemplate::parse("n{}").unwrap();
        assert_eq!(template.format(-2), "n-2");
    }

    #[test]
    fn rejects_template_without_slot() {
        let err = IdTemplate::parse("~invert").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTemplate);
    }

    #[test]
    fn rejects_template_with_two_slots() {
        let err = IdTemplate::parse("{}-{}").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTemplate);
    }

    #[test]
    fn rejects_named_or_unmatched_slot() {
        assert!(IdTemplate::parse("{name}").is_err());
        assert!(IdTemplate::parse("doc-{").is_err());
        assert!(IdTemplate::parse("doc-}{}").is_err());
    }

    #[test]
    fn keeps_source_text() {
        let template = IdTemplate::parse("res_{}").unwrap();
        assert_eq!(template.as_str(), "res_{}");
        assert_eq!(template.to_string(), "res_{}");
    }
}
