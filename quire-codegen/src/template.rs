//! Placeholder templates.
//!
//! A template is literal text with placeholders of the form `#{name}` or
//! `#{name:T}`, where `#` is the active marker, `name` a binding and `T` a
//! one-character formatter tag. A doubled marker (`##`) stands for one
//! literal marker.
//!
//! Templates are scanned by a small state machine; no backtracking.

use std::ops::Range;

use crate::{
    context::ContextStack,
    error::{Result, TemplateSource},
    format::{FormatContext, FormatterRegistry},
};

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'t> {
    Literal(String),
    Placeholder(Placeholder<'t>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder<'t> {
    pub name: &'t str,
    pub tag: Option<char>,
    /// Byte range of the whole placeholder, marker included.
    pub span: Range<usize>,
}

enum State {
    Literal,
    Marker { start: usize },
    Name { start: usize, name_start: usize },
    Tag { start: usize, name: Range<usize>, tag: Option<char> },
}

/// Double every marker so the text renders back to itself.
pub fn escape(text: &str, marker: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == marker {
            out.push(marker);
        }
        out.push(c);
    }
    out
}

/// Check that `marker` can delimit placeholders.
pub(crate) fn is_valid_marker(marker: char) -> bool {
    !(marker.is_alphanumeric() || marker.is_whitespace() || matches!(marker, '{' | '}' | ':' | '_'))
}

pub(crate) fn parse<'t>(
    template: &'t str,
    marker: char,
    source: &TemplateSource,
) -> Result<Vec<Segment<'t>>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut state = State::Literal;

    for (i, c) in template.char_indices() {
        state = match state {
            State::Literal if c == marker => State::Marker { start: i },
            State::Literal => {
                literal.push(c);
                State::Literal
            }
            State::Marker { .. } if c == marker => {
                literal.push(marker);
                State::Literal
            }
            State::Marker { start } if c == '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                State::Name {
                    start,
                    name_start: i + 1,
                }
            }
            State::Marker { start } => {
                return Err(source.stray_marker(marker, start..i + c.len_utf8()));
            }
            State::Name { start, name_start } if c == '}' || c == ':' => {
                if name_start == i {
                    return Err(source.malformed("missing binding name", start..i + 1));
                }
                if c == '}' {
                    segments.push(Segment::Placeholder(Placeholder {
                        name: &template[name_start..i],
                        tag: None,
                        span: start..i + 1,
                    }));
                    State::Literal
                } else {
                    State::Tag {
                        start,
                        name: name_start..i,
                        tag: None,
                    }
                }
            }
            State::Name { start, name_start } if c.is_alphanumeric() || c == '_' => {
                State::Name { start, name_start }
            }
            State::Name { .. } => {
                return Err(source.malformed(
                    format!("`{c}` is not allowed in a binding name"),
                    i..i + c.len_utf8(),
                ));
            }
            State::Tag { start, name, tag } if c == '}' => {
                let Some(tag) = tag else {
                    return Err(source.malformed("missing formatter tag", start..i + 1));
                };
                segments.push(Segment::Placeholder(Placeholder {
                    name: &template[name],
                    tag: Some(tag),
                    span: start..i + 1,
                }));
                State::Literal
            }
            State::Tag { start, name, tag: None } if !c.is_whitespace() => State::Tag {
                start,
                name,
                tag: Some(c),
            },
            State::Tag { start, .. } => {
                return Err(source.malformed(
                    "formatter tags are a single character",
                    start..i + c.len_utf8(),
                ));
            }
        };
    }

    match state {
        State::Literal => {}
        State::Marker { start } => {
            return Err(source.stray_marker(marker, start..template.len()));
        }
        State::Name { start, .. } | State::Tag { start, .. } => {
            return Err(source.malformed("unterminated placeholder", start..template.len()));
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Resolve every placeholder of `template` against `context`.
pub(crate) fn resolve(
    template: &str,
    context: &ContextStack,
    formatters: &FormatterRegistry,
    cx: &mut FormatContext<'_>,
) -> Result<String> {
    let source = TemplateSource::new(template);
    let segments = parse(template, context.marker(), &source)?;
    let mut out = String::with_capacity(template.len());
    for segment in segments {
        let placeholder = match segment {
            Segment::Literal(text) => {
                out.push_str(&text);
                continue;
            }
            Segment::Placeholder(p) => p,
        };
        let Some(arg) = context.resolve(placeholder.name) else {
            return Err(source.unknown_binding(
                placeholder.name,
                placeholder.span,
                &context.visible_names(),
            ));
        };
        let tag = placeholder.tag.unwrap_or_else(|| arg.default_tag());
        let Some(formatter) = formatters.get(tag) else {
            return Err(source.unknown_formatter(tag, placeholder.name, placeholder.span));
        };
        match formatter(arg, cx) {
            Some(rendered) => out.push_str(&rendered),
            None => {
                return Err(source.unsupported_value(
                    placeholder.name,
                    tag,
                    arg.kind(),
                    placeholder.span,
                ));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        format::Arg,
        imports::ImportSet,
        types::{RustType, Symbol},
    };

    fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
        parse(template, '#', &TemplateSource::new(template))
    }

    fn resolve_with(template: &str, bindings: &[(&str, Arg)]) -> Result<(String, ImportSet)> {
        let mut context = ContextStack::new('#');
        for (name, arg) in bindings {
            context.bind(*name, arg.clone());
        }
        let existing = ImportSet::new();
        let mut imports = ImportSet::new();
        let mut cx = FormatContext {
            indent: "",
            namespace: "crate",
            existing: &existing,
            imports: &mut imports,
        };
        let out = resolve(template, &context, &FormatterRegistry::rust(), &mut cx)?;
        Ok((out, imports))
    }

    #[test]
    fn test_parse_literal_and_placeholders() {
        let parsed = segments("let x: #{ty} = #{value:S};").unwrap();
        assert_eq!(
            parsed,
            vec![
                Segment::Literal("let x: ".into()),
                Segment::Placeholder(Placeholder {
                    name: "ty",
                    tag: None,
                    span: 7..12,
                }),
                Segment::Literal(" = ".into()),
                Segment::Placeholder(Placeholder {
                    name: "value",
                    tag: Some('S'),
                    span: 15..25,
                }),
                Segment::Literal(";".into()),
            ]
        );
    }

    #[test]
    fn test_doubled_marker_is_literal() {
        assert_eq!(
            segments("##[derive(Debug)]").unwrap(),
            vec![Segment::Literal("#[derive(Debug)]".into())]
        );
    }

    #[test]
    fn test_escape_round_trip() {
        for text in ["#", "a # b", "##{x}", "#{not_a_binding}", "no markers", "ü#ü"] {
            let (out, _) = resolve_with(&escape(text, '#'), &[]).unwrap();
            assert_eq!(out, text);
        }
    }

    #[test]
    fn test_stray_marker_reports_offset() {
        let err = segments("ok #[derive]").unwrap_err();
        match *err {
            Error::StrayMarker { marker, span, .. } => {
                assert_eq!(marker, '#');
                assert_eq!(span.offset(), 3);
                assert_eq!(span.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(*segments("trailing #").unwrap_err(), Error::StrayMarker { .. }));
    }

    #[test]
    fn test_malformed_placeholders() {
        for template in ["#{}", "#{name", "#{na-me}", "#{name:}", "#{name:TT}", "#{name:"] {
            let err = segments(template).unwrap_err();
            assert!(
                matches!(*err, Error::MalformedPlaceholder { .. }),
                "{template}: {err}"
            );
        }
    }

    #[test]
    fn test_unknown_binding_names_placeholder() {
        let err = resolve_with("#{missing}", &[("present", Arg::from("x"))]).unwrap_err();
        match *err {
            Error::UnknownBinding { name, available, .. } => {
                assert_eq!(name, "missing");
                assert_eq!(available, "present");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_value_names_kind() {
        let err = resolve_with("#{name:S}", &[("name", Symbol::new(RustType::string()).into())])
            .unwrap_err();
        match *err {
            Error::UnsupportedValue { name, tag, kind, .. } => {
                assert_eq!(name, "name");
                assert_eq!(tag, 'S');
                assert_eq!(kind, "symbol");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_formatter() {
        let err = resolve_with("#{name:Z}", &[("name", Arg::from("x"))]).unwrap_err();
        assert!(matches!(*err, Error::UnknownFormatter { tag: 'Z', .. }));
    }

    #[test]
    fn test_type_placeholder_collects_import() {
        let shape = Symbol::new(RustType::named("crate::model", "Shape"));
        let (out, imports) =
            resolve_with("fn get() -> #{shape} {}", &[("shape", shape.into())]).unwrap();
        assert_eq!(out, "fn get() -> Shape {}");
        assert!(imports.has_symbol("crate::model", "Shape"));
    }

    #[test]
    fn test_valid_markers() {
        assert!(is_valid_marker('#'));
        assert!(is_valid_marker('$'));
        assert!(!is_valid_marker('{'));
        assert!(!is_valid_marker('a'));
        assert!(!is_valid_marker(' '));
    }
}
