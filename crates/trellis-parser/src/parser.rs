//! Recursive-descent parser for the markup dialect.
//!
//! The grammar is a restricted HTML subset: elements with attributes, text
//! content and nested children. Only the `class` attribute is meaningful to
//! the engine; any other attribute is parsed and discarded. A document is
//! exactly one root element.

use std::borrow::Cow;

use log::debug;
use winnow::{
    ModalResult, Parser,
    ascii::{multispace0, multispace1},
    combinator::{alt, delimited, opt, preceded, repeat},
    error::{ContextError, ErrMode, StrContext},
    token::{take_till, take_while},
};

use trellis_core::markup::Markup;

use crate::error::ParseError;

/// Parses a markup document into an element tree.
///
/// Leading and trailing whitespace is ignored; anything else outside the
/// single root element is an error.
pub fn parse_markup(source: &str) -> Result<Markup, ParseError> {
    debug!(len = source.len(); "parsing markup document");

    document.parse(source).map_err(|err| {
        let offset = err.offset();
        let message = render_message(err.inner());
        ParseError::new(offset, message)
    })
}

fn render_message(inner: &ContextError) -> String {
    let rendered = inner.to_string();
    if rendered.is_empty() {
        "malformed markup".to_string()
    } else {
        rendered
    }
}

fn cut_error(label: &'static str) -> ErrMode<ContextError> {
    let mut err = ContextError::new();
    err.push(StrContext::Label(label));
    ErrMode::Cut(err)
}

fn document(input: &mut &str) -> ModalResult<Markup> {
    delimited(multispace0, element, multispace0).parse_next(input)
}

/// Parses one element, either self-closing or with content and a matching
/// closing tag.
fn element(input: &mut &str) -> ModalResult<Markup> {
    '<'.parse_next(input)?;
    let tag = name
        .context(StrContext::Label("tag name"))
        .parse_next(input)?;

    let attrs: Vec<(&str, &str)> =
        repeat(0.., preceded(multispace1, attribute)).parse_next(input)?;
    multispace0.parse_next(input)?;

    let mut node = Markup::element(tag);
    for (attr_name, value) in attrs {
        if attr_name == "class" {
            for class in value.split_whitespace() {
                node = node.with_class(class);
            }
        }
    }

    if opt("/>").parse_next(input)?.is_some() {
        return Ok(node);
    }
    '>'.context(StrContext::Label("end of opening tag"))
        .parse_next(input)?;

    content(input, &mut node)?;

    "</".parse_next(input)
        .map_err(|_: ErrMode<ContextError>| cut_error("closing tag"))?;
    let close = name.parse_next(input)?;
    multispace0.parse_next(input)?;
    '>'.context(StrContext::Label("end of closing tag"))
        .parse_next(input)?;

    if close != tag {
        return Err(cut_error("closing tag matching the opening tag"));
    }
    Ok(node)
}

/// Parses element content: interleaved text runs and child elements, up to
/// but not including the closing tag.
fn content(input: &mut &str, node: &mut Markup) -> ModalResult<()> {
    loop {
        if input.starts_with("</") {
            return Ok(());
        }
        match input.chars().next() {
            None => return Err(cut_error("closing tag")),
            Some('<') => {
                let child = element(input)?;
                node.push_child(child);
            }
            Some(_) => {
                let text = take_till(1.., '<').parse_next(input)?;
                node.push_text(&decode_entities(text));
            }
        }
    }
}

/// Parses a tag or attribute name.
fn name<'src>(input: &mut &'src str) -> ModalResult<&'src str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_'
    })
    .parse_next(input)
}

/// Parses one `name="value"` attribute. Single quotes are accepted too.
fn attribute<'src>(input: &mut &'src str) -> ModalResult<(&'src str, &'src str)> {
    let attr_name = name.parse_next(input)?;
    delimited(multispace0, '=', multispace0)
        .context(StrContext::Label("attribute value"))
        .parse_next(input)?;
    let value = alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .context(StrContext::Label("quoted attribute value"))
    .parse_next(input)?;
    Ok((attr_name, value))
}

/// Decodes the small set of character entities the oracle markup uses.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&"),
    )
}
