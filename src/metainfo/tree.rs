//! XML text to element tree
//!
//! Builds an [`Element`] tree from `quick-xml` events. Comments, the XML
//! declaration, processing instructions and doctype are dropped.

use crate::domain::{Element, Node};
use crate::error::MetainfoError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse XML text into its root element
pub fn parse_tree(content: &str) -> Result<Element, MetainfoError> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(MetainfoError::xml_parse_error(
                    reader.error_position() as u64,
                    e.to_string(),
                ))
            }
        };

        match event {
            Event::Start(start) => stack.push(start_element(&start, position)?),
            Event::Empty(start) => {
                let element = start_element(&start, position)?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    MetainfoError::xml_parse_error(position, "closing tag without opening tag")
                })?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| MetainfoError::xml_parse_error(position, e.to_string()))?;
                push_text(&text, &mut stack, position)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_text(&text, &mut stack, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(MetainfoError::xml_parse_error(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }

    root.ok_or_else(|| MetainfoError::xml_parse_error(0, "document has no root element"))
}

fn start_element(start: &BytesStart<'_>, position: u64) -> Result<Element, MetainfoError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MetainfoError::xml_parse_error(position, e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MetainfoError::xml_parse_error(position, e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    position: u64,
) -> Result<(), MetainfoError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(MetainfoError::xml_parse_error(
            position,
            format!("second root element <{}>", element.name),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(text: &str, stack: &mut [Element], position: u64) -> Result<(), MetainfoError> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(MetainfoError::xml_parse_error(
            position,
            "text outside the root element",
        ));
    };

    // Adjacent text and CDATA runs become one node
    if let Some(Node::Text(previous)) = parent.children.last_mut() {
        previous.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
    Ok(())
}

/// Remove whitespace-only text from elements that hold no other text
///
/// Layout whitespace between child elements carries no meaning; mixed
/// content (text with inline elements) is left untouched.
pub fn strip_layout_whitespace(element: &mut Element) {
    let has_text = element
        .children
        .iter()
        .any(|n| matches!(n, Node::Text(t) if !t.trim().is_empty()));
    let has_elements = element
        .children
        .iter()
        .any(|n| matches!(n, Node::Element(_)));

    if has_elements && !has_text {
        element
            .children
            .retain(|n| !matches!(n, Node::Text(_)));
    }

    for child in element.children.iter_mut() {
        if let Node::Element(e) = child {
            strip_layout_whitespace(e);
        }
    }
}
