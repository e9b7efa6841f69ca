//! Minimal namespace-aware XML element tree over `quick-xml`.
//!
//! The codec maps BoM nodes to and from this tree rather than driving the
//! event reader directly; the versioned readers stay order-insensitive and
//! the writers emit elements in schema order.
//!
//! Parsing refuses any document carrying a DOCTYPE declaration. Custom
//! entity definitions are the vehicle for entity-expansion attacks
//! (billion-laughs, external entities), and BoM documents never legitimately
//! use them, so the whole construct is rejected up front.

use crate::error::{BomError, Result};
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};
use std::io::Cursor;

/// An XML element: resolved namespace, local name, attributes, child
/// elements, and accumulated text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Resolved namespace URI; empty for unqualified elements.
    pub namespace: String,
    /// Local name, without prefix.
    pub name: String,
    /// Attributes by local name. Namespace declarations are not included.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Concatenated text content. Whitespace-only text is dropped for
    /// elements that have child elements; an empty element yields `""`.
    pub text: String,
}

impl XmlElement {
    /// Create an element with a namespace and local name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element holding only text content.
    pub fn with_text(
        namespace: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element (builder style).
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True if this element matches the expected namespace and local name.
    /// Unqualified elements match any namespace; real documents qualify
    /// everything, but hand-written fragments frequently do not.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && (self.namespace == namespace || self.namespace.is_empty())
    }

    /// Trimmed text content.
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Parse a complete XML document into its root element.
pub fn parse_document(content: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(content);
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        let (resolve, event) = reader
            .read_resolved_event()
            .map_err(|e| BomError::malformed(e.to_string()))?;
        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&resolve, &start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&resolve, &start)?;
                if stack.is_empty() {
                    // Self-closing root; no trailing content expected.
                    stack.push(element);
                    return single_root(&mut reader, stack);
                }
                finish_element(&mut stack, element)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| BomError::malformed("unexpected closing tag"))?;
                if !element.children.is_empty() && element.text.trim().is_empty() {
                    element.text.clear();
                }
                if stack.is_empty() {
                    stack.push(element);
                    return single_root(&mut reader, stack);
                }
                finish_element(&mut stack, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| BomError::malformed(e.to_string()))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                } else if !text.trim().is_empty() {
                    return Err(BomError::malformed("text content outside root element"));
                }
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(cdata.as_ref()).into_owned();
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::DocType(_) => {
                return Err(BomError::malformed(
                    "document type declarations are not supported",
                ));
            }
            Event::Eof => {
                return Err(BomError::malformed("unexpected end of document"));
            }
            // Declarations, comments, and processing instructions carry no
            // model content.
            _ => {}
        }
    }
}

fn element_from_start(resolve: &ResolveResult, start: &BytesStart<'_>) -> Result<XmlElement> {
    let namespace = match resolve {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        _ => String::new(),
    };
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = XmlElement::new(namespace, name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| BomError::malformed(e.to_string()))?;
        let key = attribute.key;
        // Skip xmlns declarations; prefixes are resolved by the reader.
        if key.as_ref() == b"xmlns" || key.as_ref().starts_with(b"xmlns:") {
            continue;
        }
        let name = String::from_utf8_lossy(key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| BomError::malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((name, value));
    }
    Ok(element)
}

fn finish_element(stack: &mut Vec<XmlElement>, element: XmlElement) -> Result<()> {
    let parent = stack
        .last_mut()
        .ok_or_else(|| BomError::malformed("element closed outside the root"))?;
    parent.children.push(element);
    Ok(())
}

/// Drain the remainder of the document and hand back the root, rejecting any
/// further element content.
fn single_root(reader: &mut NsReader<&[u8]>, mut stack: Vec<XmlElement>) -> Result<XmlElement> {
    loop {
        let (_, event) = reader
            .read_resolved_event()
            .map_err(|e| BomError::malformed(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(_) | Event::Empty(_) => {
                return Err(BomError::malformed("multiple root elements"));
            }
            Event::DocType(_) => {
                return Err(BomError::malformed(
                    "document type declarations are not supported",
                ));
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| BomError::malformed(e.to_string()))?;
                if !text.trim().is_empty() {
                    return Err(BomError::malformed("text content outside root element"));
                }
            }
            _ => {}
        }
    }
    stack
        .pop()
        .ok_or_else(|| BomError::malformed("no root element"))
}

/// Serialize an element tree to a UTF-8 XML document.
///
/// `default_namespace` is declared as the default `xmlns` on the root;
/// `prefixes` maps further namespaces to prefixes declared on the root.
/// Elements in any other namespace are a programming error and reported as
/// malformed output.
pub fn write_document(
    root: &XmlElement,
    default_namespace: &str,
    prefixes: &[(&str, &str)],
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| BomError::malformed(e.to_string()))?;
    write_element(&mut writer, root, default_namespace, prefixes, true)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| BomError::malformed(e.to_string()))
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &XmlElement,
    default_namespace: &str,
    prefixes: &[(&str, &str)],
    is_root: bool,
) -> Result<()> {
    let qualified = qualified_name(element, default_namespace, prefixes)?;
    let mut start = BytesStart::new(qualified.as_str());
    if is_root {
        start.push_attribute(("xmlns", default_namespace));
        for (prefix, namespace) in prefixes {
            start.push_attribute((format!("xmlns:{prefix}").as_str(), *namespace));
        }
    }
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| BomError::malformed(e.to_string()))?;
        return Ok(());
    }

    if element.children.is_empty() {
        // Leaf with text: use the content helper so the text is not
        // surrounded by indentation whitespace.
        let pairs = attribute_pairs(element, is_root, default_namespace, prefixes);
        writer
            .create_element(qualified.as_str())
            .with_attributes(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .write_text_content(BytesText::new(&element.text))
            .map_err(|e| BomError::malformed(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| BomError::malformed(e.to_string()))?;
    for child in &element.children {
        write_element(writer, child, default_namespace, prefixes, false)?;
    }
    writer
        .write_event(Event::End(BytesStart::new(qualified.as_str()).to_end()))
        .map_err(|e| BomError::malformed(e.to_string()))?;
    Ok(())
}

fn attribute_pairs<'a>(
    element: &'a XmlElement,
    is_root: bool,
    default_namespace: &'a str,
    prefixes: &'a [(&'a str, &'a str)],
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if is_root {
        pairs.push(("xmlns".to_string(), default_namespace.to_string()));
        for (prefix, namespace) in prefixes {
            pairs.push((format!("xmlns:{prefix}"), (*namespace).to_string()));
        }
    }
    for (name, value) in &element.attributes {
        pairs.push((name.clone(), value.clone()));
    }
    pairs
}

fn qualified_name(
    element: &XmlElement,
    default_namespace: &str,
    prefixes: &[(&str, &str)],
) -> Result<String> {
    if element.namespace == default_namespace || element.namespace.is_empty() {
        return Ok(element.name.clone());
    }
    for (prefix, namespace) in prefixes {
        if element.namespace == *namespace {
            return Ok(format!("{prefix}:{}", element.name));
        }
    }
    Err(BomError::malformed(format!(
        "no prefix declared for namespace '{}'",
        element.namespace
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced_document() {
        let root = parse_document(
            r#"<a xmlns="urn:x" xmlns:g="urn:y"><b attr="v">text</b><g:c/></a>"#,
        )
        .unwrap();
        assert_eq!(root.namespace, "urn:x");
        assert_eq!(root.name, "a");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].namespace, "urn:x");
        assert_eq!(root.children[0].text(), "text");
        assert_eq!(root.children[0].attribute("attr"), Some("v"));
        assert_eq!(root.children[1].namespace, "urn:y");
        assert_eq!(root.children[1].name, "c");
    }

    #[test]
    fn test_self_closing_root() {
        let root = parse_document(r#"<a xmlns="urn:x" k="v"/>"#).unwrap();
        assert_eq!(root.namespace, "urn:x");
        assert_eq!(root.attribute("k"), Some("v"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_empty_element_text_is_empty_string() {
        let root = parse_document("<a><b></b><c/></a>").unwrap();
        assert_eq!(root.children[0].text, "");
        assert_eq!(root.children[1].text, "");
    }

    #[test]
    fn test_whitespace_between_children_is_dropped() {
        let root = parse_document("<a>\n  <b>x</b>\n</a>").unwrap();
        assert_eq!(root.text, "");
        assert_eq!(root.children[0].text, "x");
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(BomError::MalformedXml(_))
        ));
        assert!(matches!(
            parse_document("not xml"),
            Err(BomError::MalformedXml(_))
        ));
        assert!(matches!(
            parse_document("<a>unclosed"),
            Err(BomError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_doctype_is_rejected() {
        let attack = r#"<?xml version="1.0"?>
<!DOCTYPE lolz [
  <!ENTITY lol "lol">
  <!ENTITY lol2 "&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;">
  <!ENTITY lol3 "&lol2;&lol2;&lol2;&lol2;&lol2;&lol2;&lol2;&lol2;&lol2;&lol2;">
]>
<lolz>&lol3;</lolz>"#;
        assert!(matches!(
            parse_document(attack),
            Err(BomError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_write_and_reparse() {
        let tree = XmlElement::new("urn:x", "a")
            .with_child(XmlElement::with_text("urn:x", "b", "text & more"))
            .with_child(XmlElement::new("urn:y", "c").with_attribute("k", "v"));
        let xml = write_document(&tree, "urn:x", &[("g", "urn:y")]).unwrap();
        assert!(xml.contains("<g:c"));
        let reparsed = parse_document(&xml).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn test_write_preserves_empty_text_element() {
        let tree =
            XmlElement::new("urn:x", "a").with_child(XmlElement::with_text("urn:x", "b", ""));
        let xml = write_document(&tree, "urn:x", &[]).unwrap();
        let reparsed = parse_document(&xml).unwrap();
        assert_eq!(reparsed.children[0].text, "");
    }
}
