use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::feed::FeedError;

/// Maximum element nesting accepted while building a [`Document`].
/// Real feeds nest a handful of levels; anything deeper is rejected rather
/// than building a tree whose teardown could exhaust the stack.
const MAX_DEPTH: usize = 256;

/// A fully loaded XML document.
///
/// Built in one pass from `quick-xml` pull events into an owned element tree.
/// Only the parts a feed walk needs are kept: element names, attributes, and
/// text. Comments, processing instructions, and the DOCTYPE are dropped.
///
/// # Security
///
/// `quick-xml` (0.37) never parses `<!ENTITY>` declarations. Only the five XML
/// builtin entities (`&lt;` `&gt;` `&amp;` `&apos;` `&quot;`) and character
/// references are resolved; any other entity reference fails the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

/// One element of a [`Document`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

impl Document {
    /// Parses XML text into a document tree.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Parse`] if the content is not well-formed:
    /// syntax errors, mismatched or unclosed tags, no root element, more than
    /// one root element, non-whitespace text outside the root, undeclared
    /// entities, or nesting deeper than the supported limit.
    pub fn parse(content: &str) -> Result<Self, FeedError> {
        let mut reader = Reader::from_str(content);

        let mut buf = Vec::new();
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if open.len() >= MAX_DEPTH {
                        return Err(FeedError::Parse(format!(
                            "nesting depth exceeds maximum of {} levels",
                            MAX_DEPTH
                        )));
                    }
                    open.push(Element::from_start(&e, &reader)?);
                }
                Event::Empty(e) => {
                    let element = Element::from_start(&e, &reader)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(e) => {
                    let element = open.pop().ok_or_else(|| {
                        FeedError::Parse(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    push_text(&mut open, &text)?;
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|err| FeedError::Parse(format!("invalid UTF-8 in CDATA: {}", err)))?;
                    push_text(&mut open, text)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE
                _ => {}
            }
            buf.clear();
        }

        if let Some(element) = open.last() {
            return Err(FeedError::Parse(format!(
                "unclosed element <{}>",
                element.name
            )));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| FeedError::Parse("document has no root element".to_string()))
    }

    /// The document's root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element named `name` in the document, in document order.
    pub fn descendants<'a>(&'a self, name: &'a str) -> Descendants<'a> {
        self.root.descendants(name)
    }
}

impl Element {
    fn from_start(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, FeedError> {
        let name = utf8_name(e.name().as_ref())?;

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| {
                FeedError::Parse(format!("malformed attribute on <{}>: {}", name, err))
            })?;
            let key = utf8_name(attr.key.as_ref())?;
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            nodes: Vec::new(),
        })
    }

    /// Qualified tag name, prefix included (`itunes:image`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute with the given qualified name, entities resolved.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().find(|child| child.name == name)
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Element> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// This element and every element below it named `name`, in document
    /// order (pre-order, parents before their children).
    pub fn descendants<'a>(&'a self, name: &'a str) -> Descendants<'a> {
        Descendants {
            pending: vec![self],
            name,
        }
    }

    /// The element's own text and CDATA content, concatenated and untrimmed.
    /// Text inside child elements is not included.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Iterator returned by [`Element::descendants`] and [`Document::descendants`].
pub struct Descendants<'a> {
    pending: Vec<&'a Element>,
    name: &'a str,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(element) = self.pending.pop() {
            // Reversed so the first child is popped next
            self.pending.extend(element.children().rev());
            if element.name == self.name {
                return Some(element);
            }
        }
        None
    }
}

fn utf8_name(bytes: &[u8]) -> Result<String, FeedError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| FeedError::Parse(format!("invalid UTF-8 in name: {}", err)))
}

/// Hands a finished element to its parent, or makes it the root.
fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), FeedError> {
    if let Some(parent) = open.last_mut() {
        parent.nodes.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(FeedError::Parse(format!(
            "multiple root elements: unexpected <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), FeedError> {
    if text.is_empty() {
        return Ok(());
    }
    let Some(parent) = open.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(FeedError::Parse(
            "text content outside of root element".to_string(),
        ));
    };
    match parent.nodes.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.nodes.push(Node::Text(text.to_string())),
    }
    Ok(())
}
