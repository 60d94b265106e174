//! Owned XML tree for TTX documents.
//!
//! A [`Document`] is parsed from the textual output of `ttx`, queried and rebuilt in memory, and
//! written back out in a canonical form that `ttx` accepts as compiler input. Whitespace-only text
//! is dropped while parsing and the output is re-indented with two spaces per level.

use core::{fmt, slice, str::Utf8Error};
use std::{error, string::FromUtf8Error};

use quick_xml::{
    Reader, Writer,
    events::{
        BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::AttrError,
    },
};

/// A parsed TTX document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Whether an `<?xml ...?>` declaration is written before the root element.
    declaration: bool,
    /// The root element, `ttFont` for documents produced by `ttx`.
    root: Element,
}

impl Document {
    /// Parses a [`Document`] from `text`.
    ///
    /// Comments, processing instructions and doctypes outside of the root element are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ParseDocumentError`] when `text` is not a well-formed XML document with a single
    /// root element.
    pub fn parse(text: &str) -> Result<Self, ParseDocumentError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut declaration = false;
        let mut root = None;
        let mut open: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|error| ParseDocumentError::Syntax {
                    position: reader.buffer_position(),
                    error,
                })?;

            match event {
                Event::Decl(_) => declaration = true,
                Event::Start(start) => open.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    // The reader rejects mismatched end tags, so the innermost open element is the
                    // one being closed.
                    let Some(element) = open.pop() else {
                        return Err(ParseDocumentError::UnexpectedEnd);
                    };
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = open.last_mut() {
                        let text = text.unescape()?;
                        if !text.is_empty() {
                            parent.children.push(Node::Text(text.into_owned()));
                        }
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = open.last_mut() {
                        let data = core::str::from_utf8(&data)?;
                        parent.children.push(Node::CData(data.to_owned()));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = open.last_mut() {
                        let comment = core::str::from_utf8(&comment)?;
                        parent.children.push(Node::Comment(comment.to_owned()));
                    }
                }
                Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(element) = open.pop() {
            return Err(ParseDocumentError::UnclosedElement(element.name));
        }

        let root = root.ok_or(ParseDocumentError::NoRootElement)?;
        Ok(Self { declaration, root })
    }

    /// Returns the root [`Element`].
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Returns `true` if the [`Document`] is written with an XML declaration.
    pub fn has_declaration(&self) -> bool {
        self.declaration
    }

    /// Returns every [`Element`] of the [`Document`] in document order, starting with the root.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        core::iter::once(&self.root).chain(self.root.descendants())
    }

    /// Returns the first [`Element`] in document order named `name` whose `key` attribute equals
    /// `value`.
    pub fn find(&self, name: &str, key: &str, value: &str) -> Option<&Element> {
        self.elements()
            .find(|element| element.name == name && element.attribute(key) == Some(value))
    }

    /// Builds a new [`Document`] from this one. See [`Element::rebuild()`].
    pub fn rebuild<F>(&self, replace: &mut F) -> Self
    where
        F: FnMut(&Element) -> Option<Element>,
    {
        Self {
            declaration: self.declaration,
            root: self.root.rebuild(replace),
        }
    }

    /// Serializes the [`Document`] to its canonical textual form.
    ///
    /// # Errors
    ///
    /// Returns [`WriteDocumentError`] if the XML writer fails.
    pub fn to_xml_string(&self) -> Result<String, WriteDocumentError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        if self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        self.root.write(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }
}

/// Attaches a completed `element` to the innermost open element, or makes it the root.
fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseDocumentError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(ParseDocumentError::MultipleRoots);
    } else {
        *root = Some(element);
    }

    Ok(())
}

/// A node in the children of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
    /// The contents of a `<![CDATA[...]]>` section.
    CData(String),
    /// The raw contents of a comment.
    Comment(String),
}

/// An XML element with its attributes in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// The tag name.
    name: String,
    /// The attributes, unescaped.
    attributes: Vec<(String, String)>,
    /// The child nodes.
    children: Vec<Node>,
}

impl Element {
    /// Creates a new [`Element`] with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Converts a start or empty tag into an [`Element`] without children.
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseDocumentError> {
        let name = core::str::from_utf8(start.name().as_ref())?.to_owned();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = core::str::from_utf8(attribute.key.as_ref())?.to_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Returns the tag name of the [`Element`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns an iterator over the attributes of the [`Element`] in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Sets the attribute named `key` to `value`, appending it if it is not present.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Returns the children of the [`Element`].
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Appends `child` to the children of the [`Element`].
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns an iterator over the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Returns a depth-first, pre-order iterator over all elements nested in this one.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Builds a copy of this element tree in a single pre-order pass.
    ///
    /// `replace` is called on every element before it is copied. When it returns `Some`, the
    /// returned element takes the place of the visited one and its subtree is not visited.
    pub fn rebuild<F>(&self, replace: &mut F) -> Element
    where
        F: FnMut(&Element) -> Option<Element>,
    {
        if let Some(replacement) = replace(self) {
            return replacement;
        }

        let children = self
            .children
            .iter()
            .map(|child| match child {
                Node::Element(element) => Node::Element(element.rebuild(replace)),
                other => other.clone(),
            })
            .collect();

        Element {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children,
        }
    }

    /// Writes the element tree to `writer`.
    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
                Node::CData(data) => {
                    writer.write_event(Event::CData(BytesCData::new(data.as_str())))?
                }
                Node::Comment(comment) => {
                    let comment = BytesText::from_escaped(comment.as_str());
                    writer.write_event(Event::Comment(comment))?
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// Iterator over the descendants of an [`Element`]. See [`Element::descendants()`].
pub struct Descendants<'doc> {
    /// Child iterators of the elements currently being walked, innermost last.
    stack: Vec<slice::Iter<'doc, Node>>,
}

impl<'doc> Iterator for Descendants<'doc> {
    type Item = &'doc Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(children) = self.stack.last_mut() {
            match children.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }

        None
    }
}

/// Various errors that can occur while parsing a [`Document`].
#[derive(Debug)]
pub enum ParseDocumentError {
    /// The text is not well-formed XML.
    Syntax {
        /// The byte offset at which the reader failed.
        position: usize,
        /// The underlying reader error.
        error: quick_xml::Error,
    },
    /// Text or an attribute value contains an invalid escape sequence.
    Xml(quick_xml::Error),
    /// An attribute is malformed.
    Attribute(AttrError),
    /// A name or comment is not valid UTF-8.
    InvalidUtf8(Utf8Error),
    /// An end tag appeared with no open element.
    UnexpectedEnd,
    /// The text ended while the named element was still open.
    UnclosedElement(String),
    /// The text contains more than one top-level element.
    MultipleRoots,
    /// The text contains no element at all.
    NoRootElement,
}

impl From<quick_xml::Error> for ParseDocumentError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<AttrError> for ParseDocumentError {
    fn from(value: AttrError) -> Self {
        Self::Attribute(value)
    }
}

impl From<Utf8Error> for ParseDocumentError {
    fn from(value: Utf8Error) -> Self {
        Self::InvalidUtf8(value)
    }
}

impl fmt::Display for ParseDocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { position, error } => {
                write!(f, "malformed XML at byte {position}: {error}")
            }
            Self::Xml(error) => write!(f, "invalid XML content: {error}"),
            Self::Attribute(error) => write!(f, "malformed attribute: {error}"),
            Self::InvalidUtf8(error) => write!(f, "invalid UTF-8: {error}"),
            Self::UnexpectedEnd => f.write_str("end tag without a matching start tag"),
            Self::UnclosedElement(name) => write!(f, "element <{name}> is never closed"),
            Self::MultipleRoots => f.write_str("document has more than one root element"),
            Self::NoRootElement => f.write_str("document has no root element"),
        }
    }
}

impl error::Error for ParseDocumentError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Syntax { error, .. } | Self::Xml(error) => Some(error),
            Self::Attribute(error) => Some(error),
            Self::InvalidUtf8(error) => Some(error),
            _ => None,
        }
    }
}

/// Various errors that can occur while serializing a [`Document`].
#[derive(Debug)]
pub enum WriteDocumentError {
    /// The XML writer failed.
    Xml(quick_xml::Error),
    /// The written bytes are not valid UTF-8.
    InvalidUtf8(FromUtf8Error),
}

impl From<quick_xml::Error> for WriteDocumentError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<FromUtf8Error> for WriteDocumentError {
    fn from(value: FromUtf8Error) -> Self {
        Self::InvalidUtf8(value)
    }
}

impl fmt::Display for WriteDocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(error) => write!(f, "error writing XML: {error}"),
            Self::InvalidUtf8(error) => write!(f, "written XML is not UTF-8: {error}"),
        }
    }
}

impl error::Error for WriteDocumentError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Xml(error) => Some(error),
            Self::InvalidUtf8(error) => Some(error),
        }
    }
}
