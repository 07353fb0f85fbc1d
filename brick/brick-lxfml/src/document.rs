//! Document tree.
//!
//! LXFML documents are small, so they are read into an owned [`Element`]
//! tree and then walked. Only elements and their attributes are kept; text,
//! comments and processing instructions are dropped.
//!
//! A minimal document looks like this:
//!
//! ```xml
//! <LXFML versionMajor="5" versionMinor="0">
//!   <Bricks>
//!     <Brick refID="0" designID="3001">
//!       <Part refID="0" designID="3001" materials="21">
//!         <Bone refID="0" transformation="1,0,0,0,1,0,0,0,1,0,0,0"/>
//!       </Part>
//!     </Brick>
//!   </Bricks>
//! </LXFML>
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{LoadError, LoadResult};

/// Root element name.
pub const LXFML_TAG: &str = "LXFML";
/// Container of all bricks.
pub const BRICKS_TAG: &str = "Bricks";
/// A brick: a group of parts.
pub const BRICK_TAG: &str = "Brick";
/// A placed part.
pub const PART_TAG: &str = "Part";
/// The child of a part that carries its placement.
pub const BONE_TAG: &str = "Bone";

/// Root attribute holding the document's major version.
pub const VERSION_MAJOR_ATTR: &str = "versionMajor";
/// Part attribute holding the shape identifier.
pub const DESIGN_ID_ATTR: &str = "designID";
/// Part attribute holding the material identifier list.
pub const MATERIALS_ATTR: &str = "materials";
/// Bone attribute holding the placement matrix.
pub const TRANSFORMATION_ATTR: &str = "transformation";

/// An element of a parsed document.
///
/// # Example
///
/// ```
/// use brick_lxfml::Element;
///
/// let part = Element::new("Part")
///     .with_attribute("designID", "3001")
///     .with_child(Element::new("Bone").with_attribute("transformation", "1,0,0,0,1,0,0,0,1,0,0,0"));
///
/// assert_eq!(part.attribute("designID"), Some("3001"));
/// assert!(part.first_child("Bone").is_some());
/// assert!(part.first_child("Missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, replacing any existing value with the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing any existing value with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// All child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// First child element with the given tag name.
    #[must_use]
    pub fn first_child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Child elements with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parse an XML document into an element tree.
///
/// A leading byte-order mark is skipped.
///
/// # Errors
///
/// Returns [`LoadError::Xml`] if the text is not well-formed XML or has no
/// single root element.
///
/// # Example
///
/// ```
/// use brick_lxfml::parse_document;
///
/// let root = parse_document(r#"<LXFML versionMajor="5"><Bricks/></LXFML>"#).unwrap();
/// assert_eq!(root.name(), "LXFML");
/// assert_eq!(root.attribute("versionMajor"), Some("5"));
/// assert_eq!(root.children().len(), 1);
/// ```
pub fn parse_document(source: &str) -> LoadResult<Element> {
    let source = source.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| LoadError::Xml {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => stack.push(element_from_tag(e, position)?),
            Event::Empty(ref e) => {
                let element = element_from_tag(e, position)?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| xml_error(position, "unmatched end tag"))?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(
            reader.buffer_position(),
            format!("element <{}> is never closed", open.name),
        ));
    }

    root.ok_or_else(|| xml_error(reader.buffer_position(), "document has no root element"))
}

fn element_from_tag(tag: &BytesStart<'_>, position: u64) -> LoadResult<Element> {
    let name = std::str::from_utf8(tag.local_name().as_ref())
        .map_err(|e| xml_error(position, format!("invalid UTF-8 in tag name: {e}")))?
        .to_string();

    let mut element = Element::new(name);
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| xml_error(position, format!("malformed attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())
            .map_err(|e| xml_error(position, format!("invalid UTF-8 in attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(position, format!("invalid value for '{key}': {e}")))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

/// Attach a completed element to its parent, or make it the root.
fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    position: u64,
) -> LoadResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(xml_error(
            position,
            format!("second root element <{}>", element.name),
        ));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn xml_error(position: u64, message: impl Into<String>) -> LoadError {
    LoadError::Xml {
        position,
        message: message.into(),
    }
}
