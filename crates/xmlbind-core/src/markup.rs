//! Markup tree - the intermediate form between values and text.

/// An element in the markup tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name of the element.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Child content in document order.
    pub children: Vec<Content>,
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Child content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    /// Create an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Add multiple child elements.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        for child in children {
            self.push_child(child);
        }
        self
    }

    /// Add text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Set an attribute, replacing any existing value for the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(Content::Element(child));
    }

    /// Append text, merging with a directly preceding text node.
    ///
    /// Empty strings are dropped so that `<a/>` and `<a></a>` build the same tree.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Content::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Content::Text(text));
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Iterate over child elements with the given name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given name.
    pub fn first_element(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated direct text content.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let Content::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Whether the element has any direct text content.
    pub fn has_text(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Content::Text(_)))
    }

    /// Whether the element has any child elements.
    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Remove whitespace-only text nodes when the element also has child elements.
    pub fn drop_indentation(&mut self) {
        if self.has_elements() {
            self.children.retain(|c| match c {
                Content::Text(t) => !t.chars().all(char::is_whitespace),
                Content::Element(_) => true,
            });
        }
    }

    /// [`drop_indentation`](Self::drop_indentation) on this element and every descendant.
    pub fn strip_indentation(&mut self) {
        self.drop_indentation();
        for child in &mut self.children {
            if let Content::Element(e) = child {
                e.strip_indentation();
            }
        }
    }

    /// Whether this element or a descendant mixes text with child elements.
    ///
    /// Whitespace-only text containing a line break is indentation and does
    /// not count. Re-indenting a tree with mixed content changes its text.
    pub fn has_mixed_content(&self) -> bool {
        let mixed = self.has_elements()
            && self.children.iter().any(|c| match c {
                Content::Text(t) => !is_indentation(t),
                Content::Element(_) => false,
            });
        mixed || self.elements().any(Element::has_mixed_content)
    }
}

fn is_indentation(text: &str) -> bool {
    text.contains('\n') && text.chars().all(char::is_whitespace)
}

/// Check whether `name` is usable as an element or attribute name.
///
/// Accepts the XML 1.0 name production without the namespace colon.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Check whether `c` may appear in XML 1.0 character data.
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
