//! Immutable element tree produced by a render pass, and its HTML serialization.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered element with ordered attributes and child elements.
pub struct MarkupNode {
    tag: &'static str,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub(crate) fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub(crate) fn attrs(mut self, attributes: impl IntoIterator<Item = (String, String)>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub(crate) fn child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn children_from(mut self, children: impl IntoIterator<Item = MarkupNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Element tag name.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Attributes in emission order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn class_tokens(&self) -> Vec<&str> {
        self.attribute("class")
            .map(|class| class.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_tokens().contains(&class)
    }

    /// Child elements.
    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    /// Serialize to HTML. Attribute values are escaped; elements never carry text content.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
