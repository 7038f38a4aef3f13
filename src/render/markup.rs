//! Markup trees and their HTML serialisation

use serde::{Deserialize, Serialize};

/// Elements that never carry children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text content is emitted without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Value of a markup attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MarkupAttr {
    /// Literal string value
    Static(String),
    /// Expression evaluated by the target framework
    Dynamic(String),
    /// Attribute present without a value (`defer`, `async`)
    Boolean,
}

/// A child of a markup element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MarkupChild {
    Element(MarkupNode),
    /// Text, escaped on output
    Text(String),
    /// Pre-rendered markup, emitted verbatim
    Raw(String),
    /// Framework expression interpolated into the content
    Expression(String),
}

/// An element of a markup tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: Vec<(String, MarkupAttr)>,
    #[serde(default)]
    pub children: Vec<MarkupChild>,
}

impl MarkupNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style static attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, MarkupAttr::Static(value.into()));
        self
    }

    /// Set an attribute, replacing an existing one with the same key in place
    pub fn set_attr(&mut self, key: impl Into<String>, value: MarkupAttr) {
        let key = key.into();
        match self.attrs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn set_boolean_attr(&mut self, key: impl Into<String>) {
        self.set_attr(key, MarkupAttr::Boolean);
    }

    pub fn attr(&self, key: &str) -> Option<&MarkupAttr> {
        self.attrs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn add_child(&mut self, child: MarkupNode) {
        self.children.push(MarkupChild::Element(child));
    }

    pub fn prepend_child(&mut self, child: MarkupNode) {
        self.children.insert(0, MarkupChild::Element(child));
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.children.push(MarkupChild::Text(text.into()));
    }

    pub fn add_raw(&mut self, raw: impl Into<String>) {
        self.children.push(MarkupChild::Raw(raw.into()));
    }

    /// Child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children.iter().filter_map(|child| match child {
            MarkupChild::Element(node) => Some(node),
            _ => None,
        })
    }

    /// Depth-first search for the first element with the given tag
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut MarkupNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            MarkupChild::Element(node) => node.find_mut(tag),
            _ => None,
        })
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn has_only_inline_children(&self) -> bool {
        self.children
            .iter()
            .all(|child| !matches!(child, MarkupChild::Element(_)))
    }
}

/// Serialise a markup tree as indented HTML
pub fn render(node: &MarkupNode) -> String {
    let mut out = String::new();
    write_element(&mut out, node, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_element(out: &mut String, node: &MarkupNode, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        match value {
            MarkupAttr::Static(text) | MarkupAttr::Dynamic(text) => {
                out.push_str(&format!(" {}=\"{}\"", key, escape_attr(text)));
            }
            MarkupAttr::Boolean => {
                out.push(' ');
                out.push_str(key);
            }
        }
    }
    out.push('>');

    if node.is_void() {
        out.push('\n');
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&node.tag.as_str());
    if node.has_only_inline_children() {
        for child in &node.children {
            write_inline(out, child, raw_text);
        }
    } else {
        out.push('\n');
        for child in &node.children {
            match child {
                MarkupChild::Element(element) => write_element(out, element, depth + 1),
                inline => {
                    indent(out, depth + 1);
                    write_inline(out, inline, raw_text);
                    out.push('\n');
                }
            }
        }
        indent(out, depth);
    }

    out.push_str(&format!("</{}>\n", node.tag));
}

fn write_inline(out: &mut String, child: &MarkupChild, raw_text: bool) {
    match child {
        MarkupChild::Text(text) if raw_text => out.push_str(text),
        MarkupChild::Text(text) => out.push_str(&escape_text(text)),
        MarkupChild::Raw(raw) => out.push_str(raw),
        MarkupChild::Expression(expr) => out.push_str(&format!("{{{{ {} }}}}", expr)),
        MarkupChild::Element(node) => {
            let mut nested = String::new();
            write_element(&mut nested, node, 0);
            out.push_str(nested.trim_end());
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_document() {
        let mut head = MarkupNode::new("head");
        let mut title = MarkupNode::new("title");
        title.add_text("Hello & welcome");
        head.add_child(title);

        let mut html = MarkupNode::new("html").with_attr("lang", "en");
        html.add_child(head);
        html.add_child(MarkupNode::new("body"));

        assert_eq!(
            render(&html),
            "<html lang=\"en\">\n  <head>\n    <title>Hello &amp; welcome</title>\n  </head>\n  <body></body>\n</html>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let mut script = MarkupNode::new("script").with_attr("src", "/app.js");
        script.set_boolean_attr("defer");
        assert_eq!(render(&script), "<script src=\"/app.js\" defer></script>");

        let link = MarkupNode::new("link").with_attr("rel", "stylesheet");
        assert_eq!(render(&link), "<link rel=\"stylesheet\">");
    }

    #[test]
    fn test_script_content_is_not_escaped() {
        let mut script = MarkupNode::new("script");
        script.add_text("if (a < b) { go() }");
        assert_eq!(render(&script), "<script>if (a < b) { go() }</script>");
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut node = MarkupNode::new("a").with_attr("href", "/a").with_attr("id", "x");
        node.set_attr("href", MarkupAttr::Static("/b".into()));
        assert_eq!(node.attrs[0], ("href".to_string(), MarkupAttr::Static("/b".into())));
        assert_eq!(node.attrs.len(), 2);
    }
}
