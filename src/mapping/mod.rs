//! Element mappings
//!
//! A mapping substitutes semantic UIDL elements with concrete primitives of
//! a target framework, optionally adding a library dependency and attribute
//! bindings. Mappings are resolved over the tree before any plugin runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dependency::Dependency;
use crate::uidl::{AttrValue, DynamicReference, ReferenceType, UidlElement, UidlNode};

/// Substitution rule for one semantic element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMapping {
    pub element_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,

    /// Attributes of the mapped element. A dynamic `attr` reference binds the
    /// value of the original element's attribute with that id.
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
}

/// Mapping table for one target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub elements: BTreeMap<String, ElementMapping>,

    /// UIDL event name → target event attribute
    #[serde(default)]
    pub events: BTreeMap<String, String>,

    /// UIDL attribute key → target attribute key
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Mapping {
    /// Overlay `other` on top of this mapping, entry by entry
    pub fn merge(&mut self, other: &Mapping) {
        self.elements
            .extend(other.elements.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.events
            .extend(other.events.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.attributes
            .extend(other.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn merged(&self, other: &Mapping) -> Mapping {
        let mut mapping = self.clone();
        mapping.merge(other);
        mapping
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.events.is_empty() && self.attributes.is_empty()
    }

    /// Target attribute name for a UIDL event
    pub fn event_name(&self, event: &str) -> Option<&str> {
        self.events.get(event).map(String::as_str)
    }

    /// Target attribute key for a UIDL attribute key
    pub fn attribute_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.attributes.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Substitute one element according to the mapping.
    ///
    /// Already resolved elements are left untouched, which makes repeated
    /// resolution a no-op. Elements without a mapping only pick up their
    /// semantic type, if any.
    pub fn resolve_element(&self, element: &mut UidlElement) {
        if element.mapped_from.is_some() {
            return;
        }

        let original = element.element_type.clone();
        match self.elements.get(&original) {
            Some(mapped) => {
                debug!("Mapping element '{}' to '{}'", original, mapped.element_type);
                element.element_type = mapped.element_type.clone();
                if let Some(dependency) = &mapped.dependency {
                    element.dependency = Some(dependency.clone());
                }
                if !mapped.attrs.is_empty() {
                    element.attrs = resolve_attributes(&mapped.attrs, &element.attrs);
                }
            }
            None => match element.semantic_type.take() {
                Some(semantic) => element.element_type = semantic,
                None => return,
            },
        }

        element.mapped_from = Some(original);
    }

    /// Resolve every element of a tree
    pub fn resolve_tree(&self, node: &mut UidlNode) {
        node.for_each_element_mut(&mut |element| self.resolve_element(element));
    }
}

/// Unite the mapped attributes with the element's own attributes.
///
/// Element attributes consumed by an `attr` binding are not copied again.
fn resolve_attributes(
    mapped: &BTreeMap<String, AttrValue>,
    original: &BTreeMap<String, AttrValue>,
) -> BTreeMap<String, AttrValue> {
    let mut resolved = BTreeMap::new();
    let mut consumed = Vec::new();

    for (key, value) in mapped {
        match value {
            AttrValue::Dynamic(DynamicReference {
                reference_type: ReferenceType::Attr,
                id,
            }) => {
                if let Some(bound) = original.get(id) {
                    resolved.insert(key.clone(), bound.clone());
                    consumed.push(id.as_str());
                }
            }
            other => {
                resolved.insert(key.clone(), other.clone());
            }
        }
    }

    for (key, value) in original {
        if !consumed.contains(&key.as_str()) {
            resolved.insert(key.clone(), value.clone());
        }
    }

    resolved
}

fn bind_attr(id: &str) -> AttrValue {
    AttrValue::Dynamic(DynamicReference {
        reference_type: ReferenceType::Attr,
        id: id.to_string(),
    })
}

fn element(element_type: &str) -> ElementMapping {
    ElementMapping {
        element_type: element_type.to_string(),
        dependency: None,
        attrs: BTreeMap::new(),
    }
}

/// Primitive element kinds shared by every web target
fn html_elements() -> BTreeMap<String, ElementMapping> {
    [
        ("container", "div"),
        ("text", "span"),
        ("image", "img"),
        ("link", "a"),
        ("list", "ul"),
        ("list-item", "li"),
        ("button", "button"),
        ("textinput", "input"),
    ]
    .into_iter()
    .map(|(semantic, tag)| (semantic.to_string(), element(tag)))
    .collect()
}

/// Mapping for plain HTML output
pub fn html_mapping() -> Mapping {
    let mut elements = html_elements();
    let mut navlink = element("a");
    navlink.attrs.insert("href".into(), bind_attr("transitionTo"));
    elements.insert("navlink".into(), navlink);

    let events = [("click", "onclick"), ("change", "onchange"), ("submit", "onsubmit")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Mapping {
        elements,
        events,
        attributes: BTreeMap::new(),
    }
}

/// Mapping for React output
pub fn react_mapping() -> Mapping {
    let mut elements = html_elements();
    let mut navlink = element("Link");
    navlink.dependency = Some(Dependency::library("react-router-dom", "4.3.1").named());
    navlink.attrs.insert("to".into(), bind_attr("transitionTo"));
    elements.insert("navlink".into(), navlink);

    let events = [("click", "onClick"), ("change", "onChange"), ("submit", "onSubmit")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let attributes = [("class", "className"), ("for", "htmlFor")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Mapping {
        elements,
        events,
        attributes,
    }
}
