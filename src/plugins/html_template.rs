//! Static HTML document for a component
//!
//! References to other components are inlined, since a plain HTML page has
//! no module system to import them with.

use async_trait::async_trait;
use tracing::debug;

use super::chunks;
use super::css::extract_styles;
use crate::chunk::{Chunk, FileType};
use crate::dependency::Dependency;
use crate::error::{GenerationError, Result};
use crate::mapping::Mapping;
use crate::pipeline::{ComponentPlugin, ComponentStructure, GeneratorOptions};
use crate::render::markup::{MarkupAttr, MarkupNode};
use crate::uidl::{
    AttrValue, ComponentUidl, DynamicReference, ReferenceType, UidlElement, UidlNode,
};
use crate::utils::{join_module_path, prefix_assets_path};

/// Attributes holding asset URLs
const URL_ATTRIBUTES: &[&str] = &["src", "href"];

pub struct HtmlTemplatePlugin;

#[async_trait]
impl ComponentPlugin for HtmlTemplatePlugin {
    fn name(&self) -> &str {
        "html-template"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let mapping = structure.options.mapping.clone().unwrap_or_default();
        let mut builder = HtmlBuilder {
            plugin: self.name(),
            mapping: &mapping,
            options: &structure.options,
            stack: vec![structure.uidl.name.clone()],
            stylesheets: Vec::new(),
        };

        let mut body = MarkupNode::new("body");
        builder.append(&mut body, &structure.uidl.node, &structure.uidl)?;

        let stylesheets = builder.stylesheets;
        for path in stylesheets {
            structure
                .dependencies
                .merge(path.clone(), Dependency::local(path).side_effect())?;
        }

        let mut html = MarkupNode::new("html");
        html.add_child(body);

        structure
            .chunks
            .add_or_replace(Chunk::text(chunks::DOCTYPE, FileType::Html, "<!DOCTYPE html>"));
        structure.chunks.add_or_replace(
            Chunk::markup(chunks::HTML_TEMPLATE, FileType::Html, html).link_after([chunks::DOCTYPE]),
        );

        Ok(structure)
    }
}

struct HtmlBuilder<'a> {
    plugin: &'a str,
    mapping: &'a Mapping,
    options: &'a GeneratorOptions,
    /// Components currently being inlined, outermost first
    stack: Vec<String>,
    /// Stylesheets of inlined components, in first-use order
    stylesheets: Vec<String>,
}

impl HtmlBuilder<'_> {
    fn append(&mut self, parent: &mut MarkupNode, node: &UidlNode, owner: &ComponentUidl) -> Result<()> {
        match node {
            UidlNode::Element(element) => {
                match self.options.external_components.get(&element.element_type) {
                    Some(component) => self.inline(parent, component),
                    None => {
                        let child = self.element(element, owner)?;
                        parent.add_child(child);
                        Ok(())
                    }
                }
            }
            UidlNode::Static(text) => {
                parent.add_text(text.clone());
                Ok(())
            }
            UidlNode::Dynamic(reference) => {
                if let Some(value) = static_value(reference, owner) {
                    parent.add_text(value);
                }
                Ok(())
            }
        }
    }

    fn element(&mut self, element: &UidlElement, owner: &ComponentUidl) -> Result<MarkupNode> {
        let mut node = MarkupNode::new(element.element_type.clone());

        for (key, value) in &element.attrs {
            let key = self.mapping.attribute_name(key);
            let value = match value {
                AttrValue::Static(text) => text.clone(),
                AttrValue::Dynamic(reference) => match static_value(reference, owner) {
                    Some(value) => value,
                    None => {
                        debug!("Dropping dynamic attribute '{}' on <{}>", key, node.tag);
                        continue;
                    }
                },
            };
            let value = if URL_ATTRIBUTES.contains(&key) {
                prefix_assets_path(self.options.assets_prefix(), &value)
            } else {
                value
            };
            node.set_attr(key, MarkupAttr::Static(value));
        }

        for (event, handler) in &element.events {
            let key = self.mapping.event_name(event).unwrap_or(event);
            node.set_attr(key, MarkupAttr::Static(handler.clone()));
        }

        for child in &element.children {
            self.append(&mut node, child, owner)?;
        }

        Ok(node)
    }

    fn inline(&mut self, parent: &mut MarkupNode, component: &ComponentUidl) -> Result<()> {
        if self.stack.contains(&component.name) {
            return Err(GenerationError::plugin(
                self.plugin,
                format!(
                    "component '{}' includes itself ({} -> {})",
                    component.name,
                    self.stack.join(" -> "),
                    component.name
                ),
            ));
        }

        let mut tree = component.node.clone();
        self.mapping.resolve_tree(&mut tree);

        if !extract_styles(&mut tree).is_empty() {
            let path = format!(
                "{}.css",
                join_module_path(self.options.local_prefix(), &component.module_path())
            );
            if !self.stylesheets.contains(&path) {
                self.stylesheets.push(path);
            }
        }

        self.stack.push(component.name.clone());
        let result = self.append(parent, &tree, component);
        self.stack.pop();
        result
    }
}

/// Value of a reference that is known at generation time
fn static_value(reference: &DynamicReference, owner: &ComponentUidl) -> Option<String> {
    if reference.reference_type != ReferenceType::State {
        return None;
    }
    let state = owner.state_definitions.get(&reference.id)?;
    Some(match &state.default_value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::html_mapping;

    fn options(components: Vec<ComponentUidl>) -> GeneratorOptions {
        GeneratorOptions {
            mapping: Some(html_mapping()),
            assets_prefix: Some("/static".into()),
            external_components: components
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_document_with_inlined_component() {
        let mut banner = UidlElement::new("container");
        banner.children.push(UidlNode::Static("Welcome".into()));
        let banner = ComponentUidl::new("Banner", UidlNode::Element(banner));

        let mut root = UidlElement::new("main");
        root.children.push(UidlNode::Element(UidlElement::new("Banner")));
        let mut image = UidlElement::new("img");
        image.attrs.insert("src".into(), AttrValue::Static("/logo.png".into()));
        root.children.push(UidlNode::Element(image));

        let uidl = ComponentUidl::new("Home", UidlNode::Element(root));
        let structure = HtmlTemplatePlugin
            .run(ComponentStructure::new(uidl, options(vec![banner])))
            .await
            .unwrap();

        assert_eq!(
            structure.chunks.link(FileType::Html).unwrap(),
            "<!DOCTYPE html>\n<html>\n  <body>\n    <main>\n      <div>Welcome</div>\n      <img src=\"/static/logo.png\">\n    </main>\n  </body>\n</html>"
        );
    }

    #[tokio::test]
    async fn test_self_inclusion_fails() {
        let looping = ComponentUidl::new("Loop", UidlNode::Element(UidlElement::new("Loop")));
        let uidl = ComponentUidl::new("Page", UidlNode::Element(UidlElement::new("Loop")));
        let err = HtmlTemplatePlugin
            .run(ComponentStructure::new(uidl, options(vec![looping])))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Plugin { .. }));
    }

    #[tokio::test]
    async fn test_inlined_component_keeps_its_stylesheet() {
        let mut label = UidlElement::new("span");
        label.name = Some("Price".into());
        label.style.insert("fontWeight".into(), "bold".into());
        label.children.push(UidlNode::Static("9.99".into()));
        let mut price = ComponentUidl::new("Price Tag", UidlNode::Element(label));
        price.output_options.folder_path = vec!["shop".into()];

        let mut root = UidlElement::new("main");
        root.children.push(UidlNode::Element(UidlElement::new("Price Tag")));
        root.children.push(UidlNode::Element(UidlElement::new("Price Tag")));
        let uidl = ComponentUidl::new("Home", UidlNode::Element(root));

        let mut options = options(vec![price]);
        options.local_dependencies_prefix = Some("../components".into());
        let structure = HtmlTemplatePlugin
            .run(ComponentStructure::new(uidl, options))
            .await
            .unwrap();

        let html = structure.chunks.link(FileType::Html).unwrap();
        assert_eq!(html.matches("<span class=\"price\">9.99</span>").count(), 2);

        let stylesheets: Vec<&str> = structure
            .dependencies
            .iter()
            .map(|(identifier, _)| identifier.as_str())
            .collect();
        assert_eq!(stylesheets, vec!["../components/shop/price-tag.css"]);
    }
}
