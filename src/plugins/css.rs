//! Extracts element styles into a component stylesheet

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{chunks, global_stylesheet_dependency};
use crate::chunk::{Chunk, FileType};
use crate::dependency::Dependency;
use crate::error::Result;
use crate::pipeline::{ComponentPlugin, ComponentStructure};
use crate::uidl::{AttrValue, UidlNode};
use crate::utils::dash_case;

/// `$primary-color` in a style value refers to a design token
static TOKEN_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([a-zA-Z][a-zA-Z0-9_-]*)").unwrap());

pub struct CssPlugin;

#[async_trait]
impl ComponentPlugin for CssPlugin {
    fn name(&self) -> &str {
        "css"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let rules = extract_styles(&mut structure.uidl.node);

        let file_name = structure.uidl.file_name();
        if !rules.is_empty() {
            structure
                .chunks
                .add_or_replace(Chunk::text(chunks::STYLE, FileType::Css, rules.join("\n\n")));

            let path = format!("./{}.css", file_name);
            structure.chunks.add_or_replace(Chunk::import_only(
                chunks::STYLE_IMPORT,
                FileType::Css,
                vec![(path.clone(), Dependency::local(path).side_effect())],
            ));
        }

        if let Some((identifier, dependency)) = global_stylesheet_dependency(&structure.options) {
            structure.dependencies.merge(identifier, dependency)?;
        }

        Ok(structure)
    }
}

/// Move element styles into class rules, tagging each styled element with its class
pub(crate) fn extract_styles(node: &mut UidlNode) -> Vec<String> {
    let mut rules = Vec::new();
    let mut used = HashSet::new();

    node.for_each_element_mut(&mut |element| {
        if element.style.is_empty() {
            return;
        }

        let base = dash_case(element.name.as_deref().unwrap_or(&element.element_type));
        let class_name = unique_class_name(&base, &mut used);

        let class_attr = match element.attrs.get("class") {
            Some(AttrValue::Static(existing)) if !existing.is_empty() => {
                format!("{} {}", existing, class_name)
            }
            _ => class_name.clone(),
        };
        element.attrs.insert("class".into(), AttrValue::Static(class_attr));

        rules.push(css_rule(&format!(".{}", class_name), &element.style));
    });

    rules
}

fn unique_class_name(base: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "element" } else { base };
    let mut candidate = base.to_string();
    let mut suffix = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    candidate
}

/// One CSS rule with dash-cased properties and token references resolved
pub(crate) fn css_rule(selector: &str, declarations: &BTreeMap<String, String>) -> String {
    let mut rule = format!("{} {{\n", selector);
    for (property, value) in declarations {
        rule.push_str(&format!(
            "  {}: {};\n",
            dash_case(property),
            resolve_tokens(value)
        ));
    }
    rule.push('}');
    rule
}

pub(crate) fn resolve_tokens(value: &str) -> String {
    TOKEN_REFERENCE.replace_all(value, "var(--$1)").into_owned()
}
