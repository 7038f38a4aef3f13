//! Global stylesheet from design tokens and shared style sets

use async_trait::async_trait;

use super::chunks;
use super::css::{css_rule, resolve_tokens};
use crate::chunk::{Chunk, FileType};
use crate::error::Result;
use crate::pipeline::{ComponentPlugin, ComponentStructure};
use crate::utils::dash_case;

pub struct ProjectStyleSheetPlugin;

#[async_trait]
impl ComponentPlugin for ProjectStyleSheetPlugin {
    fn name(&self) -> &str {
        "project-stylesheet"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let mut rules = Vec::new();

        let tokens = structure
            .options
            .design_language
            .as_ref()
            .or(structure.uidl.design_language.as_ref())
            .map(|language| &language.tokens);
        if let Some(tokens) = tokens.filter(|tokens| !tokens.is_empty()) {
            let mut root = String::from(":root {\n");
            for (name, value) in tokens {
                root.push_str(&format!("  --{}: {};\n", dash_case(name), resolve_tokens(value)));
            }
            root.push('}');
            rules.push(root);
        }

        let style_sets = match &structure.options.project_style_set {
            Some(style_set) if !style_set.style_set_definitions.is_empty() => {
                &style_set.style_set_definitions
            }
            _ => &structure.uidl.style_set_definitions,
        };
        for (name, declarations) in style_sets {
            rules.push(css_rule(&format!(".{}", dash_case(name)), declarations));
        }

        structure.chunks.add_or_replace(Chunk::text(
            chunks::PROJECT_STYLE,
            FileType::Css,
            rules.join("\n\n"),
        ));

        Ok(structure)
    }
}
