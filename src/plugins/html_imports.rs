//! Document head for HTML components
//!
//! Path-only dependencies become stylesheet links and script tags; the
//! component's SEO settings become title, meta and canonical tags.

use async_trait::async_trait;

use super::chunks;
use crate::chunk::FileType;
use crate::dependency::ImportKind;
use crate::error::Result;
use crate::pipeline::{ComponentPlugin, ComponentStructure};
use crate::render::markup::MarkupNode;
use crate::uidl::AssetKind;
use crate::utils::prefix_assets_path;

pub struct HtmlImportsPlugin;

#[async_trait]
impl ComponentPlugin for HtmlImportsPlugin {
    fn name(&self) -> &str {
        "html-imports"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let dependencies = structure.all_dependencies()?;
        let assets_prefix = structure.options.assets_prefix().to_string();

        let mut head = MarkupNode::new("head");

        for (_, dependency) in dependencies.iter() {
            if dependency.import != ImportKind::SideEffect {
                continue;
            }
            if dependency.source.ends_with(".css") {
                head.add_child(
                    MarkupNode::new("link")
                        .with_attr("href", dependency.source.as_str())
                        .with_attr("rel", "stylesheet"),
                );
            } else {
                head.add_child(
                    MarkupNode::new("script")
                        .with_attr("type", "text/javascript")
                        .with_attr("src", dependency.source.as_str()),
                );
            }
        }

        if let Some(seo) = &structure.uidl.seo {
            if let Some(title) = &seo.title {
                let mut tag = MarkupNode::new("title");
                tag.add_text(title.clone());
                head.add_child(tag);
            }
            for meta in &seo.meta_tags {
                let mut tag = MarkupNode::new("meta");
                for (key, value) in meta {
                    tag = tag.with_attr(key.as_str(), prefix_assets_path(&assets_prefix, value));
                }
                head.add_child(tag);
            }
            for asset in &seo.assets {
                if let (AssetKind::Canonical, Some(path)) = (asset.kind, &asset.path) {
                    head.add_child(
                        MarkupNode::new("link")
                            .with_attr("rel", "canonical")
                            .with_attr("href", prefix_assets_path(&assets_prefix, path)),
                    );
                }
            }
        }

        let chunk = structure
            .chunks
            .require_mut(self.name(), FileType::Html, chunks::HTML_TEMPLATE)?;
        let html = chunk.as_markup_mut()?;

        if head.children.is_empty() {
            return Ok(structure);
        }
        html.prepend_child(head);

        Ok(structure)
    }
}
