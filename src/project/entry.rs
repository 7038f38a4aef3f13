//! HTML entry document
//!
//! Builds the `index.html` that hosts the application from the project's
//! global settings: language, title, meta tags, assets, manifest link and
//! custom code.

use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkStore, FileType};
use crate::render::markup::MarkupNode;
use crate::uidl::{AssetKind, ProjectUidl};
use crate::utils::prefix_assets_path;

/// Attribute of a custom tag; a missing value makes it a boolean attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub attribute_key: String,
    #[serde(default)]
    pub attribute_value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTag {
    Head,
    #[default]
    Body,
}

/// Extra element injected into the entry document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTag {
    pub tag_name: String,
    #[serde(default)]
    pub target_tag: TargetTag,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFileOptions {
    #[serde(default)]
    pub assets_prefix: Option<String>,

    /// Raw markup replacing the default `<div id="app">`
    #[serde(default)]
    pub app_root_override: Option<String>,

    #[serde(default)]
    pub custom_head_content: Option<String>,

    #[serde(default)]
    pub custom_tags: Vec<CustomTag>,
}

/// Doctype and document chunks for the default HTML entry file
pub fn create_html_entry_chunks(uidl: &ProjectUidl, options: &EntryFileOptions) -> ChunkStore {
    let prefix = options.assets_prefix.as_deref().unwrap_or("");
    let globals = &uidl.globals;

    let mut html = MarkupNode::new("html");
    let mut head = MarkupNode::new("head");
    let mut body = MarkupNode::new("body");

    match &options.app_root_override {
        Some(raw) => body.add_raw(raw.clone()),
        None => body.add_child(MarkupNode::new("div").with_attr("id", "app")),
    }

    if let Some(language) = &globals.settings.language {
        html = html.with_attr("lang", language.as_str());
    }

    if let Some(title) = &globals.settings.title {
        let mut tag = MarkupNode::new("title");
        tag.add_text(title.clone());
        head.add_child(tag);
    }

    for custom in &options.custom_tags {
        let mut node = MarkupNode::new(custom.tag_name.clone());
        if let Some(content) = &custom.content {
            node.add_text(content.clone());
        }
        for attribute in &custom.attributes {
            match &attribute.attribute_value {
                Some(value) => node = node.with_attr(attribute.attribute_key.as_str(), value.as_str()),
                None => node.set_boolean_attr(attribute.attribute_key.clone()),
            }
        }
        match custom.target_tag {
            TargetTag::Head => head.add_child(node),
            TargetTag::Body => body.add_child(node),
        }
    }

    if globals.manifest.is_some() {
        head.add_child(
            MarkupNode::new("link")
                .with_attr("rel", "manifest")
                .with_attr("href", format!("{}/manifest.json", prefix.trim_end_matches('/'))),
        );
    }

    for meta in &globals.meta {
        let mut tag = MarkupNode::new("meta");
        for (key, value) in meta {
            tag = tag.with_attr(key.as_str(), prefix_assets_path(prefix, value));
        }
        head.add_child(tag);
    }

    for asset in &globals.assets {
        let path = asset.path.as_deref().map(|p| prefix_assets_path(prefix, p));
        let options = &asset.options;

        match (asset.kind, &path) {
            (AssetKind::Canonical, Some(path)) => head.add_child(
                MarkupNode::new("link")
                    .with_attr("rel", "canonical")
                    .with_attr("href", path.as_str()),
            ),
            (AssetKind::Style | AssetKind::Font, Some(path)) => head.add_child(
                MarkupNode::new("link")
                    .with_attr("rel", "stylesheet")
                    .with_attr("href", path.as_str()),
            ),
            (AssetKind::Icon, Some(path)) => {
                let mut icon = MarkupNode::new("link")
                    .with_attr("rel", "shortcut icon")
                    .with_attr("href", path.as_str());
                if let Some(icon_type) = &options.icon_type {
                    icon = icon.with_attr("type", icon_type.as_str());
                }
                if let Some(sizes) = &options.icon_sizes {
                    icon = icon.with_attr("sizes", sizes.as_str());
                }
                head.add_child(icon);
            }
            _ => {}
        }

        if let (AssetKind::Style, Some(content)) = (asset.kind, &asset.content) {
            let mut style = MarkupNode::new("style");
            style.add_text(content.clone());
            head.add_child(style);
        }

        if asset.kind == AssetKind::Script {
            let mut script = MarkupNode::new("script").with_attr("type", "text/javascript");
            match (&path, &asset.content) {
                (Some(path), _) => {
                    script = script.with_attr("src", path.as_str());
                    if options.defer {
                        script.set_boolean_attr("defer");
                    }
                    if options.is_async {
                        script.set_boolean_attr("async");
                    }
                }
                (None, Some(content)) => script.add_text(content.clone()),
                (None, None) => {}
            }

            if options.target.as_deref() == Some("body") {
                body.add_child(script);
            } else {
                head.add_child(script);
            }
        }
    }

    if let Some(content) = &options.custom_head_content {
        head.add_raw(content.clone());
    }

    if let Some(code) = &globals.custom_code {
        if let Some(head_code) = &code.head {
            head.add_raw(head_code.clone());
        }
        if let Some(body_code) = &code.body {
            body.add_raw(body_code.clone());
        }
    }

    html.add_child(head);
    html.add_child(body);

    vec![
        Chunk::text("doctype", FileType::Html, "<!DOCTYPE html>"),
        Chunk::markup("html-node", FileType::Html, html).link_after(["doctype"]),
    ]
    .into_iter()
    .collect()
}
