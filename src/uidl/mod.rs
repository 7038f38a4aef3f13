//! UIDL input model
//!
//! The framework-agnostic description of components and projects, read from
//! JSON. Only the parts the generators consume are modelled here.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::error::{GenerationError, Result};
use crate::utils::{dash_case, upper_camel_case};

/// What a dynamic value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Prop,
    State,
    Attr,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicReference {
    pub reference_type: ReferenceType,
    pub id: String,
}

/// Attribute value of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum AttrValue {
    Static(String),
    Dynamic(DynamicReference),
}

/// A node of a component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum UidlNode {
    Element(UidlElement),
    Static(String),
    Dynamic(DynamicReference),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidlElement {
    pub element_type: String,

    /// Semantic tag used when no mapping applies (`section` for a container)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,

    /// Human readable name, used for class names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,

    /// Event name → handler expression
    #[serde(default)]
    pub events: BTreeMap<String, String>,

    /// Style property → value
    #[serde(default)]
    pub style: BTreeMap<String, String>,

    #[serde(default)]
    pub children: Vec<UidlNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,

    /// Element kind before mapping resolution; set once an element is resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_from: Option<String>,
}

impl UidlElement {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            semantic_type: None,
            name: None,
            attrs: BTreeMap::new(),
            events: BTreeMap::new(),
            style: BTreeMap::new(),
            children: Vec::new(),
            dependency: None,
            mapped_from: None,
        }
    }
}

impl UidlNode {
    /// Visit every element depth-first, parents before children
    pub fn for_each_element_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut UidlElement),
    {
        if let UidlNode::Element(element) = self {
            f(element);
            for child in &mut element.children {
                child.for_each_element_mut(f);
            }
        }
    }

    pub fn for_each_element<F>(&self, f: &mut F)
    where
        F: FnMut(&UidlElement),
    {
        if let UidlNode::Element(element) = self {
            f(element);
            for child in &element.children {
                child.for_each_element(f);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    #[serde(default)]
    pub default_value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Sub-folders below the section's output path
    #[serde(default)]
    pub folder_path: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_class_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub meta_tags: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Design tokens exposed as CSS custom properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignLanguage {
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

/// Style set name → style property → value
pub type StyleSetDefinitions = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUidl {
    pub name: String,
    pub node: UidlNode,

    #[serde(default)]
    pub state_definitions: BTreeMap<String, StateDefinition>,

    #[serde(default)]
    pub output_options: OutputOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,

    #[serde(default)]
    pub style_set_definitions: StyleSetDefinitions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_language: Option<DesignLanguage>,
}

impl ComponentUidl {
    pub fn new(name: impl Into<String>, node: UidlNode) -> Self {
        Self {
            name: name.into(),
            node,
            state_definitions: BTreeMap::new(),
            output_options: OutputOptions::default(),
            seo: None,
            style_set_definitions: BTreeMap::new(),
            design_language: None,
        }
    }

    /// Output file name without extension
    pub fn file_name(&self) -> String {
        self.output_options
            .file_name
            .clone()
            .unwrap_or_else(|| dash_case(&self.name))
    }

    /// Module path below the section folder, without extension
    pub fn module_path(&self) -> String {
        let mut segments = self.output_options.folder_path.clone();
        segments.push(self.file_name());
        segments.join("/")
    }

    /// Identifier of the generated component
    pub fn class_name(&self) -> String {
        self.output_options
            .component_class_name
            .clone()
            .unwrap_or_else(|| upper_camel_case(&self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Style,
    Font,
    Icon,
    Canonical,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOptions {
    /// `head` (default) or `body`
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub defer: bool,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub icon_type: Option<String>,
    #[serde(default)]
    pub icon_sizes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub options: AssetOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

/// Web application manifest fields declared by the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub icons: Vec<ManifestIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCode {
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Globals {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub meta: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub manifest: Option<WebManifest>,
    #[serde(default)]
    pub custom_code: Option<CustomCode>,
}

/// A routed page of the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDefinition {
    /// URL the page is served at
    pub nav_link: String,
    pub component: ComponentUidl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUidl {
    pub name: String,

    #[serde(default)]
    pub globals: Globals,

    /// Application root; carries global style sets and design tokens
    pub root: ComponentUidl,

    #[serde(default)]
    pub pages: Vec<PageDefinition>,

    /// Shared components by name
    #[serde(default)]
    pub components: BTreeMap<String, ComponentUidl>,
}

impl ProjectUidl {
    pub fn from_json(source: &str) -> Result<Self> {
        let uidl: ProjectUidl = serde_json::from_str(source)?;
        uidl.validate()?;
        Ok(uidl)
    }

    /// Structural checks the generators rely on
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GenerationError::InvalidUidl("project name is empty".into()));
        }

        let mut outputs = HashSet::new();
        for page in &self.pages {
            let component = &page.component;
            if component.name.trim().is_empty() {
                return Err(GenerationError::InvalidUidl(format!(
                    "page at '{}' has an empty name",
                    page.nav_link
                )));
            }
            let mut key = component.output_options.folder_path.clone();
            key.push(component.file_name());
            if !outputs.insert(key) {
                return Err(GenerationError::InvalidUidl(format!(
                    "two pages write to the same file '{}'",
                    component.file_name()
                )));
            }
        }

        for (key, component) in &self.components {
            if component.name.trim().is_empty() {
                return Err(GenerationError::InvalidUidl(format!(
                    "component '{}' has an empty name",
                    key
                )));
            }
        }

        Ok(())
    }
}
