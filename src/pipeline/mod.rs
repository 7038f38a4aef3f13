//! Plugin pipeline
//!
//! A component structure is threaded through an ordered list of plugins.
//! Each plugin receives the whole structure by value and hands it back; the
//! first failure stops the run.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chunk::ChunkStore;
use crate::dependency::DependencyAggregator;
use crate::error::{GenerationError, Result};
use crate::mapping::Mapping;
use crate::uidl::{ComponentUidl, DesignLanguage, StyleSetDefinitions};

/// Global stylesheet a component may import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStyleSet {
    pub style_set_definitions: StyleSetDefinitions,

    /// Stylesheet file name without extension
    pub file_name: String,

    /// Relative path from the component's folder to the stylesheet's folder
    pub path: String,

    /// Whether every component imports the stylesheet
    pub import_file: bool,
}

/// A routed page, as seen by the router plugin
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition {
    pub nav_link: String,
    pub component_name: String,
    /// Module path of the page relative to the router file, without extension
    pub module_path: String,
}

/// Options for one component generation
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Relative path from the component's folder to the shared components folder
    pub local_dependencies_prefix: Option<String>,

    /// Prefix prepended to root-relative asset paths
    pub assets_prefix: Option<String>,

    /// Mapping overlaid on the generator's own mappings
    pub mapping: Option<Mapping>,

    /// Set for the application root; enables global stylesheet import
    pub is_root_component: bool,

    pub design_language: Option<DesignLanguage>,

    pub project_style_set: Option<ProjectStyleSet>,

    /// Routes for router generation
    pub routes: Vec<RouteDefinition>,

    /// Shared components by name, for generators that inline them
    pub external_components: BTreeMap<String, ComponentUidl>,
}

impl GeneratorOptions {
    /// Prefix for local component imports, `.` when unset
    pub fn local_prefix(&self) -> &str {
        self.local_dependencies_prefix.as_deref().unwrap_or(".")
    }

    pub fn assets_prefix(&self) -> &str {
        self.assets_prefix.as_deref().unwrap_or("")
    }

    /// Reject option values no generator can work with
    pub fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.local_dependencies_prefix {
            if !prefix.starts_with('.') {
                return Err(GenerationError::InvalidStrategy(format!(
                    "local dependencies prefix '{}' is not relative",
                    prefix
                )));
            }
        }
        if let Some(style_set) = &self.project_style_set {
            if style_set.file_name.is_empty() {
                return Err(GenerationError::InvalidStrategy(
                    "project stylesheet has no file name".into(),
                ));
            }
        }
        for route in &self.routes {
            if route.nav_link.is_empty() || route.component_name.is_empty() {
                return Err(GenerationError::InvalidStrategy(format!(
                    "route to '{}' is incomplete",
                    route.module_path
                )));
            }
        }
        Ok(())
    }
}

/// Everything one pipeline run works on
#[derive(Debug, Clone)]
pub struct ComponentStructure {
    pub uidl: ComponentUidl,
    pub chunks: ChunkStore,
    pub dependencies: DependencyAggregator,
    pub options: GeneratorOptions,
}

impl ComponentStructure {
    pub fn new(uidl: ComponentUidl, options: GeneratorOptions) -> Self {
        Self {
            uidl,
            chunks: ChunkStore::new(),
            dependencies: DependencyAggregator::new(),
            options,
        }
    }

    /// Structure dependencies plus every chunk's dependency records
    pub fn all_dependencies(&self) -> Result<DependencyAggregator> {
        let mut dependencies = self.dependencies.clone();
        self.chunks.collect_dependencies(&mut dependencies)?;
        Ok(dependencies)
    }
}

/// A transformation step over a component structure
#[async_trait]
pub trait ComponentPlugin: Send + Sync {
    /// Plugin name for logging and error reports
    fn name(&self) -> &str;

    async fn run(&self, structure: ComponentStructure) -> Result<ComponentStructure>;
}

/// Run the plugins in order, stopping at the first failure
pub async fn run_pipeline(
    mut structure: ComponentStructure,
    plugins: &[Arc<dyn ComponentPlugin>],
) -> Result<ComponentStructure> {
    debug!(
        "Running {} plugin(s) for '{}'",
        plugins.len(),
        structure.uidl.name
    );

    for plugin in plugins {
        debug!("Plugin: {}", plugin.name());
        structure = plugin.run(structure).await?;
        debug!("  {} chunk(s) after {}", structure.chunks.len(), plugin.name());
    }

    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, FileType};
    use crate::uidl::UidlNode;

    struct Producer;

    #[async_trait]
    impl ComponentPlugin for Producer {
        fn name(&self) -> &str {
            "producer"
        }

        async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
            structure
                .chunks
                .add_or_replace(Chunk::text("body", FileType::Js, "const a = 1"));
            Ok(structure)
        }
    }

    struct Consumer;

    #[async_trait]
    impl ComponentPlugin for Consumer {
        fn name(&self) -> &str {
            "consumer"
        }

        async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
            let chunk = structure.chunks.require_mut(self.name(), FileType::Js, "body")?;
            chunk.as_text_mut()?.push_str("\nexport default a");
            Ok(structure)
        }
    }

    fn structure() -> ComponentStructure {
        ComponentStructure::new(
            ComponentUidl::new("Demo", UidlNode::Static(String::new())),
            GeneratorOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_plugins_run_in_order() {
        let plugins: Vec<Arc<dyn ComponentPlugin>> = vec![Arc::new(Producer), Arc::new(Consumer)];
        let result = run_pipeline(structure(), &plugins).await.unwrap();
        assert_eq!(
            result.chunks.link(FileType::Js).unwrap(),
            "const a = 1\nexport default a"
        );
    }

    #[tokio::test]
    async fn test_missing_chunk_names_plugin_and_chunk() {
        let plugins: Vec<Arc<dyn ComponentPlugin>> = vec![Arc::new(Consumer)];
        match run_pipeline(structure(), &plugins).await.unwrap_err() {
            GenerationError::MissingChunk { plugin, chunk, .. } => {
                assert_eq!(plugin, "consumer");
                assert_eq!(chunk, "body");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absolute_prefix_is_rejected() {
        let options = GeneratorOptions {
            local_dependencies_prefix: Some("/components".into()),
            ..Default::default()
        };
        assert!(options.validate().is_err());
        assert_eq!(GeneratorOptions::default().local_prefix(), ".");
    }
}
