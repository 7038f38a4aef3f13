//! Component generator
//!
//! Binds mappings, plugins and post-processors into one reusable value.
//! A generator is immutable once built; derive variants with
//! [`ComponentGenerator::to_builder`].

pub mod postprocess;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::chunk::ChunkStore;
use crate::error::Result;
use crate::mapping::Mapping;
use crate::output::GeneratedFile;
use crate::pipeline::{run_pipeline, ComponentPlugin, ComponentStructure, GeneratorOptions};
use crate::uidl::{ComponentUidl, UidlElement};

pub use postprocess::{CssFormatter, NormalizeWhitespace};

/// Linked file text keyed by extension
pub type CodeOutputs = BTreeMap<String, String>;

/// Transformation over the linked text of a component's files
pub trait PostProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, outputs: CodeOutputs) -> Result<CodeOutputs>;
}

/// A post-processor backed by a closure
pub struct FnPostProcessor<F> {
    name: String,
    func: F,
}

impl<F> PostProcessor for FnPostProcessor<F>
where
    F: Fn(CodeOutputs) -> Result<CodeOutputs> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, outputs: CodeOutputs) -> Result<CodeOutputs> {
        (self.func)(outputs)
    }
}

pub fn post_processor_fn<F>(name: impl Into<String>, func: F) -> Arc<dyn PostProcessor>
where
    F: Fn(CodeOutputs) -> Result<CodeOutputs> + Send + Sync + 'static,
{
    Arc::new(FnPostProcessor {
        name: name.into(),
        func,
    })
}

/// Files and package dependencies of one generated component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledComponent {
    pub files: Vec<GeneratedFile>,
    /// Published dependencies as package → version
    pub dependencies: BTreeMap<String, String>,
}

/// Mappings, plugins and post-processors for one target
#[derive(Clone, Default)]
pub struct ComponentGenerator {
    mapping: Mapping,
    plugins: Vec<Arc<dyn ComponentPlugin>>,
    post_processors: Vec<Arc<dyn PostProcessor>>,
}

impl fmt::Debug for ComponentGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentGenerator")
            .field("plugins", &self.plugin_names())
            .field(
                "post_processors",
                &self.post_processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ComponentGenerator {
    pub fn builder() -> ComponentGeneratorBuilder {
        ComponentGeneratorBuilder::default()
    }

    /// A builder seeded with this generator's configuration
    pub fn to_builder(&self) -> ComponentGeneratorBuilder {
        ComponentGeneratorBuilder {
            generator: self.clone(),
        }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Apply the generator's mappings to a single element
    pub fn resolve_element(&self, element: &mut UidlElement) {
        self.mapping.resolve_element(element);
    }

    /// Generate the files of one component
    pub async fn generate_component(
        &self,
        uidl: &ComponentUidl,
        options: &GeneratorOptions,
    ) -> Result<CompiledComponent> {
        options.validate()?;

        let mapping = match &options.mapping {
            Some(extra) => self.mapping.merged(extra),
            None => self.mapping.clone(),
        };

        let mut uidl = uidl.clone();
        mapping.resolve_tree(&mut uidl.node);

        let mut options = options.clone();
        options.mapping = Some(mapping);

        let file_name = uidl.file_name();
        let structure = ComponentStructure::new(uidl, options);
        let structure = run_pipeline(structure, &self.plugins).await?;

        let dependencies = structure.all_dependencies()?;
        let files = self.link_code_chunks(&structure.chunks, &file_name)?;

        info!("Generated component '{}' ({} file(s))", structure.uidl.name, files.len());

        Ok(CompiledComponent {
            files,
            dependencies: dependencies.package_versions(),
        })
    }

    /// Link every file type in the store, post-process, and name the files
    pub fn link_code_chunks(&self, chunks: &ChunkStore, file_name: &str) -> Result<Vec<GeneratedFile>> {
        let linked = chunks.link_all()?;
        let order: Vec<String> = linked
            .iter()
            .map(|(file_type, _)| file_type.extension().to_string())
            .collect();

        let mut outputs: CodeOutputs = linked
            .into_iter()
            .map(|(file_type, text)| (file_type.extension().to_string(), text))
            .collect();

        for processor in &self.post_processors {
            debug!("Post-processor: {}", processor.name());
            outputs = processor.process(outputs)?;
        }

        let mut files = Vec::with_capacity(outputs.len());
        for ext in order {
            if let Some(content) = outputs.remove(&ext) {
                files.push(GeneratedFile::new(file_name, ext, content));
            }
        }
        // Outputs introduced by a post-processor come last, by extension
        for (ext, content) in outputs {
            files.push(GeneratedFile::new(file_name, ext, content));
        }

        Ok(files)
    }
}

#[derive(Default)]
pub struct ComponentGeneratorBuilder {
    generator: ComponentGenerator,
}

impl ComponentGeneratorBuilder {
    /// Overlay a mapping on the mappings added so far
    pub fn mapping(mut self, mapping: &Mapping) -> Self {
        self.generator.mapping.merge(mapping);
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn ComponentPlugin>) -> Self {
        self.generator.plugins.push(plugin);
        self
    }

    pub fn plugins<I>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ComponentPlugin>>,
    {
        self.generator.plugins.extend(plugins);
        self
    }

    pub fn post_processor(mut self, processor: Arc<dyn PostProcessor>) -> Self {
        self.generator.post_processors.push(processor);
        self
    }

    pub fn build(self) -> ComponentGenerator {
        self.generator
    }
}
