//! Name lookup for configuration files
//!
//! Configuration refers to generators, plugins, post-processors, mappings and
//! strategy presets by name. The registry is an explicit value handed to
//! whoever resolves those names.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{GenerationError, Result};
use crate::generator::{ComponentGenerator, CssFormatter, NormalizeWhitespace, PostProcessor};
use crate::mapping::{html_mapping, react_mapping, Mapping};
use crate::pipeline::ComponentPlugin;
use crate::plugins::{
    builtin_plugin, html_component_generator, project_stylesheet_generator,
    react_component_generator, react_router_generator,
};
use crate::project::{html_strategy, react_strategy, ProjectStrategy};

pub struct Registry {
    generators: BTreeMap<String, ComponentGenerator>,
    post_processors: BTreeMap<String, Arc<dyn PostProcessor>>,
    mappings: BTreeMap<String, Mapping>,
}

impl Registry {
    /// Registry holding every built-in collaborator
    pub fn builtin() -> Self {
        let mut registry = Self {
            generators: BTreeMap::new(),
            post_processors: BTreeMap::new(),
            mappings: BTreeMap::new(),
        };

        registry.register_generator("react-component", react_component_generator());
        registry.register_generator("react-router", react_router_generator());
        registry.register_generator("html-component", html_component_generator());
        registry.register_generator("project-stylesheet", project_stylesheet_generator());

        registry.register_post_processor(Arc::new(NormalizeWhitespace));
        registry.register_post_processor(Arc::new(CssFormatter));

        registry.mappings.insert("react".into(), react_mapping());
        registry.mappings.insert("html".into(), html_mapping());

        registry
    }

    pub fn register_generator(&mut self, name: impl Into<String>, generator: ComponentGenerator) {
        self.generators.insert(name.into(), generator);
    }

    pub fn register_post_processor(&mut self, processor: Arc<dyn PostProcessor>) {
        self.post_processors
            .insert(processor.name().to_string(), processor);
    }

    /// Generator named by a strategy section
    pub fn generator(&self, section: &str, name: &str) -> Result<ComponentGenerator> {
        self.generators
            .get(name)
            .cloned()
            .ok_or_else(|| GenerationError::UndefinedGenerator {
                section: section.to_string(),
                name: name.to_string(),
            })
    }

    pub fn plugin(&self, name: &str) -> Result<Arc<dyn ComponentPlugin>> {
        builtin_plugin(name).ok_or_else(|| GenerationError::UndefinedPlugin(name.to_string()))
    }

    pub fn post_processor(&self, name: &str) -> Result<Arc<dyn PostProcessor>> {
        self.post_processors
            .get(name)
            .cloned()
            .ok_or_else(|| GenerationError::UndefinedPostProcessor(name.to_string()))
    }

    pub fn mapping(&self, name: &str) -> Result<&Mapping> {
        self.mappings
            .get(name)
            .ok_or_else(|| GenerationError::UndefinedMapping(name.to_string()))
    }

    pub fn strategy(&self, preset: &str) -> Result<ProjectStrategy> {
        match preset {
            "react" => Ok(react_strategy()),
            "html" => Ok(html_strategy()),
            other => Err(GenerationError::InvalidStrategy(format!(
                "unknown strategy preset '{}'",
                other
            ))),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_are_configuration_faults() {
        let registry = Registry::builtin();

        let err = registry.generator("pages", "vue-component").unwrap_err();
        assert!(matches!(err, GenerationError::UndefinedGenerator { .. }));
        assert!(err.is_configuration_fault());

        assert!(matches!(
            registry.plugin("prettier").err(),
            Some(GenerationError::UndefinedPlugin(_))
        ));
        assert!(matches!(
            registry.post_processor("minify").err(),
            Some(GenerationError::UndefinedPostProcessor(_))
        ));
        assert!(matches!(
            registry.mapping("vue").err(),
            Some(GenerationError::UndefinedMapping(_))
        ));
        assert!(registry.strategy("angular").is_err());
    }

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        for name in ["html-component", "project-stylesheet", "react-component", "react-router"] {
            assert!(registry.generator("components", name).is_ok());
        }
        assert!(registry.post_processor("css-format").is_ok());
        assert_eq!(
            registry.mapping("react").unwrap().attribute_name("class"),
            "className"
        );
    }
}
