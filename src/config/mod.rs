//! Configuration handling for uidlgen
//!
//! Parses `uidlgen.toml` and turns it into a project strategy.

mod registry;
mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, FileType};
use crate::error::GenerationError;
use crate::generator::ComponentGenerator;
use crate::mapping::Mapping;
use crate::project::{EntryFileOptions, ProjectStrategy};
use crate::uidl::ProjectUidl;

pub use registry::Registry;
pub use schema::*;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Mapping overlaid on the generators' own mappings
    #[serde(default)]
    pub mapping: Option<Mapping>,

    /// Root directory (computed from config file location)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read config file: {}", canonical_path.display()))?;

        let mut config = Self::parse(&content)?;
        config.root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.as_ref().display());
            Ok(Self::default_config())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "Failed to parse uidlgen.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            root: PathBuf::from("."),
            ..Self::default()
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.strategy.preset.trim().is_empty() {
            anyhow::bail!("strategy.preset must not be empty in uidlgen.toml");
        }
        if self.output.dir.trim().is_empty() {
            anyhow::bail!("output.dir must not be empty in uidlgen.toml");
        }
        if let Some(name) = &self.project.name {
            if name.trim().is_empty() {
                anyhow::bail!("project.name must not be empty when given");
            }
        }
        Ok(())
    }

    /// Get the absolute output directory path
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output.dir)
    }

    /// Resolve the configured preset and overrides into a strategy
    pub fn build_strategy(&self, registry: &Registry) -> std::result::Result<ProjectStrategy, GenerationError> {
        let config = &self.strategy;
        let mut strategy = registry.strategy(&config.preset)?;

        if let Some(prefix) = &config.static_prefix {
            strategy.static_files.prefix = Some(prefix.clone());
        }
        if let Some(path) = &config.static_path {
            strategy.static_files.path = path.clone();
        }

        let components = &config.components;
        strategy.components.generator =
            section_generator(registry, "components", &strategy.components.generator, components)?;
        if let Some(path) = &components.path {
            strategy.components.path = path.clone();
        }
        if let Some(folder) = components.folder_per_component {
            strategy.components.options.create_folder_for_each_component = folder;
        }
        if let Some(file_name) = &components.file_name {
            strategy.components.options.component_file_name = Some(file_name.clone());
        }

        let pages = &config.pages;
        strategy.pages.generator = section_generator(registry, "pages", &strategy.pages.generator, pages)?;
        if let Some(path) = &pages.path {
            strategy.pages.path = path.clone();
        }
        if let Some(folder) = pages.folder_per_component {
            strategy.pages.options.create_folder_for_each_page = folder;
        }
        if let Some(file_name) = &pages.file_name {
            strategy.pages.options.page_file_name = Some(file_name.clone());
        }

        if let Some(router_config) = &config.router {
            if !router_config.enabled {
                strategy.router = None;
            } else if let Some(router) = &mut strategy.router {
                router.generator = section_generator(registry, "router", &router.generator, router_config)?;
                if let Some(path) = &router_config.path {
                    router.path = path.clone();
                }
                if let Some(file_name) = &router_config.file_name {
                    router.file_name = file_name.clone();
                }
            } else {
                return Err(GenerationError::InvalidStrategy(format!(
                    "the {} preset has no router section to configure",
                    config.preset
                )));
            }
        }

        if let Some(entry_config) = &config.entry {
            if !entry_config.enabled {
                strategy.entry = None;
            } else if let Some(entry) = &mut strategy.entry {
                if let Some(path) = &entry_config.path {
                    entry.path = path.clone();
                }
                if let Some(file_name) = &entry_config.file_name {
                    entry.file_name = file_name.clone();
                }
                entry.options.app_root_override = entry_config.app_root_override.clone();
                entry.options.custom_head_content = entry_config.custom_head_content.clone();
                entry.options.custom_tags = entry_config.custom_tags.clone();

                let extra = entry_chunks(&entry_config.chunks)?;
                if !extra.is_empty() {
                    let base = entry.chunk_generation.clone();
                    entry.chunk_generation = Arc::new(move |uidl: &ProjectUidl, options: &EntryFileOptions| {
                        let mut chunks = base(uidl, options);
                        for chunk in &extra {
                            chunks.add_or_replace(chunk.clone());
                        }
                        chunks
                    });
                }
            } else {
                return Err(GenerationError::InvalidStrategy(format!(
                    "the {} preset has no entry section to configure",
                    config.preset
                )));
            }
        }

        if let Some(style_config) = &config.style_sheet {
            if !style_config.enabled {
                strategy.project_style_sheet = None;
            } else if let Some(style_sheet) = &mut strategy.project_style_sheet {
                if let Some(name) = &style_config.generator {
                    style_sheet.generator = registry.generator("style_sheet", name)?;
                }
                if let Some(path) = &style_config.path {
                    style_sheet.path = path.clone();
                }
                if let Some(file_name) = &style_config.file_name {
                    style_sheet.file_name = file_name.clone();
                }
                if let Some(import_file) = style_config.import_file {
                    style_sheet.import_file = import_file;
                }
            }
        }

        strategy.validate()?;
        Ok(strategy)
    }
}

/// The section's generator with configured replacements and additions
fn section_generator(
    registry: &Registry,
    section: &str,
    preset: &ComponentGenerator,
    config: &SectionConfig,
) -> std::result::Result<ComponentGenerator, GenerationError> {
    let base = match &config.generator {
        Some(name) => registry.generator(section, name)?,
        None => preset.clone(),
    };
    if config.plugins.is_empty() && config.post_processors.is_empty() && config.mappings.is_empty() {
        return Ok(base);
    }

    let mut builder = base.to_builder();
    for name in &config.mappings {
        builder = builder.mapping(registry.mapping(name)?);
    }
    for name in &config.plugins {
        builder = builder.plugin(registry.plugin(name)?);
    }
    for name in &config.post_processors {
        builder = builder.post_processor(registry.post_processor(name)?);
    }
    Ok(builder.build())
}

fn entry_chunks(configs: &[ChunkConfig]) -> std::result::Result<Vec<Chunk>, GenerationError> {
    configs
        .iter()
        .map(|config| {
            let mut chunk = Chunk::text(config.name.clone(), FileType::Html, config.content.clone())
                .link_after(config.link_after.iter().cloned());
            for flag in &config.flags {
                chunk = chunk.with_flag_named(flag)?;
            }
            Ok(chunk)
        })
        .collect()
}
