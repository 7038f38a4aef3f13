//! Project generation
//!
//! Drives the component generators over a whole project according to a
//! [`ProjectStrategy`], computing the relative paths between sections and
//! folding every result into one output folder and one package manifest.

pub mod entry;
pub mod manifest;
pub mod strategy;

use std::collections::BTreeMap;
use std::time::Instant;

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::error::{GenerationError, Result};
use crate::generator::CompiledComponent;
use crate::mapping::Mapping;
use crate::output::GeneratedFolder;
use crate::pipeline::{GeneratorOptions, ProjectStyleSet, RouteDefinition};
use crate::uidl::{ComponentUidl, ProjectUidl};
use crate::utils::{format_duration, join_module_path, relative_prefix};

pub use entry::{create_html_entry_chunks, Attribute, CustomTag, EntryFileOptions, TargetTag};
pub use manifest::{create_manifest_file, handle_package_json};
pub use strategy::{
    html_strategy, react_strategy, ChunkGenerationFn, ComponentsOptions, ComponentsStrategy,
    EntryStrategy, FrameworkContent, FrameworkContentFn, FrameworkContext, FrameworkFileStrategy,
    FrameworkStrategy, PagesOptions, PagesStrategy, ProjectStrategy, RouterStrategy,
    StaticStrategy, StyleSheetStrategy,
};

/// Where a component's files are written
#[derive(Debug, Clone, PartialEq)]
struct Placement {
    folder: Vec<String>,
    file_name: String,
}

impl Placement {
    /// Module path of the file from another folder, without extension
    fn module_path_from(&self, from: &[String]) -> String {
        join_module_path(&relative_prefix(from, &self.folder), &self.file_name)
    }
}

/// Generates complete projects for one strategy
#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    strategy: ProjectStrategy,
}

impl ProjectGenerator {
    pub fn new(strategy: ProjectStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &ProjectStrategy {
        &self.strategy
    }

    /// Generate every section of the project into a copy of `template`
    pub async fn generate_project(
        &self,
        uidl: &ProjectUidl,
        template: GeneratedFolder,
        mapping: Option<&Mapping>,
    ) -> Result<GeneratedFolder> {
        let start = Instant::now();
        uidl.validate()?;
        self.strategy.validate()?;

        let strategy = &self.strategy;
        let mut folder = template;
        let mut dependencies: BTreeMap<String, String> = BTreeMap::new();
        let assets_prefix = strategy.static_files.prefix.clone();

        info!("Generating project '{}' with the {} strategy", uidl.name, strategy.id);

        // Shared components
        let components: Vec<(Placement, &ComponentUidl)> = uidl
            .components
            .values()
            .map(|component| (self.component_placement(component), component))
            .collect();
        let results = try_join_all(components.iter().map(|(placement, component)| {
            let options = self.section_options(uidl, &placement.folder, mapping, false);
            async move {
                strategy
                    .components
                    .generator
                    .generate_component(&rename(component, &placement.file_name), &options)
                    .await
            }
        }))
        .await?;
        for ((placement, _), result) in components.iter().zip(results) {
            fold(&mut folder, &mut dependencies, &placement.folder, result);
        }
        debug!("Generated {} shared component(s)", components.len());

        // Pages
        let pages: Vec<(Placement, &ComponentUidl)> = uidl
            .pages
            .iter()
            .map(|page| (self.page_placement(&page.component), &page.component))
            .collect();
        let results = try_join_all(pages.iter().map(|(placement, component)| {
            let options = self.section_options(uidl, &placement.folder, mapping, false);
            async move {
                strategy
                    .pages
                    .generator
                    .generate_component(&rename(component, &placement.file_name), &options)
                    .await
            }
        }))
        .await?;
        for ((placement, _), result) in pages.iter().zip(results) {
            fold(&mut folder, &mut dependencies, &placement.folder, result);
        }
        debug!("Generated {} page(s)", pages.len());

        // Router
        if let Some(router) = &strategy.router {
            let mut options = self.section_options(uidl, &router.path, mapping, true);
            options.local_dependencies_prefix = Some(relative_prefix(&router.path, &strategy.pages.path));
            options.routes = uidl
                .pages
                .iter()
                .zip(&pages)
                .map(|(page, (placement, component))| RouteDefinition {
                    nav_link: page.nav_link.clone(),
                    component_name: component.class_name(),
                    module_path: placement.module_path_from(&router.path),
                })
                .collect();

            let root = rename(&uidl.root, &router.file_name);
            let result = router.generator.generate_component(&root, &options).await?;
            fold(&mut folder, &mut dependencies, &router.path, result);
            debug!("Generated router at {}", router.path.join("/"));
        }

        // Entry file
        if let Some(entry) = &strategy.entry {
            let mut entry_options = entry.options.clone();
            if entry_options.assets_prefix.is_none() {
                entry_options.assets_prefix = assets_prefix.clone();
            }
            let chunks = (entry.chunk_generation)(uidl, &entry_options);
            let files = entry.generator.link_code_chunks(&chunks, &entry.file_name)?;
            folder.inject_files(&entry.path, files);
            debug!("Generated entry file {}", entry.file_name);
        }

        // Project stylesheet
        if let Some(style_sheet) = &strategy.project_style_sheet {
            let mut options = self.section_options(uidl, &style_sheet.path, mapping, true);
            options.project_style_set = Some(ProjectStyleSet {
                style_set_definitions: uidl.root.style_set_definitions.clone(),
                file_name: style_sheet.file_name.clone(),
                path: ".".into(),
                import_file: false,
            });
            let root = rename(&uidl.root, &style_sheet.file_name);
            let result = style_sheet.generator.generate_component(&root, &options).await?;
            fold(&mut folder, &mut dependencies, &style_sheet.path, result);
        }

        // Framework files
        if let Some(framework) = &strategy.framework {
            if let Some(config) = &framework.config {
                self.framework_file(uidl, config, &mut folder, &mut dependencies)?;
            }
            if let Some(replace) = &framework.replace {
                let exists = folder
                    .folder(&replace.path)
                    .map(|f| f.files.iter().any(|file| file.name == replace.file_name))
                    .unwrap_or(false);
                if !exists {
                    return Err(GenerationError::InvalidStrategy(format!(
                        "framework file '{}' to replace is not part of the template",
                        replace.file_name
                    )));
                }
                self.framework_file(uidl, replace, &mut folder, &mut dependencies)?;
            }
        }

        // Web manifest
        let prefix = assets_prefix.as_deref().unwrap_or("");
        if let Some(manifest) = create_manifest_file(uidl, prefix)? {
            folder.inject_files(&strategy.static_files.path, vec![manifest]);
        }

        // Package manifest
        handle_package_json(&mut folder, uidl, &dependencies, &BTreeMap::new())?;

        info!(
            "Generated {} file(s) in {}",
            folder.files_recursive().len(),
            format_duration(start.elapsed())
        );

        Ok(folder)
    }

    fn component_placement(&self, component: &ComponentUidl) -> Placement {
        let strategy = &self.strategy.components;
        let mut folder = strategy.path.clone();
        folder.extend(component.output_options.folder_path.iter().cloned());

        if strategy.options.create_folder_for_each_component {
            folder.push(component.file_name());
            let file_name = strategy
                .options
                .component_file_name
                .clone()
                .unwrap_or_else(|| "index".into());
            Placement { folder, file_name }
        } else {
            Placement {
                folder,
                file_name: component.file_name(),
            }
        }
    }

    fn page_placement(&self, component: &ComponentUidl) -> Placement {
        let strategy = &self.strategy.pages;
        let mut folder = strategy.path.clone();
        folder.extend(component.output_options.folder_path.iter().cloned());

        if strategy.options.create_folder_for_each_page {
            folder.push(component.file_name());
            let file_name = strategy
                .options
                .page_file_name
                .clone()
                .unwrap_or_else(|| "index".into());
            Placement { folder, file_name }
        } else {
            Placement {
                folder,
                file_name: component.file_name(),
            }
        }
    }

    /// Options for a generation whose output lands in `location`
    fn section_options(
        &self,
        uidl: &ProjectUidl,
        location: &[String],
        mapping: Option<&Mapping>,
        is_root_component: bool,
    ) -> GeneratorOptions {
        let strategy = &self.strategy;
        GeneratorOptions {
            local_dependencies_prefix: Some(relative_prefix(location, &strategy.components.path)),
            assets_prefix: strategy.static_files.prefix.clone(),
            mapping: mapping.cloned(),
            is_root_component,
            design_language: uidl.root.design_language.clone(),
            project_style_set: strategy.project_style_sheet.as_ref().map(|style_sheet| ProjectStyleSet {
                style_set_definitions: uidl.root.style_set_definitions.clone(),
                file_name: style_sheet.file_name.clone(),
                path: relative_prefix(location, &style_sheet.path),
                import_file: style_sheet.import_file,
            }),
            routes: Vec::new(),
            external_components: self.placed_components(uidl),
        }
    }

    /// Shared components as written, with folder and file name relative to the components folder
    fn placed_components(&self, uidl: &ProjectUidl) -> BTreeMap<String, ComponentUidl> {
        let root = self.strategy.components.path.len();
        uidl.components
            .iter()
            .map(|(key, component)| {
                let placement = self.component_placement(component);
                let mut placed = rename(component, &placement.file_name);
                placed.output_options.folder_path = placement.folder[root..].to_vec();
                (key.clone(), placed)
            })
            .collect()
    }

    fn framework_file(
        &self,
        uidl: &ProjectUidl,
        file: &FrameworkFileStrategy,
        folder: &mut GeneratedFolder,
        dependencies: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        let global_stylesheet = match (&self.strategy.project_style_sheet, file.global_stylesheet_dependent) {
            (Some(style_sheet), true) => Some(join_module_path(
                &relative_prefix(&file.path, &style_sheet.path),
                &format!("{}.css", style_sheet.file_name),
            )),
            _ => None,
        };

        let content = (file.content)(&FrameworkContext {
            project: uidl,
            folder: &*folder,
            dependencies: &*dependencies,
            global_stylesheet,
        })?;

        let files = file.generator.link_code_chunks(&content.chunks, &file.file_name)?;
        folder.inject_files(&file.path, files);
        merge_versions(dependencies, content.dependencies);
        debug!("Generated framework file {}", file.file_name);
        Ok(())
    }
}

/// A copy of the component written under `file_name`
fn rename(component: &ComponentUidl, file_name: &str) -> ComponentUidl {
    let mut component = component.clone();
    if component.output_options.component_class_name.is_none() {
        component.output_options.component_class_name = Some(component.class_name());
    }
    component.output_options.file_name = Some(file_name.to_string());
    component
}

fn fold(
    folder: &mut GeneratedFolder,
    dependencies: &mut BTreeMap<String, String>,
    path: &[String],
    result: CompiledComponent,
) {
    folder.inject_files(path, result.files);
    merge_versions(dependencies, result.dependencies);
}

/// Later versions win; disagreements are logged
fn merge_versions(dependencies: &mut BTreeMap<String, String>, incoming: BTreeMap<String, String>) {
    for (package, version) in incoming {
        if let Some(previous) = dependencies.insert(package.clone(), version.clone()) {
            if previous != version {
                debug!("Package '{}' version {} replaced by {}", package, previous, version);
            }
        }
    }
}
