//! Project strategies
//!
//! A strategy is the immutable plan for one target: which generator handles
//! each section of the project and where its files go.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::chunk::ChunkStore;
use crate::error::{GenerationError, Result};
use crate::generator::ComponentGenerator;
use crate::output::GeneratedFolder;
use crate::plugins::{
    entry_file_generator, html_component_generator, project_stylesheet_generator,
    react_component_generator, react_router_generator,
};
use crate::uidl::ProjectUidl;

use super::entry::{create_html_entry_chunks, EntryFileOptions};

/// Builds the entry file chunks from the project and entry options
pub type ChunkGenerationFn = Arc<dyn Fn(&ProjectUidl, &EntryFileOptions) -> ChunkStore + Send + Sync>;

/// Chunks and package dependencies of a framework file
#[derive(Debug, Clone, Default)]
pub struct FrameworkContent {
    pub chunks: ChunkStore,
    pub dependencies: BTreeMap<String, String>,
}

/// Inputs available to framework config functions
pub struct FrameworkContext<'a> {
    pub project: &'a ProjectUidl,
    /// Output folder generated so far
    pub folder: &'a GeneratedFolder,
    /// Package dependencies collected so far
    pub dependencies: &'a BTreeMap<String, String>,
    /// Path of the global stylesheet from the file's folder, when one is generated
    pub global_stylesheet: Option<String>,
}

pub type FrameworkContentFn = Arc<dyn Fn(&FrameworkContext<'_>) -> Result<FrameworkContent> + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct ComponentsOptions {
    /// Put each component into a folder named after it
    pub create_folder_for_each_component: bool,
    /// File name inside the per-component folder (`index` when unset)
    pub component_file_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComponentsStrategy {
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub options: ComponentsOptions,
}

#[derive(Debug, Clone, Default)]
pub struct PagesOptions {
    pub create_folder_for_each_page: bool,
    pub page_file_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PagesStrategy {
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub options: PagesOptions,
}

#[derive(Debug, Clone)]
pub struct RouterStrategy {
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub file_name: String,
}

#[derive(Clone)]
pub struct EntryStrategy {
    /// Linker and post-processors for the entry chunks
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub file_name: String,
    pub chunk_generation: ChunkGenerationFn,
    pub options: EntryFileOptions,
}

impl fmt::Debug for EntryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryStrategy")
            .field("path", &self.path)
            .field("file_name", &self.file_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct StyleSheetStrategy {
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub file_name: String,
    /// Whether every component imports the stylesheet, not only the root
    pub import_file: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StaticStrategy {
    /// Prefix for root-relative asset URLs
    pub prefix: Option<String>,
    pub path: Vec<String>,
}

/// A framework file produced from the generated project
#[derive(Clone)]
pub struct FrameworkFileStrategy {
    pub generator: ComponentGenerator,
    pub path: Vec<String>,
    pub file_name: String,
    pub content: FrameworkContentFn,
    /// Whether the content needs the global stylesheet path
    pub global_stylesheet_dependent: bool,
}

/// Framework specific files
#[derive(Clone, Default)]
pub struct FrameworkStrategy {
    /// File generated from scratch
    pub config: Option<FrameworkFileStrategy>,
    /// Template file rewritten in place; the template must contain it
    pub replace: Option<FrameworkFileStrategy>,
}

impl fmt::Debug for FrameworkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkStrategy")
            .field("config", &self.config.as_ref().map(|c| &c.file_name))
            .field("replace", &self.replace.as_ref().map(|r| &r.file_name))
            .finish()
    }
}

/// Plan for generating a whole project
#[derive(Debug, Clone)]
pub struct ProjectStrategy {
    pub id: String,
    pub components: ComponentsStrategy,
    pub pages: PagesStrategy,
    pub router: Option<RouterStrategy>,
    pub entry: Option<EntryStrategy>,
    pub project_style_sheet: Option<StyleSheetStrategy>,
    pub static_files: StaticStrategy,
    pub framework: Option<FrameworkStrategy>,
}

impl ProjectStrategy {
    /// Reject paths and names that would place files outside the project
    pub fn validate(&self) -> Result<()> {
        let mut paths = vec![
            ("components", &self.components.path),
            ("pages", &self.pages.path),
            ("static", &self.static_files.path),
        ];
        if let Some(router) = &self.router {
            paths.push(("router", &router.path));
            check_file_name("router", &router.file_name)?;
        }
        if let Some(entry) = &self.entry {
            paths.push(("entry", &entry.path));
            check_file_name("entry", &entry.file_name)?;
        }
        if let Some(style) = &self.project_style_sheet {
            paths.push(("project stylesheet", &style.path));
            check_file_name("project stylesheet", &style.file_name)?;
        }
        if let Some(framework) = &self.framework {
            if let Some(config) = &framework.config {
                paths.push(("framework config", &config.path));
                check_file_name("framework config", &config.file_name)?;
            }
            if let Some(replace) = &framework.replace {
                paths.push(("framework replace", &replace.path));
                check_file_name("framework replace", &replace.file_name)?;
            }
        }

        for (section, path) in paths {
            if let Some(segment) = path
                .iter()
                .find(|s| s.is_empty() || s.as_str() == "." || s.as_str() == ".." || s.contains('/'))
            {
                return Err(GenerationError::InvalidStrategy(format!(
                    "{} path has an invalid segment '{}'",
                    section, segment
                )));
            }
        }

        Ok(())
    }
}

fn check_file_name(section: &str, file_name: &str) -> Result<()> {
    if file_name.trim().is_empty() || file_name.contains('/') {
        return Err(GenerationError::InvalidStrategy(format!(
            "{} file name '{}' is invalid",
            section, file_name
        )));
    }
    Ok(())
}

pub(crate) fn segments(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

/// Default entry chunk generation
pub fn html_entry_chunk_generation() -> ChunkGenerationFn {
    Arc::new(create_html_entry_chunks)
}

/// React single page application
pub fn react_strategy() -> ProjectStrategy {
    ProjectStrategy {
        id: "react".into(),
        components: ComponentsStrategy {
            generator: react_component_generator(),
            path: segments(&["src", "components"]),
            options: ComponentsOptions::default(),
        },
        pages: PagesStrategy {
            generator: react_component_generator(),
            path: segments(&["src", "views"]),
            options: PagesOptions::default(),
        },
        router: Some(RouterStrategy {
            generator: react_router_generator(),
            path: segments(&["src"]),
            file_name: "index".into(),
        }),
        entry: Some(EntryStrategy {
            generator: entry_file_generator(),
            path: segments(&["public"]),
            file_name: "index".into(),
            chunk_generation: html_entry_chunk_generation(),
            options: EntryFileOptions::default(),
        }),
        project_style_sheet: Some(StyleSheetStrategy {
            generator: project_stylesheet_generator(),
            path: segments(&["src"]),
            file_name: "style".into(),
            import_file: false,
        }),
        static_files: StaticStrategy {
            prefix: None,
            path: segments(&["public"]),
        },
        framework: None,
    }
}

/// Plain HTML pages with components inlined
pub fn html_strategy() -> ProjectStrategy {
    ProjectStrategy {
        id: "html".into(),
        components: ComponentsStrategy {
            generator: html_component_generator(),
            path: Vec::new(),
            options: ComponentsOptions::default(),
        },
        pages: PagesStrategy {
            generator: html_component_generator(),
            path: Vec::new(),
            options: PagesOptions::default(),
        },
        router: None,
        entry: None,
        project_style_sheet: Some(StyleSheetStrategy {
            generator: project_stylesheet_generator(),
            path: Vec::new(),
            file_name: "style".into(),
            import_file: true,
        }),
        static_files: StaticStrategy::default(),
        framework: None,
    }
}
