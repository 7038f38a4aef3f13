//! Built-in plugins and generators
//!
//! Each plugin handles one concern of a component's output. The generator
//! constructors at the bottom combine them for the supported targets.

mod css;
mod html_imports;
mod html_template;
mod import_statements;
mod jsx_component;
mod project_stylesheet;
mod router;

use std::sync::Arc;

use crate::dependency::Dependency;
use crate::generator::{ComponentGenerator, CssFormatter, NormalizeWhitespace};
use crate::mapping::{html_mapping, react_mapping};
use crate::pipeline::{ComponentPlugin, GeneratorOptions};
use crate::uidl::{DynamicReference, ReferenceType};
use crate::utils::join_module_path;

pub use css::CssPlugin;
pub use html_imports::HtmlImportsPlugin;
pub use html_template::HtmlTemplatePlugin;
pub use import_statements::ImportStatementsPlugin;
pub use jsx_component::JsxComponentPlugin;
pub use project_stylesheet::ProjectStyleSheetPlugin;
pub use router::RouterPlugin;

/// Chunk names shared between plugins
pub mod chunks {
    pub const DOCTYPE: &str = "doctype";
    pub const HTML_TEMPLATE: &str = "html-template";
    pub const JSX_COMPONENT: &str = "jsx-component";
    pub const ROUTER: &str = "router";
    pub const STYLE: &str = "style";
    pub const STYLE_IMPORT: &str = "style-import";
    pub const PROJECT_STYLE: &str = "project-style";
    pub const IMPORT_LIB: &str = "import-lib";
    pub const IMPORT_PACK: &str = "import-pack";
    pub const IMPORT_LOCAL: &str = "import-local";

    /// Import chunks every code chunk is linked after
    pub const IMPORTS: [&str; 3] = [IMPORT_LIB, IMPORT_PACK, IMPORT_LOCAL];
}

pub(crate) const REACT_VERSION: &str = "16.8.3";
pub(crate) const REACT_ROUTER_VERSION: &str = "4.3.1";

/// Expression text for a dynamic reference inside JSX
pub(crate) fn reference_expression(reference: &DynamicReference) -> String {
    match reference.reference_type {
        ReferenceType::Prop => format!("props.{}", reference.id),
        ReferenceType::State | ReferenceType::Attr | ReferenceType::Local => reference.id.clone(),
    }
}

/// Side-effect import of the project stylesheet, when the component should carry one
pub(crate) fn global_stylesheet_dependency(options: &GeneratorOptions) -> Option<(String, Dependency)> {
    let style_set = options.project_style_set.as_ref()?;
    if !(style_set.import_file || options.is_root_component) {
        return None;
    }
    let path = join_module_path(&style_set.path, &format!("{}.css", style_set.file_name));
    Some((path.clone(), Dependency::local(path).side_effect()))
}

/// React function components with an extracted stylesheet
pub fn react_component_generator() -> ComponentGenerator {
    ComponentGenerator::builder()
        .mapping(&react_mapping())
        .plugin(Arc::new(CssPlugin))
        .plugin(Arc::new(JsxComponentPlugin))
        .plugin(Arc::new(ImportStatementsPlugin))
        .post_processor(Arc::new(NormalizeWhitespace))
        .build()
}

/// React router entry module
pub fn react_router_generator() -> ComponentGenerator {
    ComponentGenerator::builder()
        .mapping(&react_mapping())
        .plugin(Arc::new(RouterPlugin))
        .plugin(Arc::new(ImportStatementsPlugin))
        .post_processor(Arc::new(NormalizeWhitespace))
        .build()
}

/// Static HTML documents with inlined components
pub fn html_component_generator() -> ComponentGenerator {
    ComponentGenerator::builder()
        .mapping(&html_mapping())
        .plugin(Arc::new(CssPlugin))
        .plugin(Arc::new(HtmlTemplatePlugin))
        .plugin(Arc::new(HtmlImportsPlugin))
        .post_processor(Arc::new(NormalizeWhitespace))
        .build()
}

/// Global stylesheet with design tokens
pub fn project_stylesheet_generator() -> ComponentGenerator {
    ComponentGenerator::builder()
        .plugin(Arc::new(ProjectStyleSheetPlugin))
        .post_processor(Arc::new(CssFormatter))
        .post_processor(Arc::new(NormalizeWhitespace))
        .build()
}

/// Linker-only generator, used for entry files
pub fn entry_file_generator() -> ComponentGenerator {
    ComponentGenerator::builder()
        .post_processor(Arc::new(NormalizeWhitespace))
        .build()
}

/// A built-in plugin by registry name
pub fn builtin_plugin(name: &str) -> Option<Arc<dyn ComponentPlugin>> {
    let plugin: Arc<dyn ComponentPlugin> = match name {
        "css" => Arc::new(CssPlugin),
        "html-template" => Arc::new(HtmlTemplatePlugin),
        "html-imports" => Arc::new(HtmlImportsPlugin),
        "jsx-component" => Arc::new(JsxComponentPlugin),
        "import-statements" => Arc::new(ImportStatementsPlugin),
        "router" => Arc::new(RouterPlugin),
        "project-stylesheet" => Arc::new(ProjectStyleSheetPlugin),
        _ => return None,
    };
    Some(plugin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ProjectStyleSet;

    #[test]
    fn test_builtin_plugins_resolve_by_name() {
        let names = [
            "css",
            "html-template",
            "html-imports",
            "jsx-component",
            "import-statements",
            "router",
            "project-stylesheet",
        ];
        for name in names {
            let plugin = builtin_plugin(name).unwrap();
            assert_eq!(plugin.name(), name);
        }
        assert!(builtin_plugin("unknown").is_none());
    }

    #[test]
    fn test_global_stylesheet_import_for_root() {
        let mut options = GeneratorOptions {
            project_style_set: Some(ProjectStyleSet {
                file_name: "style".into(),
                path: "..".into(),
                import_file: false,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(global_stylesheet_dependency(&options).is_none());

        options.is_root_component = true;
        let (identifier, dependency) = global_stylesheet_dependency(&options).unwrap();
        assert_eq!(identifier, "../style.css");
        assert_eq!(dependency.source, "../style.css");
    }
}
