//! React router entry module
//!
//! Builds the application shell that maps every route to its page component
//! and mounts it into the document.

use async_trait::async_trait;

use super::{chunks, global_stylesheet_dependency, REACT_ROUTER_VERSION, REACT_VERSION};
use crate::chunk::{Chunk, FileType};
use crate::dependency::Dependency;
use crate::error::{GenerationError, Result};
use crate::pipeline::{ComponentPlugin, ComponentStructure};
use crate::render::code::{CodeNode, ExportKind, Expr};
use crate::render::markup::{MarkupAttr, MarkupNode};

pub struct RouterPlugin;

#[async_trait]
impl ComponentPlugin for RouterPlugin {
    fn name(&self) -> &str {
        "router"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        if structure.options.routes.is_empty() {
            return Err(GenerationError::plugin(
                self.name(),
                "the project defines no routes",
            ));
        }

        let dependencies = &mut structure.dependencies;
        dependencies.merge("React", Dependency::library("react", REACT_VERSION))?;
        dependencies.merge("ReactDOM", Dependency::library("react-dom", REACT_VERSION))?;
        dependencies.merge(
            "Router",
            Dependency::library("react-router-dom", REACT_ROUTER_VERSION)
                .named()
                .with_original_name("BrowserRouter"),
        )?;
        dependencies.merge(
            "Route",
            Dependency::library("react-router-dom", REACT_ROUTER_VERSION).named(),
        )?;

        let mut switch = MarkupNode::new("div");
        for route in &structure.options.routes {
            structure.dependencies.merge(
                route.component_name.clone(),
                Dependency::local(route.module_path.clone()),
            )?;

            let mut node = MarkupNode::new("Route");
            if route.nav_link == "/" {
                node.set_boolean_attr("exact");
            }
            node.set_attr("path", MarkupAttr::Static(route.nav_link.clone()));
            node.set_attr("component", MarkupAttr::Dynamic(route.component_name.clone()));
            switch.add_child(node);
        }

        if let Some((identifier, dependency)) = global_stylesheet_dependency(&structure.options) {
            structure.dependencies.merge(identifier, dependency)?;
        }

        let mut router = MarkupNode::new("Router");
        router.add_child(switch);

        let program = CodeNode::Program(vec![
            CodeNode::Function {
                name: "App".into(),
                params: Vec::new(),
                body: vec![CodeNode::Return(Expr::Jsx(router))],
                export: ExportKind::None,
            },
            CodeNode::Statement(String::new()),
            CodeNode::Statement("ReactDOM.render(<App />, document.getElementById('app'))".into()),
        ]);

        structure.chunks.add_or_replace(
            Chunk::code(chunks::ROUTER, FileType::Js, program).link_after(chunks::IMPORTS),
        );

        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{GeneratorOptions, RouteDefinition};
    use crate::uidl::{ComponentUidl, UidlNode};

    fn root() -> ComponentUidl {
        ComponentUidl::new("App", UidlNode::Static(String::new()))
    }

    #[tokio::test]
    async fn test_routes_become_route_elements() {
        let options = GeneratorOptions {
            routes: vec![
                RouteDefinition {
                    nav_link: "/".into(),
                    component_name: "Home".into(),
                    module_path: "./views/home".into(),
                },
                RouteDefinition {
                    nav_link: "/about".into(),
                    component_name: "About".into(),
                    module_path: "./views/about".into(),
                },
            ],
            ..Default::default()
        };

        let structure = RouterPlugin
            .run(ComponentStructure::new(root(), options))
            .await
            .unwrap();
        let chunk = structure.chunks.get(FileType::Js, chunks::ROUTER).unwrap();
        let code = crate::render::render(&chunk.content);

        assert!(code.contains("<Route exact path=\"/\" component={Home} />"));
        assert!(code.contains("<Route path=\"/about\" component={About} />"));
        assert!(code.ends_with("ReactDOM.render(<App />, document.getElementById('app'))"));
        assert_eq!(structure.dependencies.get("Home").unwrap().source, "./views/home");
    }

    #[tokio::test]
    async fn test_no_routes_is_a_plugin_fault() {
        let err = RouterPlugin
            .run(ComponentStructure::new(root(), GeneratorOptions::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Plugin { .. }));
    }
}
