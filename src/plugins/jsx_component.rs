//! React function component from the element tree

use async_trait::async_trait;

use super::{chunks, reference_expression, REACT_VERSION};
use crate::chunk::{Chunk, FileType};
use crate::dependency::{Dependency, DependencyAggregator, DependencyKind};
use crate::error::{GenerationError, Result};
use crate::mapping::Mapping;
use crate::pipeline::{ComponentPlugin, ComponentStructure, GeneratorOptions};
use crate::render::code::{CodeNode, ExportKind, Expr};
use crate::render::markup::{MarkupAttr, MarkupChild, MarkupNode};
use crate::uidl::{AttrValue, UidlElement, UidlNode};
use crate::utils::{dash_case, join_module_path, upper_camel_case};

pub struct JsxComponentPlugin;

#[async_trait]
impl ComponentPlugin for JsxComponentPlugin {
    fn name(&self) -> &str {
        "jsx-component"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let UidlNode::Element(root) = &structure.uidl.node else {
            return Err(GenerationError::plugin(
                self.name(),
                format!("component '{}' has no root element", structure.uidl.name),
            ));
        };

        let mapping = structure.options.mapping.clone().unwrap_or_default();
        let mut builder = JsxBuilder {
            mapping: &mapping,
            options: &structure.options,
            dependencies: &mut structure.dependencies,
        };
        let jsx = builder.element(root)?;

        structure
            .dependencies
            .merge("React", Dependency::library("react", REACT_VERSION))?;

        let mut body = Vec::new();
        if !structure.uidl.state_definitions.is_empty() {
            structure.dependencies.merge(
                "useState",
                Dependency::library("react", REACT_VERSION).named(),
            )?;
            for (name, state) in &structure.uidl.state_definitions {
                body.push(CodeNode::Statement(format!(
                    "const [{}, set{}] = useState({})",
                    name,
                    upper_camel_case(name),
                    state.default_value
                )));
            }
            body.push(CodeNode::Statement(String::new()));
        }
        body.push(CodeNode::Return(Expr::Jsx(jsx)));

        let class_name = structure.uidl.class_name();
        let component = CodeNode::Program(vec![
            CodeNode::Function {
                name: class_name.clone(),
                params: vec!["props".into()],
                body,
                export: ExportKind::None,
            },
            CodeNode::Statement(String::new()),
            CodeNode::ExportDefault(class_name),
        ]);

        structure.chunks.add_or_replace(
            Chunk::code(chunks::JSX_COMPONENT, FileType::Js, component).link_after(chunks::IMPORTS),
        );

        Ok(structure)
    }
}

struct JsxBuilder<'a> {
    mapping: &'a Mapping,
    options: &'a GeneratorOptions,
    dependencies: &'a mut DependencyAggregator,
}

impl JsxBuilder<'_> {
    fn element(&mut self, element: &UidlElement) -> Result<MarkupNode> {
        self.register_dependency(element)?;

        let mut node = MarkupNode::new(element.element_type.clone());
        for (key, value) in &element.attrs {
            let key = self.mapping.attribute_name(key).to_string();
            let value = match value {
                AttrValue::Static(text) => MarkupAttr::Static(text.clone()),
                AttrValue::Dynamic(reference) => MarkupAttr::Dynamic(reference_expression(reference)),
            };
            node.set_attr(key, value);
        }
        for (event, handler) in &element.events {
            let key = self.mapping.event_name(event).unwrap_or(event).to_string();
            node.set_attr(key, MarkupAttr::Dynamic(handler.clone()));
        }

        for child in &element.children {
            match child {
                UidlNode::Element(child) => {
                    let child = self.element(child)?;
                    node.add_child(child);
                }
                UidlNode::Static(text) => node.add_text(text.clone()),
                UidlNode::Dynamic(reference) => node
                    .children
                    .push(MarkupChild::Expression(reference_expression(reference))),
            }
        }

        Ok(node)
    }

    /// Library elements and references to other components become imports
    fn register_dependency(&mut self, element: &UidlElement) -> Result<()> {
        let identifier = element.element_type.clone();
        let dependency = match &element.dependency {
            Some(dep) if dep.kind == DependencyKind::Local => {
                let file = if dep.source.is_empty() {
                    dash_case(&identifier)
                } else {
                    dep.source.clone()
                };
                Dependency {
                    source: join_module_path(self.options.local_prefix(), &file),
                    ..dep.clone()
                }
            }
            Some(dep) => dep.clone(),
            None => match self.options.external_components.get(&identifier) {
                Some(component) => Dependency::local(join_module_path(
                    self.options.local_prefix(),
                    &component.module_path(),
                )),
                None => return Ok(()),
            },
        };
        self.dependencies.merge(identifier, dependency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::react_mapping;
    use crate::uidl::{ComponentUidl, DynamicReference, ReferenceType, StateDefinition};

    fn structure(root: UidlElement) -> ComponentStructure {
        let mut uidl = ComponentUidl::new("Counter", UidlNode::Element(root));
        uidl.state_definitions.insert(
            "count".into(),
            StateDefinition {
                default_value: serde_json::json!(0),
            },
        );
        ComponentStructure::new(
            uidl,
            GeneratorOptions {
                mapping: Some(react_mapping()),
                local_dependencies_prefix: Some("../components".into()),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_function_component_with_state() {
        let mut root = UidlElement::new("button");
        root.events.insert("click".into(), "() => setCount(count + 1)".into());
        root.children.push(UidlNode::Dynamic(DynamicReference {
            reference_type: ReferenceType::State,
            id: "count".into(),
        }));

        let structure = JsxComponentPlugin.run(structure(root)).await.unwrap();
        let chunk = structure.chunks.get(FileType::Js, chunks::JSX_COMPONENT).unwrap();
        let code = crate::render::render(&chunk.content);

        assert!(code.starts_with("const Counter = (props) => {"));
        assert!(code.contains("const [count, setCount] = useState(0)"));
        assert!(code.contains("<button onClick={() => setCount(count + 1)}>{count}</button>"));
        assert!(code.ends_with("export default Counter"));
        assert!(structure.dependencies.get("useState").is_some());
    }

    #[tokio::test]
    async fn test_local_component_import_uses_prefix() {
        let mut root = UidlElement::new("div");
        let mut card = UidlElement::new("ProductCard");
        card.dependency = Some(Dependency::local(""));
        root.children.push(UidlNode::Element(card));

        let structure = JsxComponentPlugin.run(structure(root)).await.unwrap();
        assert_eq!(
            structure.dependencies.get("ProductCard").unwrap().source,
            "../components/product-card"
        );
    }

    #[tokio::test]
    async fn test_text_root_is_rejected() {
        let uidl = ComponentUidl::new("Broken", UidlNode::Static("hi".into()));
        let err = JsxComponentPlugin
            .run(ComponentStructure::new(uidl, GeneratorOptions::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Plugin { .. }));
    }
}
