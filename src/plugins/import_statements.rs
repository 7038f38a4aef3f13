//! ES import declarations from the aggregated dependencies

use async_trait::async_trait;

use super::chunks;
use crate::chunk::{Chunk, ChunkFlag, FileType};
use crate::dependency::DependencyKind;
use crate::error::{GenerationError, Result};
use crate::pipeline::{ComponentPlugin, ComponentStructure};
use crate::render::code::{CodeNode, ImportClause};

pub struct ImportStatementsPlugin;

#[async_trait]
impl ComponentPlugin for ImportStatementsPlugin {
    fn name(&self) -> &str {
        "import-statements"
    }

    async fn run(&self, mut structure: ComponentStructure) -> Result<ComponentStructure> {
        let dependencies = structure.all_dependencies()?;

        let groups = [
            (chunks::IMPORT_LIB, DependencyKind::Library),
            (chunks::IMPORT_PACK, DependencyKind::Package),
            (chunks::IMPORT_LOCAL, DependencyKind::Local),
        ];

        for (name, kind) in groups {
            // Declarations keep the order in which their source first appears
            let mut declarations: Vec<(String, ImportClause)> = Vec::new();
            for (identifier, dependency) in dependencies.iter().filter(|(_, d)| d.kind == kind) {
                let clause = dependency.import_clause(identifier);
                match declarations
                    .iter_mut()
                    .find(|(source, _)| *source == dependency.source)
                {
                    Some((source, existing)) => merge_clause(source, existing, clause)?,
                    None => declarations.push((dependency.source.clone(), clause)),
                }
            }

            let statements: Vec<CodeNode> = declarations
                .into_iter()
                .map(|(source, clause)| CodeNode::import(source, clause))
                .collect();

            let mut chunk = Chunk::code(name, FileType::Js, CodeNode::Program(statements.clone()));
            if statements.is_empty() {
                chunk = chunk.with_flag(ChunkFlag::Hidden);
            }
            structure.chunks.add_or_replace(chunk);
        }

        Ok(structure)
    }
}

/// Fold a second clause for the same module into the first
fn merge_clause(source: &str, existing: &mut ImportClause, incoming: ImportClause) -> Result<()> {
    existing.default = merge_binding(source, existing.default.take(), incoming.default)?;
    existing.namespace = merge_binding(source, existing.namespace.take(), incoming.namespace)?;
    for named in incoming.named {
        if !existing.named.contains(&named) {
            existing.named.push(named);
        }
    }
    Ok(())
}

fn merge_binding(source: &str, existing: Option<String>, incoming: Option<String>) -> Result<Option<String>> {
    match (existing, incoming) {
        (Some(existing), Some(incoming)) if existing != incoming => Err(GenerationError::ConflictingImport {
            source_path: source.to_string(),
            existing,
            incoming,
        }),
        (existing, incoming) => Ok(existing.or(incoming)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::Dependency;
    use crate::pipeline::GeneratorOptions;
    use crate::uidl::{ComponentUidl, UidlNode};

    #[tokio::test]
    async fn test_imports_grouped_and_merged_by_source() {
        let mut structure = ComponentStructure::new(
            ComponentUidl::new("Home", UidlNode::Static(String::new())),
            GeneratorOptions::default(),
        );
        let deps = &mut structure.dependencies;
        deps.merge("React", Dependency::library("react", "16.8.3")).unwrap();
        deps.merge("useState", Dependency::library("react", "16.8.3").named())
            .unwrap();
        deps.merge("Card", Dependency::local("../components/card")).unwrap();
        structure.chunks.add_or_replace(Chunk::import_only(
            "style-import",
            FileType::Css,
            vec![("./home.css".into(), Dependency::local("./home.css").side_effect())],
        ));

        let structure = ImportStatementsPlugin.run(structure).await.unwrap();
        assert_eq!(
            structure.chunks.link(FileType::Js).unwrap(),
            "import React, { useState } from 'react'\n\
             import './home.css'\n\
             import Card from '../components/card'"
        );
        assert!(structure
            .chunks
            .get(FileType::Js, chunks::IMPORT_PACK)
            .unwrap()
            .has_flag(ChunkFlag::Hidden));
    }

    #[tokio::test]
    async fn test_two_default_bindings_for_one_module_fail() {
        let mut structure = ComponentStructure::new(
            ComponentUidl::new("Home", UidlNode::Static(String::new())),
            GeneratorOptions::default(),
        );
        let deps = &mut structure.dependencies;
        deps.merge("Card", Dependency::local("../components/card")).unwrap();
        deps.merge("Tile", Dependency::local("../components/card")).unwrap();

        match ImportStatementsPlugin.run(structure).await.unwrap_err() {
            GenerationError::ConflictingImport {
                source_path,
                existing,
                incoming,
            } => {
                assert_eq!(source_path, "../components/card");
                assert_eq!(existing, "Card");
                assert_eq!(incoming, "Tile");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
