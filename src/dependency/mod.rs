//! Dependency aggregation
//!
//! Plugins register every identifier they reference in emitted code together
//! with the module it comes from. Aggregation is keyed by that identifier so
//! the same import is never emitted twice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::render::code::{ImportClause, NamedImport};

/// Where a dependency is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Published library tied to the target framework (router, UI kit)
    Library,
    /// Any other published npm package
    Package,
    /// Relative path inside the generated project
    Local,
}

/// Shape of the import statement for a dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    #[default]
    Default,
    Named,
    Namespace,
    /// Import the path only, binding nothing
    SideEffect,
}

/// A resolved import/package reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: DependencyKind,

    /// Package name or relative path
    #[serde(alias = "path")]
    pub source: String,

    /// Version constraint, only meaningful for published packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub import: ImportKind,

    /// Exported name when it differs from the local identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
}

impl Dependency {
    pub fn library(source: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Library,
            source: source.into(),
            version: Some(version.into()),
            import: ImportKind::Default,
            original_name: None,
        }
    }

    pub fn package(source: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Package,
            ..Self::library(source, version)
        }
    }

    pub fn local(path: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Local,
            source: path.into(),
            version: None,
            import: ImportKind::Default,
            original_name: None,
        }
    }

    pub fn named(mut self) -> Self {
        self.import = ImportKind::Named;
        self
    }

    pub fn namespace(mut self) -> Self {
        self.import = ImportKind::Namespace;
        self
    }

    pub fn side_effect(mut self) -> Self {
        self.import = ImportKind::SideEffect;
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Whether the dependency is published and belongs in a package manifest
    pub fn is_published(&self) -> bool {
        self.kind != DependencyKind::Local && self.version.is_some()
    }

    /// The import bindings this dependency contributes under `identifier`
    pub fn import_clause(&self, identifier: &str) -> ImportClause {
        match self.import {
            ImportKind::Default => ImportClause {
                default: Some(identifier.to_string()),
                ..Default::default()
            },
            ImportKind::Namespace => ImportClause {
                namespace: Some(identifier.to_string()),
                ..Default::default()
            },
            ImportKind::Named => ImportClause {
                named: vec![NamedImport {
                    imported: self
                        .original_name
                        .clone()
                        .unwrap_or_else(|| identifier.to_string()),
                    local: identifier.to_string(),
                }],
                ..Default::default()
            },
            ImportKind::SideEffect => ImportClause::default(),
        }
    }
}

/// Identifier → dependency map with merge-on-write semantics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyAggregator {
    entries: BTreeMap<String, Dependency>,
}

impl DependencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a record under `identifier`.
    ///
    /// Identical records are a no-op and a record from the same source replaces
    /// the existing one (later version wins). A record from a different source
    /// is an ambiguous import target and fails.
    pub fn merge(&mut self, identifier: impl Into<String>, record: Dependency) -> Result<()> {
        let identifier = identifier.into();

        if let Some(existing) = self.entries.get(&identifier) {
            if existing.source != record.source {
                return Err(GenerationError::AmbiguousDependency {
                    identifier,
                    existing: existing.source.clone(),
                    incoming: record.source,
                });
            }
            if *existing == record {
                return Ok(());
            }
            debug!("Updating dependency '{}' from {}", identifier, record.source);
        }

        self.entries.insert(identifier, record);
        Ok(())
    }

    /// Merge every entry of another aggregator
    pub fn extend(&mut self, other: &DependencyAggregator) -> Result<()> {
        for (identifier, record) in &other.entries {
            self.merge(identifier.clone(), record.clone())?;
        }
        Ok(())
    }

    /// The final identifier → record map, ordered by identifier
    pub fn all(&self) -> &BTreeMap<String, Dependency> {
        &self.entries
    }

    pub fn get(&self, identifier: &str) -> Option<&Dependency> {
        self.entries.get(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Dependency)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Published dependencies as `package → version`, for package manifests
    pub fn package_versions(&self) -> BTreeMap<String, String> {
        self.entries
            .values()
            .filter(|dep| dep.is_published())
            .filter_map(|dep| {
                dep.version
                    .as_ref()
                    .map(|version| (dep.source.clone(), version.clone()))
            })
            .collect()
    }
}
