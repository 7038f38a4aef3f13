//! Chunk intermediate representation
//!
//! A chunk is a named unit of partial output for one file type. Plugins add
//! and mutate chunks in a [`ChunkStore`]; the linker orders them by their
//! `link_after` constraints and serialises them into file text.

mod linker;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, DependencyAggregator};
use crate::error::{GenerationError, Result};
use crate::render::code::CodeNode;
use crate::render::markup::MarkupNode;

pub use linker::resolve_order;

/// Kind of file a chunk contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Css,
    Html,
    Js,
    Json,
    Vue,
    Ts,
    Tsx,
}

impl FileType {
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Css => "css",
            FileType::Html => "html",
            FileType::Js => "js",
            FileType::Json => "json",
            FileType::Vue => "vue",
            FileType::Ts => "ts",
            FileType::Tsx => "tsx",
        }
    }

    /// Determine file type from an extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "css" => Some(FileType::Css),
            "html" | "htm" => Some(FileType::Html),
            "js" | "jsx" | "mjs" => Some(FileType::Js),
            "json" => Some(FileType::Json),
            "vue" => Some(FileType::Vue),
            "ts" => Some(FileType::Ts),
            "tsx" => Some(FileType::Tsx),
            _ => None,
        }
    }

    /// Whether content of the given representation can be emitted into this file type
    pub fn accepts(&self, representation: Representation) -> bool {
        match representation {
            Representation::Text => true,
            Representation::CodeTree => matches!(
                self,
                FileType::Js | FileType::Ts | FileType::Tsx | FileType::Vue
            ),
            Representation::MarkupTree => matches!(self, FileType::Html | FileType::Vue),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How a chunk's content is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Text,
    CodeTree,
    MarkupTree,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Text => f.write_str("plain text"),
            Representation::CodeTree => f.write_str("code tree"),
            Representation::MarkupTree => f.write_str("markup tree"),
        }
    }
}

/// Representation-specific chunk payload
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkContent {
    Text(String),
    CodeTree(CodeNode),
    MarkupTree(MarkupNode),
}

impl ChunkContent {
    pub fn representation(&self) -> Representation {
        match self {
            ChunkContent::Text(_) => Representation::Text,
            ChunkContent::CodeTree(_) => Representation::CodeTree,
            ChunkContent::MarkupTree(_) => Representation::MarkupTree,
        }
    }

    fn mismatch(&self, chunk: &str, expected: Representation) -> GenerationError {
        GenerationError::RepresentationMismatch {
            chunk: chunk.to_string(),
            expected,
            found: self.representation(),
        }
    }
}

/// Recognised chunk annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkFlag {
    /// Contributes dependencies only, emits no text
    ImportOnly,
    /// Takes part in ordering but emits no text
    Hidden,
}

impl ChunkFlag {
    /// Parse a flag name as used in configuration files
    pub fn parse(chunk: &str, flag: &str) -> Result<Self> {
        match flag {
            "import-only" | "importOnly" => Ok(ChunkFlag::ImportOnly),
            "hidden" => Ok(ChunkFlag::Hidden),
            _ => Err(GenerationError::UnknownChunkFlag {
                chunk: chunk.to_string(),
                flag: flag.to_string(),
            }),
        }
    }
}

/// A named, typed unit of partial output
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub name: String,
    pub file_type: FileType,
    pub content: ChunkContent,
    /// Names of chunks that must precede this one
    pub link_after: Vec<String>,
    pub meta: BTreeSet<ChunkFlag>,
    /// Dependency records contributed to the component's aggregator
    pub dependencies: Vec<(String, Dependency)>,
}

impl Chunk {
    pub fn new(name: impl Into<String>, file_type: FileType, content: ChunkContent) -> Self {
        Self {
            name: name.into(),
            file_type,
            content,
            link_after: Vec::new(),
            meta: BTreeSet::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, file_type: FileType, text: impl Into<String>) -> Self {
        Self::new(name, file_type, ChunkContent::Text(text.into()))
    }

    pub fn code(name: impl Into<String>, file_type: FileType, node: CodeNode) -> Self {
        Self::new(name, file_type, ChunkContent::CodeTree(node))
    }

    pub fn markup(name: impl Into<String>, file_type: FileType, node: MarkupNode) -> Self {
        Self::new(name, file_type, ChunkContent::MarkupTree(node))
    }

    /// A chunk that only registers dependencies
    pub fn import_only(
        name: impl Into<String>,
        file_type: FileType,
        dependencies: Vec<(String, Dependency)>,
    ) -> Self {
        let mut chunk = Self::text(name, file_type, String::new()).with_flag(ChunkFlag::ImportOnly);
        chunk.dependencies = dependencies;
        chunk
    }

    pub fn link_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_after.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_flag(mut self, flag: ChunkFlag) -> Self {
        self.meta.insert(flag);
        self
    }

    /// Add a flag given by name; unknown names are rejected
    pub fn with_flag_named(self, flag: &str) -> Result<Self> {
        let flag = ChunkFlag::parse(&self.name, flag)?;
        Ok(self.with_flag(flag))
    }

    pub fn with_dependency(mut self, identifier: impl Into<String>, dependency: Dependency) -> Self {
        self.dependencies.push((identifier.into(), dependency));
        self
    }

    pub fn has_flag(&self, flag: ChunkFlag) -> bool {
        self.meta.contains(&flag)
    }

    /// Whether the linker writes this chunk's content into the file
    pub fn emits(&self) -> bool {
        !self.has_flag(ChunkFlag::ImportOnly) && !self.has_flag(ChunkFlag::Hidden)
    }

    pub fn as_text_mut(&mut self) -> Result<&mut String> {
        match &mut self.content {
            ChunkContent::Text(text) => Ok(text),
            other => Err(other.mismatch(&self.name, Representation::Text)),
        }
    }

    pub fn as_code_mut(&mut self) -> Result<&mut CodeNode> {
        match &mut self.content {
            ChunkContent::CodeTree(node) => Ok(node),
            other => Err(other.mismatch(&self.name, Representation::CodeTree)),
        }
    }

    pub fn as_markup_mut(&mut self) -> Result<&mut MarkupNode> {
        match &mut self.content {
            ChunkContent::MarkupTree(node) => Ok(node),
            other => Err(other.mismatch(&self.name, Representation::MarkupTree)),
        }
    }
}

/// Ordered collection of chunks for one component structure
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk, or replace the chunk with the same name and file type.
    ///
    /// A replaced chunk keeps its original insertion slot.
    pub fn add_or_replace(&mut self, chunk: Chunk) {
        match self.position(chunk.file_type, &chunk.name) {
            Some(index) => self.chunks[index] = chunk,
            None => self.chunks.push(chunk),
        }
    }

    pub fn remove(&mut self, file_type: FileType, name: &str) -> Option<Chunk> {
        self.position(file_type, name)
            .map(|index| self.chunks.remove(index))
    }

    pub fn get(&self, file_type: FileType, name: &str) -> Option<&Chunk> {
        self.position(file_type, name).map(|index| &self.chunks[index])
    }

    pub fn get_mut(&mut self, file_type: FileType, name: &str) -> Option<&mut Chunk> {
        self.position(file_type, name)
            .map(move |index| &mut self.chunks[index])
    }

    /// Look up a chunk a plugin cannot work without
    pub fn require(&self, plugin: &str, file_type: FileType, name: &str) -> Result<&Chunk> {
        self.get(file_type, name)
            .ok_or_else(|| missing_chunk(plugin, file_type, name))
    }

    pub fn require_mut(&mut self, plugin: &str, file_type: FileType, name: &str) -> Result<&mut Chunk> {
        self.get_mut(file_type, name)
            .ok_or_else(|| missing_chunk(plugin, file_type, name))
    }

    pub fn contains(&self, file_type: FileType, name: &str) -> bool {
        self.position(file_type, name).is_some()
    }

    /// All chunks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Chunks of one file type in insertion order
    pub fn of_type(&self, file_type: FileType) -> impl Iterator<Item = &Chunk> {
        self.chunks
            .iter()
            .filter(move |chunk| chunk.file_type == file_type)
    }

    /// File types with at least one emitting chunk, in order of first appearance
    pub fn file_types(&self) -> Vec<FileType> {
        let mut types = Vec::new();
        for chunk in self.chunks.iter().filter(|chunk| chunk.emits()) {
            if !types.contains(&chunk.file_type) {
                types.push(chunk.file_type);
            }
        }
        types
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Fold every chunk's dependency records into the aggregator
    pub fn collect_dependencies(&self, dependencies: &mut DependencyAggregator) -> Result<()> {
        for chunk in &self.chunks {
            for (identifier, record) in &chunk.dependencies {
                dependencies.merge(identifier.clone(), record.clone())?;
            }
        }
        Ok(())
    }

    fn position(&self, file_type: FileType, name: &str) -> Option<usize> {
        self.chunks
            .iter()
            .position(|chunk| chunk.file_type == file_type && chunk.name == name)
    }
}

impl FromIterator<Chunk> for ChunkStore {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut store = ChunkStore::new();
        for chunk in iter {
            store.add_or_replace(chunk);
        }
        store
    }
}

fn missing_chunk(plugin: &str, file_type: FileType, name: &str) -> GenerationError {
    GenerationError::MissingChunk {
        plugin: plugin.to_string(),
        chunk: name.to_string(),
        file_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_insertion_slot() {
        let mut store = ChunkStore::new();
        store.add_or_replace(Chunk::text("a", FileType::Js, "a1"));
        store.add_or_replace(Chunk::text("b", FileType::Js, "b"));
        store.add_or_replace(Chunk::text("a", FileType::Js, "a2"));

        let names: Vec<&str> = store.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            store.get(FileType::Js, "a").unwrap().content,
            ChunkContent::Text("a2".into())
        );
    }

    #[test]
    fn test_names_are_scoped_by_file_type() {
        let mut store = ChunkStore::new();
        store.add_or_replace(Chunk::text("main", FileType::Js, "js"));
        store.add_or_replace(Chunk::text("main", FileType::Css, "css"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.file_types(), vec![FileType::Js, FileType::Css]);

        store.remove(FileType::Css, "main");
        assert_eq!(store.len(), 1);
        assert!(store.contains(FileType::Js, "main"));
    }

    #[test]
    fn test_silent_file_types_are_not_listed() {
        let mut store = ChunkStore::new();
        store.add_or_replace(Chunk::import_only("style-import", FileType::Css, Vec::new()));
        store.add_or_replace(Chunk::text("component", FileType::Js, "js"));
        assert_eq!(store.file_types(), vec![FileType::Js]);
    }

    #[test]
    fn test_require_reports_missing_chunk() {
        let store = ChunkStore::new();
        let err = store
            .require("html-imports", FileType::Html, "html-template")
            .unwrap_err();
        match err {
            GenerationError::MissingChunk { plugin, chunk, .. } => {
                assert_eq!(plugin, "html-imports");
                assert_eq!(chunk, "html-template");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let chunk = Chunk::text("x", FileType::Js, "");
        assert!(chunk.clone().with_flag_named("hidden").unwrap().has_flag(ChunkFlag::Hidden));
        let err = chunk.with_flag_named("inline-later").unwrap_err();
        assert!(matches!(err, GenerationError::UnknownChunkFlag { .. }));
    }

    #[test]
    fn test_representation_accessors() {
        let mut chunk = Chunk::text("styles", FileType::Css, "a {}");
        assert!(chunk.as_text_mut().is_ok());
        let err = chunk.as_markup_mut().unwrap_err();
        assert!(matches!(
            err,
            GenerationError::RepresentationMismatch {
                expected: Representation::MarkupTree,
                found: Representation::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_collect_dependencies_reports_conflicts() {
        let store: ChunkStore = vec![
            Chunk::import_only(
                "a",
                FileType::Js,
                vec![("Link".into(), Dependency::library("react-router-dom", "4.3.1"))],
            ),
            Chunk::import_only(
                "b",
                FileType::Js,
                vec![("Link".into(), Dependency::library("next/link", "10.0.0"))],
            ),
        ]
        .into_iter()
        .collect();

        let mut deps = DependencyAggregator::new();
        assert!(store.collect_dependencies(&mut deps).is_err());
    }
}
