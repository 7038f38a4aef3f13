//! uidlgen library
//!
//! Turns UIDL component and project descriptions into framework source
//! projects: chunk IR, plugin pipelines, the chunk linker and project
//! strategies.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod output;
pub mod pipeline;
pub mod plugins;
pub mod project;
pub mod render;
pub mod uidl;
pub mod utils;

pub use chunk::{Chunk, ChunkStore, FileType};
pub use cli::Cli;
pub use config::{Config, Registry};
pub use dependency::{Dependency, DependencyAggregator};
pub use error::GenerationError;
pub use generator::{CompiledComponent, ComponentGenerator};
pub use output::{GeneratedFile, GeneratedFolder};
pub use pipeline::{ComponentPlugin, ComponentStructure, GeneratorOptions};
pub use project::{ProjectGenerator, ProjectStrategy};
pub use uidl::{ComponentUidl, ProjectUidl};
