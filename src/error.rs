//! Error types for code generation
//!
//! Every inconsistency the generator can detect is reported through
//! [`GenerationError`]. Nothing in the core recovers from these silently.

use thiserror::Error;

use crate::chunk::{FileType, Representation};

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("plugin '{plugin}' expected chunk '{chunk}' ({file_type}) but it is missing")]
    MissingChunk {
        plugin: String,
        chunk: String,
        file_type: FileType,
    },

    #[error("chunk '{chunk}' links after '{missing}', which does not exist in the {file_type} chunks")]
    UnresolvedLink {
        chunk: String,
        missing: String,
        file_type: FileType,
    },

    #[error("cyclic link_after constraints between {file_type} chunks: {}", chunks.join(", "))]
    LinkCycle {
        file_type: FileType,
        chunks: Vec<String>,
    },

    #[error("dependency '{identifier}' is already imported from '{existing}', cannot also import it from '{incoming}'")]
    AmbiguousDependency {
        identifier: String,
        existing: String,
        incoming: String,
    },

    #[error("module '{source_path}' is imported as both '{existing}' and '{incoming}'")]
    ConflictingImport {
        source_path: String,
        existing: String,
        incoming: String,
    },

    #[error("strategy section '{section}' references undefined generator '{name}'")]
    UndefinedGenerator { section: String, name: String },

    #[error("undefined plugin '{0}'")]
    UndefinedPlugin(String),

    #[error("undefined post-processor '{0}'")]
    UndefinedPostProcessor(String),

    #[error("undefined mapping '{0}'")]
    UndefinedMapping(String),

    #[error("unknown chunk flag '{flag}' on chunk '{chunk}'")]
    UnknownChunkFlag { chunk: String, flag: String },

    #[error("invalid project strategy: {0}")]
    InvalidStrategy(String),

    #[error("chunk '{chunk}' holds {found} content, expected {expected}")]
    RepresentationMismatch {
        chunk: String,
        expected: Representation,
        found: Representation,
    },

    #[error("chunk '{chunk}' holds {representation} content, which cannot be emitted into a {file_type} file")]
    UnsupportedRepresentation {
        chunk: String,
        representation: Representation,
        file_type: FileType,
    },

    #[error("plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    #[error("post-processor '{processor}' failed: {message}")]
    PostProcessor { processor: String, message: String },

    #[error("invalid UIDL: {0}")]
    InvalidUidl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Shorthand for a plugin's own precondition failure
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from a misconfigured strategy, plugin list or chunk set
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingChunk { .. }
                | Self::UnresolvedLink { .. }
                | Self::LinkCycle { .. }
                | Self::AmbiguousDependency { .. }
                | Self::ConflictingImport { .. }
                | Self::UndefinedGenerator { .. }
                | Self::UndefinedPlugin(_)
                | Self::UndefinedPostProcessor(_)
                | Self::UndefinedMapping(_)
                | Self::UnknownChunkFlag { .. }
                | Self::InvalidStrategy(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
