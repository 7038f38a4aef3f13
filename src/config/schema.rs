//! Configuration schema definitions

use serde::{Deserialize, Serialize};

use crate::project::CustomTag;

/// Project metadata configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Overrides the project name from the UIDL
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON description of the generated folder
    #[default]
    Json,
    /// File listing only
    Tree,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the JSON description is written to
    #[serde(default = "default_output_dir")]
    pub dir: String,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> String {
    "dist".to_string()
}

/// Strategy preset and per-section overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Built-in strategy to start from
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Prefix for root-relative asset URLs
    #[serde(default)]
    pub static_prefix: Option<String>,

    /// Folder for static files such as the web manifest
    #[serde(default)]
    pub static_path: Option<Vec<String>>,

    #[serde(default)]
    pub components: SectionConfig,

    #[serde(default)]
    pub pages: SectionConfig,

    #[serde(default)]
    pub router: Option<SectionConfig>,

    #[serde(default)]
    pub entry: Option<EntryConfig>,

    #[serde(default)]
    pub style_sheet: Option<StyleSheetConfig>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            static_prefix: None,
            static_path: None,
            components: SectionConfig::default(),
            pages: SectionConfig::default(),
            router: None,
            entry: None,
            style_sheet: None,
        }
    }
}

fn default_preset() -> String {
    "react".to_string()
}

fn default_true() -> bool {
    true
}

/// Overrides for a generated section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Turns an optional section off
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Registry name of the generator replacing the preset's
    #[serde(default)]
    pub generator: Option<String>,

    /// Plugins appended to the generator
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Post-processors appended to the generator
    #[serde(default)]
    pub post_processors: Vec<String>,

    /// Registry mappings overlaid on the generator's own, in order
    #[serde(default)]
    pub mappings: Vec<String>,

    #[serde(default)]
    pub path: Option<Vec<String>>,

    #[serde(default)]
    pub file_name: Option<String>,

    /// One folder per component or page
    #[serde(default)]
    pub folder_per_component: Option<bool>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            generator: None,
            plugins: Vec::new(),
            post_processors: Vec::new(),
            mappings: Vec::new(),
            path: None,
            file_name: None,
            folder_per_component: None,
        }
    }
}

/// An extra chunk linked into the entry document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    pub name: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub link_after: Vec<String>,

    /// `hidden` or `import-only`
    #[serde(default)]
    pub flags: Vec<String>,
}

/// Overrides for the entry document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub path: Option<Vec<String>>,

    #[serde(default)]
    pub file_name: Option<String>,

    #[serde(default)]
    pub app_root_override: Option<String>,

    #[serde(default)]
    pub custom_head_content: Option<String>,

    #[serde(default)]
    pub custom_tags: Vec<CustomTag>,

    #[serde(default)]
    pub chunks: Vec<ChunkConfig>,
}

/// Overrides for the project stylesheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSheetConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub generator: Option<String>,

    #[serde(default)]
    pub path: Option<Vec<String>>,

    #[serde(default)]
    pub file_name: Option<String>,

    /// Import the stylesheet from every component
    #[serde(default)]
    pub import_file: Option<bool>,
}
