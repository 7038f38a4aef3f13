//! Generated output tree
//!
//! The in-memory description of a generated project: folders of files, each
//! file carrying its content and encoding. Publishing it anywhere is left to
//! the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEncoding {
    #[default]
    Utf8,
    Base64,
}

/// Where a file's content lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLocation {
    /// Content is carried inline
    #[default]
    Local,
    /// Content is a URL to fetch from
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    /// File name without extension
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub content_encoding: FileEncoding,
    /// Extension, if the file has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub location: FileLocation,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, file_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_encoding: FileEncoding::Utf8,
            file_type: Some(file_type.into()),
            location: FileLocation::Local,
        }
    }

    /// Full file name including the extension
    pub fn file_name(&self) -> String {
        match &self.file_type {
            Some(ext) => format!("{}.{}", self.name, ext),
            None => self.name.clone(),
        }
    }

    /// Split a file name into name and extension at the last dot
    pub fn from_file_name(file_name: &str, content: impl Into<String>) -> Self {
        match file_name.rsplit_once('.') {
            Some((name, ext)) if !name.is_empty() => Self::new(name, ext, content),
            _ => Self {
                name: file_name.to_string(),
                content: content.into(),
                content_encoding: FileEncoding::Utf8,
                file_type: None,
                location: FileLocation::Local,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFolder {
    pub name: String,
    #[serde(default)]
    pub files: Vec<GeneratedFile>,
    #[serde(default)]
    pub sub_folders: Vec<GeneratedFolder>,
}

impl GeneratedFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            sub_folders: Vec::new(),
        }
    }

    /// Add files below `path`, creating folders on the way.
    ///
    /// A file with the same name and extension as an existing one replaces it.
    pub fn inject_files(&mut self, path: &[String], files: Vec<GeneratedFile>) {
        let folder = self.folder_mut_or_create(path);
        for file in files {
            match folder
                .files
                .iter_mut()
                .find(|existing| existing.name == file.name && existing.file_type == file.file_type)
            {
                Some(existing) => *existing = file,
                None => folder.files.push(file),
            }
        }
    }

    pub fn folder(&self, path: &[String]) -> Option<&GeneratedFolder> {
        let mut current = self;
        for segment in path {
            current = current.sub_folders.iter().find(|f| &f.name == segment)?;
        }
        Some(current)
    }

    pub fn folder_mut(&mut self, path: &[String]) -> Option<&mut GeneratedFolder> {
        let mut current = self;
        for segment in path {
            current = current.sub_folders.iter_mut().find(|f| &f.name == segment)?;
        }
        Some(current)
    }

    /// Look up a file by its full name (`index.html`) below `path`
    pub fn get_file(&self, path: &[String], file_name: &str) -> Option<&GeneratedFile> {
        self.folder(path)?
            .files
            .iter()
            .find(|file| file.file_name() == file_name)
    }

    pub fn get_file_mut(&mut self, path: &[String], file_name: &str) -> Option<&mut GeneratedFile> {
        self.folder_mut(path)?
            .files
            .iter_mut()
            .find(|file| file.file_name() == file_name)
    }

    /// Every file with its path from this folder, depth-first
    pub fn files_recursive(&self) -> Vec<(String, &GeneratedFile)> {
        let mut out = Vec::new();
        self.collect_files("", &mut out);
        out
    }

    fn collect_files<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a GeneratedFile)>) {
        for file in &self.files {
            out.push((format!("{}{}", prefix, file.file_name()), file));
        }
        for folder in &self.sub_folders {
            folder.collect_files(&format!("{}{}/", prefix, folder.name), out);
        }
    }

    fn folder_mut_or_create(&mut self, path: &[String]) -> &mut GeneratedFolder {
        let mut current = self;
        for segment in path {
            let index = match current.sub_folders.iter().position(|f| &f.name == segment) {
                Some(index) => index,
                None => {
                    current.sub_folders.push(GeneratedFolder::new(segment.clone()));
                    current.sub_folders.len() - 1
                }
            };
            current = &mut current.sub_folders[index];
        }
        current
    }
}
