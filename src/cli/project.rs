//! Project generation command

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Args;
use colored::Colorize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, OutputFormat, Registry};
use crate::output::{FileEncoding, GeneratedFile, GeneratedFolder};
use crate::project::ProjectGenerator;
use crate::uidl::ProjectUidl;
use crate::utils::{format_duration, format_size, hash_content, slugify};

/// Generate a project from a project UIDL file
#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Project UIDL (JSON)
    pub uidl: PathBuf,

    /// Directory whose files seed the generated project
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Where to write the JSON description of the generated project
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Strategy preset, overriding the config file
    #[arg(short, long)]
    pub preset: Option<String>,
}

impl ProjectCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let mut config = Config::load_or_default(config_path)?;
        if let Some(preset) = &self.preset {
            config.strategy.preset = preset.clone();
        }

        let registry = Registry::builtin();
        let strategy = config.build_strategy(&registry)?;

        let source = fs::read_to_string(&self.uidl)
            .with_context(|| format!("Failed to read UIDL file: {}", self.uidl.display()))?;
        let mut uidl = ProjectUidl::from_json(&source)
            .with_context(|| format!("Invalid project UIDL: {}", self.uidl.display()))?;
        if let Some(name) = &config.project.name {
            uidl.name = name.clone();
        }

        let template = match &self.template {
            Some(dir) => load_template(dir, &slugify(&uidl.name))?,
            None => GeneratedFolder::new(slugify(&uidl.name)),
        };

        eprintln!(
            "{} Generating {} with the {} strategy...",
            "→".blue(),
            uidl.name.cyan(),
            strategy.id.cyan()
        );

        let generator = ProjectGenerator::new(strategy);
        let folder = generator
            .generate_project(&uidl, template, config.mapping.as_ref())
            .await?;

        let files = folder.files_recursive();
        match config.output.format {
            OutputFormat::Json => {
                let out = self.out.clone().unwrap_or_else(|| {
                    config
                        .output_dir()
                        .join(format!("{}.json", slugify(&uidl.name)))
                });
                if let Some(parent) = out.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                let json = serde_json::to_string_pretty(&folder)?;
                fs::write(&out, json).with_context(|| format!("Failed to write {}", out.display()))?;
                eprintln!("  {} Wrote {}", "✓".green(), out.display().to_string().cyan());
            }
            OutputFormat::Tree => {
                for (path, _) in &files {
                    println!("{}", path);
                }
            }
        }

        eprintln!(
            "\n{} Generated {} file(s) in {}\n",
            "✓".green().bold(),
            files.len(),
            format_duration(start.elapsed())
        );

        for (path, file) in &files {
            eprintln!(
                "  {} {} {} {}",
                "•".dimmed(),
                path.cyan(),
                format_size(file.content.len()).dimmed(),
                hash_content(file.content.as_bytes()).dimmed()
            );
        }
        eprintln!();

        Ok(())
    }
}

/// Read a directory into a folder tree; non UTF-8 files are base64 encoded
pub fn load_template(dir: &Path, name: &str) -> Result<GeneratedFolder> {
    let mut folder = GeneratedFolder::new(name);

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk template {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(dir)?;
        let segments: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        let file_name = entry.file_name().to_string_lossy();

        let bytes = fs::read(entry.path())
            .with_context(|| format!("Failed to read template file {}", entry.path().display()))?;
        let file = match String::from_utf8(bytes) {
            Ok(text) => GeneratedFile::from_file_name(&file_name, text),
            Err(err) => {
                let mut file = GeneratedFile::from_file_name(&file_name, STANDARD.encode(err.as_bytes()));
                file.content_encoding = FileEncoding::Base64;
                file
            }
        };

        debug!("Template file {}", relative.display());
        folder.inject_files(&segments, vec![file]);
    }

    Ok(folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_template_keeps_structure() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/robots.txt"), "User-agent: *").unwrap();
        fs::write(dir.path().join("logo.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

        let folder = load_template(dir.path(), "site").unwrap();
        let robots = folder.get_file(&["public".to_string()], "robots.txt").unwrap();
        assert_eq!(robots.content, "User-agent: *");

        let logo = folder.get_file(&[], "logo.bin").unwrap();
        assert_eq!(logo.content_encoding, FileEncoding::Base64);
        assert_eq!(logo.content, STANDARD.encode([0xffu8, 0xfe, 0x00]));
    }
}
