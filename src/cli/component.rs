//! Single component generation command

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::{Config, Registry};
use crate::pipeline::GeneratorOptions;
use crate::uidl::ComponentUidl;

/// Generate a single component from a component UIDL file
#[derive(Args, Debug)]
pub struct ComponentCommand {
    /// Component UIDL (JSON)
    pub uidl: PathBuf,

    /// Registered generator to use
    #[arg(short, long, default_value = "react-component")]
    pub generator: String,

    /// Relative path to the shared components folder
    #[arg(long)]
    pub prefix: Option<String>,
}

impl ComponentCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let config = Config::load_or_default(config_path)?;
        let registry = Registry::builtin();
        let generator = registry.generator("component", &self.generator)?;

        let source = fs::read_to_string(&self.uidl)
            .with_context(|| format!("Failed to read UIDL file: {}", self.uidl.display()))?;
        let uidl: ComponentUidl = serde_json::from_str(&source)
            .with_context(|| format!("Invalid component UIDL: {}", self.uidl.display()))?;

        info!("Generating component {} with {}", uidl.name, self.generator);
        let options = GeneratorOptions {
            local_dependencies_prefix: self.prefix.clone(),
            mapping: config.mapping.clone(),
            ..GeneratorOptions::default()
        };
        let compiled = generator.generate_component(&uidl, &options).await?;

        for file in &compiled.files {
            println!("// {}", file.file_name());
            println!("{}", file.content);
        }

        if !compiled.dependencies.is_empty() {
            eprintln!("\n  Dependencies:");
            for (package, version) in &compiled.dependencies {
                eprintln!("    {} {}@{}", "•".dimmed(), package.cyan(), version.dimmed());
            }
        }
        eprintln!();

        Ok(())
    }
}
