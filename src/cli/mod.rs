//! Command-line interface for uidlgen
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `project`: Generate a whole project from a project UIDL
//! - `component`: Generate a single component
//! - `init`: Write a starter configuration and sample UIDL

mod component;
mod init;
mod project;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use component::ComponentCommand;
pub use init::InitCommand;
pub use project::{load_template, ProjectCommand};

/// uidlgen - Generate framework projects from UIDL
#[derive(Parser, Debug)]
#[command(name = "uidlgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to uidlgen.toml config file
    #[arg(short, long, global = true, default_value = "uidlgen.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a project from a project UIDL file
    Project(ProjectCommand),

    /// Generate a single component from a component UIDL file
    Component(ComponentCommand),

    /// Write a starter uidlgen.toml and a sample project UIDL
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Project(cmd) => cmd.execute(&self.config).await,
            Commands::Component(cmd) => cmd.execute(&self.config).await,
            Commands::Init(cmd) => cmd.execute().await,
        }
    }
}

fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "◆".cyan(),
        "uidlgen".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
