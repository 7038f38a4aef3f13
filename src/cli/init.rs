//! Project initialization command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

/// Write a starter configuration and sample UIDL
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Project name / directory
    #[arg(default_value = ".")]
    pub name: String,

    /// Strategy preset (react, html)
    #[arg(short, long, default_value = "react")]
    pub preset: String,
}

impl InitCommand {
    pub async fn execute(&self) -> Result<()> {
        let project_dir = Path::new(&self.name);

        if !matches!(self.preset.as_str(), "react" | "html") {
            anyhow::bail!("Unknown preset '{}', expected react or html", self.preset);
        }

        eprintln!(
            "{} Initializing new {} project...\n",
            "→".blue(),
            self.preset.cyan()
        );

        if self.name != "." {
            fs::create_dir_all(project_dir).context("Failed to create project directory")?;
        }

        fs::write(project_dir.join("uidlgen.toml"), self.generate_config())
            .context("Failed to write uidlgen.toml")?;
        eprintln!("  {} Created {}", "✓".green(), "uidlgen.toml".cyan());

        fs::write(project_dir.join("project.json"), self.generate_uidl())
            .context("Failed to write project.json")?;
        eprintln!("  {} Created {}", "✓".green(), "project.json".cyan());

        eprintln!("\n{} Project initialized successfully!\n", "✓".green().bold());

        eprintln!("  Next steps:");
        if self.name != "." {
            eprintln!("    {} cd {}", "→".dimmed(), self.name.cyan());
        }
        eprintln!("    {} uidlgen project project.json", "→".dimmed());
        eprintln!();

        Ok(())
    }

    fn display_name(&self) -> &str {
        if self.name == "." {
            "my-app"
        } else {
            &self.name
        }
    }

    fn generate_config(&self) -> String {
        format!(
            r#"# uidlgen configuration

[project]
name = "{name}"

[output]
dir = "dist"
format = "json"

[strategy]
preset = "{preset}"
"#,
            name = self.display_name(),
            preset = self.preset,
        )
    }

    fn generate_uidl(&self) -> String {
        let uidl = serde_json::json!({
            "name": self.display_name(),
            "globals": {
                "settings": { "title": self.display_name(), "language": "en" },
                "meta": [{ "name": "viewport", "content": "width=device-width, initial-scale=1" }]
            },
            "root": {
                "name": "App",
                "node": { "type": "static", "content": "" },
                "styleSetDefinitions": {
                    "primary-button": { "background": "$primary", "color": "white" }
                },
                "designLanguage": { "tokens": { "primary": "#6b46c1" } }
            },
            "pages": [
                {
                    "navLink": "/",
                    "component": {
                        "name": "Home",
                        "node": {
                            "type": "element",
                            "content": {
                                "elementType": "container",
                                "style": { "padding": "16px" },
                                "children": [
                                    {
                                        "type": "element",
                                        "content": {
                                            "elementType": "navlink",
                                            "attrs": { "transitionTo": { "type": "static", "content": "/about" } },
                                            "children": [{ "type": "static", "content": "About" }]
                                        }
                                    }
                                ]
                            }
                        }
                    }
                },
                {
                    "navLink": "/about",
                    "component": {
                        "name": "About",
                        "node": { "type": "element", "content": {
                            "elementType": "text",
                            "children": [{ "type": "static", "content": "Generated with uidlgen" }]
                        } }
                    }
                }
            ]
        });
        // `json!` values always serialize
        serde_json::to_string_pretty(&uidl).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::uidl::ProjectUidl;

    #[test]
    fn test_generated_files_parse() {
        let cmd = InitCommand {
            name: "shop".into(),
            preset: "html".into(),
        };
        let config = Config::parse(&cmd.generate_config()).unwrap();
        assert_eq!(config.strategy.preset, "html");
        assert_eq!(config.project.name.as_deref(), Some("shop"));

        let uidl = ProjectUidl::from_json(&cmd.generate_uidl()).unwrap();
        assert_eq!(uidl.pages.len(), 2);
        assert_eq!(uidl.pages[1].nav_link, "/about");
    }
}
