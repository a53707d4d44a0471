use crate::config::{MvcConfig, ProjectKind, MANIFEST_FILE};
use crate::registry::{FileStore, RegistryStore, ScriptRegistry};
use crate::MvcContext;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::fs;
use std::path::Path;

pub struct InitOptions {
    pub yes: bool,
    pub name: Option<String>,
    pub author: Option<String>,
    pub kind: Option<ProjectKind>,
    pub licence: Option<String>,
    pub git_link: Option<String>,
}

const LICENCES: &[&str] = &["MIT", "none"];

pub fn run(path: &str, opts: InitOptions, ctx: &MvcContext) -> Result<()> {
    let root = Path::new(path);

    if root.join(MANIFEST_FILE).exists() && !ctx.force {
        if !ctx.quiet {
            println!("{} Project already initialized. Use --force to overwrite.", "[INFO]".yellow());
        }
        return Ok(());
    }

    if !root.exists() {
        fs::create_dir_all(root).context("Failed to create project directory")?;
    }

    let dir_name = root
        .canonicalize()?
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("my_project"))
        .to_string_lossy()
        .to_string();

    let mut config = MvcConfig::default(&opts.name.clone().unwrap_or(dir_name));

    if opts.yes || ctx.quiet {
        config.project.kind = opts.kind.unwrap_or(ProjectKind::App);
        config.project.author = opts.author.unwrap_or_default();
        config.project.licence = opts.licence.unwrap_or_else(|| "MIT".to_string());
        config.project.git_link = opts.git_link;
    } else {
        println!("{}", "mvc project setup".bold().purple());
        let theme = ColorfulTheme::default();

        config.project.name = Input::with_theme(&theme)
            .with_prompt("Project name")
            .default(config.project.name.clone())
            .validate_with(|name: &String| -> Result<(), &str> {
                if name.trim().is_empty() {
                    Err("Must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        config.project.kind = match opts.kind {
            Some(kind) => kind,
            None => {
                let kinds = &["Application", "Library/Framework"];
                let selection = Select::with_theme(&theme)
                    .with_prompt("Project type")
                    .default(0)
                    .items(&kinds[..])
                    .interact()?;
                if selection == 0 { ProjectKind::App } else { ProjectKind::Lib }
            }
        };

        config.project.author = match opts.author {
            Some(author) => author,
            None => Input::with_theme(&theme)
                .with_prompt("Author")
                .validate_with(|author: &String| -> Result<(), &str> {
                    if author.trim().is_empty() {
                        Err("Must not be empty")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?,
        };

        config.project.git_link = match opts.git_link {
            Some(link) => Some(link),
            None => {
                let has_remote = Confirm::with_theme(&theme)
                    .with_prompt("Does the project have an external git repository?")
                    .default(false)
                    .interact()?;
                if has_remote {
                    let link: String = Input::with_theme(&theme)
                        .with_prompt("Repository link")
                        .interact_text()?;
                    Some(link)
                } else {
                    None
                }
            }
        };

        config.project.licence = match opts.licence {
            Some(licence) => licence,
            None => {
                let selection = Select::with_theme(&theme)
                    .with_prompt("Licence")
                    .default(0)
                    .items(LICENCES)
                    .interact()?;
                LICENCES[selection].to_string()
            }
        };
    }

    config.save(root)?;

    let store = FileStore::for_project(root);
    if !store.exists() {
        store.save(&ScriptRegistry::bootstrap())?;
    } else if ctx.verbose {
        println!("   Keeping existing script registry at {:?}", store.path());
    }

    if !ctx.quiet {
        println!("{} Project '{}' initialized successfully!", "[OK]".green(), config.project.name);
        println!("   Default scripts: commit, push");
    }
    Ok(())
}
