use crate::config::{self, MvcConfig, MANIFEST_FILE};
use crate::registry::{FileStore, RegistryStore};
use crate::MvcContext;
use anyhow::{Context, Result};
use colored::*;

pub fn run(ctx: &MvcContext) -> Result<()> {
    let root = config::project_root()?;
    let manifest = root.join(MANIFEST_FILE);
    let config = if manifest.exists() {
        Some(MvcConfig::from_file(&manifest).context("Failed to load configuration. Are you in a valid project?")?)
    } else {
        None
    };
    let store = FileStore::for_project(&root);
    let registry = store.load()?;

    if ctx.quiet {
        return Ok(());
    }

    println!("{} Checking project...", "[INFO]".blue());
    if let Some(config) = config {
        println!("   Project: {}", config.project.name);
        println!("   Type: {:?}", config.project.kind);
        if !config.project.author.is_empty() {
            println!("   Author: {}", config.project.author);
        }
        println!("   Licence: {}", config.project.licence);
        if let Some(link) = &config.project.git_link {
            println!("   Repository: {}", link);
        }
    } else {
        println!("{} No {} found in {:?}.", "[WARN]".yellow(), MANIFEST_FILE, root);
    }

    if ctx.verbose {
        println!("   Registry: {:?}", store.path());
    }
    match config::editor_override() {
        Some(editor) => println!("   Editor: {} (from {})", editor, config::EDITOR_ENV),
        None => println!("   Editor: {}", registry.editor_command),
    }

    if registry.entries.is_empty() {
        println!("   No scripts registered. Create one with 'mvc script'.");
    }
    for script in &registry.entries {
        println!(
            "   Script '{}': {} ({} args)",
            script.name,
            script.kind.to_string().green(),
            script.arg_count
        );
    }
    Ok(())
}
