use crate::authoring::{self, AuthoringMode};
use crate::config;
use crate::error::MvcError;
use crate::registry::{validate_name, FileStore, RegistryStore};
use crate::shell::SystemShell;
use crate::template;
use crate::MvcContext;
use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

pub struct ScriptOptions {
    pub name: Option<String>,
    pub args: Option<u32>,
    pub inline: bool,
}

/// `mvc script`: create a new script or edit an existing one.
pub fn edit(opts: ScriptOptions, ctx: &MvcContext) -> Result<()> {
    let root = config::project_root()?;
    let store = FileStore::for_project(&root);
    let registry = store.load()?;
    let theme = ColorfulTheme::default();
    let interactive = opts.name.is_none() || opts.args.is_none();

    let name = match opts.name {
        Some(name) => {
            validate_name(&name)?;
            name
        }
        None => Input::with_theme(&theme)
            .with_prompt("Script name")
            .validate_with(|name: &String| -> Result<(), String> {
                validate_name(name).map_err(|e| e.to_string())
            })
            .interact_text()?,
    };

    if interactive {
        let kinds = &["UNIX shell script (.sh)"];
        Select::with_theme(&theme)
            .with_prompt("Script type")
            .default(0)
            .items(&kinds[..])
            .interact()?;
    }

    let arg_count = match opts.args {
        Some(count) => count,
        None => {
            let current = registry.find_by_name(&name).map(|s| s.arg_count).unwrap_or(0);
            let count: i64 = Input::with_theme(&theme)
                .with_prompt("Amount of script arguments")
                .default(i64::from(current))
                .validate_with(|n: &i64| -> Result<(), &str> {
                    if *n < 0 {
                        Err("Amount of arguments must not be negative")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            u32::try_from(count)
                .map_err(|_| MvcError::Validation(format!("{} is not a valid amount of arguments", count)))?
        }
    };

    let mode = if opts.inline {
        AuthoringMode::Inline
    } else {
        let editor = config::editor_override().unwrap_or_else(|| registry.editor_command.clone());
        let program = editor.split_whitespace().next().unwrap_or_default().to_string();
        if which::which(&program).is_err() {
            return Err(MvcError::ExternalProcess(format!(
                "editor '{}' was not found. Set one with 'mvc script cli <command>'.",
                program
            ))
            .into());
        }
        if ctx.verbose {
            println!("   Editor: {}", editor);
        }
        AuthoringMode::Editor(editor)
    };

    let saved = authoring::author(&store, &SystemShell, &name, arg_count, &mode, &root, |path| {
        println!(
            "{} Edit the script in {}, then come back here.",
            "[INFO]".blue(),
            path.display()
        );
        let done = Confirm::with_theme(&theme)
            .with_prompt("Continue?")
            .default(true)
            .interact()?;
        Ok(done)
    })?;

    match saved {
        Some(script) => {
            if !ctx.quiet {
                println!(
                    "{} Saved script '{}' ({} argument{}).",
                    "[OK]".green(),
                    script.name,
                    script.arg_count,
                    if script.arg_count == 1 { "" } else { "s" }
                );
            }
        }
        None => {
            if !ctx.quiet {
                println!("{} Script '{}' was left empty, nothing saved.", "[WARN]".yellow(), name);
            }
        }
    }
    Ok(())
}

/// `mvc script cli <command>`
pub fn set_editor(command: &str, ctx: &MvcContext) -> Result<()> {
    if command.trim().is_empty() {
        return Err(MvcError::Validation("You must specify a command to use as the cli editor".to_string()).into());
    }
    let store = FileStore::for_project(&config::project_root()?);
    let mut registry = store.load()?;
    registry.editor_command = command.to_string();
    store.save(&registry)?;

    if !ctx.quiet {
        println!("{} CLI editor set to '{}'.", "[OK]".green(), command);
    }
    Ok(())
}

/// `mvc script remove <name>`
pub fn remove(name: &str, ctx: &MvcContext) -> Result<()> {
    let store = FileStore::for_project(&config::project_root()?);
    let mut registry = store.load()?;
    if registry.remove(name).is_none() {
        return Err(MvcError::script_not_found(name).into());
    }
    store.save(&registry)?;

    if !ctx.quiet {
        println!("{} Removed script '{}'.", "[OK]".green(), name);
    }
    Ok(())
}

/// `mvc script show <name>`
pub fn show(name: &str, _ctx: &MvcContext) -> Result<()> {
    let registry = FileStore::for_project(&config::project_root()?).load()?;
    let script = registry
        .find_by_name(name)
        .ok_or_else(|| MvcError::script_not_found(name))?;

    println!("{} {} [{}] args={}", "[INFO]".blue(), script.name, script.kind, script.arg_count);
    print!("{}", template::decode(&script.body)?);
    Ok(())
}
