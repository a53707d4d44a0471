use crate::config;
use crate::dispatch::{self, Outcome};
use crate::error::MvcError;
use crate::mvb::Step;
use crate::registry::{FileStore, RegistryStore};
use crate::shell::SystemShell;
use crate::MvcContext;
use anyhow::Result;
use colored::*;

/// `mvc run <name> [args...]`
pub fn run(name: &str, args: Vec<String>, ctx: &MvcContext) -> Result<()> {
    run_script(name, &args, ctx)
}

/// Shared by `run` and the fixed `commit`/`push`/`build` commands.
pub fn run_script(name: &str, args: &[String], ctx: &MvcContext) -> Result<()> {
    let root = config::project_root()?;
    let registry = FileStore::for_project(&root).load()?;

    let mut stdout = std::io::stdout();
    let outcome = dispatch::dispatch(&registry, name, args, &SystemShell, &root, &mut stdout, |steps| {
        if !ctx.quiet {
            println!("{} Running script '{}'...", "[INFO]".blue(), name);
        }
        if ctx.verbose {
            for step in steps {
                match step {
                    Step::Shell(script) => script.lines().for_each(|line| println!("   > {}", line)),
                    Step::Print(text) => println!("   > (print) {}", text),
                }
            }
        }
    })?;

    match outcome {
        Outcome::NotFound => Err(MvcError::script_not_found(name).into()),
        Outcome::Skipped(kind) => {
            if !ctx.quiet {
                println!(
                    "{} Script '{}' has type '{}', which this version of mvc cannot run.",
                    "[WARN]".yellow(),
                    name,
                    kind
                );
            }
            Ok(())
        }
        Outcome::Executed { status } if status.success() => {
            if !ctx.quiet {
                println!("{} Script '{}' finished.", "[OK]".green(), name);
            }
            Ok(())
        }
        Outcome::Executed { status } => Err(MvcError::ExternalProcess(format!(
            "script '{}' failed with exit code {:?}",
            name, status.code
        ))
        .into()),
    }
}
