use crate::error::MvcError;
use crate::mvb::{self, Step};
use crate::registry::{ScriptDefinition, ScriptRegistry, ScriptType};
use crate::shell::{Shell, ShellStatus};
use crate::template;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    /// `status` is the first failing step's, or the last one's.
    Executed { status: ShellStatus },
    /// Registered with a kind this build cannot run.
    Skipped(ScriptType),
}

/// Value of positional argument `index` for a script taking `arg_count` of
/// them. Declared but unsupplied slots read as empty, anything past
/// `arg_count` is `None`.
pub fn positional(arg_count: u32, cli_args: &[String], index: usize) -> Option<&str> {
    if index >= arg_count as usize {
        return None;
    }
    Some(cli_args.get(index).map_or("", String::as_str))
}

/// Decodes `script` and turns it into the steps to run, with placeholders
/// filled from `cli_args`. `None` for kinds this build cannot run.
pub fn plan(script: &ScriptDefinition, cli_args: &[String]) -> Result<Option<Vec<Step>>> {
    let arg = |i| positional(script.arg_count, cli_args, i);

    let steps = match &script.kind {
        ScriptType::Other(_) => return Ok(None),
        ScriptType::Shell => vec![Step::Shell(template::resolve(&script.body, arg)?)],
        ScriptType::Mvb => {
            let text = template::decode(&script.body)?;
            let program = mvb::assemble(&text).map_err(|e| {
                MvcError::CorruptData(format!("script '{}' is not a valid mvb program ({})", script.name, e))
            })?;
            mvb::lower(&program, arg)
                .map_err(|e| MvcError::Validation(format!("script '{}': {}", script.name, e)))?
        }
    };
    Ok(Some(steps))
}

/// Looks up `key`, fills its placeholders from `cli_args` and runs it.
/// `on_plan` sees the steps before anything is executed; `Print` steps go
/// to `out`. Execution stops at the first failing shell step.
pub fn dispatch(
    registry: &ScriptRegistry,
    key: &str,
    cli_args: &[String],
    shell: &dyn Shell,
    cwd: &Path,
    out: &mut dyn Write,
    on_plan: impl FnOnce(&[Step]),
) -> Result<Outcome> {
    let Some(script) = registry.find_by_name(key) else {
        return Ok(Outcome::NotFound);
    };

    let Some(steps) = plan(script, cli_args)? else {
        return Ok(Outcome::Skipped(script.kind.clone()));
    };
    on_plan(&steps);

    let mut status = ShellStatus { code: Some(0) };
    for step in &steps {
        match step {
            Step::Print(text) => writeln!(out, "{}", text)?,
            Step::Shell(command) => {
                status = shell.run(command, cwd)?;
                if !status.success() {
                    break;
                }
            }
        }
    }
    Ok(Outcome::Executed { status })
}
