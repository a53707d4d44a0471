use crate::commands::run;
use crate::MvcContext;
use anyhow::Result;

/// `mvc commit <message>` runs the registered `commit` script.
pub fn run(args: Vec<String>, ctx: &MvcContext) -> Result<()> {
    run::run_script("commit", &args, ctx)
}
