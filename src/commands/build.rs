use crate::commands::run;
use crate::MvcContext;
use anyhow::Result;

// Projects without a `build` script get the usual "create one" hint.
pub fn run(args: Vec<String>, ctx: &MvcContext) -> Result<()> {
    run::run_script("build", &args, ctx)
}
