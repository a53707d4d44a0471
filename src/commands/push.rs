use crate::commands::run;
use crate::MvcContext;
use anyhow::Result;

pub fn run(args: Vec<String>, ctx: &MvcContext) -> Result<()> {
    run::run_script("push", &args, ctx)
}
