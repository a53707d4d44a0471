mod authoring;
mod config;
mod dispatch;
mod error;
mod mvb;
mod registry;
mod shell;
mod template;
mod commands {
    pub mod build;
    pub mod commit;
    pub mod info;
    pub mod init;
    pub mod push;
    pub mod run;
    pub mod script;
}
use clap::{Parser, Subcommand};
use colored::*;
use error::MvcError;
use std::process;

#[derive(Parser)]
#[command(name = "mvc")]
#[command(about = "Set up projects and run their registered scripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (print resolved scripts and error causes)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (suppress status output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Force operations (overwrite an existing mvc.toml)
    #[arg(short, long, global = true)]
    force: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with the default scripts
    Init {
        #[arg(default_value = ".")]
        path: String,

        /// Skip interactive prompts and use defaults
        #[arg(long, short = 'y')]
        yes: bool,

        /// Project name (defaults to directory name)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long, value_enum)]
        kind: Option<config::ProjectKind>,

        #[arg(long)]
        licence: Option<String>,

        /// External git repository link
        #[arg(long)]
        git_link: Option<String>,
    },
    /// Run a registered script
    Run {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the 'commit' script
    Commit {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the 'push' script
    Push {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the 'build' script
    Build {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create or edit a script
    Script {
        #[command(subcommand)]
        action: Option<ScriptAction>,

        /// Script name (prompted when missing)
        #[arg(long)]
        name: Option<String>,

        /// Amount of script arguments (prompted when missing)
        #[arg(long = "args")]
        arg_count: Option<u32>,

        /// Edit the scratch file yourself instead of opening the cli editor
        #[arg(long)]
        inline: bool,
    },
    /// Show project details and registered scripts
    Info,
}

#[derive(Subcommand)]
enum ScriptAction {
    /// Set the editor used to write scripts
    Cli { command: String },
    /// Delete a script
    Remove { name: String },
    /// Print a script's source
    Show { name: String },
}

pub struct MvcContext {
    pub verbose: bool,
    pub quiet: bool,
    pub force: bool,
}

fn main() {
    let cli = Cli::parse();

    let ctx = MvcContext {
        verbose: cli.verbose,
        quiet: cli.quiet,
        force: cli.force,
    };

    let result = match cli.command {
        Commands::Init { path, yes, name, author, kind, licence, git_link } => {
            let opts = commands::init::InitOptions { yes, name, author, kind, licence, git_link };
            commands::init::run(&path, opts, &ctx)
        }
        Commands::Run { name, args } => commands::run::run(&name, args, &ctx),
        Commands::Commit { args } => commands::commit::run(args, &ctx),
        Commands::Push { args } => commands::push::run(args, &ctx),
        Commands::Build { args } => commands::build::run(args, &ctx),
        Commands::Script { action, name, arg_count, inline } => match action {
            Some(ScriptAction::Cli { command }) => commands::script::set_editor(&command, &ctx),
            Some(ScriptAction::Remove { name }) => commands::script::remove(&name, &ctx),
            Some(ScriptAction::Show { name }) => commands::script::show(&name, &ctx),
            None => {
                let opts = commands::script::ScriptOptions { name, args: arg_count, inline };
                commands::script::edit(opts, &ctx)
            }
        },
        Commands::Info => commands::info::run(&ctx),
    };

    if let Err(e) = result {
        // Missing registries and scripts are reported, not fatal.
        if let Some(MvcError::NotFound(msg)) = e.downcast_ref::<MvcError>() {
            if !ctx.quiet {
                println!("{} {}", "[WARN]".yellow(), msg);
            }
            return;
        }
        if !ctx.quiet {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            if ctx.verbose {
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {}", cause);
                }
            }
        }
        process::exit(1);
    }
}
