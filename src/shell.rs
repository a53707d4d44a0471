use crate::error::MvcError;
use anyhow::Result;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellStatus {
    pub code: Option<i32>,
}

impl ShellStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command string through the platform shell and waits for it.
pub trait Shell {
    fn run(&self, command: &str, cwd: &Path) -> Result<ShellStatus>;
}

pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, command: &str, cwd: &Path) -> Result<ShellStatus> {
        let (shell, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let status = Command::new(shell)
            .arg(flag)
            .arg(command)
            .current_dir(cwd)
            .status()
            .map_err(|e| MvcError::ExternalProcess(format!("could not start {}: {}", shell, e)))?;

        Ok(ShellStatus { code: status.code() })
    }
}

/// Quotes `word` so the platform shell sees it as one argument.
pub fn quote(word: &str) -> String {
    if cfg!(windows) {
        format!("\"{}\"", word.replace('"', "\"\""))
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}
