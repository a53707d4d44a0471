use crate::registry::REGISTRY_DIR;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "mvc.toml";
pub const EDITOR_ENV: &str = "MVC_EDITOR";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MvcConfig {
    pub project: ProjectConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    pub kind: ProjectKind,
    pub author: String,
    pub licence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_link: Option<String>,
}

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    App,
    Lib,
}

impl MvcConfig {
    pub fn default(name: &str) -> Self {
        MvcConfig {
            project: ProjectConfig {
                name: name.to_string(),
                kind: ProjectKind::App,
                author: String::new(),
                licence: "MIT".to_string(),
                git_link: None,
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: MvcConfig = toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(root.join(MANIFEST_FILE), content).context("Failed to write mvc.toml")?;
        Ok(())
    }
}

/// Walks up from `start` to the first directory holding `mvc.toml` or a
/// `.mvc` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(MANIFEST_FILE).is_file() || current.join(REGISTRY_DIR).is_dir() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Project root for the current directory, or the current directory itself
/// when no project is found (the registry load then reports what is missing).
pub fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

/// `MVC_EDITOR` wins over the registry's `cliEditor`.
pub fn editor_override() -> Option<String> {
    std::env::var(EDITOR_ENV).ok().filter(|v| !v.trim().is_empty())
}
