use crate::error::MvcError;
use crate::template;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_EDITOR: &str = "vi";
pub const REGISTRY_DIR: &str = ".mvc";
pub const REGISTRY_FILE: &str = "scripts.json";

const COMMIT_SCRIPT: &str = "git add *\ngit commit -a -m \"{args.index.0}\"\n";
const PUSH_SCRIPT: &str = "git add *\ngit commit -a -m \"{args.index.0}\"\ngit push -u origin main\n";

/// How a script body is executed. Kinds this build does not know are kept
/// verbatim so rewriting the registry never loses them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ScriptType {
    Shell,
    /// Flat instruction list, see `crate::mvb`.
    Mvb,
    Other(String),
}

impl From<String> for ScriptType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sh" => ScriptType::Shell,
            "mvb" => ScriptType::Mvb,
            _ => ScriptType::Other(value),
        }
    }
}

impl From<ScriptType> for String {
    fn from(kind: ScriptType) -> Self {
        match kind {
            ScriptType::Shell => "sh".to_string(),
            ScriptType::Mvb => "mvb".to_string(),
            ScriptType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptType::Shell => write!(f, "sh"),
            ScriptType::Mvb => write!(f, "mvb"),
            ScriptType::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScriptDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScriptType,
    #[serde(rename = "args")]
    pub arg_count: u32,
    /// Base64 encoded script source.
    #[serde(rename = "script")]
    pub body: String,
}

impl ScriptDefinition {
    pub fn shell(name: &str, arg_count: u32, plain: &str) -> Self {
        ScriptDefinition {
            name: name.to_string(),
            kind: ScriptType::Shell,
            arg_count,
            body: template::encode(plain),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScriptRegistry {
    #[serde(rename = "cliEditor", default = "default_editor")]
    pub editor_command: String,
    #[serde(rename = "scripts", default)]
    pub entries: Vec<ScriptDefinition>,
}

fn default_editor() -> String {
    DEFAULT_EDITOR.to_string()
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        ScriptRegistry {
            editor_command: default_editor(),
            entries: Vec::new(),
        }
    }
}

impl ScriptRegistry {
    /// Registry written for a freshly initialized project.
    pub fn bootstrap() -> Self {
        ScriptRegistry {
            editor_command: default_editor(),
            entries: vec![
                ScriptDefinition::shell("commit", 1, COMMIT_SCRIPT),
                ScriptDefinition::shell("push", 1, PUSH_SCRIPT),
            ],
        }
    }

    /// First entry named `name`. Duplicates further down are ignored.
    pub fn find_by_name(&self, name: &str) -> Option<&ScriptDefinition> {
        self.entries.iter().find(|s| s.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|s| s.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ScriptDefinition> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }
}

pub fn validate_name(name: &str) -> Result<(), MvcError> {
    if name.is_empty() {
        return Err(MvcError::Validation("Name must not be empty".to_string()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(MvcError::Validation("Name must not contain spaces".to_string()));
    }
    Ok(())
}

/// Durable storage for the script registry.
pub trait RegistryStore {
    fn load(&self) -> Result<ScriptRegistry>;
    fn save(&self, registry: &ScriptRegistry) -> Result<()>;
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn for_project(root: &Path) -> Self {
        Self::new(root.join(REGISTRY_DIR).join(REGISTRY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl RegistryStore for FileStore {
    fn load(&self) -> Result<ScriptRegistry> {
        if !self.path.exists() {
            return Err(MvcError::NotFound(format!(
                "No script registry found at {:?}. Run 'mvc init' to create one.",
                self.path
            ))
            .into());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        let registry = serde_json::from_str(&content)
            .map_err(|e| MvcError::CorruptData(format!("{:?}: {}", self.path, e)))?;
        Ok(registry)
    }

    /// Replaces the whole file. The document is written to a sibling temp
    /// file and renamed over the destination once synced.
    fn save(&self, registry: &ScriptRegistry) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

        let content = serde_json::to_string_pretty(registry).context("Failed to serialize script registry")?;
        let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temporary registry file")?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all().context("Failed to sync script registry")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}
