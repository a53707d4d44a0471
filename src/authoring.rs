use crate::error::MvcError;
use crate::registry::{validate_name, RegistryStore, ScriptDefinition, ScriptRegistry};
use crate::shell::{quote_path, Shell};
use crate::template;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub enum AuthoringMode {
    /// Open the scratch file with this editor command and wait for it to exit.
    Editor(String),
    /// Let the operator edit the scratch file with any tool, then confirm.
    Inline,
}

/// A script being created or edited. Holds the registry index when the
/// name already exists so the entry is replaced where it stands.
pub struct AuthoringSession {
    name: String,
    arg_count: u32,
    existing: Option<usize>,
    buffer: String,
}

impl AuthoringSession {
    pub fn begin(registry: &ScriptRegistry, name: &str, arg_count: u32) -> Result<Self> {
        validate_name(name)?;
        let existing = registry.position(name);
        let buffer = match existing {
            Some(i) => template::decode(&registry.entries[i].body)?,
            None => String::new(),
        };
        Ok(AuthoringSession {
            name: name.to_string(),
            arg_count,
            existing,
            buffer,
        })
    }

    /// Round-trips the buffer through a scratch file. `Ok(None)` means the
    /// operator left nothing usable behind: an empty file, an unreadable
    /// file, or a declined confirmation in inline mode.
    pub fn capture(
        &self,
        mode: &AuthoringMode,
        shell: &dyn Shell,
        cwd: &Path,
        acknowledge: impl FnOnce(&Path) -> Result<bool>,
    ) -> Result<Option<String>> {
        let mut scratch = tempfile::Builder::new()
            .prefix("mvc-")
            .suffix(".sh")
            .tempfile()
            .context("Failed to create scratch file")?;
        scratch.write_all(self.buffer.as_bytes())?;
        scratch.flush()?;
        let path = scratch.path().to_path_buf();

        match mode {
            AuthoringMode::Editor(editor) => {
                let command = format!("{} {}", editor, quote_path(&path));
                let status = shell.run(&command, cwd)?;
                if !status.success() {
                    return Err(MvcError::ExternalProcess(format!(
                        "editor '{}' exited with code {:?}",
                        editor, status.code
                    ))
                    .into());
                }
            }
            AuthoringMode::Inline => {
                if !acknowledge(&path)? {
                    return Ok(None);
                }
            }
        }

        match fs::read_to_string(&path) {
            Ok(body) if !body.is_empty() => Ok(Some(body)),
            _ => Ok(None),
        }
    }

    pub fn commit(self, registry: &mut ScriptRegistry, body: &str) -> ScriptDefinition {
        let definition = ScriptDefinition::shell(&self.name, self.arg_count, body);
        match self.existing.filter(|&i| i < registry.entries.len()) {
            Some(i) => registry.entries[i] = definition.clone(),
            None => registry.entries.push(definition.clone()),
        }
        definition
    }
}

/// Full authoring pass: load, edit, and save only when a body came back.
pub fn author(
    store: &dyn RegistryStore,
    shell: &dyn Shell,
    name: &str,
    arg_count: u32,
    mode: &AuthoringMode,
    cwd: &Path,
    acknowledge: impl FnOnce(&Path) -> Result<bool>,
) -> Result<Option<ScriptDefinition>> {
    let mut registry = store.load()?;
    let session = AuthoringSession::begin(&registry, name, arg_count)?;

    let Some(body) = session.capture(mode, shell, cwd, acknowledge)? else {
        return Ok(None);
    };

    let definition = session.commit(&mut registry, &body);
    store.save(&registry)?;
    Ok(Some(definition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ScriptType;
    use crate::shell::testing::RecordingShell;
    use crate::shell::ShellStatus;
    use std::cell::{Cell, RefCell};

    struct MemoryStore {
        registry: RefCell<ScriptRegistry>,
        saves: Cell<usize>,
    }

    impl MemoryStore {
        fn new(registry: ScriptRegistry) -> Self {
            MemoryStore {
                registry: RefCell::new(registry),
                saves: Cell::new(0),
            }
        }
    }

    impl RegistryStore for MemoryStore {
        fn load(&self) -> Result<ScriptRegistry> {
            Ok(self.registry.borrow().clone())
        }

        fn save(&self, registry: &ScriptRegistry) -> Result<()> {
            self.saves.set(self.saves.get() + 1);
            *self.registry.borrow_mut() = registry.clone();
            Ok(())
        }
    }

    /// Stands in for an editor: overwrites the file named at the end of
    /// the command with fixed content.
    struct WritingEditor {
        content: &'static str,
        seen_buffer: RefCell<String>,
    }

    impl Shell for WritingEditor {
        fn run(&self, command: &str, _cwd: &Path) -> Result<ShellStatus> {
            let (_, quoted) = command.rsplit_once(' ').unwrap();
            let path = quoted.trim_matches(|c| c == '\'' || c == '"');
            *self.seen_buffer.borrow_mut() = fs::read_to_string(path).unwrap();
            fs::write(path, self.content).unwrap();
            Ok(ShellStatus { code: Some(0) })
        }
    }

    fn never_asked(_: &Path) -> Result<bool> {
        panic!("acknowledgment is only requested in inline mode")
    }

    #[test]
    fn new_session_starts_empty() {
        let session = AuthoringSession::begin(&ScriptRegistry::bootstrap(), "lint", 0).unwrap();
        assert_eq!(session.existing, None);
        assert_eq!(session.buffer, "");
        assert_eq!(session.name, "lint");
    }

    #[test]
    fn existing_session_preloads_decoded_body() {
        let session = AuthoringSession::begin(&ScriptRegistry::bootstrap(), "commit", 1).unwrap();
        assert_eq!(session.existing, Some(0));
        assert_eq!(session.buffer, "git add *\ngit commit -a -m \"{args.index.0}\"\n");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let registry = ScriptRegistry::bootstrap();
        assert!(AuthoringSession::begin(&registry, "", 0).is_err());
        assert!(AuthoringSession::begin(&registry, "my script", 0).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn editor_mode_reads_back_what_the_editor_wrote() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let editor = WritingEditor {
            content: "cargo clippy -- {args.index.0}\n",
            seen_buffer: RefCell::new(String::new()),
        };

        let definition = author(
            &store,
            &editor,
            "lint",
            1,
            &AuthoringMode::Editor("vi".to_string()),
            Path::new("."),
            never_asked,
        )
        .unwrap()
        .unwrap();

        assert_eq!(editor.seen_buffer.borrow().as_str(), "");
        assert_eq!(definition.arg_count, 1);
        assert_eq!(store.saves.get(), 1);
        let registry = store.registry.borrow();
        assert_eq!(registry.entries.len(), 3);
        let lint = registry.find_by_name("lint").unwrap();
        assert_eq!(template::decode(&lint.body).unwrap(), "cargo clippy -- {args.index.0}\n");
    }

    #[test]
    fn editor_receives_quoted_scratch_path() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let shell = RecordingShell::new();

        let result = author(
            &store,
            &shell,
            "lint",
            0,
            &AuthoringMode::Editor("nano -w".to_string()),
            Path::new("."),
            never_asked,
        )
        .unwrap();

        // The recording shell leaves the scratch file empty.
        assert!(result.is_none());
        let commands = shell.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("nano -w "));
        assert!(commands[0].contains("mvc-"));
    }

    #[test]
    fn empty_inline_edit_leaves_registry_alone() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let shell = RecordingShell::new();

        let result = author(
            &store,
            &shell,
            "lint",
            0,
            &AuthoringMode::Inline,
            Path::new("."),
            |_| Ok(true),
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(store.saves.get(), 0);
        assert!(store.registry.borrow().find_by_name("lint").is_none());
        assert!(shell.commands().is_empty());
    }

    #[test]
    fn whitespace_only_body_is_still_a_body() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let definition = author(
            &store,
            &RecordingShell::new(),
            "blank",
            0,
            &AuthoringMode::Inline,
            Path::new("."),
            |path| {
                fs::write(path, "\n").unwrap();
                Ok(true)
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(template::decode(&definition.body).unwrap(), "\n");
        assert_eq!(store.saves.get(), 1);
    }

    #[test]
    fn declined_inline_edit_is_discarded() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let result = author(
            &store,
            &RecordingShell::new(),
            "lint",
            0,
            &AuthoringMode::Inline,
            Path::new("."),
            |path| {
                fs::write(path, "echo never saved").unwrap();
                Ok(false)
            },
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(store.saves.get(), 0);
    }

    #[test]
    fn inline_edit_of_push_updates_in_place() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let new_body = "git commit -a -m \"{args.index.0}\"\ngit push origin {args.index.1}\n";

        author(
            &store,
            &RecordingShell::new(),
            "push",
            2,
            &AuthoringMode::Inline,
            Path::new("."),
            |path| {
                assert!(fs::read_to_string(path).unwrap().contains("git push -u origin main"));
                fs::write(path, new_body).unwrap();
                Ok(true)
            },
        )
        .unwrap()
        .unwrap();

        let registry = store.registry.borrow();
        assert_eq!(registry.entries.len(), 2);
        assert_eq!(registry.entries[1].name, "push");
        assert_eq!(registry.entries[1].arg_count, 2);
        assert_eq!(registry.entries[1].kind, ScriptType::Shell);
        assert_eq!(template::decode(&registry.entries[1].body).unwrap(), new_body);
    }

    #[test]
    fn editor_failure_aborts_without_saving() {
        let store = MemoryStore::new(ScriptRegistry::bootstrap());
        let err = author(
            &store,
            &RecordingShell::exiting_with(1),
            "lint",
            0,
            &AuthoringMode::Editor("vi".to_string()),
            Path::new("."),
            never_asked,
        )
        .unwrap_err();

        assert!(matches!(err.downcast_ref::<MvcError>(), Some(MvcError::ExternalProcess(_))));
        assert_eq!(store.saves.get(), 0);
    }

    #[test]
    fn commit_forces_shell_kind_on_replace() {
        let mut registry = ScriptRegistry::bootstrap();
        registry.entries[0].kind = ScriptType::Mvb;

        let session = AuthoringSession::begin(&registry, "commit", 0).unwrap();
        session.commit(&mut registry, "git commit -m wip\n");

        assert_eq!(registry.entries.len(), 2);
        assert_eq!(registry.entries[0].kind, ScriptType::Shell);
        assert_eq!(registry.entries[0].arg_count, 0);
    }
}
