// File: ./src/context.rs
/*! Application context abstraction for filesystem paths.

`AppContext` decides where configuration and logs live. Two
implementations are provided:

- `StandardContext`: uses `directories::ProjectDirs`, or an override root
  given on the command line.
- `TestContext`: a temporary directory for isolated tests, removed on drop.

Code that touches the filesystem receives a `&dyn AppContext` instead of
reading globals or environment variables.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    fn get_log_path(&self) -> Option<PathBuf> {
        self.get_data_dir()
            .ok()
            .map(|p| p.join("vault-timeline.log"))
    }
}

fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {:?}", path))?;
    }
    Ok(path)
}

// --- Production Implementation ---

#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    /// When `override_root` is `Some(path)`, directories are created under
    /// that root as `data` and `config`.
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "vault-timeline", "vault-timeline")
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            return ensure_exists(root.join("data"));
        }
        let proj = Self::get_proj_dirs().ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        ensure_exists(proj.data_dir().to_path_buf())
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            return ensure_exists(root.join("config"));
        }
        let proj = Self::get_proj_dirs().ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        ensure_exists(proj.config_dir().to_path_buf())
    }
}

// --- Test Implementation ---

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// Creates a context backed by a unique temporary directory.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let root = std::env::temp_dir().join(format!("vault_timeline_test_{}", uuid));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }

    /// Directory used as the note vault in tests.
    pub fn vault_dir(&self) -> PathBuf {
        let p = self.root.join("vault");
        std::fs::create_dir_all(&p).expect("failed to create test vault");
        p
    }

    /// Writes a note relative to the vault directory, creating parent folders.
    pub fn write_note(&self, rel: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.vault_dir().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create note folder");
        }
        std::fs::write(&path, content).expect("failed to write note");
        path
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("data");
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("config");
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
