// File: ./src/storage.rs
// Writes the timeline document, the calendar feed and the config file.
//
// Every write goes to a hidden sibling temp file (`.<file>.tmp`) that is
// renamed over the target, while an exclusive lock is held on a hidden
// `.<file>.lock` sidecar. Both carry the full file name, so `Calendar.md`
// and `Calendar.ics` in one folder never share a sidecar.
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Storage;

impl Storage {
    fn sidecar_path(file_path: &Path, suffix: &str) -> PathBuf {
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dot = if name.starts_with('.') { "" } else { "." };
        file_path.with_file_name(format!("{}{}.{}", dot, name, suffix))
    }

    pub fn get_lock_path(file_path: &Path) -> PathBuf {
        Self::sidecar_path(file_path, "lock")
    }

    pub fn get_temp_path(file_path: &Path) -> PathBuf {
        Self::sidecar_path(file_path, "tmp")
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file '{}'", lock_path.display()))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = Self::get_temp_path(path);
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Replaces `path` with `contents`, creating missing parent directories.
    pub fn write_locked<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        Self::with_lock(path, || Self::atomic_write(path, contents))
            .with_context(|| format!("Failed to write '{}'", path.display()))
    }
}
