// File: ./src/vault.rs
//! Note discovery and reminder metadata extraction.
//!
//! A note takes part in the timeline when it contains a `<key>: <date>` line
//! (`Reminder:` by default). Optional `Repeat:`, `Priority:` and `Style:`
//! fields and the first embedded image refine how it is listed.
use crate::config::Config;
use crate::error::TimelineError;
use crate::model::{RawReminder, parse_date};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const NOTE_EXTENSION: &str = "md";

/// Fields pulled out of one note's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFields {
    pub date: String,
    pub repeat: Option<i64>,
    pub priority: Option<u8>,
    pub style: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone)]
pub struct NoteExtractor {
    date: Regex,
    repeat: Regex,
    priority: Regex,
    style: Regex,
    thumbnail: Regex,
}

impl NoteExtractor {
    pub fn new(reminder_key: &str) -> Result<Self> {
        let date = Regex::new(&format!(r"{}:[ \t]+(.+)", regex::escape(reminder_key.trim())))
            .with_context(|| format!("Invalid reminder key '{}'", reminder_key))?;
        Ok(Self {
            date,
            repeat: Regex::new(r"Repeat:[ \t]+(\d+)")?,
            priority: Regex::new(r"Priority:[ \t]+([1-6])")?,
            style: Regex::new(r"Style:[ \t]+(.*)")?,
            thumbnail: Regex::new(
                r"(?i)!\[\[[^\]\n]*?\.(?:jpe?g|png|heic|webp)\]\]|!\[[^\]\n]*\]\([^)\n]*?\.(?:jpe?g|png|heic|webp)\)",
            )?,
        })
    }

    /// Returns `None` when the note carries no reminder date.
    pub fn extract(&self, content: &str) -> Option<NoteFields> {
        let date = self.date.captures(content)?.get(1)?.as_str().trim().to_string();

        let repeat = self
            .repeat
            .captures(content)
            .and_then(|c| c[1].parse::<i64>().ok());
        let priority = self
            .priority
            .captures(content)
            .and_then(|c| c[1].parse::<u8>().ok());
        let style = self
            .style
            .captures(content)
            .map(|c| c[1].replace('"', "").trim().to_string())
            .unwrap_or_default();
        let thumbnail = self
            .thumbnail
            .find(content)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Some(NoteFields {
            date,
            repeat,
            priority,
            style,
            thumbnail,
        })
    }
}

/// Header line placed above a note's backlink.
///
/// A priority wins over the folder rules and becomes a Markdown heading of
/// that level.
pub fn folder_header(config: &Config, folder: &str, priority: Option<u8>) -> String {
    if !config.show_folders {
        return String::new();
    }
    if let Some(p) = priority {
        return format!("{} {} \n", "#".repeat(usize::from(p)), folder);
    }
    match config.folder_symbol(folder) {
        Some(symbol) => format!("{} {}\n", symbol, folder),
        None => {
            let default = config.default_folder_symbol();
            format!("{} {} {}\n", default, folder, default)
        }
    }
}

pub fn backlink_label(header: &str, stem: &str, style: &str, thumbnail: &str) -> String {
    format!("{} - {style}[[{}]]{style} {}", header, stem, thumbnail, style = style)
}

/// Recursively lists Markdown notes under `root` in sorted order.
///
/// Hidden files and folders are skipped, as is `exclude` (the generated
/// timeline document).
pub fn collect_notes(root: &Path, exclude: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    collect_into(root, exclude, &mut out)
        .with_context(|| format!("Failed to scan vault '{}'", root.display()))?;
    Ok(out)
}

// Symlinked folders are not entered; symlinked note files are kept.
fn collect_into(dir: &Path, exclude: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }
        if file_type.is_dir() {
            collect_into(&path, exclude, out)?;
        } else if file_type.is_symlink() && path.is_dir() {
            log::debug!("Not following symlinked folder {}", path.display());
        } else if path.extension().is_some_and(|e| e == NOTE_EXTENSION) && path != exclude {
            out.push(path);
        }
    }
    Ok(())
}

/// Result of scanning a vault.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Reminders in discovery order.
    pub reminders: Vec<RawReminder>,
    /// Notes dropped because of bad metadata.
    pub skipped: Vec<TimelineError>,
    /// Notes that could not be read at all.
    pub failures: Vec<anyhow::Error>,
}

/// Turns one note into a reminder. `Ok(None)` means the note has no reminder.
pub fn read_reminder(
    config: &Config,
    extractor: &NoteExtractor,
    path: &Path,
    content: &str,
) -> Result<Option<RawReminder>, TimelineError> {
    let Some(fields) = extractor.extract(content) else {
        return Ok(None);
    };

    if let Err(e) = parse_date(&fields.date) {
        return Err(TimelineError::SkippedNote {
            path: path.to_path_buf(),
            source: Box::new(e),
        });
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let folder = path
        .parent()
        .and_then(Path::file_name)
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let thumbnail = if config.show_images {
        fields.thumbnail.as_str()
    } else {
        ""
    };
    let header = folder_header(config, &folder, fields.priority);

    Ok(Some(RawReminder {
        label_text: backlink_label(&header, &stem, &fields.style, thumbnail),
        id: stem,
        date: fields.date,
        repeat_interval: fields.repeat,
        priority: fields.priority,
        folder,
    }))
}

/// Reads every note of the configured vault. Unreadable notes and bad
/// metadata are collected rather than stopping the scan; only a vault that
/// cannot be listed is an immediate error.
pub fn scan_vault(config: &Config) -> Result<ScanOutcome> {
    if config.vault.as_os_str().is_empty() {
        anyhow::bail!("Vault path is not set; edit the config file or pass --vault");
    }
    let extractor = NoteExtractor::new(&config.reminder_key)?;
    let paths = collect_notes(&config.vault, &config.timeline_path())?;
    log::debug!("Found {} notes under {}", paths.len(), config.vault.display());

    let mut outcome = ScanOutcome::default();
    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Cannot read {}: {}", path.display(), e);
                let err = anyhow::Error::new(e)
                    .context(format!("Failed to read note '{}'", path.display()));
                outcome.failures.push(err);
                continue;
            }
        };

        match read_reminder(config, &extractor, &path, &content) {
            Ok(Some(reminder)) => outcome.reminders.push(reminder),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}", e);
                outcome.skipped.push(e);
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn extractor() -> NoteExtractor {
        NoteExtractor::new("Reminder").unwrap()
    }

    #[test]
    fn extracts_all_fields() {
        let note = "---\nReminder: 2025-06-10\nRepeat: 365\nPriority: 2\nStyle: \"==\"\n---\n![[cake.PNG]]\n";
        let fields = extractor().extract(note).unwrap();

        assert_eq!(fields.date, "2025-06-10");
        assert_eq!(fields.repeat, Some(365));
        assert_eq!(fields.priority, Some(2));
        assert_eq!(fields.style, "==");
        assert_eq!(fields.thumbnail, "![[cake.PNG]]");
    }

    #[test]
    fn priority_outside_range_is_ignored() {
        let fields = extractor()
            .extract("Reminder: 2025-06-10\nPriority: 9\n")
            .unwrap();
        assert_eq!(fields.priority, None);
        assert_eq!(fields.repeat, None);
        assert_eq!(fields.thumbnail, "");
    }

    #[test]
    fn notes_without_key_are_not_reminders() {
        assert!(extractor().extract("Just some text\nRepeat: 3").is_none());
        assert!(extractor().extract("Reminder:\n").is_none());
    }

    #[test]
    fn markdown_image_link_is_a_thumbnail() {
        let fields = extractor()
            .extract("Reminder: 2025-06-10\n![photo](img/cat.jpeg)\n")
            .unwrap();
        assert_eq!(fields.thumbnail, "![photo](img/cat.jpeg)");
    }

    #[test]
    fn headers_follow_priority_then_rules() {
        let config = Config {
            folder_rules: HashMap::from([
                ("Default".to_string(), "`".to_string()),
                ("Birthdays".to_string(), "#".to_string()),
            ]),
            ..Config::default()
        };

        assert_eq!(folder_header(&config, "Work", Some(3)), "### Work \n");
        assert_eq!(folder_header(&config, "Birthdays", None), "# Birthdays\n");
        assert_eq!(folder_header(&config, "Work", None), "` Work `\n");

        let hidden = Config {
            show_folders: false,
            ..Config::default()
        };
        assert_eq!(folder_header(&hidden, "Work", Some(1)), "");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_folders_are_not_followed() {
        use crate::context::TestContext;

        let ctx = TestContext::new();
        ctx.write_note("Work/a.md", "Reminder: 2025-06-10\n");
        ctx.write_note("Other/b.md", "Reminder: 2025-06-11\n");
        let vault = ctx.vault_dir();
        std::os::unix::fs::symlink(&vault, vault.join("Work/loop")).unwrap();
        std::os::unix::fs::symlink(vault.join("Other/b.md"), vault.join("Work/b-link.md"))
            .unwrap();

        let notes = collect_notes(&vault, &vault.join("Calendar.md")).unwrap();

        assert_eq!(
            notes,
            vec![
                vault.join("Other/b.md"),
                vault.join("Work/a.md"),
                vault.join("Work/b-link.md"),
            ]
        );
    }

    #[test]
    fn label_wraps_backlink_in_style() {
        assert_eq!(
            backlink_label("# Birthdays\n", "Ana", "**", "![[ana.png]]"),
            "# Birthdays\n - **[[Ana]]** ![[ana.png]]"
        );
        assert_eq!(backlink_label("", "Ana", "", ""), " - [[Ana]] ");
    }
}
