// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::error::TimelineError;
use crate::model::{CalendarOptions, DateLimits, SimpleOptions, SortDirection, TimelineMode};
use crate::render::DEFAULT_TEMPLATE;
use crate::storage::Storage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the folder symbol used for folders without their own rule.
pub const DEFAULT_FOLDER_RULE: &str = "Default";

fn default_true() -> bool {
    true
}

fn default_reminder_key() -> String {
    "Reminder".to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_folder_rules() -> HashMap<String, String> {
    HashMap::from([
        (DEFAULT_FOLDER_RULE.to_string(), "`".to_string()),
        ("Birthdays".to_string(), "#".to_string()),
        ("Anniversaries".to_string(), "##".to_string()),
    ])
}

/// Date window used by simple mode when `limited_dates` is on.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DateRules {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub others: Vec<String>,
}

impl Default for DateRules {
    fn default() -> Self {
        Self {
            start: "2018-01-01".to_string(),
            end: "2018-12-31".to_string(),
            others: Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Root folder scanned for notes.
    #[serde(default)]
    pub vault: PathBuf,
    /// Timeline document; defaults to `<vault>/Calendar.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_file: Option<PathBuf>,
    /// Calendar feed; defaults to `<vault>/.Calendar.ics`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ical_file: Option<PathBuf>,
    #[serde(default = "default_reminder_key")]
    pub reminder_key: String,

    #[serde(default)]
    pub sort: SortDirection,
    #[serde(default = "default_true")]
    pub show_expired: bool,
    #[serde(default = "default_true")]
    pub show_folders: bool,
    #[serde(default = "default_true")]
    pub show_images: bool,
    #[serde(default = "default_true")]
    pub ical_enable: bool,

    #[serde(default)]
    pub simple_mode: bool,
    #[serde(default)]
    pub limited_dates: bool,
    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default)]
    pub date_rules: DateRules,
    #[serde(default = "default_folder_rules")]
    pub folder_rules: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault: PathBuf::new(),
            timeline_file: None,
            ical_file: None,
            reminder_key: default_reminder_key(),
            sort: SortDirection::default(),
            show_expired: true,
            show_folders: true,
            show_images: true,
            ical_enable: true,
            simple_mode: false,
            limited_dates: false,
            template: default_template(),
            date_rules: DateRules::default(),
            folder_rules: default_folder_rules(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Whether an error returned by [`Config::load`] means the file is absent.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context. Returns the written path.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        let path = ctx.get_config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        Storage::write_locked(path, toml_str)
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        if !self.folder_rules.contains_key(DEFAULT_FOLDER_RULE) {
            return Err(TimelineError::InvalidConfig(format!(
                "folder_rules must contain a '{}' entry",
                DEFAULT_FOLDER_RULE
            )));
        }
        if self.reminder_key.trim().is_empty() {
            return Err(TimelineError::InvalidConfig(
                "reminder_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeline_path(&self) -> PathBuf {
        self.timeline_file
            .clone()
            .unwrap_or_else(|| self.vault.join("Calendar.md"))
    }

    pub fn ical_path(&self) -> PathBuf {
        self.ical_file
            .clone()
            .unwrap_or_else(|| self.vault.join(".Calendar.ics"))
    }

    /// Symbol configured for a folder, if any.
    pub fn folder_symbol(&self, folder: &str) -> Option<&str> {
        self.folder_rules.get(folder).map(String::as_str)
    }

    pub fn default_folder_symbol(&self) -> &str {
        self.folder_rules
            .get(DEFAULT_FOLDER_RULE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Builds the classification mode. Malformed date rules are returned
    /// next to the mode; the valid parts of the rules still apply.
    pub fn timeline_mode(&self) -> (TimelineMode, Vec<TimelineError>) {
        if !self.simple_mode {
            let mode = TimelineMode::Calendar(CalendarOptions {
                show_expired: self.show_expired,
            });
            return (mode, Vec::new());
        }
        if !self.limited_dates {
            return (TimelineMode::Simple(SimpleOptions { limits: None }), Vec::new());
        }

        let rules = &self.date_rules;
        let (limits, errors) = DateLimits::from_keys(&rules.start, &rules.end, &rules.others);
        let mode = TimelineMode::Simple(SimpleOptions {
            limits: Some(limits),
        });
        (mode, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("vault = \"/notes\"").unwrap();
        assert_eq!(config.reminder_key, "Reminder");
        assert!(config.show_expired);
        assert_eq!(config.default_folder_symbol(), "`");
        assert_eq!(config.timeline_path(), PathBuf::from("/notes/Calendar.md"));
        assert_eq!(config.ical_path(), PathBuf::from("/notes/.Calendar.ics"));
        assert_eq!(config.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn folder_rules_require_default() {
        let config: Config = toml::from_str(
            r##"
            vault = "/notes"
            [folder_rules]
            Birthdays = "#"
            "##,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(TimelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let ctx = TestContext::new();
        let mut config = Config {
            vault: ctx.vault_dir(),
            simple_mode: true,
            limited_dates: true,
            sort: SortDirection::Descending,
            ..Config::default()
        };
        config.date_rules.others.push("2024-12-01".to_string());

        config.save(&ctx).unwrap();
        let loaded = Config::load(&ctx).unwrap();

        assert_eq!(loaded.vault, config.vault);
        assert_eq!(loaded.sort, SortDirection::Descending);
        assert_eq!(loaded.date_rules, config.date_rules);
        assert!(loaded.simple_mode && loaded.limited_dates);
    }

    #[test]
    fn missing_file_is_detected() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
    }

    #[test]
    fn limited_mode_reports_bad_rules() {
        let config = Config {
            simple_mode: true,
            limited_dates: true,
            date_rules: DateRules {
                start: "2025-06-01".to_string(),
                end: "2025-06-30".to_string(),
                others: vec!["2025-07-04".to_string(), "xmas".to_string()],
            },
            ..Config::default()
        };

        let (mode, errors) = config.timeline_mode();
        assert_eq!(errors.len(), 1);
        let TimelineMode::Simple(SimpleOptions { limits: Some(limits) }) = mode else {
            panic!("expected limited simple mode");
        };
        assert_eq!(limits.extra.len(), 1);
        assert!(limits.range.is_some());
    }
}
