//! A config file with bundled defaults.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::document::{self, YamlDocument};
use crate::error::{ConfigError, ConfigResult};

/// A [`YamlDocument`] overlaid with the defaults a plugin ships inside its
/// binary (the text of the default file, usually via `include_str!`).
///
/// On first run the bundled text is written to disk verbatim, comments and
/// all. Afterwards every load sweeps the defaults for keys missing from the
/// on-disk file and copies them in, so shipping a new config key with an
/// update needs no migration step. Asking for a key absent from both the
/// disk and the bundle is an error naming the bundle and the path.
pub struct SimpleConfig {
    doc: YamlDocument,
    defaults: Option<Mapping>,
    file_name: String,
    bundled_text: Option<String>,
    path_prefix: Option<String>,
}

impl SimpleConfig {
    /// Opens `<data_dir>/<file_name>`, seeding and updating it from the
    /// bundled default text.
    pub fn with_defaults(
        data_dir: &Path,
        file_name: &str,
        bundled_text: &str,
    ) -> ConfigResult<Self> {
        let path = data_dir.join(file_name);
        let defaults = document::parse_mapping(bundled_text, &path).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Defaults {
                file: file_name.to_string(),
                source,
            },
            other => other,
        })?;

        if !path.exists() {
            write_verbatim(&path, bundled_text)?;
            info!("Created the default file '{file_name}'.");
        }

        let mut config = Self {
            doc: YamlDocument::open(path)?,
            defaults: Some(defaults),
            file_name: file_name.to_string(),
            bundled_text: Some(bundled_text.to_string()),
            path_prefix: None,
        };
        config.apply_missing_defaults()?;
        Ok(config)
    }

    /// Opens `<data_dir>/<file_name>` with no defaults. Only this form
    /// honors a path prefix.
    pub fn without_defaults(data_dir: &Path, file_name: &str) -> ConfigResult<Self> {
        Ok(Self {
            doc: YamlDocument::open(data_dir.join(file_name))?,
            defaults: None,
            file_name: file_name.to_string(),
            bundled_text: None,
            path_prefix: None,
        })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn document(&self) -> &YamlDocument {
        &self.doc
    }

    /// Prepends a fixed segment to every path, so a config scoped to one
    /// entity can drop the repeated `<id>.` at each call site. Ignored when
    /// the config has defaults; a bundle cannot carry per-entity keys.
    pub fn set_path_prefix(&mut self, prefix: Option<&str>) {
        if self.defaults.is_some() {
            warn!(
                "path prefix ignored for '{}': the config has bundled defaults",
                self.file_name
            );
            return;
        }
        self.path_prefix = prefix.map(str::to_string);
    }

    /// Lines written back as `#` comments at the top of every save. Plain
    /// saves lose the bundle's comments; the header survives.
    pub fn set_header(&mut self, lines: &[&str]) {
        self.doc.set_header(lines);
    }

    /// Reads the value at `path`. A key missing from disk but present in
    /// the defaults is copied in and written back first.
    pub fn get(&mut self, path: &str) -> ConfigResult<Value> {
        let full = self.full_path(path);
        if let Some(value) = self.doc.get(&full) {
            return Ok(value.clone());
        }

        let Some(defaults) = &self.defaults else {
            return Err(ConfigError::MissingKey {
                file: self.file_name.clone(),
                key: path.to_string(),
            });
        };
        let value = document::lookup(defaults, path)
            .cloned()
            .ok_or_else(|| ConfigError::MissingDefault {
                file: self.file_name.clone(),
                key: path.to_string(),
            })?;
        info!(
            "Updating {}. Set '{}' to '{}'",
            self.file_name,
            path,
            display_value(&value)
        );
        self.write(path, value.clone())?;
        Ok(value)
    }

    pub fn get_string(&mut self, path: &str) -> ConfigResult<String> {
        let value = self.get(path)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| wrong_type(path, "string"))
    }

    pub fn get_bool(&mut self, path: &str) -> ConfigResult<bool> {
        self.get(path)?
            .as_bool()
            .ok_or_else(|| wrong_type(path, "boolean"))
    }

    pub fn get_i64(&mut self, path: &str) -> ConfigResult<i64> {
        self.get(path)?
            .as_i64()
            .ok_or_else(|| wrong_type(path, "number"))
    }

    pub fn get_f64(&mut self, path: &str) -> ConfigResult<f64> {
        self.get(path)?
            .as_f64()
            .ok_or_else(|| wrong_type(path, "number"))
    }

    pub fn get_string_list(&mut self, path: &str) -> ConfigResult<Vec<String>> {
        self.get(path)?
            .as_sequence()
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .ok_or_else(|| wrong_type(path, "list of strings"))
    }

    /// Sets a value in memory. [`write`](Self::write) persists it too.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let full = self.full_path(path);
        self.doc.set(&full, value);
    }

    /// Sets a value, saves the file and reloads it from disk.
    pub fn write(&mut self, path: &str, value: impl Into<Value>) -> ConfigResult<()> {
        self.set(path, value);
        self.save()?;
        self.reload()
    }

    pub fn save(&self) -> ConfigResult<()> {
        self.doc.save()
    }

    /// Reloads from disk and re-applies the defaults sweep, so keys deleted
    /// by hand come back.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.doc.reload()?;
        self.apply_missing_defaults()
    }

    fn full_path(&self, path: &str) -> String {
        match (&self.defaults, &self.path_prefix) {
            (None, Some(prefix)) => format!("{prefix}.{path}"),
            _ => path.to_string(),
        }
    }

    /// Copies every default key the on-disk document lacks, logging each
    /// one, and saves if anything changed.
    fn apply_missing_defaults(&mut self) -> ConfigResult<()> {
        let Some(defaults) = self.defaults.clone() else {
            return Ok(());
        };

        let mut missing = Vec::new();
        collect_missing(&defaults, &self.doc, String::new(), &mut missing);
        if missing.is_empty() {
            return Ok(());
        }

        for (path, value) in &missing {
            info!(
                "Updating {}. Set '{}' to '{}'",
                self.file_name,
                path,
                display_value(value)
            );
            self.doc.set(path, value.clone());
        }
        self.save()
    }

    /// The text the config was bundled with, for hosts that want to show it.
    pub fn bundled_text(&self) -> Option<&str> {
        self.bundled_text.as_deref()
    }
}

fn wrong_type(path: &str, expected: &'static str) -> ConfigError {
    ConfigError::WrongType {
        key: path.to_string(),
        expected,
    }
}

/// Recursive key-presence sweep: leaves (and empty sections) of `defaults`
/// absent from `doc` land in `missing` with their dotted paths.
fn collect_missing(
    defaults: &Mapping,
    doc: &YamlDocument,
    prefix: String,
    missing: &mut Vec<(String, Value)>,
) {
    for (key, value) in defaults {
        let Some(key) = key.as_str() else {
            continue;
        };
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };

        match value.as_mapping() {
            Some(section) if !section.is_empty() => {
                collect_missing(section, doc, path, missing);
            }
            _ => {
                if doc.get(&path).is_none() {
                    missing.push((path, value.clone()));
                }
            }
        }
    }
}

fn write_verbatim(path: &Path, text: &str) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn display_value(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}
