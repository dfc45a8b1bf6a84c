//! One YAML file with dotted-path access.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// A YAML document bound to a path on disk.
///
/// Paths use dots to traverse nested mappings: `"ranks.admin.prefix"` reads
/// `prefix:` under `admin:` under `ranks:`. Saving is atomic (temp file,
/// then rename) so a crash mid-write never truncates a config. Plain YAML
/// re-serialization loses `#` comments; an optional header survives because
/// it is written back on every save.
#[derive(Debug, Clone)]
pub struct YamlDocument {
    path: PathBuf,
    root: Mapping,
    header: Vec<String>,
}

impl YamlDocument {
    /// Opens the document at `path`. A missing file yields an empty
    /// document; it appears on disk at the first save.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let root = load_mapping(&path)?;
        Ok(Self {
            path,
            root,
            header: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written back as `#` comments at the top of every save.
    pub fn set_header(&mut self, lines: &[&str]) {
        self.header = lines.iter().map(|line| line.to_string()).collect();
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Looks a value up by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.root, path)
    }

    /// Sets a value at a dotted path, creating intermediate mappings as
    /// needed. An intermediate that is not a mapping is replaced by one.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let leaf = segments.pop().unwrap_or(path);

        let mut current = &mut self.root;
        for segment in segments {
            let entry = current
                .entry(Value::from(segment))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            // Checked to be a mapping just above.
            current = entry.as_mapping_mut().unwrap();
        }
        current.insert(Value::from(leaf), value.into());
    }

    /// Removes the value at a dotted path, returning it if present.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (parents, leaf) = path.rsplit_once('.').unwrap_or(("", path));
        if parents.is_empty() {
            return self.root.remove(leaf);
        }

        let mut segments = parents.split('.');
        let mut current = self.root.get_mut(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping_mut()?.get_mut(segment)?;
        }
        current.as_mapping_mut()?.remove(leaf)
    }

    pub fn get_string(&self, path: &str) -> ConfigResult<Option<String>> {
        self.typed(path, "string", |v| v.as_str().map(str::to_string))
    }

    pub fn get_bool(&self, path: &str) -> ConfigResult<Option<bool>> {
        self.typed(path, "boolean", Value::as_bool)
    }

    pub fn get_i64(&self, path: &str) -> ConfigResult<Option<i64>> {
        self.typed(path, "number", Value::as_i64)
    }

    pub fn get_f64(&self, path: &str) -> ConfigResult<Option<f64>> {
        self.typed(path, "number", Value::as_f64)
    }

    pub fn get_string_list(&self, path: &str) -> ConfigResult<Option<Vec<String>>> {
        self.typed(path, "list of strings", |value| {
            value
                .as_sequence()?
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }

    fn typed<T>(
        &self,
        path: &str,
        expected: &'static str,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> ConfigResult<Option<T>> {
        match self.get(path) {
            None => Ok(None),
            Some(value) => convert(value).map(Some).ok_or(ConfigError::WrongType {
                key: path.to_string(),
                expected,
            }),
        }
    }

    /// Writes the document out atomically: serialize, write a sibling temp
    /// file, rename over the target.
    pub fn save(&self) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let body =
            serde_yaml::to_string(&Value::Mapping(self.root.clone())).map_err(|source| {
                ConfigError::Serialize {
                    path: self.path.clone(),
                    source,
                }
            })?;

        let mut text = String::new();
        for line in &self.header {
            text.push_str("# ");
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&body);

        let tmp = self.path.with_extension("yml.tmp");
        fs::write(&tmp, text).map_err(|source| ConfigError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the in-memory state with whatever is on disk.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.root = load_mapping(&self.path)?;
        Ok(())
    }
}

fn load_mapping(path: &Path) -> ConfigResult<Mapping> {
    if !path.exists() {
        return Ok(Mapping::new());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mapping(&text, path)
}

/// Dotted-path lookup over a bare mapping, shared with the defaults overlay.
pub(crate) fn lookup<'a>(mapping: &'a Mapping, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = mapping.get(segments.next()?)?;
    for segment in segments {
        current = current.as_mapping()?.get(segment)?;
    }
    Some(current)
}

pub(crate) fn parse_mapping(text: &str, path: &Path) -> ConfigResult<Mapping> {
    let value: Value = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
