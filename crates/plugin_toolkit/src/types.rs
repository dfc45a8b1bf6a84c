//! Shared identity types used across the toolkit.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::KeyError;

// ============================================================================
// Player Identity
// ============================================================================

/// Unique identifier for a player known to the host server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID handed out by the host.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Namespaced Keys
// ============================================================================

/// A validated `namespace:key` resource identifier.
///
/// The charset matches what the host accepts for resource locations:
/// lowercase alphanumerics plus `.`, `_` and `-` in both halves, with `/`
/// additionally allowed in the key half.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespacedKey {
    namespace: String,
    key: String,
}

impl NamespacedKey {
    /// Builds a key under the given namespace, validating both halves.
    pub fn new(namespace: &str, key: &str) -> Result<Self, KeyError> {
        if namespace.is_empty() || key.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(ch) = namespace.chars().find(|c| !is_namespace_char(*c)) {
            return Err(KeyError::InvalidNamespace {
                namespace: namespace.to_string(),
                ch,
            });
        }
        if let Some(ch) = key.chars().find(|c| !is_key_char(*c)) {
            return Err(KeyError::InvalidKey {
                key: key.to_string(),
                ch,
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
    }

    /// Builds a key under the host's own `minecraft` namespace.
    pub fn minecraft(key: &str) -> Result<Self, KeyError> {
        Self::new("minecraft", key)
    }

    /// Parses `namespace:key`. Strings without a colon land in the
    /// `minecraft` namespace, mirroring how the host resolves bare keys.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        match input.split_once(':') {
            Some((namespace, key)) => Self::new(namespace, key),
            None => Self::minecraft(input),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
}

fn is_key_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

impl FromStr for NamespacedKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NamespacedKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NamespacedKey> for String {
    fn from(value: NamespacedKey) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Versions
// ============================================================================

/// A plugin or server version of the `major.minor.patch[-tag]` form.
///
/// Parsing is deliberately lenient because plugin builds in the wild are
/// loosely stamped: missing segments and segments that fail to parse count
/// as zero, so `"1.2"` reads as `1.2.0` and `"1.0.x"` as `1.0.0`.
///
/// Ordering compares `major`, `minor` and `patch` in turn; a tagged build
/// sorts before the untagged release it points at (`1.4.0-dev < 1.4.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub tag: Option<String>,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            tag: None,
        }
    }

    /// Parses a version string, never failing.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (numbers, tag) = match input.split_once('-') {
            Some((numbers, tag)) if !tag.is_empty() => (numbers, Some(tag.to_string())),
            Some((numbers, _)) => (numbers, None),
            None => (input, None),
        };
        let mut segments = numbers.split('.');
        let mut next = || {
            segments
                .next()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        Self {
            major: next(),
            minor: next(),
            patch: next(),
            tag,
        }
    }

    /// Whether this is a `-dev` stamped build. Dev builds are excluded from
    /// update notifications.
    pub fn is_dev_build(&self) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case("dev"))
    }

    /// Whether this version is at or above the given one. The usual gate for
    /// features that only exist past a certain host release.
    pub fn at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        *self >= Self::new(major, minor, patch)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.tag, &other.tag) {
                (None, None) => Ordering::Equal,
                // A tagged build precedes the release it was cut from.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.tag {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Title Timing
// ============================================================================

/// Fade-in, stay and fade-out timing for a title, in client ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleTimes {
    pub fade_in: u32,
    pub stay: u32,
    pub fade_out: u32,
}

impl Default for TitleTimes {
    fn default() -> Self {
        Self {
            fade_in: 20,
            stay: 60,
            fade_out: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_round_trip() {
        let id = PlayerId::new();
        let parsed: PlayerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_namespaced_key_validation() {
        let key = NamespacedKey::new("toolkit", "menu/main").unwrap();
        assert_eq!(key.to_string(), "toolkit:menu/main");

        assert!(NamespacedKey::new("Toolkit", "menu").is_err());
        assert!(NamespacedKey::new("toolkit", "Menu").is_err());
        assert!(NamespacedKey::new("", "menu").is_err());
        // Slashes only belong in the key half.
        assert!(NamespacedKey::new("tool/kit", "menu").is_err());
    }

    #[test]
    fn test_namespaced_key_parse_defaults_namespace() {
        let key = NamespacedKey::parse("stone").unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.key(), "stone");

        let key = NamespacedKey::parse("toolkit:panel").unwrap();
        assert_eq!(key.namespace(), "toolkit");
    }

    #[test]
    fn test_namespaced_key_serde_as_string() {
        let key = NamespacedKey::minecraft("white_stained_glass_pane").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"minecraft:white_stained_glass_pane\"");

        let back: NamespacedKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_version_lenient_parse() {
        assert_eq!(Version::parse("1.2.3"), Version::new(1, 2, 3));
        assert_eq!(Version::parse("1.2"), Version::new(1, 2, 0));
        assert_eq!(Version::parse("1"), Version::new(1, 0, 0));
        assert_eq!(Version::parse("1.0.x"), Version::new(1, 0, 0));
        assert_eq!(Version::parse(" 2.5.1 "), Version::new(2, 5, 1));
    }

    #[test]
    fn test_version_tag_parse() {
        let v = Version::parse("1.0.10-dev");
        assert_eq!((v.major, v.minor, v.patch), (1, 0, 10));
        assert!(v.is_dev_build());
        assert!(Version::parse("1.0.10-DEV").is_dev_build());
        assert!(!Version::parse("1.0.10-rc1").is_dev_build());
        assert!(!Version::parse("1.0.10").is_dev_build());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::parse("1.2.0") > Version::parse("0.9.9"));
        assert!(Version::parse("1.10.0") > Version::parse("1.9.9"));
        assert!(Version::parse("2.0.0") > Version::parse("1.99.99"));
        assert_eq!(Version::parse("1.2"), Version::new(1, 2, 0));
        // Tagged builds come before the release they were cut from.
        assert!(Version::parse("1.4.0-dev") < Version::parse("1.4.0"));
    }

    #[test]
    fn test_version_at_least() {
        let server = Version::parse("1.21.0");
        assert!(server.at_least(1, 20, 5));
        assert!(server.at_least(1, 21, 0));
        assert!(!server.at_least(1, 21, 1));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::parse("1.2.3").to_string(), "1.2.3");
        assert_eq!(Version::parse("1.0.10-dev").to_string(), "1.0.10-dev");
    }

    #[test]
    fn test_title_times_defaults() {
        let times = TitleTimes::default();
        assert_eq!((times.fade_in, times.stay, times.fade_out), (20, 60, 10));
    }
}
