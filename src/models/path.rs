//! Key paths: dotted or segmented identifiers locating a node in the
//! configuration tree.

use std::fmt;

/// Separator between segments in the dotted string form.
pub const SEPARATOR: char = '.';

/// An ordered sequence of key segments addressing a node in a
/// configuration tree. The empty path addresses the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path, addressing the whole tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from explicit segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when this path addresses the tree root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The implicit environment variable name for this path: segments
    /// joined with `_`, upper-cased. `db.username` → `DB_USERNAME`.
    pub fn env_var_name(&self) -> String {
        self.segments.join("_").to_uppercase()
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            segments: path.split(SEPARATOR).map(str::to_string).collect(),
        }
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&String> for KeyPath {
    fn from(path: &String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_string_splits_into_segments() {
        let path = KeyPath::from("db.username");
        assert_eq!(path.segments(), &["db".to_string(), "username".to_string()]);
    }

    #[test]
    fn empty_string_is_root() {
        assert!(KeyPath::from("").is_root());
        assert!(KeyPath::root().is_root());
    }

    #[test]
    fn segments_round_trip_through_display() {
        let path = KeyPath::from_segments(["server", "session", "engine"]);
        assert_eq!(path.to_string(), "server.session.engine");
    }

    #[test]
    fn env_var_name_joins_and_uppercases() {
        assert_eq!(KeyPath::from("db.username").env_var_name(), "DB_USERNAME");
        assert_eq!(
            KeyPath::from("server.session.engine").env_var_name(),
            "SERVER_SESSION_ENGINE"
        );
        assert_eq!(KeyPath::root().env_var_name(), "");
    }
}
