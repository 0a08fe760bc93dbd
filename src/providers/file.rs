//! JSON-document-backed provider.
//!
//! Reads secret entries from a JSON document — the CLI's way of
//! exercising the secrets pipeline without a cloud SDK. Two shapes are
//! accepted: an object mapping names to raw string values,
//!
//! ```json
//! {
//!     "db.password": "hunter2",
//!     "myapp@feature.enabled": "true"
//! }
//! ```
//!
//! or an array of `{name, value}` entries, the shape secret-manager
//! list APIs return:
//!
//! ```json
//! [{"name": "db.password", "value": "hunter2"}]
//! ```
//!
//! Document order is preserved, which matters for the `config` sentinel
//! short-circuit.

use std::path::{Path, PathBuf};

use crate::models::{Namespace, SecretEntry};

use super::{ProviderError, SecretProvider};

/// A provider reading entries from a JSON object document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    name: String,
    namespace: Namespace,
    path: PathBuf,
}

impl JsonFileProvider {
    /// Create a provider reading from `path`.
    pub fn new(name: impl Into<String>, namespace: Namespace, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            namespace,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SecretProvider for JsonFileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Namespace {
        self.namespace
    }

    fn list_entries(&self) -> Result<Vec<SecretEntry>, ProviderError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| ProviderError::ReadDocument {
                path: self.path.clone(),
                source,
            })?;

        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| ProviderError::ParseDocument {
                path: self.path.clone(),
                source,
            })?;

        match document {
            serde_json::Value::Object(object) => {
                let mut entries = Vec::with_capacity(object.len());
                for (name, value) in object {
                    let serde_json::Value::String(raw_value) = value else {
                        return Err(ProviderError::InvalidDocument {
                            path: self.path.clone(),
                        });
                    };
                    entries.push(SecretEntry::new(name, raw_value));
                }
                Ok(entries)
            }
            document @ serde_json::Value::Array(_) => serde_json::from_value(document)
                .map_err(|_| ProviderError::InvalidDocument {
                    path: self.path.clone(),
                }),
            _ => Err(ProviderError::InvalidDocument {
                path: self.path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_doc(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("secrets.json");
        std::fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn reads_entries_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, r#"{"z.last": "1", "a.first": "2"}"#);

        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        let entries = provider.list_entries().unwrap();
        assert_eq!(entries[0], SecretEntry::new("z.last", "1"));
        assert_eq!(entries[1], SecretEntry::new("a.first", "2"));
    }

    #[test]
    fn missing_document_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            JsonFileProvider::new("file", Namespace::Flat, dir.path().join("absent.json"));
        assert!(matches!(
            provider.list_entries(),
            Err(ProviderError::ReadDocument { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "{not json");
        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        assert!(matches!(
            provider.list_entries(),
            Err(ProviderError::ParseDocument { .. })
        ));
    }

    #[test]
    fn array_form_reads_name_value_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            &dir,
            r#"[{"name": "db.password", "value": "hunter2"}, {"name": "config", "value": "{}"}]"#,
        );
        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        let entries = provider.list_entries().unwrap();
        assert_eq!(entries[0], SecretEntry::new("db.password", "hunter2"));
        assert_eq!(entries[1], SecretEntry::new("config", "{}"));
    }

    #[test]
    fn array_of_wrong_shapes_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, r#"["a", "b"]"#);
        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        assert!(matches!(
            provider.list_entries(),
            Err(ProviderError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn scalar_document_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, r#""just a string""#);
        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        assert!(matches!(
            provider.list_entries(),
            Err(ProviderError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn non_string_values_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, r#"{"a": 1}"#);
        let provider = JsonFileProvider::new("file", Namespace::Flat, &path);
        assert!(matches!(
            provider.list_entries(),
            Err(ProviderError::InvalidDocument { .. })
        ));
    }
}
