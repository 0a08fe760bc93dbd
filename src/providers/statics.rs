//! In-memory provider: the embedding hook and test double.

use crate::models::{Namespace, SecretEntry};

use super::{ProviderError, SecretProvider};

/// A provider backed by a fixed, in-memory entry list.
///
/// Useful for embedding applications that already hold their secrets,
/// and for exercising the secrets pipeline in tests.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    namespace: Namespace,
    entries: Vec<SecretEntry>,
}

impl StaticProvider {
    /// Create an empty provider with the given settings name and style.
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            entries: Vec::new(),
        }
    }

    /// Append one entry, builder-style.
    pub fn with_entry(mut self, name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        self.entries.push(SecretEntry::new(name, raw_value));
        self
    }
}

impl SecretProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Namespace {
        self.namespace
    }

    fn list_entries(&self) -> Result<Vec<SecretEntry>, ProviderError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_come_back_in_insertion_order() {
        let provider = StaticProvider::new("statics", Namespace::Flat)
            .with_entry("b", "2")
            .with_entry("a", "1");
        let entries = provider.list_entries().unwrap();
        assert_eq!(entries[0].name, "b");
        assert_eq!(entries[1].name, "a");
    }
}
