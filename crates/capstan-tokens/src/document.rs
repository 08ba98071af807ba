//! Structured token document loading.
//!
//! A token document is a JSON object whose outer keys are variant names and
//! whose values map token keys to string values:
//!
//! ```json
//! { "en": { "greet": "hi" }, "fr": { "greet": "salut" } }
//! ```
//!
//! The first variant section in the document is additionally folded into the
//! generic tier, mirroring the host's own default-language convention, and
//! every section is then recorded under its variant. "First" means document
//! order — parsing preserves key order so the rule does not depend on map
//! iteration order.

use std::path::Path;

use crate::error::{TokenError, TokenResult};
use crate::store::TokenStore;

impl TokenStore {
    /// Load a token document from an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup, and
    /// [`TokenError::Parse`] for malformed input. Sections that parsed
    /// before the error stay applied; nothing after it is.
    pub fn load_from_str(&self, text: &str) -> TokenResult<()> {
        if !self.is_initialized() {
            return Err(TokenError::Uninitialized);
        }

        let root: serde_json::Value =
            serde_json::from_str(text).map_err(|e| TokenError::parse(e.to_string()))?;
        let Some(sections) = root.as_object() else {
            return Err(TokenError::parse(
                "document root must be an object of variant sections",
            ));
        };

        let mut generics_added = false;
        for (variant, tokens) in sections {
            let Some(tokens) = tokens.as_object() else {
                return Err(TokenError::parse(format!(
                    "variant section {variant:?} must be an object of token strings"
                )));
            };

            let mut entries = Vec::with_capacity(tokens.len());
            for (key, value) in tokens {
                let Some(value) = value.as_str() else {
                    return Err(TokenError::parse(format!(
                        "token {key:?} in variant {variant:?} must be a string"
                    )));
                };
                entries.push((key.clone(), value.to_string()));
            }

            if !generics_added {
                self.extend_generic(entries.iter().cloned())?;
                generics_added = true;
            }
            self.extend_for_variant(entries, variant.as_str())?;
        }
        Ok(())
    }

    /// Load a token document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Io`] if the file cannot be read, otherwise as
    /// [`TokenStore::load_from_str`].
    pub fn load_from_file(&self, path: &Path) -> TokenResult<()> {
        if !self.is_initialized() {
            return Err(TokenError::Uninitialized);
        }
        let text = std::fs::read_to_string(path)?;
        self.load_from_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> TokenStore {
        let store = TokenStore::new();
        assert!(store.initialize());
        store
    }

    #[test]
    fn test_first_variant_seeds_generic_tier() {
        let store = initialized();
        store
            .load_from_str(r#"{"en": {"greet": "hi"}, "fr": {"greet": "salut"}}"#)
            .unwrap();

        assert_eq!(store.resolve("greet", "fr").unwrap(), Some("salut".into()));
        // "de" has no tier: the generic value seeded from "en" answers.
        assert_eq!(store.resolve("greet", "de").unwrap(), Some("hi".into()));
        assert_eq!(store.resolve("greet", "en").unwrap(), Some("hi".into()));
    }

    #[test]
    fn test_first_means_document_order() {
        let store = initialized();
        store
            .load_from_str(r#"{"zz": {"token": "from-zz"}, "aa": {"token": "from-aa"}}"#)
            .unwrap();

        // "zz" comes first in the document even though "aa" sorts first.
        assert_eq!(
            store.resolve("token", "other").unwrap(),
            Some("from-zz".into())
        );
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let store = initialized();
        let result = store.load_from_str("{not json");
        assert!(matches!(result, Err(TokenError::Parse { .. })));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let store = initialized();
        assert!(matches!(
            store.load_from_str("[1, 2, 3]"),
            Err(TokenError::Parse { .. })
        ));
    }

    #[test]
    fn test_error_keeps_earlier_sections() {
        let store = initialized();
        let result = store.load_from_str(
            r#"{"en": {"greet": "hi"}, "fr": {"greet": 42}}"#,
        );
        assert!(matches!(result, Err(TokenError::Parse { .. })));

        // The valid "en" section stays applied; the bad "fr" section does
        // not leak partial state.
        assert_eq!(store.resolve("greet", "en").unwrap(), Some("hi".into()));
        assert_eq!(store.resolve("greet", "de").unwrap(), Some("hi".into()));
        assert_eq!(store.resolve("greet", "fr").unwrap(), Some("hi".into()));
    }

    #[test]
    fn test_uninitialized_store_rejects_documents() {
        let store = TokenStore::new();
        assert!(matches!(
            store.load_from_str("{}"),
            Err(TokenError::Uninitialized)
        ));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let store = initialized();
        store.load_from_str("{}").unwrap();
        assert_eq!(store.resolve("anything", "en").unwrap(), None);
    }
}
