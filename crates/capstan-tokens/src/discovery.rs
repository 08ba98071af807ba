//! Token document discovery.
//!
//! Documents live anywhere under a plugin-asset directory and are found by
//! their fixed extension. A malformed document is skipped with a warning; it
//! must not take the rest of the scan down with it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{TokenError, TokenResult};
use crate::store::TokenStore;

/// File extension of token documents.
pub const TOKEN_DOCUMENT_EXTENSION: &str = "tokens";

/// Recursively collect token documents under `root`.
///
/// Results are sorted by path so repeated scans load in the same order.
#[must_use]
pub fn scan_token_documents(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let Ok(entry) = entry else { continue };
        if entry.file_type().is_dir() {
            continue;
        }
        let is_document = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == TOKEN_DOCUMENT_EXTENSION);
        if is_document {
            found.push(entry.into_path());
        }
    }
    found.sort();
    found
}

/// Load every token document under `root` into the store.
///
/// Returns how many documents loaded. Per-document parse and I/O failures
/// are logged and skipped.
///
/// # Errors
///
/// Returns [`TokenError::Uninitialized`] if the store has not been set up —
/// that is a caller bug, not a property of any one document.
pub fn load_documents_from_dir(store: &TokenStore, root: &Path) -> TokenResult<usize> {
    let mut loaded = 0;
    for path in scan_token_documents(root) {
        match store.load_from_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Loaded token document");
                loaded += 1;
            },
            Err(TokenError::Uninitialized) => return Err(TokenError::Uninitialized),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping token document");
            },
        }
    }
    Ok(loaded)
}
