//! Token override store for the Capstan orchestrator.
//!
//! A capability module that lets other modules override the text tokens the
//! host resolves at display time. Overrides live in two tiers: a generic
//! tier that applies everywhere, and per-variant tiers (e.g. one per display
//! language) that win over the generic tier for their variant.
//!
//! - [`TokenStore`]: The two-tier override table and its query surface
//! - [`merge_into`]: The last-write-wins merge used when the host swaps in
//!   overrides
//! - [`scan_token_documents`]: Recursive discovery of `.tokens` documents in
//!   a plugin-asset directory
//! - [`descriptor`]: The module descriptor wiring the store into the
//!   orchestrator's stage sequence
//!
//! Every public store operation is rejected with
//! [`TokenError::Uninitialized`] until the module's own stage callback has
//! run — callers must not observe a partially-initialized store.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod discovery;
pub mod document;
pub mod error;
pub mod module;
pub mod store;

pub use discovery::{TOKEN_DOCUMENT_EXTENSION, load_documents_from_dir, scan_token_documents};
pub use error::{TokenError, TokenResult};
pub use module::{descriptor, module_id};
pub use store::{TokenStore, merge_into};
