//! The two-tier token override table.
//!
//! Lookups prefer the variant tier, fall back to the generic tier, and
//! report not-found otherwise. Writes are last-write-wins upserts; setting a
//! key twice is not an error. The store is a cheap cloneable handle: the
//! owning module keeps one, the host keeps one for queries, and any module
//! that imports it gets the write path. A single mutex keeps
//! `set_for_variant` and `resolve` atomic with respect to each other if the
//! host ever calls in from more than one thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{TokenError, TokenResult};

/// Produce a table equal to `base` with every key present in `overrides`
/// replaced by the override value and every key absent from `base` added —
/// overrides always win on conflict. Ordering of untouched keys is not
/// preserved.
#[must_use]
pub fn merge_into(
    base: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[derive(Debug, Default)]
struct StoreInner {
    initialized: bool,
    generic: HashMap<String, String>,
    variants: HashMap<String, HashMap<String, String>>,
    active_variant: Option<String>,
}

/// Cloneable handle to the two-tier token override table.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl TokenStore {
    /// Create an uninitialized store.
    ///
    /// The store stays unusable until the token-overrides module's stage
    /// callback runs; every operation returns
    /// [`TokenError::Uninitialized`] before that.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn locked_initialized(&self) -> TokenResult<MutexGuard<'_, StoreInner>> {
        let inner = self.lock();
        if !inner.initialized {
            return Err(TokenError::Uninitialized);
        }
        Ok(inner)
    }

    /// Whether the owning module has completed its setup stage.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Flip the one-time initialization latch. Returns `false` if the latch
    /// was already set.
    pub(crate) fn initialize(&self) -> bool {
        let mut inner = self.lock();
        if inner.initialized {
            return false;
        }
        inner.initialized = true;
        true
    }

    /// Upsert a token into the generic tier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn set_generic(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> TokenResult<()> {
        let mut inner = self.locked_initialized()?;
        inner.generic.insert(key.into(), value.into());
        Ok(())
    }

    /// Upsert a token into a variant tier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn set_for_variant(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        variant: impl Into<String>,
    ) -> TokenResult<()> {
        let key = key.into();
        let variant = variant.into();
        let mut inner = self.locked_initialized()?;
        let tier = inner.variants.entry(variant.clone()).or_default();
        if tier.contains_key(&key) {
            debug!(key = %key, variant = %variant, "Overriding existing token value");
        }
        tier.insert(key, value.into());
        Ok(())
    }

    /// Bulk upsert into the generic tier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn extend_generic(
        &self,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> TokenResult<()> {
        let mut inner = self.locked_initialized()?;
        for (key, value) in entries {
            inner.generic.insert(key, value);
        }
        Ok(())
    }

    /// Bulk upsert into a variant tier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn extend_for_variant(
        &self,
        entries: impl IntoIterator<Item = (String, String)>,
        variant: impl Into<String>,
    ) -> TokenResult<()> {
        let variant = variant.into();
        let mut inner = self.locked_initialized()?;
        let tier = inner.variants.entry(variant.clone()).or_default();
        for (key, value) in entries {
            if tier.contains_key(&key) {
                debug!(key = %key, variant = %variant, "Overriding existing token value");
            }
            tier.insert(key, value);
        }
        Ok(())
    }

    /// Resolve a token for a variant: variant tier value if present, else
    /// the generic value, else `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn resolve(&self, key: &str, variant: &str) -> TokenResult<Option<String>> {
        let inner = self.locked_initialized()?;
        let value = inner
            .variants
            .get(variant)
            .and_then(|tier| tier.get(key))
            .or_else(|| inner.generic.get(key))
            .cloned();
        Ok(value)
    }

    /// Resolve a token under the host's currently-active variant.
    ///
    /// With no active variant recorded yet, only the generic tier answers.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn resolve_token(&self, key: &str) -> TokenResult<Option<String>> {
        let inner = self.locked_initialized()?;
        let value = inner
            .active_variant
            .as_ref()
            .and_then(|variant| inner.variants.get(variant))
            .and_then(|tier| tier.get(key))
            .or_else(|| inner.generic.get(key))
            .cloned();
        Ok(value)
    }

    /// Record the host's active variant. The host calls this from its
    /// variant-changed notification.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn set_active_variant(&self, variant: impl Into<String>) -> TokenResult<()> {
        let variant = variant.into();
        let mut inner = self.locked_initialized()?;
        debug!(variant = %variant, "Active variant changed");
        inner.active_variant = Some(variant);
        Ok(())
    }

    /// The recorded active variant, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn active_variant(&self) -> TokenResult<Option<String>> {
        Ok(self.locked_initialized()?.active_variant.clone())
    }

    /// Produce the table the host should swap in for a variant: `base` with
    /// the generic tier merged over it, then the variant tier over that.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Uninitialized`] before module setup.
    pub fn apply_overrides(
        &self,
        base: &HashMap<String, String>,
        variant: &str,
    ) -> TokenResult<HashMap<String, String>> {
        let inner = self.locked_initialized()?;
        let mut merged = merge_into(base, &inner.generic);
        if let Some(tier) = inner.variants.get(variant) {
            merged = merge_into(&merged, tier);
        }
        Ok(merged)
    }
}
