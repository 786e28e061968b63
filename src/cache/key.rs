//! Composite Key Module
//!
//! Cache and task items share one addressing scheme: a content hash plus an
//! optional model identifier, joined into a single composite string.

use std::fmt;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

// == Key Separator ==
/// Reserved separator used when joining key fields into a composite string.
///
/// Fields containing this character are rejected at construction time so that
/// two distinct keys can never produce the same composite.
pub const KEY_SEPARATOR: char = ':';

// == Cache Key ==
/// Composite key addressing one cache/task item.
///
/// Two items with the same `hash` but different `model_id` are distinct
/// entries. The canonical composite form is `hash` or `hash:model_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Content fingerprint of the input
    pub hash: String,
    /// Which computation variant produced/consumes the value
    pub model_id: Option<String>,
}

impl CacheKey {
    // == Constructor ==
    /// Creates a validated key from its fields.
    ///
    /// Rejects empty fields, fields containing the separator, and composites
    /// exceeding [`MAX_KEY_LENGTH`].
    pub fn new(hash: impl Into<String>, model_id: Option<String>) -> Result<Self> {
        let hash = hash.into();
        validate_field("hash", &hash)?;
        if let Some(model) = &model_id {
            validate_field("model_id", model)?;
        }

        let key = Self { hash, model_id };
        if key.composite().len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(key)
    }

    // == Parse ==
    /// Parses a raw composite string back into its fields.
    ///
    /// The socket transport speaks raw composites, so `hash:model` round-trips
    /// through here. At most one separator is honored.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(2, KEY_SEPARATOR);
        let hash = parts.next().unwrap_or_default().to_string();
        let model_id = parts.next().map(str::to_string);
        Self::new(hash, model_id)
    }

    // == Composite ==
    /// Returns the canonical composite string for this key.
    pub fn composite(&self) -> String {
        match &self.model_id {
            Some(model) => format!("{}{}{}", self.hash, KEY_SEPARATOR, model),
            None => self.hash.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.composite())
    }
}

// == Field Validation ==
fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CacheError::InvalidRequest(format!(
            "Field '{}' cannot be empty",
            name
        )));
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(CacheError::InvalidRequest(format!(
            "Field '{}' must not contain '{}'",
            name, KEY_SEPARATOR
        )));
    }
    Ok(())
}
