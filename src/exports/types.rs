//! Validated identifiers and operation results.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::storage::StoredExport;

/// Number of digits in an export id.
pub const EXPORT_ID_LEN: usize = 12;

/// Smallest generated export id.
pub const MIN_GENERATED_ID: u64 = 100_000_000_000;

/// Largest generated export id.
pub const MAX_GENERATED_ID: u64 = 999_999_999_999;

/// A 12-digit export identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportId(String);

impl ExportId {
    /// Validate a caller-supplied id.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidArgument`] unless the id is exactly
    /// twelve ASCII digits.
    pub fn parse(id: &str) -> Result<Self, ExportError> {
        if id.len() == EXPORT_ID_LEN && id.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(id.to_string()))
        } else {
            Err(ExportError::invalid("ID must be a 12-digit number"))
        }
    }

    /// Draw a uniformly random id in `100000000000..=999999999999`.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw an id from the given random source.
    #[must_use]
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(MIN_GENERATED_ID..=MAX_GENERATED_ID).to_string())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A positive player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerUserId(i64);

impl PlayerUserId {
    /// Validate a player id.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidArgument`] if the id is not positive.
    pub fn new(id: i64) -> Result<Self, ExportError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(ExportError::invalid("Invalid player_user_id"))
        }
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// An export annotated with its expiry state at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportView {
    /// The export as stored (or as it was before eviction).
    #[serde(flatten)]
    pub export: StoredExport,
    /// Whether the export had outlived its TTL.
    pub is_expired: bool,
}

impl ExportView {
    /// Annotate an export with its expiry state.
    #[must_use]
    pub const fn new(export: StoredExport, is_expired: bool) -> Self {
        Self { export, is_expired }
    }
}

/// Result of importing (reading and consuming) an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedExport {
    /// Export id.
    pub id: String,
    /// The stored payload.
    pub serialized_data: String,
    /// Whether the export had expired; if so it no longer exists.
    pub is_expired: bool,
}
