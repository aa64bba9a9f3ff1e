//! Engine configuration.

use std::collections::BTreeSet;

/// Fields every record carries that only the engine may change.
pub const SYSTEM_FIELDS: [&str; 2] = ["id", "version"];

/// Root fields protected when no override is configured.
pub const DEFAULT_PROTECTED_FIELDS: [&str; 5] =
    ["id", "version", "created_at", "updated_at", "password_hash"];

/// Root field names that no operation may target.
///
/// The system fields in [`SYSTEM_FIELDS`] are always members, whatever set a
/// deployment configures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedFields {
    fields: BTreeSet<String>,
}

impl ProtectedFields {
    /// Creates a protected set from `fields` plus the system fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = SYSTEM_FIELDS.iter().map(|f| (*f).to_string()).collect();
        set.extend(fields.into_iter().map(Into::into));
        Self { fields: set }
    }

    /// Adds a protected field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    /// Returns true if `field` is protected.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }
}

impl Default for ProtectedFields {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_FIELDS)
    }
}

/// Configuration for the transaction applier.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Root fields that operations may not target.
    pub protected_fields: ProtectedFields,
}

impl EngineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the protected field policy.
    #[must_use]
    pub fn with_protected_fields(mut self, protected_fields: ProtectedFields) -> Self {
        self.protected_fields = protected_fields;
        self
    }
}
