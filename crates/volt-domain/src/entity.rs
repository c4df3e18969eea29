//! Entity module - canonical companies produced by deduplication

use serde::{Serialize, Serializer};
use std::fmt;

/// A raw company-name string as produced by the mention extractor
///
/// Order of mentions matters: the deduplicator clusters greedily left to right.
pub type Mention = String;

/// Unique identifier for a canonical entity based on UUIDv7
///
/// Identifiers are opaque and only stable within a single run. UUIDv7 keeps
/// them sortable by creation time, which mirrors first-appearance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u128);

impl EntityId {
    /// Generate a new UUIDv7-based EntityId
    ///
    /// # Examples
    ///
    /// ```
    /// use volt_domain::EntityId;
    ///
    /// let id = EntityId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntityId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntityId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid entity id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Case-insensitive name equality using full Unicode lowercasing
///
/// Every layer that de-duplicates names (aliases, key people, competitors)
/// compares through this function.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// The deduplicated, single logical company behind one or more mentions
///
/// Invariants:
/// - `canonical_name` is non-empty
/// - `aliases` are distinct from `canonical_name` and from each other,
///   compared case-insensitively
///
/// Aliases are only accumulated during deduplication; afterwards the entity
/// is read-only. Use [`CanonicalEntity::add_alias`] to keep the invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEntity {
    /// Opaque identifier, stable within a run
    pub id: EntityId,

    /// Representative mention (original casing)
    pub canonical_name: String,

    /// Other mentions that clustered to this entity, in first-seen order
    pub aliases: Vec<String>,
}

impl CanonicalEntity {
    /// Create an entity with no aliases
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            canonical_name: canonical_name.into(),
            aliases: Vec::new(),
        }
    }

    /// Whether `name` equals the canonical name or an alias (case-insensitive)
    pub fn knows(&self, name: &str) -> bool {
        same_name(&self.canonical_name, name) || self.aliases.iter().any(|a| same_name(a, name))
    }

    /// Add an alias unless it is blank or already known
    ///
    /// Returns `true` if the alias was added.
    pub fn add_alias(&mut self, alias: impl Into<String>) -> bool {
        let alias = alias.into();
        let alias = alias.trim();
        if alias.is_empty() || self.knows(alias) {
            return false;
        }
        self.aliases.push(alias.to_string());
        true
    }

    /// Replace the canonical name, demoting the previous one to an alias
    ///
    /// The new name is removed from the alias list if it was there.
    pub fn promote(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.aliases.retain(|a| !same_name(a, &name));
        let previous = std::mem::replace(&mut self.canonical_name, name);
        if !same_name(&previous, &self.canonical_name) {
            self.aliases.insert(0, previous);
        }
    }

    /// All names of this entity, canonical first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
