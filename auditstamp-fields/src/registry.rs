//! FieldRegistry — the lookup structure consulted on every save.
//!
//! Registration happens once, single-threaded, while record types are being
//! defined at startup. `FieldRegistryBuilder::build()` then freezes the
//! collected declarations into an immutable `FieldRegistry` that worker
//! threads read concurrently without locking.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::types::{FieldDescriptor, MarkerCategory, OwnerType};

type CategoryTable = HashMap<OwnerType, Vec<FieldDescriptor>>;

/// Collects field registrations during the startup phase.
///
/// ```rust
/// use auditstamp_fields::{FieldRegistry, MarkerCategory};
///
/// # fn main() -> auditstamp_fields::Result<()> {
/// let mut builder = FieldRegistry::builder();
/// builder.register(MarkerCategory::CreatingActor, "Invoice", "created_by")?;
/// builder.register(MarkerCategory::LastActor, "Invoice", "modified_by")?;
/// let registry = builder.build();
///
/// assert!(registry.contains(MarkerCategory::CreatingActor, &"Invoice".into()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FieldRegistryBuilder {
    tables: [CategoryTable; MarkerCategory::ALL.len()],
}

impl FieldRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under a marker category.
    ///
    /// Fields append in call order, so `fields_for` later yields them in the
    /// order they were declared. Registering an identical
    /// (category, owner, field) triple again is a no-op — each declared field
    /// registers once, and a repeated declaration must not produce a
    /// duplicate stamp.
    ///
    /// Empty identifiers are a contract violation by the type-definition
    /// code and fail here, at registration time, not at lookup time.
    pub fn register(
        &mut self,
        category: MarkerCategory,
        owner: impl Into<OwnerType>,
        field: impl Into<String>,
    ) -> Result<()> {
        let owner = owner.into();
        let field = field.into();

        if owner.is_empty() {
            return Err(RegistryError::EmptyOwnerType { field });
        }
        if field.is_empty() {
            return Err(RegistryError::EmptyFieldName {
                owner: owner.to_string(),
            });
        }

        let fields = self.tables[category.index()].entry(owner.clone()).or_default();
        if fields.iter().any(|d| d.field == field) {
            return Ok(());
        }
        fields.push(FieldDescriptor {
            owner,
            field,
            category,
        });
        Ok(())
    }

    /// Freeze the collected registrations into an immutable registry.
    pub fn build(self) -> FieldRegistry {
        let registry = FieldRegistry {
            tables: self.tables,
        };
        debug!(fields = registry.len(), "field registry frozen");
        registry
    }
}

/// Immutable mapping from marker category to the audited fields each owner
/// type declares. Safe to share across threads (`Arc<FieldRegistry>`).
#[derive(Debug)]
pub struct FieldRegistry {
    tables: [CategoryTable; MarkerCategory::ALL.len()],
}

impl FieldRegistry {
    /// Start collecting registrations.
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::new()
    }

    /// True iff `owner` has at least one field registered under `category`.
    ///
    /// Direct map lookup — this runs on every save of every record.
    pub fn contains(&self, category: MarkerCategory, owner: &OwnerType) -> bool {
        self.tables[category.index()].contains_key(owner)
    }

    /// The fields registered for `owner` under `category`, in registration
    /// order. Empty for owners with no registered fields — most record
    /// types legitimately have none, so absence is not an error.
    pub fn fields_for(&self, category: MarkerCategory, owner: &OwnerType) -> &[FieldDescriptor] {
        self.tables[category.index()]
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All registered descriptors, across every category.
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.tables.iter().flat_map(|t| t.values().flatten())
    }

    /// Total number of registered fields.
    pub fn len(&self) -> usize {
        self.tables.iter().map(|t| t.values().map(Vec::len).sum::<usize>()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(HashMap::is_empty)
    }

    /// Serializable summary of everything registered, keyed by category then
    /// owner type. Diagnostics only; stamping goes through `fields_for`.
    pub fn schema(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for category in MarkerCategory::ALL {
            let table = &self.tables[category.index()];
            let mut owners: Vec<&OwnerType> = table.keys().collect();
            owners.sort();

            let mut by_owner = serde_json::Map::new();
            for owner in owners {
                let names: Vec<&str> = table[owner].iter().map(|d| d.field.as_str()).collect();
                by_owner.insert(owner.to_string(), serde_json::json!(names));
            }
            root.insert(category.as_str().to_string(), by_owner.into());
        }
        root.into()
    }
}
