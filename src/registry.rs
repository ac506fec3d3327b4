//! Lifecycle bookkeeping for live embedded widgets.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// One live embedding: the scope driving the widget plus the last value
/// known to both sides of the bridge.
///
/// `last_value` is the suppression baseline for inbound pushes. The watcher
/// updates it when the widget changes; the push path only reads it.
pub struct InstanceRecord<S> {
    id: String,
    scope: S,
    binding_key: Option<String>,
    last_value: Value,
}

impl<S> InstanceRecord<S> {
    /// Creates a record for a freshly compiled widget.
    pub fn new(
        id: impl Into<String>,
        scope: S,
        binding_key: Option<String>,
        last_value: Value,
    ) -> Self {
        Self {
            id: id.into(),
            scope,
            binding_key,
            last_value,
        }
    }

    /// Identifier shared with the placeholder node.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The scope handle driving this widget.
    #[must_use]
    pub const fn scope(&self) -> &S {
        &self.scope
    }

    /// The watched slot name, or `None` for markup-only embeddings.
    #[must_use]
    pub fn binding_key(&self) -> Option<&str> {
        self.binding_key.as_deref()
    }

    /// The last value both sides agreed on.
    #[must_use]
    pub const fn last_value(&self) -> &Value {
        &self.last_value
    }

    /// Records a new agreed value after the widget reported a change.
    pub fn set_last_value(&mut self, value: Value) {
        self.last_value = value;
    }

    /// Consumes the record, yielding the scope for teardown.
    pub fn into_scope(self) -> S {
        self.scope
    }
}

impl<S> fmt::Debug for InstanceRecord<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRecord")
            .field("id", &self.id)
            .field("binding_key", &self.binding_key)
            .field("last_value", &self.last_value)
            .finish_non_exhaustive()
    }
}

/// Registry of live instances, keyed by embedding identifier.
///
/// Purely passive storage: reconciliation decides when entries appear and
/// the sweeper decides when they go.
#[derive(Default)]
pub struct Registry<S> {
    records: HashMap<String, InstanceRecord<S>>,
}

impl<S> Registry<S> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Looks up the record for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&InstanceRecord<S>> {
        self.records.get(id)
    }

    /// Mutable lookup, used by watchers to refresh `last_value`.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut InstanceRecord<S>> {
        self.records.get_mut(id)
    }

    /// Whether a record exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Inserts a record, returning any record it displaced.
    pub fn put(&mut self, record: InstanceRecord<S>) -> Option<InstanceRecord<S>> {
        self.records.insert(record.id.clone(), record)
    }

    /// Removes and returns the record for `id`.
    pub fn remove(&mut self, id: &str) -> Option<InstanceRecord<S>> {
        self.records.remove(id)
    }

    /// Snapshot of every registered identifier.
    ///
    /// Taken before sweeps so entries can be removed mid-iteration.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no widgets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.records.len())
            .finish_non_exhaustive()
    }
}
