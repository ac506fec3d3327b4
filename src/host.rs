//! Trait seams for the two frameworks on either side of the bridge.
//!
//! The bridge never touches a real document or a real scope type. Hosts
//! implement these traits over whatever widget framework they embed, and
//! tests implement them over plain in-memory state.

use std::fmt;

use serde_json::Value;

use crate::error::BridgeError;

/// Answers whether a node carrying a given identifier is attached to the
/// document right now.
pub trait DomProbe {
    /// Number of attached nodes whose id attribute equals `id`.
    fn node_count(&self, id: &str) -> usize;

    /// Whether at least one node carries `id`.
    fn node_exists(&self, id: &str) -> bool {
        self.node_count(id) != 0
    }
}

/// Callback installed on a watched scope slot.
///
/// Invoked by the widget framework's digest cycle with the slot's new value
/// and the value observed on the previous pass.
pub type Watcher = Box<dyn FnMut(&Value, &Value)>;

/// Clonable handle to one state container inside the widget framework.
///
/// Clones alias the same underlying scope, the way framework scope objects
/// are shared by reference. [`digest`](Self::digest) runs one dirty-check
/// pass: every watched slot is compared against the value recorded on the
/// previous pass and its watcher fires on a difference. The first pass
/// after [`watch`](Self::watch) only records the baseline and fires
/// nothing.
pub trait WidgetScope: Clone {
    /// Reads a slot, or `None` if it was never written.
    fn read(&self, key: &str) -> Option<Value>;

    /// Writes a slot without triggering a dirty-check pass.
    fn write(&self, key: &str, value: Value);

    /// Installs `watcher` on `key` for every subsequent digest pass.
    fn watch(&self, key: &str, watcher: Watcher);

    /// Runs one dirty-check pass over this scope's watched slots.
    fn digest(&self);

    /// Tears the scope down, releasing its watchers and framework state.
    /// Must not call back into the bridge.
    fn destroy(&self);
}

/// The imperative widget framework the bridge drives.
pub trait WidgetHost: DomProbe {
    /// Scope handles this framework hands out.
    type Scope: WidgetScope + 'static;

    /// Whether the framework is loaded and able to compile widgets.
    fn is_ready(&self) -> bool;

    /// Creates a fresh child scope for the embedding `id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the framework cannot allocate a scope.
    fn create_scope(&self, id: &str) -> Result<Self::Scope, BridgeError>;

    /// Compiles `markup` into the node carrying `id` and links the result
    /// against `scope`. Existing children of the node are removed first;
    /// after a successful compile the widget subtree is the node's only
    /// content.
    ///
    /// # Errors
    ///
    /// Returns an error when the framework rejects the markup or the node.
    fn compile(&self, id: &str, markup: &str, scope: &Self::Scope) -> Result<(), BridgeError>;
}

/// A value the model's event channel refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: String,
}

impl Rejection {
    /// Creates a rejection with the channel's own description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The channel's description of why the value was refused.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for Rejection {}

/// Receives values flowing out of embedded widgets into the model.
///
/// A rejected value is logged by the bridge and dropped; it does not
/// disturb the instance's recorded state.
pub trait EventSink {
    /// Accepts one outbound value for the embedding `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the model cannot decode the value.
    fn accept(&self, id: &str, value: Value) -> Result<(), Rejection>;
}
