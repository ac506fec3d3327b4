//! Descriptors emitted by the renderer for each embedding point.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a bound value is interpreted when it crosses between frameworks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Forwarded as-is.
    #[default]
    Plain,
    /// A millisecond timestamp in the embedder's local time. Outbound
    /// values are normalized to midnight UTC of the same calendar date.
    Date,
}

/// Describes one embedding point for a single render pass.
///
/// The renderer produces a fresh descriptor every pass; nothing in it is
/// retained across passes except what the bridge copies into its own
/// records. The identifier doubles as the id attribute of the placeholder
/// node the renderer commits to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    id: String,
    markup: String,
    #[serde(default)]
    binding_key: Option<String>,
    #[serde(default)]
    value_kind: ValueKind,
    #[serde(default)]
    value: Value,
}

impl Placeholder {
    /// Creates a markup-only descriptor with no bound value.
    pub fn new(id: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            markup: markup.into(),
            binding_key: None,
            value_kind: ValueKind::default(),
            value: Value::Null,
        }
    }

    /// Names the scope slot the widget reads and writes.
    #[must_use]
    pub fn bind(mut self, key: impl Into<String>) -> Self {
        self.binding_key = Some(key.into());
        self
    }

    /// Sets the model's current value for the bound slot.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Sets how the bound value is interpreted at the boundary.
    #[must_use]
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = kind;
        self
    }

    /// Identifier shared by the placeholder node and the instance record.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Markup the widget framework compiles into the placeholder node.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// The bound slot name, or `None` for markup-only embeddings.
    #[must_use]
    pub fn binding_key(&self) -> Option<&str> {
        self.binding_key.as_deref()
    }

    /// Interpretation of the bound value.
    #[must_use]
    pub const fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// The model's value for this pass.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}
