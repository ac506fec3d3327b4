use thiserror::Error;

/// Errors produced while building the bridge or creating widget instances.
///
/// Only construction surfaces errors directly to the caller. Failures
/// during a render pass or at a frame boundary are logged and folded into
/// the frame outcome instead; the renderer's pass is never aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The widget framework is not ready to compile widgets.
    #[error("widget framework is not available")]
    HostUnavailable,

    /// No node carrying the identifier was attached to the document when
    /// the deferred creation fired.
    #[error("no placeholder node with id `{0}` is attached to the document")]
    NodeMissing(String),

    /// The identifier matched more than one node, so there is no unique
    /// target to embed into.
    #[error("placeholder id `{id}` matches {count} nodes, expected exactly one")]
    NodeNotUnique {
        /// The ambiguous identifier.
        id: String,
        /// How many nodes carried it.
        count: usize,
    },

    /// The widget framework reported a failure while creating a scope or
    /// compiling markup.
    #[error("widget framework error for `{id}`: {reason}")]
    Host {
        /// Identifier of the embedding the failure belongs to.
        id: String,
        /// The framework's own description of what went wrong.
        reason: String,
    },
}

impl BridgeError {
    /// Wraps a widget-framework failure report for the given embedding.
    pub fn host(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Host {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
