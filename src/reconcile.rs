//! Decides what an embedding call must do for one placeholder.

/// Work selected for a placeholder on one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The widget is already live: push the model's value if it changed.
    Update,
    /// First embedding of this identifier: defer widget creation to the
    /// next frame boundary, when the renderer has committed the node.
    Create,
    /// A record survived while its node was torn down externally: release
    /// the stale record now, then proceed as for [`Action::Create`].
    Recover,
}

/// Applies the reconciliation decision table.
///
/// | record | node | outcome            |
/// |--------|------|--------------------|
/// | yes    | yes  | [`Action::Update`]  |
/// | no     | no   | [`Action::Create`]  |
/// | yes    | no   | [`Action::Recover`] |
/// | no     | yes  | `None`              |
///
/// `None` is the one invalid cell: a node carrying the identifier with no
/// record behind it means the two frameworks disagree about who owns the
/// node. Callers report it and leave both the document and the registry
/// untouched.
#[must_use]
pub const fn classify(has_record: bool, node_exists: bool) -> Option<Action> {
    match (has_record, node_exists) {
        (true, true) => Some(Action::Update),
        (false, false) => Some(Action::Create),
        (true, false) => Some(Action::Recover),
        (false, true) => None,
    }
}
