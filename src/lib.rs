#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(missing_debug_implementations)]

//! Embeds live, imperatively-managed widgets inside a declarative
//! virtual-DOM tree and keeps the two state systems in sync.
//!
//! A virtual-DOM renderer rebuilds its tree on every pass and owns every
//! node in it; a dirty-checking widget framework compiles markup into real
//! nodes once and mutates them in place. `estuary` sits between them. The
//! renderer emits a [`Placeholder`] per embedding point and calls
//! [`Bridge::embed`] on each pass; the bridge reconciles that against its
//! instance registry, pushing changed values into live widgets
//! synchronously and deferring node-touching work (widget creation,
//! cleanup of instances whose nodes disappeared) to the next
//! [`Bridge::frame`] boundary, after the renderer has committed its pass.
//!
//! Values edited inside a widget flow back through an [`EventSink`] into
//! the model, with each instance's last agreed value tracked so a model
//! echoing a change back does not ping-pong between the frameworks. The
//! widget framework itself stays behind the [`WidgetHost`] and
//! [`WidgetScope`] seams; nothing in this crate touches a real document.

mod bridge;
mod convert;
mod descriptor;
mod error;
mod frame;
mod host;
mod propagate;
mod reconcile;
mod registry;
mod sweep;

pub use bridge::{Bridge, BridgeBuilder, FrameOutcome};
pub use convert::{OffsetSource, local_date_to_utc_midnight};
pub use descriptor::{Placeholder, ValueKind};
pub use error::BridgeError;
pub use frame::FrameStamp;
pub use host::{DomProbe, EventSink, Rejection, Watcher, WidgetHost, WidgetScope};
pub use reconcile::{Action, classify};

/// Value type carried across the bridge.
pub use serde_json::Value;
