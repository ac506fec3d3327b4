//! Change propagation between a widget's scope and the model.
//!
//! Values move in two directions through one shared baseline. The watcher
//! records what the widget last reported before forwarding it out; the
//! push path writes into the scope only when the model's value differs
//! from that baseline. A model change therefore produces one digest, one
//! watcher firing and one outbound event, after which both sides agree
//! again and the next identical push is suppressed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{error, trace};

use crate::convert::{self, OffsetSource};
use crate::descriptor::{Placeholder, ValueKind};
use crate::host::{EventSink, Watcher, WidgetScope};
use crate::registry::Registry;

/// Builds the watcher installed on a widget's bound slot.
///
/// On every digest pass where the slot changed, the watcher converts the
/// value for the model's domain, records it as the instance's last agreed
/// value, and forwards it into the model's event channel. A record that
/// disappeared mid-digest is tolerated; a rejected forward is logged with
/// the embedding identifier and dropped.
pub(crate) fn watcher<S: WidgetScope + 'static>(
    id: String,
    kind: ValueKind,
    registry: Weak<RefCell<Registry<S>>>,
    sink: Rc<dyn EventSink>,
    offsets: Rc<dyn OffsetSource>,
) -> Watcher {
    Box::new(move |value: &Value, _previous: &Value| {
        let converted = convert::outbound(kind, value.clone(), offsets.as_ref());
        if let Some(registry) = registry.upgrade() {
            if let Some(record) = registry.borrow_mut().get_mut(&id) {
                record.set_last_value(converted.clone());
            }
        }
        if let Err(rejection) = sink.accept(&id, converted) {
            error!(%id, %rejection, "model rejected value from embedded widget");
        }
    })
}

/// Pushes the model's current value into a live instance.
///
/// A value structurally equal to the instance's last agreed value is not
/// written: the scope already holds it, and writing would only burn a
/// digest pass echoing it back out. Returns whether a write happened.
pub(crate) fn push<S: WidgetScope>(
    registry: &RefCell<Registry<S>>,
    placeholder: &Placeholder,
) -> bool {
    // Copy the handle out and drop the borrow first: the digest below
    // fires watchers that re-enter the registry.
    let (scope, key) = {
        let records = registry.borrow();
        let Some(record) = records.get(placeholder.id()) else {
            return false;
        };
        let Some(key) = record.binding_key() else {
            return false;
        };
        if record.last_value() == placeholder.value() {
            trace!(id = placeholder.id(), "push suppressed, value unchanged");
            return false;
        }
        (record.scope().clone(), key.to_owned())
    };

    scope.write(&key, placeholder.value().clone());
    scope.digest();
    true
}
