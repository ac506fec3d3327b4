//! The bridge itself: synchronous embedding calls, the frame boundary,
//! and the deferred creation sequence between them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use time::UtcOffset;
use tracing::{debug, error};

use crate::convert::OffsetSource;
use crate::descriptor::Placeholder;
use crate::error::BridgeError;
use crate::frame::{FrameQueue, FrameStamp};
use crate::host::{EventSink, WidgetHost, WidgetScope};
use crate::propagate;
use crate::reconcile::{self, Action};
use crate::registry::{InstanceRecord, Registry};
use crate::sweep::Sweeper;

/// Summary of the work performed at one frame boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Widgets created this frame.
    pub created: usize,
    /// Stale instances released by the sweep.
    pub released: usize,
    /// Creations abandoned after a failed node lookup or a host error.
    pub abandoned: usize,
}

impl FrameOutcome {
    /// Whether the frame performed no work at all.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        self.created == 0 && self.released == 0 && self.abandoned == 0
    }
}

/// Builder for [`Bridge`] instances.
pub struct BridgeBuilder<H: WidgetHost> {
    host: H,
    sink: Rc<dyn EventSink>,
    offsets: Rc<dyn OffsetSource>,
}

impl<H: WidgetHost> BridgeBuilder<H> {
    /// Starts a builder over the widget framework and the model's event
    /// channel. The offset source defaults to UTC.
    pub fn new(host: H, sink: impl EventSink + 'static) -> Self {
        Self {
            host,
            sink: Rc::new(sink),
            offsets: Rc::new(UtcOffset::UTC),
        }
    }

    /// Replaces the UTC-offset source consulted for date-valued slots.
    #[must_use]
    pub fn with_offsets(mut self, offsets: impl OffsetSource + 'static) -> Self {
        self.offsets = Rc::new(offsets);
        self
    }

    /// Consumes the builder and produces a [`Bridge`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::HostUnavailable`] when the widget framework
    /// reports it is not ready to compile widgets.
    pub fn build(self) -> Result<Bridge<H>, BridgeError> {
        if !self.host.is_ready() {
            return Err(BridgeError::HostUnavailable);
        }
        Ok(Bridge {
            host: self.host,
            sink: self.sink,
            offsets: self.offsets,
            registry: Rc::new(RefCell::new(Registry::new())),
            queue: FrameQueue::new(),
            sweeper: Sweeper::new(),
        })
    }
}

impl<H: WidgetHost> fmt::Debug for BridgeBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder").finish_non_exhaustive()
    }
}

/// Embeds live widget-framework instances at placeholder nodes owned by a
/// virtual-DOM renderer and keeps both sides' state in sync.
///
/// The renderer calls [`embed`](Self::embed) for every placeholder on
/// every render pass; the host calls [`frame`](Self::frame) from its paint
/// callback. Everything in between is bookkeeping the bridge owns.
pub struct Bridge<H: WidgetHost> {
    host: H,
    sink: Rc<dyn EventSink>,
    offsets: Rc<dyn OffsetSource>,
    registry: Rc<RefCell<Registry<H::Scope>>>,
    queue: FrameQueue,
    sweeper: Sweeper,
}

impl<H: WidgetHost> Bridge<H> {
    /// Reconciles one placeholder against the live state.
    ///
    /// Called by the renderer once per placeholder per render pass, while
    /// the pass is still in flight. The placeholder's real node may not be
    /// attached yet, so widget creation and cleanup are deferred to the
    /// next [`frame`](Self::frame) boundary; only value pushes into
    /// already-live widgets happen synchronously. `node` is the renderer's
    /// own handle and is returned untouched: the bridge mutates the
    /// document out of band, never the virtual tree.
    pub fn embed<N>(&mut self, node: N, placeholder: &Placeholder) -> N {
        self.queue.request_sweep();

        let has_record = self.registry.borrow().contains(placeholder.id());
        let node_exists = self.host.node_exists(placeholder.id());
        match reconcile::classify(has_record, node_exists) {
            Some(Action::Update) => {
                if propagate::push(&self.registry, placeholder) {
                    debug!(id = placeholder.id(), "pushed model value into widget");
                }
            }
            Some(Action::Create) => {
                debug!(id = placeholder.id(), "scheduling widget creation");
                self.queue.schedule_creation(placeholder.clone());
            }
            Some(Action::Recover) => {
                debug!(
                    id = placeholder.id(),
                    "releasing stale instance before re-embedding"
                );
                self.release(placeholder.id());
                self.queue.schedule_creation(placeholder.clone());
            }
            None => {
                error!(
                    id = placeholder.id(),
                    "placeholder node exists without a registry entry"
                );
            }
        }
        node
    }

    /// Runs the deferred work for one paint frame.
    ///
    /// Sweeps instances whose nodes left the document, then performs the
    /// queued creations. A creation that fails is logged, counted and
    /// dropped; the next render pass schedules it afresh if the
    /// placeholder is still there.
    pub fn frame(&mut self, stamp: FrameStamp) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        if self.queue.take_sweep_requests() > 0 {
            let mut registry = self.registry.borrow_mut();
            outcome.released = self.sweeper.sweep(stamp, &mut registry, &self.host);
        }

        for placeholder in self.queue.take_creations() {
            match self.create(&placeholder) {
                Ok(true) => outcome.created += 1,
                Ok(false) => {}
                Err(err) => {
                    error!(id = placeholder.id(), %err, "abandoning widget creation");
                    outcome.abandoned += 1;
                }
            }
        }
        outcome
    }

    /// Number of live instances.
    #[must_use]
    pub fn instances(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Whether an instance record exists for `id`.
    #[must_use]
    pub fn has_instance(&self, id: &str) -> bool {
        self.registry.borrow().contains(id)
    }

    /// Whether no deferred work is waiting for the next frame.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }

    /// The widget framework this bridge drives.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the widget framework.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // Performs one deferred creation. Ok(false) means the entry was
    // superseded between scheduling and the frame boundary.
    fn create(&mut self, placeholder: &Placeholder) -> Result<bool, BridgeError> {
        let id = placeholder.id();

        // The schedule can be stale by the time the frame fires; trust the
        // registry and the document, not the queue.
        if self.registry.borrow().contains(id) {
            debug!(id, "skipping creation, instance already live");
            return Ok(false);
        }
        match self.host.node_count(id) {
            1 => {}
            0 => return Err(BridgeError::NodeMissing(id.to_owned())),
            count => {
                return Err(BridgeError::NodeNotUnique {
                    id: id.to_owned(),
                    count,
                });
            }
        }

        let scope = self.host.create_scope(id)?;
        if let Some(key) = placeholder.binding_key() {
            scope.write(key, placeholder.value().clone());
        }
        if let Err(err) = self.host.compile(id, placeholder.markup(), &scope) {
            scope.destroy();
            return Err(err);
        }

        self.registry.borrow_mut().put(InstanceRecord::new(
            id,
            scope.clone(),
            placeholder.binding_key().map(ToOwned::to_owned),
            placeholder.value().clone(),
        ));
        if let Some(key) = placeholder.binding_key() {
            scope.watch(
                key,
                propagate::watcher(
                    id.to_owned(),
                    placeholder.value_kind(),
                    Rc::downgrade(&self.registry),
                    Rc::clone(&self.sink),
                    Rc::clone(&self.offsets),
                ),
            );
        }
        // One digest so the framework's dirty-check baseline matches the
        // initial value. The first genuine widget change then reports a
        // correct previous value instead of echoing the initial write.
        scope.digest();
        debug!(id, "widget created and linked");
        Ok(true)
    }

    // Destroys and forgets the record for `id`, if one exists.
    fn release(&mut self, id: &str) {
        if let Some(record) = self.registry.borrow_mut().remove(id) {
            record.into_scope().destroy();
        }
    }
}

impl<H: WidgetHost> fmt::Debug for Bridge<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("instances", &self.registry.borrow().len())
            .field("idle", &self.queue.is_idle())
            .finish_non_exhaustive()
    }
}
