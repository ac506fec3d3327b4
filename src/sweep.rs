//! Once-per-frame release of instances whose nodes left the document.

use tracing::debug;

use crate::frame::FrameStamp;
use crate::host::{DomProbe, WidgetScope};
use crate::registry::Registry;

/// Walks the registry at the frame boundary and releases stale entries.
///
/// Every embedding call requests a sweep, so a render pass over many
/// placeholders piles up many requests for the same frame. The stamp guard
/// collapses them: the registry is scanned at most once per frame.
#[derive(Debug, Default)]
pub struct Sweeper {
    last_run: Option<FrameStamp>,
}

impl Sweeper {
    /// Creates a sweeper that has not run yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_run: None }
    }

    /// Releases every record whose backing node is no longer attached.
    ///
    /// Returns the number of records released. A sweep already performed
    /// for `stamp` is a no-op and returns zero without scanning.
    pub fn sweep<S: WidgetScope>(
        &mut self,
        stamp: FrameStamp,
        registry: &mut Registry<S>,
        probe: &dyn DomProbe,
    ) -> usize {
        if self.last_run == Some(stamp) {
            return 0;
        }
        self.last_run = Some(stamp);

        let mut released = 0;
        for id in registry.ids() {
            if probe.node_exists(&id) {
                continue;
            }
            if let Some(record) = registry.remove(&id) {
                record.into_scope().destroy();
                debug!(%id, "released instance whose node left the document");
                released += 1;
            }
        }
        released
    }
}
