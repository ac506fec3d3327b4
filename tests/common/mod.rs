//! In-memory stand-in for a dirty-checking widget framework.
//!
//! Scopes hold slots and watchers; `digest` compares each watched slot
//! against the value it saw on the previous pass, firing the watcher on a
//! difference. The framework tracks nodes as bare id counts and logs every
//! scope creation, compile and destroy so tests can assert on them.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use estuary::{
    BridgeError, DomProbe, EventSink, Placeholder, Rejection, Value, Watcher, WidgetHost,
    WidgetScope,
};

struct Watch {
    key: String,
    baseline: Option<Value>,
    watcher: Watcher,
}

#[derive(Default)]
struct ScopeState {
    slots: HashMap<String, Value>,
    watches: Vec<Watch>,
    digests: usize,
    destroyed: bool,
}

/// Shared handle to one fake scope. Clones alias the same state.
#[derive(Clone)]
pub struct FakeScope {
    state: Rc<RefCell<ScopeState>>,
    destroys: Rc<Cell<usize>>,
}

impl FakeScope {
    fn new(destroys: Rc<Cell<usize>>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScopeState::default())),
            destroys,
        }
    }

    pub fn slot(&self, key: &str) -> Option<Value> {
        self.read(key)
    }

    pub fn digests(&self) -> usize {
        self.state.borrow().digests
    }

    pub fn watch_count(&self) -> usize {
        self.state.borrow().watches.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }
}

impl WidgetScope for FakeScope {
    fn read(&self, key: &str) -> Option<Value> {
        self.state.borrow().slots.get(key).cloned()
    }

    fn write(&self, key: &str, value: Value) {
        let mut state = self.state.borrow_mut();
        assert!(!state.destroyed, "write into a destroyed scope");
        state.slots.insert(key.to_owned(), value);
    }

    fn watch(&self, key: &str, watcher: Watcher) {
        self.state.borrow_mut().watches.push(Watch {
            key: key.to_owned(),
            baseline: None,
            watcher,
        });
    }

    fn digest(&self) {
        // Take the watch list so a firing watcher can re-enter the scope.
        let mut watches = {
            let mut state = self.state.borrow_mut();
            assert!(!state.destroyed, "digest on a destroyed scope");
            state.digests += 1;
            std::mem::take(&mut state.watches)
        };
        for watch in &mut watches {
            let current = self
                .state
                .borrow()
                .slots
                .get(&watch.key)
                .cloned()
                .unwrap_or(Value::Null);
            match watch.baseline.replace(current.clone()) {
                Some(previous) if previous != current => (watch.watcher)(&current, &previous),
                // The first pass after watch() records the baseline quietly.
                _ => {}
            }
        }
        let mut state = self.state.borrow_mut();
        watches.append(&mut state.watches);
        state.watches = watches;
    }

    fn destroy(&self) {
        {
            let mut state = self.state.borrow_mut();
            assert!(!state.destroyed, "scope destroyed twice");
            state.destroyed = true;
            state.watches.clear();
        }
        self.destroys.set(self.destroys.get() + 1);
    }
}

#[derive(Default)]
struct FrameworkState {
    nodes: HashMap<String, usize>,
    ready: bool,
    scopes: Vec<(String, FakeScope)>,
    compiled: Vec<(String, String)>,
    probes: usize,
    fail_compile: Option<String>,
}

/// Handle to the fake framework. Clones share state, so a test keeps one
/// handle while the bridge owns another.
#[derive(Clone)]
pub struct FakeFramework {
    state: Rc<RefCell<FrameworkState>>,
    destroys: Rc<Cell<usize>>,
}

impl FakeFramework {
    pub fn new() -> Self {
        let framework = Self::offline();
        framework.state.borrow_mut().ready = true;
        framework
    }

    pub fn offline() -> Self {
        Self {
            state: Rc::new(RefCell::new(FrameworkState::default())),
            destroys: Rc::new(Cell::new(0)),
        }
    }

    /// Attaches one more node carrying `id` to the fake document.
    pub fn add_node(&self, id: &str) {
        *self
            .state
            .borrow_mut()
            .nodes
            .entry(id.to_owned())
            .or_insert(0) += 1;
    }

    /// Detaches one node carrying `id`.
    pub fn remove_node(&self, id: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(count) = state.nodes.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                state.nodes.remove(id);
            }
        }
    }

    /// The most recently created scope for `id`.
    pub fn scope(&self, id: &str) -> FakeScope {
        self.state
            .borrow()
            .scopes
            .iter()
            .rev()
            .find(|(scope_id, _)| scope_id == id)
            .map(|(_, scope)| scope.clone())
            .expect("no scope was created for the id")
    }

    pub fn scopes_created(&self) -> usize {
        self.state.borrow().scopes.len()
    }

    pub fn compiled(&self) -> Vec<(String, String)> {
        self.state.borrow().compiled.clone()
    }

    pub fn destroyed(&self) -> usize {
        self.destroys.get()
    }

    /// Number of document lookups since the last reset.
    pub fn probes(&self) -> usize {
        self.state.borrow().probes
    }

    pub fn reset_probes(&self) {
        self.state.borrow_mut().probes = 0;
    }

    /// Makes the next compile of `id` fail the way a bad directive would.
    pub fn fail_compile_for(&self, id: &str) {
        self.state.borrow_mut().fail_compile = Some(id.to_owned());
    }
}

impl DomProbe for FakeFramework {
    fn node_count(&self, id: &str) -> usize {
        let mut state = self.state.borrow_mut();
        state.probes += 1;
        state.nodes.get(id).copied().unwrap_or(0)
    }
}

impl WidgetHost for FakeFramework {
    type Scope = FakeScope;

    fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    fn create_scope(&self, id: &str) -> Result<Self::Scope, BridgeError> {
        let scope = FakeScope::new(Rc::clone(&self.destroys));
        self.state
            .borrow_mut()
            .scopes
            .push((id.to_owned(), scope.clone()));
        Ok(scope)
    }

    fn compile(&self, id: &str, markup: &str, _scope: &Self::Scope) -> Result<(), BridgeError> {
        let mut state = self.state.borrow_mut();
        if state.fail_compile.as_deref() == Some(id) {
            return Err(BridgeError::host(id, "directive compilation failed"));
        }
        state.compiled.push((id.to_owned(), markup.to_owned()));
        Ok(())
    }
}

/// Sink capturing every value forwarded out of the widgets.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.borrow().clone()
    }
}

impl EventSink for RecordingSink {
    fn accept(&self, id: &str, value: Value) -> Result<(), Rejection> {
        self.events.borrow_mut().push((id.to_owned(), value));
        Ok(())
    }
}

/// Sink refusing every value, counting the attempts.
#[derive(Clone, Default)]
pub struct RejectingSink {
    attempts: Rc<Cell<usize>>,
}

impl RejectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl EventSink for RejectingSink {
    fn accept(&self, _id: &str, _value: Value) -> Result<(), Rejection> {
        self.attempts.set(self.attempts.get() + 1);
        Err(Rejection::new("model decoder refused the value"))
    }
}

/// A text-input descriptor bound to the `val` slot.
pub fn text_input(id: &str, value: Value) -> Placeholder {
    Placeholder::new(id, "<input data-model=\"val\">")
        .bind("val")
        .with_value(value)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
