//! Unsaved-changes guard for editing views.
//!
//! Views register an "is dirty" predicate in an [`UnsavedChangesRegistry`]
//! and drive a [`NavigationGuard`] from their navigation, unload and history
//! events. Everything here runs on the UI thread, so shared state lives in
//! `Rc<RefCell<_>>` rather than behind locks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Duration, Utc};

/// Default lifetime of the bypass flag set by a confirmed navigation.
pub const DEFAULT_BYPASS_TIMEOUT_MS: u64 = 500;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Converts a millisecond count into a bypass window, saturating on overflow.
pub fn bypass_timeout_from_millis(ms: u64) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

type DirtyPredicate = Rc<dyn Fn() -> bool>;

struct RegistryEntry {
    generation: u64,
    predicate: DirtyPredicate,
}

#[derive(Default)]
struct RegistryInner {
    entries: HashMap<String, RegistryEntry>,
    next_generation: u64,
    bypass_until: Option<DateTime<Utc>>,
}

/// Shared map from view identifier to its "is dirty" predicate.
///
/// Clones share the same entries and bypass flag.
#[derive(Clone)]
pub struct UnsavedChangesRegistry {
    inner: Rc<RefCell<RegistryInner>>,
    clock: Rc<dyn Clock>,
    bypass_timeout: Duration,
}

impl Default for UnsavedChangesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnsavedChangesRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::default(),
            clock: Rc::new(SystemClock),
            bypass_timeout: bypass_timeout_from_millis(DEFAULT_BYPASS_TIMEOUT_MS),
        }
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_bypass_timeout(mut self, timeout: Duration) -> Self {
        self.bypass_timeout = timeout;
        self
    }

    /// Registers `predicate` under `key`, replacing any previous entry.
    ///
    /// The entry lives until the returned [`Registration`] is dropped.
    #[must_use = "dropping the registration unregisters the view immediately"]
    pub fn register<F>(&self, key: impl Into<String>, predicate: F) -> Registration
    where
        F: Fn() -> bool + 'static,
    {
        let key = key.into();
        let mut inner = self.inner.borrow_mut();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        if inner
            .entries
            .insert(
                key.clone(),
                RegistryEntry {
                    generation,
                    predicate: Rc::new(predicate),
                },
            )
            .is_some()
        {
            log::debug!("Replaced unsaved-changes predicate for view {key}");
        }

        Registration {
            registry: Rc::downgrade(&self.inner),
            key,
            generation,
        }
    }

    /// Removes the entry for `key` regardless of which handle created it.
    pub fn unregister(&self, key: &str) -> bool {
        self.inner.borrow_mut().entries.remove(key).is_some()
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Evaluates the predicate of `key`; unknown keys are clean.
    ///
    /// The bypass flag is not consulted.
    pub fn has_unsaved_changes(&self, key: &str) -> bool {
        let predicate = self
            .inner
            .borrow()
            .entries
            .get(key)
            .map(|entry| Rc::clone(&entry.predicate));
        predicate.is_some_and(|predicate| predicate())
    }

    /// Returns `true` when any registered view is dirty and no bypass is active.
    pub fn has_any_unsaved_changes(&self) -> bool {
        if self.is_bypass_active() {
            return false;
        }
        // Predicates may read the registry, so evaluate them outside the borrow.
        let predicates: Vec<DirtyPredicate> = self
            .inner
            .borrow()
            .entries
            .values()
            .map(|entry| Rc::clone(&entry.predicate))
            .collect();
        predicates.iter().any(|predicate| predicate())
    }

    /// Suspends interception for the configured bypass window.
    pub fn activate_bypass(&self) {
        let until = self
            .clock
            .now()
            .checked_add_signed(self.bypass_timeout)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.inner.borrow_mut().bypass_until = Some(until);
        log::debug!("Navigation bypass active until {until}");
    }

    pub fn is_bypass_active(&self) -> bool {
        let now = self.clock.now();
        self.inner
            .borrow()
            .bypass_until
            .is_some_and(|until| now < until)
    }

    pub fn clear_bypass(&self) {
        self.inner.borrow_mut().bypass_until = None;
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

/// Scoped registration returned by [`UnsavedChangesRegistry::register`].
pub struct Registration {
    registry: Weak<RefCell<RegistryInner>>,
    key: String,
    generation: u64,
}

impl Registration {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.borrow_mut();
        if inner
            .entries
            .get(&self.key)
            .is_some_and(|entry| entry.generation == self.generation)
        {
            inner.entries.remove(&self.key);
        }
    }
}

/// Browser history operations used by the guard.
pub trait HistoryDriver {
    /// In-app navigation to `target`.
    fn push(&mut self, target: &str);
    /// One step back in the session history.
    fn back(&mut self);
    /// Pushes a history entry that a back action lands on first.
    fn push_sentinel(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Push(String),
    Back,
    Sentinel,
}

/// [`HistoryDriver`] that records every call. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    pub events: Vec<HistoryEvent>,
}

impl RecordingHistory {
    pub fn count(&self, event: &HistoryEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl HistoryDriver for RecordingHistory {
    fn push(&mut self, target: &str) {
        self.events.push(HistoryEvent::Push(target.to_string()));
    }

    fn back(&mut self) {
        self.events.push(HistoryEvent::Back);
    }

    fn push_sentinel(&mut self) {
        self.events.push(HistoryEvent::Sentinel);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Clean,
    Dirty,
    ConfirmPending,
    Navigating,
}

impl Display for GuardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::ConfirmPending => "confirm-pending",
            Self::Navigating => "navigating",
        };
        write!(f, "{name}")
    }
}

/// Navigation deferred until the user answers the leave dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingNavigation {
    Push(String),
    Back,
}

/// Whether the caller may carry out the navigation it asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Intercepted,
}

/// Leave-confirmation state machine for one editing view.
///
/// `Clean -> Dirty` when the view's predicate turns true, `Dirty ->
/// ConfirmPending` when a navigation is intercepted, then `Navigating` on
/// confirm or back to `Dirty` on cancel. `Navigating` lasts until the bypass
/// window closes.
pub struct NavigationGuard<H> {
    registry: UnsavedChangesRegistry,
    view_key: String,
    history: H,
    state: GuardState,
    pending: Option<PendingNavigation>,
    sentinel_armed: bool,
}

impl<H: HistoryDriver> NavigationGuard<H> {
    pub fn new(registry: UnsavedChangesRegistry, view_key: impl Into<String>, history: H) -> Self {
        Self {
            registry,
            view_key: view_key.into(),
            history,
            state: GuardState::Clean,
            pending: None,
            sentinel_armed: false,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Whether the leave dialog should be visible.
    pub fn show_leave_dialog(&self) -> bool {
        self.state == GuardState::ConfirmPending
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn registry(&self) -> &UnsavedChangesRegistry {
        &self.registry
    }

    fn is_dirty(&self) -> bool {
        self.registry.has_unsaved_changes(&self.view_key)
    }

    fn transition(&mut self, next: GuardState) {
        if self.state != next {
            log::debug!("Guard for {}: {} -> {next}", self.view_key, self.state);
            self.state = next;
        }
    }

    fn arm_sentinel(&mut self) {
        if !self.sentinel_armed {
            self.history.push_sentinel();
            self.sentinel_armed = true;
        }
    }

    /// Re-reads the view's predicate. Call after every edit.
    ///
    /// The first time the view becomes dirty a sentinel history entry is
    /// pushed so that a browser back lands on it.
    pub fn sync_dirty_state(&mut self) {
        match self.state {
            GuardState::ConfirmPending => return,
            GuardState::Navigating if self.registry.is_bypass_active() => return,
            _ => {}
        }
        self.resync();
    }

    fn resync(&mut self) {
        if self.is_dirty() {
            self.transition(GuardState::Dirty);
            self.arm_sentinel();
        } else {
            self.transition(GuardState::Clean);
        }
    }

    /// Leaves `Navigating` once the bypass window has closed.
    fn refresh_expired_navigating(&mut self) {
        if self.state == GuardState::Navigating && !self.registry.is_bypass_active() {
            log::debug!("Bypass expired for {} before the view left", self.view_key);
            self.resync();
        }
    }

    /// Checks an in-app navigation to `target` before it happens.
    pub fn handle_navigation(&mut self, target: impl Into<String>) -> NavigationDecision {
        self.refresh_expired_navigating();
        if self.state == GuardState::Navigating
            || self.registry.is_bypass_active()
            || !self.is_dirty()
        {
            return NavigationDecision::Proceed;
        }
        let target = target.into();
        log::debug!("Intercepted navigation from {} to {target}", self.view_key);
        self.pending = Some(PendingNavigation::Push(target));
        self.transition(GuardState::ConfirmPending);
        NavigationDecision::Intercepted
    }

    /// Returns `true` when the browser should ask before unloading the page.
    pub fn handle_before_unload(&self) -> bool {
        self.registry.has_any_unsaved_changes()
    }

    /// Handles a browser back/forward event.
    ///
    /// The event has already consumed the sentinel entry. A dirty view keeps
    /// the user on the page and asks for confirmation; the real back step is
    /// replayed by [`confirm_leave`](Self::confirm_leave).
    pub fn handle_pop_state(&mut self) -> NavigationDecision {
        self.refresh_expired_navigating();
        self.sentinel_armed = false;
        if self.state == GuardState::Navigating || self.registry.is_bypass_active() {
            return NavigationDecision::Proceed;
        }
        if self.state == GuardState::ConfirmPending {
            return NavigationDecision::Intercepted;
        }
        if !self.is_dirty() {
            self.transition(GuardState::Clean);
            return NavigationDecision::Proceed;
        }
        log::debug!("Intercepted history back from {}", self.view_key);
        self.pending = Some(PendingNavigation::Back);
        self.transition(GuardState::ConfirmPending);
        NavigationDecision::Intercepted
    }

    /// Accepts the leave dialog.
    ///
    /// Closes the dialog, runs `cleanup`, activates the registry bypass and
    /// then performs the deferred navigation. Returns `false` when nothing
    /// was pending.
    pub fn confirm_leave(&mut self, cleanup: impl FnOnce()) -> bool {
        self.refresh_expired_navigating();
        let Some(pending) = self.pending.take() else {
            log::debug!("Leave confirmed for {} with no pending navigation", self.view_key);
            self.sync_dirty_state();
            return false;
        };
        self.transition(GuardState::Navigating);
        cleanup();
        self.registry.activate_bypass();
        match pending {
            PendingNavigation::Push(target) => self.history.push(&target),
            PendingNavigation::Back => self.history.back(),
        }
        true
    }

    /// Dismisses the leave dialog and stays on the page.
    ///
    /// A still-dirty view gets its sentinel back if a history event consumed
    /// it while the dialog was open.
    pub fn cancel_leave(&mut self) {
        self.pending = None;
        self.resync();
    }
}
