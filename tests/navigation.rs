use std::cell::Cell;
use std::rc::Rc;

use chrono::Duration;
use pushkind_mealplan::services::navigation::{
    GuardState, HistoryEvent, ManualClock, NavigationDecision, NavigationGuard,
    RecordingHistory, UnsavedChangesRegistry,
};

mod common;

use common::{init_logging, now};

#[test]
fn two_views_share_one_registry() {
    init_logging();
    let registry = UnsavedChangesRegistry::new();
    let editor_dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&editor_dirty);

    let _list = registry.register("recipe-list", || false);
    let editor = registry.register("recipe-editor", move || flag.get());
    assert!(registry.has_any_unsaved_changes());

    drop(editor);
    assert!(!registry.has_any_unsaved_changes());
    assert!(registry.is_registered("recipe-list"));
}

#[test]
fn browser_back_is_confirmed_once() {
    init_logging();
    let clock = Rc::new(ManualClock::new(now()));
    let registry = UnsavedChangesRegistry::new()
        .with_clock(clock.clone())
        .with_bypass_timeout(Duration::milliseconds(500));
    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    let _registration = registry.register("plan-editor", move || flag.get());
    let mut guard = NavigationGuard::new(
        registry.clone(),
        "plan-editor",
        RecordingHistory::default(),
    );

    dirty.set(true);
    guard.sync_dirty_state();
    assert!(guard.handle_before_unload());

    assert_eq!(guard.handle_pop_state(), NavigationDecision::Intercepted);
    assert!(guard.show_leave_dialog());

    let reset = Rc::clone(&dirty);
    assert!(guard.confirm_leave(move || reset.set(false)));
    assert!(!guard.show_leave_dialog());
    assert!(!guard.handle_before_unload());

    // Popstate caused by the replayed back step.
    dirty.set(true);
    clock.advance(Duration::milliseconds(50));
    assert_eq!(guard.handle_pop_state(), NavigationDecision::Proceed);
    assert_eq!(guard.state(), GuardState::Navigating);
    assert_eq!(
        guard.history().events,
        vec![HistoryEvent::Sentinel, HistoryEvent::Back]
    );

    clock.advance(Duration::milliseconds(500));
    assert!(guard.handle_before_unload());
}

#[test]
fn cancelled_back_keeps_user_on_page() {
    let registry = UnsavedChangesRegistry::new();
    let _registration = registry.register("settings", || true);
    let mut guard = NavigationGuard::new(registry, "settings", RecordingHistory::default());
    guard.sync_dirty_state();

    guard.handle_pop_state();
    guard.cancel_leave();
    assert_eq!(guard.state(), GuardState::Dirty);

    // The re-armed sentinel catches the next back as well.
    assert_eq!(guard.handle_pop_state(), NavigationDecision::Intercepted);
    assert_eq!(guard.history().count(&HistoryEvent::Sentinel), 2);
    assert_eq!(guard.history().count(&HistoryEvent::Back), 0);
}
