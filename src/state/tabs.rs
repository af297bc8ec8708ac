//! Tab and pane lifecycle plus the addressed pane mutators.
//!
//! The store is the single owner of all tab/pane state. UI-facing callers
//! mutate it through discrete operations; each observable change emits one
//! scoped event through the [`Notifier`]. Caller misuse (closing the last
//! tab, addressing a missing pane) is a silent no-op, never an error.

use serde::{Deserialize, Serialize};

use crate::state::notify::{ChangeEvent, Notifier};
use crate::state::pane::{Pane, SortSpec, ViewMode};

/// Opaque tab identifier, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(u64);

/// Opaque pane identifier, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(u64);

impl TabId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl PaneId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// A collection of one or more panes (split view) with one active pane.
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    panes: Vec<Pane>,
    active_pane: Option<PaneId>,
    /// Split percentage for 2-pane layouts, `None` for a single pane.
    pub split: Option<f32>,
}

impl Tab {
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.active_pane
    }

    pub fn pane(&self, pane_id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == pane_id)
    }

    fn pane_mut(&mut self, pane_id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == pane_id)
    }

    fn first_pane_id(&self) -> Option<PaneId> {
        self.panes.first().map(|p| p.id)
    }
}

/// The tab/pane state machine.
pub struct TabStore {
    tabs: Vec<Tab>,
    active_tab: Option<TabId>,
    next_id: u64,
    history_limit: usize,
    default_view_mode: ViewMode,
    notifier: Notifier,
}

impl TabStore {
    pub fn new(notifier: Notifier, history_limit: usize, default_view_mode: ViewMode) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab: None,
            next_id: 0,
            history_limit,
            default_view_mode,
            notifier,
        }
    }

    fn next_tab_id(&mut self) -> TabId {
        self.next_id += 1;
        TabId(self.next_id)
    }

    fn next_pane_id(&mut self) -> PaneId {
        self.next_id += 1;
        PaneId(self.next_id)
    }

    // ── Tab lifecycle ────────────────────────────────────────────────────

    /// Create a tab with one pane seeded at `path` and make it active.
    pub fn create_tab(&mut self, path: &str) -> TabId {
        let tab_id = self.next_tab_id();
        let pane_id = self.next_pane_id();
        let pane = Pane::new(pane_id, path, self.default_view_mode, self.history_limit);
        self.tabs.push(Tab {
            id: tab_id,
            panes: vec![pane],
            active_pane: Some(pane_id),
            split: None,
        });
        self.active_tab = Some(tab_id);
        self.notifier.emit(ChangeEvent::Tabs);
        tab_id
    }

    /// Close a tab. No-op when it is the last remaining tab; when the closed
    /// tab was active, activation falls to the first remaining tab.
    pub fn close_tab(&mut self, tab_id: TabId) {
        if self.tabs.len() <= 1 {
            return;
        }
        let Some(pos) = self.tabs.iter().position(|t| t.id == tab_id) else {
            return;
        };
        self.tabs.remove(pos);
        if self.active_tab == Some(tab_id) {
            self.active_tab = self.tabs.first().map(|t| t.id);
        }
        self.notifier.emit(ChangeEvent::Tabs);
    }

    /// Make a tab active; if it has no active pane, its first pane becomes
    /// active.
    pub fn activate_tab(&mut self, tab_id: TabId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.active_pane.is_none() {
            tab.active_pane = tab.first_pane_id();
        }
        self.active_tab = Some(tab_id);
        self.notifier.emit(ChangeEvent::Tabs);
    }

    /// Make a pane active within its tab. Already-active panes are a no-op
    /// with no notification, so downstream consumers don't recompute.
    pub fn activate_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.active_pane == Some(pane_id) {
            return;
        }
        if tab.pane(pane_id).is_none() {
            return;
        }
        tab.active_pane = Some(pane_id);
        self.notifier.emit(ChangeEvent::Tab(tab_id));
    }

    /// Append a new pane to a tab and make it active.
    pub fn create_pane(&mut self, tab_id: TabId, path: &str) -> Option<PaneId> {
        if self.tab(tab_id).is_none() {
            return None;
        }
        let pane_id = self.next_pane_id();
        let pane = Pane::new(pane_id, path, self.default_view_mode, self.history_limit);
        let tab = self.tab_mut(tab_id).expect("tab existence checked above");
        tab.panes.push(pane);
        tab.active_pane = Some(pane_id);
        self.notifier.emit(ChangeEvent::Tab(tab_id));
        Some(pane_id)
    }

    /// Remove a pane. The last pane of a tab is guarded the same way as the
    /// last tab: closing it is a no-op, so a tab never becomes unusable. If
    /// the closed pane was active, activation falls to the first remaining
    /// pane.
    pub fn close_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.panes.len() <= 1 {
            return;
        }
        let Some(pos) = tab.panes.iter().position(|p| p.id == pane_id) else {
            return;
        };
        tab.panes.remove(pos);
        if tab.active_pane == Some(pane_id) {
            tab.active_pane = tab.first_pane_id();
        }
        if tab.panes.len() < 2 {
            tab.split = None;
        }
        self.notifier.emit(ChangeEvent::Tab(tab_id));
    }

    /// Set the split percentage of a 2-pane tab.
    pub fn set_split(&mut self, tab_id: TabId, percentage: f32) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.panes.len() < 2 {
            return;
        }
        tab.split = Some(percentage.clamp(0.0, 100.0));
        self.notifier.emit(ChangeEvent::Tab(tab_id));
    }

    // ── Getters ──────────────────────────────────────────────────────────

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.active_tab
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn pane(&self, tab_id: TabId, pane_id: PaneId) -> Option<&Pane> {
        self.tab(tab_id).and_then(|t| t.pane(pane_id))
    }

    // ── Addressed pane mutators ──────────────────────────────────────────

    fn with_pane(
        &mut self,
        tab_id: TabId,
        pane_id: PaneId,
        mutate: impl FnOnce(&mut Pane) -> bool,
    ) {
        let Some(pane) = self.tab_mut(tab_id).and_then(|t| t.pane_mut(pane_id)) else {
            return;
        };
        if mutate(pane) {
            self.notifier.emit(ChangeEvent::Pane(tab_id, pane_id));
        }
    }

    /// Canonical path-change entry point for a pane.
    pub fn navigate(&mut self, tab_id: TabId, pane_id: PaneId, path: &str) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.navigate(path);
            true
        });
    }

    /// Step a pane back in its history; no-op at the oldest entry.
    pub fn navigate_back(&mut self, tab_id: TabId, pane_id: PaneId) {
        self.with_pane(tab_id, pane_id, |pane| pane.navigate_back());
    }

    /// Step a pane forward in its history; no-op at the newest entry.
    pub fn navigate_forward(&mut self, tab_id: TabId, pane_id: PaneId) {
        self.with_pane(tab_id, pane_id, |pane| pane.navigate_forward());
    }

    /// Replace a pane's selection wholesale.
    pub fn set_selected<I, S>(&mut self, tab_id: TabId, pane_id: PaneId, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.set_selected(paths);
            true
        });
    }

    /// Plain left-click selection.
    pub fn select_click(&mut self, tab_id: TabId, pane_id: PaneId, path: &str) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.select_click(path);
            true
        });
    }

    /// Ctrl/cmd-click selection toggle.
    pub fn select_ctrl_click(&mut self, tab_id: TabId, pane_id: PaneId, path: &str) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.select_ctrl_click(path);
            true
        });
    }

    /// Right-click selection (preserves an existing multi-selection).
    pub fn select_context_click(&mut self, tab_id: TabId, pane_id: PaneId, path: &str) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.select_context_click(path);
            true
        });
    }

    pub fn set_sorting(&mut self, tab_id: TabId, pane_id: PaneId, sorting: Vec<SortSpec>) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.sorting = sorting;
            true
        });
    }

    pub fn set_view_mode(&mut self, tab_id: TabId, pane_id: PaneId, mode: ViewMode) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.view_mode = mode;
            true
        });
    }

    /// Set or clear a pane's transient status line.
    pub fn set_status(&mut self, tab_id: TabId, pane_id: PaneId, message: Option<String>) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.set_status(message);
            true
        });
    }

    /// Bump a pane's refresh key (explicit cache-bust signal).
    pub fn refresh(&mut self, tab_id: TabId, pane_id: PaneId) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.refresh();
            true
        });
    }

    pub(crate) fn apply_contents(
        &mut self,
        tab_id: TabId,
        pane_id: PaneId,
        contents: crate::fs::service::DirectoryContents,
    ) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.apply_contents(contents);
            true
        });
    }

    pub(crate) fn prune_selected(&mut self, tab_id: TabId, pane_id: PaneId, gone: &[String]) {
        self.with_pane(tab_id, pane_id, |pane| {
            pane.prune_selected(gone);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::notify::Scope;

    fn store() -> TabStore {
        TabStore::new(Notifier::new(), 100, ViewMode::List)
    }

    fn store_with_tab() -> (TabStore, TabId, PaneId) {
        let mut s = store();
        let tab = s.create_tab("/start");
        let pane = s.tab(tab).unwrap().active_pane().unwrap();
        (s, tab, pane)
    }

    #[test]
    fn create_tab_seeds_one_active_pane() {
        let (s, tab, pane) = store_with_tab();
        assert_eq!(s.active_tab(), Some(tab));
        let t = s.tab(tab).unwrap();
        assert_eq!(t.panes().len(), 1);
        assert_eq!(t.active_pane(), Some(pane));
        let p = s.pane(tab, pane).unwrap();
        assert_eq!(p.path(), "/start");
        assert_eq!(p.history().entries(), ["/start"]);
        assert_eq!(p.view_mode, ViewMode::List);
    }

    #[test]
    fn close_last_tab_is_noop() {
        let (mut s, tab, _) = store_with_tab();
        s.close_tab(tab);
        assert_eq!(s.tabs().len(), 1);
        assert_eq!(s.active_tab(), Some(tab));
    }

    #[test]
    fn close_active_tab_activates_first_remaining() {
        let (mut s, first, _) = store_with_tab();
        let second = s.create_tab("/other");
        assert_eq!(s.active_tab(), Some(second));
        s.close_tab(second);
        assert_eq!(s.active_tab(), Some(first));
        assert_eq!(s.tabs().len(), 1);
    }

    #[test]
    fn close_inactive_tab_keeps_active() {
        let (mut s, first, _) = store_with_tab();
        let second = s.create_tab("/other");
        s.close_tab(first);
        assert_eq!(s.active_tab(), Some(second));
    }

    #[test]
    fn activate_tab_with_no_active_pane_picks_first() {
        let (mut s, tab, pane) = store_with_tab();
        // Force the dangling case directly.
        s.tab_mut(tab).unwrap().active_pane = None;
        s.activate_tab(tab);
        assert_eq!(s.tab(tab).unwrap().active_pane(), Some(pane));
    }

    #[test]
    fn activate_pane_already_active_emits_nothing() {
        let (mut s, tab, pane) = store_with_tab();
        let mut rx = s.notifier.subscribe(Scope::Tab(tab));
        s.activate_pane(tab, pane);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn activate_unknown_pane_is_noop() {
        let (mut s, tab, pane) = store_with_tab();
        s.activate_pane(tab, PaneId::from_raw(9999));
        assert_eq!(s.tab(tab).unwrap().active_pane(), Some(pane));
    }

    #[test]
    fn create_pane_appends_and_activates() {
        let (mut s, tab, first) = store_with_tab();
        let second = s.create_pane(tab, "/split").unwrap();
        let t = s.tab(tab).unwrap();
        assert_eq!(t.panes().len(), 2);
        assert_eq!(t.panes()[0].id, first);
        assert_eq!(t.panes()[1].id, second);
        assert_eq!(t.active_pane(), Some(second));
    }

    #[test]
    fn close_last_pane_in_tab_is_noop() {
        let (mut s, tab, pane) = store_with_tab();
        s.close_pane(tab, pane);
        assert_eq!(s.tab(tab).unwrap().panes().len(), 1);
    }

    #[test]
    fn close_active_pane_falls_to_first() {
        let (mut s, tab, first) = store_with_tab();
        let second = s.create_pane(tab, "/split").unwrap();
        s.close_pane(tab, second);
        let t = s.tab(tab).unwrap();
        assert_eq!(t.panes().len(), 1);
        assert_eq!(t.active_pane(), Some(first));
    }

    #[test]
    fn close_pane_clears_split() {
        let (mut s, tab, _) = store_with_tab();
        let second = s.create_pane(tab, "/split").unwrap();
        s.set_split(tab, 30.0);
        assert_eq!(s.tab(tab).unwrap().split, Some(30.0));
        s.close_pane(tab, second);
        assert_eq!(s.tab(tab).unwrap().split, None);
    }

    #[test]
    fn set_split_requires_two_panes() {
        let (mut s, tab, _) = store_with_tab();
        s.set_split(tab, 50.0);
        assert_eq!(s.tab(tab).unwrap().split, None);
    }

    #[test]
    fn navigate_back_forward_walk_history() {
        let (mut s, tab, pane) = store_with_tab();
        s.navigate(tab, pane, "/a");
        s.navigate(tab, pane, "/b");
        s.navigate(tab, pane, "/c");
        s.navigate_back(tab, pane);
        s.navigate_back(tab, pane);
        assert_eq!(s.pane(tab, pane).unwrap().path(), "/a");
        s.navigate_forward(tab, pane);
        assert_eq!(s.pane(tab, pane).unwrap().path(), "/b");
    }

    #[test]
    fn navigate_same_path_keeps_history_length() {
        let (mut s, tab, pane) = store_with_tab();
        s.navigate(tab, pane, "/a");
        let before = s.pane(tab, pane).unwrap().history().len();
        s.navigate(tab, pane, "/a");
        assert_eq!(s.pane(tab, pane).unwrap().history().len(), before);
    }

    #[test]
    fn navigate_after_back_discards_branch() {
        let (mut s, tab, pane) = store_with_tab();
        s.navigate(tab, pane, "/a");
        s.navigate(tab, pane, "/b");
        s.navigate_back(tab, pane);
        s.navigate(tab, pane, "/c");
        let p = s.pane(tab, pane).unwrap();
        assert_eq!(p.history().entries(), ["/start", "/a", "/c"]);
        assert_eq!(p.path(), "/c");
    }

    #[test]
    fn mutators_on_unknown_pane_are_noops() {
        let (mut s, tab, _) = store_with_tab();
        let ghost = PaneId::from_raw(777);
        s.navigate(tab, ghost, "/nowhere");
        s.refresh(tab, ghost);
        s.set_status(tab, ghost, Some("lost".into()));
        assert_eq!(s.tab(tab).unwrap().panes().len(), 1);
    }

    #[test]
    fn pane_mutation_emits_scoped_event() {
        let (mut s, tab, pane) = store_with_tab();
        let mut rx = s.notifier.subscribe(Scope::Pane(tab, pane));
        s.navigate(tab, pane, "/elsewhere");
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::Pane(tab, pane));
    }

    #[test]
    fn back_at_oldest_emits_nothing() {
        let (mut s, tab, pane) = store_with_tab();
        let mut rx = s.notifier.subscribe(Scope::Pane(tab, pane));
        s.navigate_back(tab, pane);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ids_are_unique_across_tabs_and_panes() {
        let mut s = store();
        let t1 = s.create_tab("/a");
        let t2 = s.create_tab("/b");
        let p1 = s.tab(t1).unwrap().active_pane().unwrap();
        let p2 = s.tab(t2).unwrap().active_pane().unwrap();
        assert_ne!(t1, t2);
        assert_ne!(p1, p2);
    }
}
