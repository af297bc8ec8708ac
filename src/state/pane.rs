//! One directory-browsing viewport: path, history, view settings, selection,
//! status line, and the last loaded listing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::fs::service::{DirectoryContents, FileInfo};
use crate::state::history::NavigationHistory;
use crate::state::tabs::PaneId;

/// How a pane renders its listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    Grid,
    #[default]
    List,
}

/// Sortable listing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Name,
    Size,
    Modified,
}

/// One column of a pane's sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }
}

/// Per-pane browsing state.
///
/// All mutation goes through [`super::tabs::TabStore`], which addresses panes
/// by `(TabId, PaneId)` and emits change notifications.
#[derive(Debug, Clone)]
pub struct Pane {
    pub id: PaneId,
    path: String,
    pub view_mode: ViewMode,
    pub sorting: Vec<SortSpec>,
    selected: HashSet<String>,
    history: NavigationHistory,
    status: Option<String>,
    refresh_key: u64,
    contents: Option<DirectoryContents>,
}

impl Pane {
    pub(crate) fn new(
        id: PaneId,
        path: impl Into<String>,
        view_mode: ViewMode,
        history_limit: usize,
    ) -> Self {
        let path = path.into();
        Self {
            id,
            history: NavigationHistory::new(path.clone(), history_limit),
            path,
            view_mode,
            sorting: vec![SortSpec::ascending(SortKey::Name)],
            selected: HashSet::new(),
            status: None,
            refresh_key: 0,
            contents: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Last successfully applied listing, if any.
    pub fn contents(&self) -> Option<&DirectoryContents> {
        self.contents.as_ref()
    }

    /// The live cache key for this pane's directory query.
    pub fn query_key(&self) -> (String, u64) {
        (self.path.clone(), self.refresh_key)
    }

    /// Canonical path-change entry point: records the new path in history
    /// (branch-discarding), clears the status line, and drops the selection.
    pub(crate) fn navigate(&mut self, path: &str) {
        self.history.push(path);
        self.path = path.to_string();
        self.status = None;
        self.selected.clear();
    }

    /// Step back in history; returns whether the path changed.
    pub(crate) fn navigate_back(&mut self) -> bool {
        if let Some(path) = self.history.back() {
            self.path = path.to_string();
            self.status = None;
            self.selected.clear();
            true
        } else {
            false
        }
    }

    /// Step forward in history; returns whether the path changed.
    pub(crate) fn navigate_forward(&mut self) -> bool {
        if let Some(path) = self.history.forward() {
            self.path = path.to_string();
            self.status = None;
            self.selected.clear();
            true
        } else {
            false
        }
    }

    /// Replace the selection wholesale (copies, does not alias the caller's
    /// collection).
    pub(crate) fn set_selected<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = paths.into_iter().map(Into::into).collect();
    }

    /// Plain left click: selection becomes exactly the clicked path.
    pub(crate) fn select_click(&mut self, path: &str) {
        self.selected.clear();
        self.selected.insert(path.to_string());
    }

    /// Ctrl/cmd click: toggle the clicked path in the selection.
    pub(crate) fn select_ctrl_click(&mut self, path: &str) {
        if !self.selected.remove(path) {
            self.selected.insert(path.to_string());
        }
    }

    /// Right click: keep an existing multi-selection when the target is
    /// already part of it, otherwise collapse to the clicked path.
    pub(crate) fn select_context_click(&mut self, path: &str) {
        if !self.selected.contains(path) {
            self.select_click(path);
        }
    }

    pub(crate) fn set_status(&mut self, message: Option<String>) {
        self.status = message;
    }

    /// Cache-bust signal: bumps the refresh key without touching path or
    /// history.
    pub(crate) fn refresh(&mut self) {
        self.refresh_key += 1;
    }

    /// Apply a freshly loaded listing. The caller has already verified the
    /// result matches this pane's live query key. Clears any transient
    /// status, so a load-failure message never outlives the failure.
    pub(crate) fn apply_contents(&mut self, contents: DirectoryContents) {
        self.contents = Some(contents);
        self.status = None;
    }

    /// Remove paths from the selection (after a delete or cut-paste), so
    /// consumers don't act on entries that no longer exist.
    pub(crate) fn prune_selected(&mut self, gone: &[String]) {
        for path in gone {
            self.selected.remove(path);
        }
    }

    /// The loaded files ordered for display: directories first, then the
    /// pane's sort columns in sequence, name ascending as the final
    /// tiebreaker.
    pub fn sorted_files(&self) -> Vec<&FileInfo> {
        let mut files: Vec<&FileInfo> = match &self.contents {
            Some(c) => c.files.iter().collect(),
            None => return Vec::new(),
        };
        files.sort_by(|a, b| {
            use std::cmp::Ordering;
            match (a.is_dir, b.is_dir) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
            for spec in &self.sorting {
                let ord = match spec.key {
                    SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                    SortKey::Size => a.size.cmp(&b.size),
                    SortKey::Modified => a.modified.cmp(&b.modified),
                };
                let ord = if spec.descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.name.to_lowercase().cmp(&b.name.to_lowercase())
        });
        files
    }
}
