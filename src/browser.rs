//! UI-facing facade: composes the tab store, query cache, clipboard
//! coordinator, and the collaborator services.
//!
//! Structural and field mutations stay synchronous; only collaborator calls
//! (listing, path info, open, paste, delete) suspend. Listing results are
//! applied under the "last navigate wins" rule: the pane's live
//! `(path, refresh_key)` is re-checked after every fetch and stale results
//! are dropped.

use std::future::Future;
use std::sync::Arc;

use tokio::task;

use crate::clipboard::ClipboardCoordinator;
use crate::config::Config;
use crate::error::Result;
use crate::fs::service::{
    DialogService, DirectoryService, FileInfo, PathService, Platform, Shortcut,
};
use crate::query::{DirectoryQueryCache, QueryKey, QueryOutcome};
use crate::state::notify::Notifier;
use crate::state::tabs::{PaneId, TabId, TabStore};

/// The navigation and state-coordination core, assembled.
pub struct FileBrowser {
    store: TabStore,
    cache: Arc<DirectoryQueryCache>,
    clipboard: ClipboardCoordinator,
    service: Arc<dyn DirectoryService>,
    paths: Arc<dyn PathService>,
    notifier: Notifier,
}

impl FileBrowser {
    /// Build the core and seed one tab at the starting directory (config
    /// override first, the service's default otherwise).
    pub fn new(
        service: Arc<dyn DirectoryService>,
        paths: Arc<dyn PathService>,
        dialogs: Arc<dyn DialogService>,
        config: &Config,
    ) -> Result<Self> {
        let initial = match config.initial_path() {
            Some(path) => path.to_string(),
            None => service.initial_path()?,
        };
        let notifier = Notifier::new();
        let mut store = TabStore::new(
            notifier.clone(),
            config.history_limit(),
            config.default_view_mode(),
        );
        store.create_tab(&initial);
        let cache = Arc::new(DirectoryQueryCache::new(service.clone(), config.cache_ttl()));
        let clipboard = ClipboardCoordinator::new(
            service.clone(),
            dialogs,
            notifier.clone(),
            config.confirm_delete(),
        );
        Ok(Self {
            store,
            cache,
            clipboard,
            service,
            paths,
            notifier,
        })
    }

    /// The tab/pane state machine.
    pub fn store(&self) -> &TabStore {
        &self.store
    }

    /// Mutable access for the synchronous operations in
    /// [`TabStore`] (navigate, selection, sorting, activation…).
    pub fn store_mut(&mut self) -> &mut TabStore {
        &mut self.store
    }

    /// The clipboard coordinator's read side.
    pub fn clipboard(&self) -> &ClipboardCoordinator {
        &self.clipboard
    }

    /// Subscription registry for change events.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// First half of a pane load: capture the pane's live query key and
    /// build the fetch future. The future borrows nothing from the store, so
    /// navigation can proceed while it runs; [`Self::apply_load`] decides at
    /// resolution time whether the result is still wanted.
    pub fn begin_load(
        &self,
        tab_id: TabId,
        pane_id: PaneId,
    ) -> Option<(QueryKey, impl Future<Output = QueryOutcome> + 'static)> {
        let pane = self.store.pane(tab_id, pane_id)?;
        let key = pane.query_key();
        let cache = self.cache.clone();
        let fetch_key = key.clone();
        Some((key, async move {
            cache.query(&fetch_key.0, fetch_key.1).await
        }))
    }

    /// Second half of a pane load: apply a fetched outcome if the pane still
    /// exists and its live key equals `requested` ("last navigate wins").
    ///
    /// Returns `true` when the result was applied; `false` when the pane is
    /// gone, the result arrived stale, or the listing failed (failure is
    /// reported on the pane's status line, and no fallback content is
    /// synthesized).
    pub fn apply_load(
        &mut self,
        tab_id: TabId,
        pane_id: PaneId,
        requested: &QueryKey,
        outcome: &QueryOutcome,
    ) -> bool {
        let Some(pane) = self.store.pane(tab_id, pane_id) else {
            return false;
        };
        if pane.query_key() != *requested {
            return false;
        }

        match outcome.as_ref() {
            Ok(contents) => {
                self.store.apply_contents(tab_id, pane_id, contents.clone());
                true
            }
            Err(err) => {
                self.store.set_status(
                    tab_id,
                    pane_id,
                    Some(format!("Failed to load {}: {err}", requested.0)),
                );
                false
            }
        }
    }

    /// Load directory contents for a pane and apply them if still current.
    pub async fn load_pane(&mut self, tab_id: TabId, pane_id: PaneId) -> bool {
        let Some((key, fetch)) = self.begin_load(tab_id, pane_id) else {
            return false;
        };
        let outcome = fetch.await;
        self.apply_load(tab_id, pane_id, &key, &outcome)
    }

    /// Open a listing entry: directories navigate the pane, files go to the
    /// platform's default application.
    pub async fn open_entry(&mut self, tab_id: TabId, pane_id: PaneId, entry: &FileInfo) {
        if entry.is_dir {
            self.store.navigate(tab_id, pane_id, &entry.path);
            self.load_pane(tab_id, pane_id).await;
            return;
        }
        let service = self.service.clone();
        let path = entry.path.clone();
        let joined = task::spawn_blocking(move || service.open_with_default_app(&path)).await;
        match joined {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                self.store
                    .set_status(tab_id, pane_id, Some(format!("Open failed: {err}")));
            }
            Err(_) => {
                self.store
                    .set_status(tab_id, pane_id, Some("Open task failed".into()));
            }
        }
    }

    /// Navigate a pane to its parent directory; no-op at the root.
    pub async fn navigate_up(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(pane) = self.store.pane(tab_id, pane_id) else {
            return;
        };
        let current = pane.path().to_string();

        let paths = self.paths.clone();
        let probe = current.clone();
        let joined = task::spawn_blocking(move || {
            let info = paths.path_info(&probe)?;
            if info.parts.len() < 2 {
                return Ok(None);
            }
            paths
                .path_at_index(&info.full_path, info.parts.len() - 2)
                .map(Some)
        })
        .await;

        match joined {
            Ok(Ok(Some(parent))) => {
                self.store.navigate(tab_id, pane_id, &parent);
                self.load_pane(tab_id, pane_id).await;
            }
            Ok(Ok(None)) => {}
            Ok(Err(err)) => {
                self.store
                    .set_status(tab_id, pane_id, Some(format!("Go up failed: {err}")));
            }
            Err(_) => {
                self.store
                    .set_status(tab_id, pane_id, Some("Go up task failed".into()));
            }
        }
    }

    /// Open a directory in a fresh tab.
    pub fn open_in_new_tab(&mut self, path: &str) -> TabId {
        self.store.create_tab(path)
    }

    /// Close a pane and drop cache entries for the directory it showed, so a
    /// recreated pane always fetches fresh.
    pub fn close_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let shown = self
            .store
            .pane(tab_id, pane_id)
            .map(|p| p.path().to_string());
        let before = self.store.tab(tab_id).map(|t| t.panes().len());
        self.store.close_pane(tab_id, pane_id);
        let after = self.store.tab(tab_id).map(|t| t.panes().len());
        if before != after {
            if let Some(path) = shown {
                self.cache.invalidate(&path);
            }
        }
    }

    /// Close a tab and drop cache entries for every directory its panes
    /// showed, so recreated panes always fetch fresh.
    pub fn close_tab(&mut self, tab_id: TabId) {
        let shown: Vec<String> = self
            .store
            .tab(tab_id)
            .map(|t| t.panes().iter().map(|p| p.path().to_string()).collect())
            .unwrap_or_default();
        let before = self.store.tabs().len();
        self.store.close_tab(tab_id);
        if self.store.tabs().len() != before {
            for path in shown {
                self.cache.invalidate(&path);
            }
        }
    }

    /// Stage a copy/cut selection on the shared clipboard.
    pub fn stage_clipboard(&mut self, paths: Vec<String>, cut_mode: bool) {
        self.clipboard.stage(paths, cut_mode);
    }

    /// Paste the staged clipboard into `dest_dir`, then reload the target
    /// pane under its bumped refresh key. The paste's outcome message is
    /// put back after the reload (a fresh listing clears pane status).
    pub async fn paste_into(&mut self, tab_id: TabId, pane_id: PaneId, dest_dir: &str) {
        self.clipboard
            .paste(&mut self.store, tab_id, pane_id, dest_dir)
            .await;
        self.reload_keeping_status(tab_id, pane_id).await;
    }

    /// Delete files owned by a pane (confirmation-gated), then reload it.
    pub async fn delete(&mut self, tab_id: TabId, pane_id: PaneId, paths: Vec<String>) {
        self.clipboard
            .delete(&mut self.store, tab_id, pane_id, paths)
            .await;
        self.reload_keeping_status(tab_id, pane_id).await;
    }

    async fn reload_keeping_status(&mut self, tab_id: TabId, pane_id: PaneId) {
        let message = self
            .store
            .pane(tab_id, pane_id)
            .and_then(|p| p.status().map(str::to_string));
        if self.load_pane(tab_id, pane_id).await && message.is_some() {
            self.store.set_status(tab_id, pane_id, message);
        }
    }

    /// Sidebar shortcuts from the directory service.
    pub async fn shortcuts(&self) -> Result<Vec<Shortcut>> {
        let service = self.service.clone();
        task::spawn_blocking(move || service.shortcuts())
            .await
            .unwrap_or_else(|_| Ok(Vec::new()))
    }

    /// The operating system the directory service reports.
    pub fn platform(&self) -> Platform {
        self.service.platform()
    }
}
