//! The process-wide copy/cut clipboard and the coordinator that drives
//! paste/delete against the directory service.

use std::sync::Arc;

use tokio::task;

use crate::fs::service::{DialogService, DirectoryService};
use crate::state::notify::{ChangeEvent, Notifier};
use crate::state::tabs::{PaneId, TabId, TabStore};

/// The single staged copy/cut file set, shared across all tabs and panes.
#[derive(Debug, Clone, Default)]
pub struct ClipboardState {
    paths: Vec<String>,
    cut_mode: bool,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage paths, replacing any prior content. `cut_mode == true` means
    /// paste will move instead of copy.
    pub fn set(&mut self, paths: Vec<String>, cut_mode: bool) {
        self.paths = paths;
        self.cut_mode = cut_mode;
    }

    /// Empty the clipboard.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.cut_mode = false;
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn cut_mode(&self) -> bool {
        self.cut_mode
    }
}

/// Orchestrates clipboard-driven file operations.
///
/// Holds the staged selection, dispatches paste/delete to the
/// [`DirectoryService`] off-thread, and reconciles the affected pane
/// afterward (refresh key bump, status message, selection pruning). Failures
/// surface through the [`DialogService`] plus a pane status; nothing is
/// retried.
pub struct ClipboardCoordinator {
    clipboard: ClipboardState,
    service: Arc<dyn DirectoryService>,
    dialogs: Arc<dyn DialogService>,
    notifier: Notifier,
    confirm_delete: bool,
}

impl ClipboardCoordinator {
    pub fn new(
        service: Arc<dyn DirectoryService>,
        dialogs: Arc<dyn DialogService>,
        notifier: Notifier,
        confirm_delete: bool,
    ) -> Self {
        Self {
            clipboard: ClipboardState::new(),
            service,
            dialogs,
            notifier,
            confirm_delete,
        }
    }

    /// Current staged content.
    pub fn clipboard(&self) -> &ClipboardState {
        &self.clipboard
    }

    /// Stage a copy (`cut_mode == false`) or cut (`cut_mode == true`)
    /// selection, unconditionally replacing any prior staged set.
    pub fn stage(&mut self, paths: Vec<String>, cut_mode: bool) {
        self.clipboard.set(paths, cut_mode);
        self.notifier.emit(ChangeEvent::Clipboard);
    }

    /// Discard the staged selection.
    pub fn clear(&mut self) {
        if !self.clipboard.is_empty() {
            self.clipboard.clear();
            self.notifier.emit(ChangeEvent::Clipboard);
        }
    }

    /// Paste the staged selection into `dest_dir`, reconciling the pane at
    /// `(tab_id, pane_id)` afterward.
    ///
    /// No-op when the clipboard is empty or `dest_dir` does not denote a
    /// directory known to the pane (its own path, or a directory in its
    /// loaded listing). The clipboard is cleared after the attempt whether
    /// it succeeded or not.
    // TODO: clearing on failure discards the user's staged set even though
    // nothing moved; flagged for product review.
    pub async fn paste(
        &mut self,
        store: &mut TabStore,
        tab_id: TabId,
        pane_id: PaneId,
        dest_dir: &str,
    ) {
        if self.clipboard.is_empty() {
            return;
        }
        if !Self::is_known_directory(store, tab_id, pane_id, dest_dir) {
            return;
        }

        let paths = self.clipboard.paths().to_vec();
        let cut_mode = self.clipboard.cut_mode();
        store.set_status(
            tab_id,
            pane_id,
            Some(format!("Pasting {} item(s)…", paths.len())),
        );

        let service = self.service.clone();
        let dest = dest_dir.to_string();
        let sources = paths.clone();
        let joined =
            task::spawn_blocking(move || service.paste_files(&dest, &sources, cut_mode)).await;

        match joined {
            Ok(Ok(message)) => {
                store.refresh(tab_id, pane_id);
                if cut_mode {
                    store.prune_selected(tab_id, pane_id, &paths);
                }
                store.set_status(tab_id, pane_id, Some(message));
            }
            Ok(Err(err)) => {
                self.dialogs.show_error("Paste Error", &err.to_string());
                store.set_status(tab_id, pane_id, Some(format!("Paste failed: {err}")));
            }
            Err(_) => {
                store.set_status(tab_id, pane_id, Some("Paste task failed".into()));
            }
        }

        self.clipboard.clear();
        self.notifier.emit(ChangeEvent::Clipboard);
    }

    /// Delete `paths`, owner pane `(tab_id, pane_id)`. Gated on an
    /// interactive confirmation; declining is a no-op.
    pub async fn delete(
        &mut self,
        store: &mut TabStore,
        tab_id: TabId,
        pane_id: PaneId,
        paths: Vec<String>,
    ) {
        if paths.is_empty() {
            return;
        }
        if self.confirm_delete {
            let question = format!("Delete {} item(s)? This cannot be undone.", paths.len());
            if !self.dialogs.confirm("Confirm Delete", &question) {
                return;
            }
        }

        store.set_status(
            tab_id,
            pane_id,
            Some(format!("Deleting {} item(s)…", paths.len())),
        );

        let service = self.service.clone();
        let targets = paths.clone();
        let joined = task::spawn_blocking(move || service.delete_files(&targets)).await;

        match joined {
            Ok(Ok(message)) => {
                store.refresh(tab_id, pane_id);
                store.prune_selected(tab_id, pane_id, &paths);
                store.set_status(tab_id, pane_id, Some(message));
            }
            Ok(Err(err)) => {
                self.dialogs.show_error("Delete Error", &err.to_string());
                store.set_status(tab_id, pane_id, Some(format!("Delete failed: {err}")));
            }
            Err(_) => {
                store.set_status(tab_id, pane_id, Some("Delete task failed".into()));
            }
        }
    }

    /// A paste destination is valid when it is the pane's own directory or a
    /// directory entry of the pane's last loaded listing.
    fn is_known_directory(
        store: &TabStore,
        tab_id: TabId,
        pane_id: PaneId,
        dest_dir: &str,
    ) -> bool {
        let Some(pane) = store.pane(tab_id, pane_id) else {
            return false;
        };
        if pane.path() == dest_dir {
            return true;
        }
        pane.contents()
            .map(|c| c.files.iter().any(|f| f.path == dest_dir && f.is_dir))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ServiceError};
    use crate::fs::service::{DirectoryContents, FileInfo, Platform, Shortcut};
    use crate::state::notify::Scope;
    use crate::state::pane::ViewMode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingService {
        pastes: Mutex<Vec<(String, Vec<String>, bool)>>,
        deletes: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl DirectoryService for RecordingService {
        fn list_directory(&self, path: &str) -> Result<DirectoryContents> {
            Ok(DirectoryContents {
                path: path.to_string(),
                files: Vec::new(),
                dir_count: 0,
                file_count: 0,
                direct_size_bytes: 0,
            })
        }
        fn open_with_default_app(&self, path: &str) -> Result<String> {
            Ok(format!("Opened {path}"))
        }
        fn paste_files(&self, target: &str, files: &[String], cut: bool) -> Result<String> {
            if self.fail {
                return Err(ServiceError::Copy("disk full".into()));
            }
            self.pastes
                .lock()
                .unwrap()
                .push((target.to_string(), files.to_vec(), cut));
            Ok(format!("Copied {} item(s) to {target}", files.len()))
        }
        fn delete_files(&self, files: &[String]) -> Result<String> {
            if self.fail {
                return Err(ServiceError::Delete("locked".into()));
            }
            self.deletes.lock().unwrap().push(files.to_vec());
            Ok(format!("Deleted {} item(s)", files.len()))
        }
        fn shortcuts(&self) -> Result<Vec<Shortcut>> {
            Ok(Vec::new())
        }
        fn platform(&self) -> Platform {
            Platform::Linux
        }
        fn initial_path(&self) -> Result<String> {
            Ok("/".into())
        }
    }

    #[derive(Default)]
    struct ScriptedDialogs {
        accept: bool,
        errors: Mutex<Vec<(String, String)>>,
    }

    impl DialogService for ScriptedDialogs {
        fn show_error(&self, title: &str, message: &str) {
            self.errors
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
        }
        fn confirm(&self, _: &str, _: &str) -> bool {
            self.accept
        }
    }

    struct Fixture {
        store: TabStore,
        coordinator: ClipboardCoordinator,
        service: Arc<RecordingService>,
        dialogs: Arc<ScriptedDialogs>,
        tab: TabId,
        pane: PaneId,
    }

    fn fixture(fail: bool, accept_confirm: bool) -> Fixture {
        let notifier = Notifier::new();
        let service = Arc::new(RecordingService {
            fail,
            ..Default::default()
        });
        let dialogs = Arc::new(ScriptedDialogs {
            accept: accept_confirm,
            ..Default::default()
        });
        let mut store = TabStore::new(notifier.clone(), 100, ViewMode::List);
        let tab = store.create_tab("/home/user");
        let pane = store.tab(tab).unwrap().active_pane().unwrap();
        let coordinator =
            ClipboardCoordinator::new(service.clone(), dialogs.clone(), notifier, true);
        Fixture {
            store,
            coordinator,
            service,
            dialogs,
            tab,
            pane,
        }
    }

    #[test]
    fn stage_replaces_prior_content() {
        let mut f = fixture(false, true);
        f.coordinator.stage(vec!["/a".into(), "/b".into()], false);
        f.coordinator.stage(vec!["/c".into()], true);
        assert_eq!(f.coordinator.clipboard().paths(), ["/c"]);
        assert!(f.coordinator.clipboard().cut_mode());
    }

    #[tokio::test]
    async fn paste_success_clears_clipboard_and_refreshes() {
        let mut f = fixture(false, true);
        f.coordinator.stage(vec!["/x/f1".into(), "/x/f2".into()], true);
        let key_before = f.store.pane(f.tab, f.pane).unwrap().refresh_key();

        f.coordinator
            .paste(&mut f.store, f.tab, f.pane, "/home/user")
            .await;

        assert!(f.coordinator.clipboard().is_empty());
        let pane = f.store.pane(f.tab, f.pane).unwrap();
        assert_eq!(pane.refresh_key(), key_before + 1);
        assert!(pane.status().unwrap().contains("2 item(s)"));
        let pastes = f.service.pastes.lock().unwrap();
        assert_eq!(pastes.len(), 1);
        assert_eq!(pastes[0].0, "/home/user");
        assert!(pastes[0].2);
    }

    #[tokio::test]
    async fn paste_failure_shows_dialog_and_still_clears() {
        let mut f = fixture(true, true);
        f.coordinator.stage(vec!["/x/f1".into()], false);

        f.coordinator
            .paste(&mut f.store, f.tab, f.pane, "/home/user")
            .await;

        assert!(f.coordinator.clipboard().is_empty());
        let errors = f.dialogs.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "Paste Error");
        let pane = f.store.pane(f.tab, f.pane).unwrap();
        assert!(pane.status().unwrap().starts_with("Paste failed"));
    }

    #[tokio::test]
    async fn paste_with_empty_clipboard_is_noop() {
        let mut f = fixture(false, true);
        f.coordinator
            .paste(&mut f.store, f.tab, f.pane, "/home/user")
            .await;
        assert!(f.service.pastes.lock().unwrap().is_empty());
        assert_eq!(f.store.pane(f.tab, f.pane).unwrap().status(), None);
    }

    #[tokio::test]
    async fn paste_onto_non_directory_is_noop() {
        let mut f = fixture(false, true);
        f.store.apply_contents(
            f.tab,
            f.pane,
            DirectoryContents {
                path: "/home/user".into(),
                files: vec![FileInfo {
                    name: "notes.txt".into(),
                    path: "/home/user/notes.txt".into(),
                    size: 1,
                    is_dir: false,
                    mode: "-rw-r--r--".into(),
                    modified: None,
                    extension: Some(".txt".into()),
                }],
                dir_count: 0,
                file_count: 1,
                direct_size_bytes: 1,
            },
        );
        f.coordinator.stage(vec!["/x/f1".into()], false);

        f.coordinator
            .paste(&mut f.store, f.tab, f.pane, "/home/user/notes.txt")
            .await;

        assert!(f.service.pastes.lock().unwrap().is_empty());
        // The staged set survives a rejected destination.
        assert_eq!(f.coordinator.clipboard().len(), 1);
    }

    #[tokio::test]
    async fn paste_into_listed_subdirectory_is_allowed() {
        let mut f = fixture(false, true);
        f.store.apply_contents(
            f.tab,
            f.pane,
            DirectoryContents {
                path: "/home/user".into(),
                files: vec![FileInfo {
                    name: "projects".into(),
                    path: "/home/user/projects".into(),
                    size: 0,
                    is_dir: true,
                    mode: "drwxr-xr-x".into(),
                    modified: None,
                    extension: None,
                }],
                dir_count: 1,
                file_count: 0,
                direct_size_bytes: 0,
            },
        );
        f.coordinator.stage(vec!["/x/f1".into()], false);

        f.coordinator
            .paste(&mut f.store, f.tab, f.pane, "/home/user/projects")
            .await;

        assert_eq!(f.service.pastes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_confirmed_refreshes_and_prunes_selection() {
        let mut f = fixture(false, true);
        f.store
            .set_selected(f.tab, f.pane, ["/home/user/a", "/home/user/b"]);
        let key_before = f.store.pane(f.tab, f.pane).unwrap().refresh_key();

        f.coordinator
            .delete(
                &mut f.store,
                f.tab,
                f.pane,
                vec!["/home/user/a".into()],
            )
            .await;

        let pane = f.store.pane(f.tab, f.pane).unwrap();
        assert_eq!(pane.refresh_key(), key_before + 1);
        assert!(!pane.selected().contains("/home/user/a"));
        assert!(pane.selected().contains("/home/user/b"));
        assert_eq!(f.service.deletes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_declined_is_noop() {
        let mut f = fixture(false, false);
        f.coordinator
            .delete(&mut f.store, f.tab, f.pane, vec!["/home/user/a".into()])
            .await;
        assert!(f.service.deletes.lock().unwrap().is_empty());
        assert_eq!(f.store.pane(f.tab, f.pane).unwrap().status(), None);
    }

    #[tokio::test]
    async fn delete_failure_surfaces_dialog() {
        let mut f = fixture(true, true);
        f.coordinator
            .delete(&mut f.store, f.tab, f.pane, vec!["/home/user/a".into()])
            .await;
        assert_eq!(f.dialogs.errors.lock().unwrap().len(), 1);
        let pane = f.store.pane(f.tab, f.pane).unwrap();
        assert!(pane.status().unwrap().starts_with("Delete failed"));
    }

    #[tokio::test]
    async fn delete_without_confirmation_setting_skips_dialog() {
        let notifier = Notifier::new();
        let service: Arc<RecordingService> = Arc::new(Default::default());
        // Dialogs would decline, but confirmation is disabled.
        let dialogs = Arc::new(ScriptedDialogs {
            accept: false,
            ..Default::default()
        });
        let mut store = TabStore::new(notifier.clone(), 100, ViewMode::List);
        let tab = store.create_tab("/home/user");
        let pane = store.tab(tab).unwrap().active_pane().unwrap();
        let mut coordinator =
            ClipboardCoordinator::new(service.clone(), dialogs, notifier, false);

        coordinator
            .delete(&mut store, tab, pane, vec!["/home/user/a".into()])
            .await;
        assert_eq!(service.deletes.lock().unwrap().len(), 1);
    }

    #[test]
    fn stage_emits_clipboard_event() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe(Scope::Clipboard);
        let service: Arc<RecordingService> = Arc::new(Default::default());
        let dialogs: Arc<ScriptedDialogs> = Arc::new(Default::default());
        let mut coordinator = ClipboardCoordinator::new(service, dialogs, notifier, true);
        coordinator.stage(vec!["/a".into()], false);
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::Clipboard);
    }
}
