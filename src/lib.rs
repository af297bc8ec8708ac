//! Navigation and state-coordination core for a multi-pane, multi-tab file
//! browser.
//!
//! The crate owns three subsystems: the tab/pane state machine
//! ([`state::tabs::TabStore`]), the directory query cache
//! ([`query::DirectoryQueryCache`]), and the clipboard coordinator
//! ([`clipboard::ClipboardCoordinator`]). Rendering, layout, and the actual
//! file-system work are external collaborators reached through the traits in
//! [`fs::service`]; [`fs::local`] provides the real filesystem-backed
//! implementation. [`browser::FileBrowser`] wires everything together for
//! UI-facing callers.

pub mod browser;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod fs;
pub mod query;
pub mod state;

pub use browser::FileBrowser;
pub use clipboard::{ClipboardCoordinator, ClipboardState};
pub use config::Config;
pub use error::{ErrorKind, Result, ServiceError};
pub use fs::service::{
    DialogService, DirectoryContents, DirectoryService, FileInfo, PathInfo, PathService, Platform,
    Shortcut,
};
pub use query::{DirectoryQueryCache, QueryKey, QueryOutcome};
pub use state::history::NavigationHistory;
pub use state::notify::{ChangeEvent, Notifier, Scope};
pub use state::pane::{Pane, SortKey, SortSpec, ViewMode};
pub use state::tabs::{PaneId, Tab, TabId, TabStore};
