//! Collaborator contracts and the data model they exchange.
//!
//! Everything the core knows about the real file system goes through these
//! traits. Methods are synchronous; the core executes them off the UI thread
//! via `tokio::task::spawn_blocking` so state mutation stays single-threaded.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for one directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
    /// Permission string in `ls -l` form (`"drwxr-xr-x"`).
    pub mode: String,
    pub modified: Option<SystemTime>,
    /// Extension including the leading dot (`".txt"`), `None` for entries
    /// without one.
    pub extension: Option<String>,
}

/// A directory listing with aggregate tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryContents {
    /// The canonicalized path that was listed.
    pub path: String,
    pub files: Vec<FileInfo>,
    pub dir_count: usize,
    pub file_count: usize,
    /// Sum of the sizes of direct (non-directory) children, in bytes.
    pub direct_size_bytes: u64,
}

/// Platform-normalized segments of a path, for breadcrumb navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub full_path: String,
    /// Volume or root prefix (`"/"` on Unix, `"C:"` on Windows).
    pub root: String,
    pub separator: String,
    /// Ordered segments, root first.
    pub parts: Vec<String>,
}

/// Operating system reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

/// Icon category for a sidebar shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutKind {
    Home,
    Desktop,
    Downloads,
    Documents,
    Music,
    Pictures,
    Videos,
}

/// A well-known directory offered in the sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub path: String,
    pub kind: ShortcutKind,
}

/// File-system operations the core dispatches but does not implement.
pub trait DirectoryService: Send + Sync {
    /// List the contents of a directory.
    fn list_directory(&self, path: &str) -> Result<DirectoryContents>;

    /// Open a file with the platform's default application. Returns a
    /// human-readable confirmation message.
    fn open_with_default_app(&self, path: &str) -> Result<String>;

    /// Copy (`cut_mode == false`) or move (`cut_mode == true`) the given
    /// files into `target_dir`. Returns a summary message.
    fn paste_files(&self, target_dir: &str, files: &[String], cut_mode: bool) -> Result<String>;

    /// Delete the given files and directories (directories recursively).
    fn delete_files(&self, files: &[String]) -> Result<String>;

    /// Enumerate well-known user directories for the sidebar.
    fn shortcuts(&self) -> Result<Vec<Shortcut>>;

    /// The operating system the service runs on.
    fn platform(&self) -> Platform;

    /// Default starting directory for a fresh pane.
    fn initial_path(&self) -> Result<String>;
}

/// Path segmentation used by "go up" and breadcrumb logic.
pub trait PathService: Send + Sync {
    /// Split a path into its platform-normalized segments.
    fn path_info(&self, path: &str) -> Result<PathInfo>;

    /// Reconstruct the sub-path ending at segment `index` of `full_path`.
    fn path_at_index(&self, full_path: &str, index: usize) -> Result<String>;
}

/// Native dialog collaborator for error display and destructive-action
/// confirmation.
pub trait DialogService: Send + Sync {
    /// Show a modal error dialog.
    fn show_error(&self, title: &str, message: &str);

    /// Ask an interactive yes/no question; `true` means proceed.
    fn confirm(&self, title: &str, message: &str) -> bool;
}
