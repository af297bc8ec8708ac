//! Filesystem-backed implementation of the collaborator contracts.
//!
//! Paths cross the boundary as strings; every operation canonicalizes its
//! inputs first (absolute + lexically cleaned) so listings and breadcrumbs
//! agree on one spelling per directory.

use std::fs;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::process::Command;

use crate::error::{Result, ServiceError};
use crate::fs::service::{
    DirectoryContents, DirectoryService, FileInfo, PathInfo, PathService, Platform, Shortcut,
    ShortcutKind,
};

/// Local-disk implementation of [`DirectoryService`] and [`PathService`].
#[derive(Debug, Default, Clone)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

/// Make a path absolute and lexically clean (`.` and `..` resolved) without
/// touching the disk. Empty paths are rejected.
pub fn canonical_path(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(ServiceError::InvalidPath("empty path".into()));
    }
    let p = Path::new(path);
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ServiceError::from_io(e, path))?
            .join(p)
    };

    let mut clean = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root.
                if clean.parent().is_some() {
                    clean.pop();
                }
            }
            other => clean.push(other),
        }
    }
    Ok(clean.to_string_lossy().into_owned())
}

/// Render permissions the way `ls -l` prints them.
#[cfg(unix)]
fn mode_string(metadata: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    let bits = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'l'
    } else {
        '-'
    });
    for shift in [6u32, 3, 0] {
        let triad = bits >> shift;
        out.push(if triad & 0o4 != 0 { 'r' } else { '-' });
        out.push(if triad & 0o2 != 0 { 'w' } else { '-' });
        out.push(if triad & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(metadata: &fs::Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let w = if metadata.permissions().readonly() { '-' } else { 'w' };
    format!("{kind}r{w}xr{w}xr{w}x")
}

fn file_info(path: &Path, metadata: &fs::Metadata) -> FileInfo {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()));
    FileInfo {
        name,
        path: path.to_string_lossy().into_owned(),
        size: metadata.len(),
        is_dir: metadata.is_dir(),
        mode: mode_string(metadata),
        modified: metadata.modified().ok(),
        extension,
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

/// Copy one source into `target`, refusing to overwrite an existing
/// destination.
fn copy_into(source: &str, target: &Path) -> Result<()> {
    let source = canonical_path(source)?;
    let src = Path::new(&source);
    let name = src
        .file_name()
        .ok_or_else(|| ServiceError::InvalidPath(source.clone()))?;
    let dest = target.join(name);

    let metadata =
        fs::metadata(src).map_err(|e| ServiceError::Copy(format!("cannot access {source}: {e}")))?;
    if dest.exists() {
        return Err(ServiceError::Copy(format!(
            "destination {} already exists",
            dest.display()
        )));
    }

    if metadata.is_dir() {
        copy_dir_recursive(src, &dest)
            .map_err(|e| ServiceError::Copy(format!("failed to copy directory {source}: {e}")))?;
    } else {
        fs::copy(src, &dest)
            .map_err(|e| ServiceError::Copy(format!("failed to copy file {source}: {e}")))?;
    }
    Ok(())
}

/// Move one source into `target`. Tries `fs::rename` first; falls back to
/// copy + remove for cross-device moves.
fn move_into(source: &str, target: &Path) -> Result<()> {
    let source = canonical_path(source)?;
    let src = Path::new(&source);
    let name = src
        .file_name()
        .ok_or_else(|| ServiceError::InvalidPath(source.clone()))?;
    let dest = target.join(name);

    if fs::rename(src, &dest).is_ok() {
        return Ok(());
    }

    let metadata =
        fs::metadata(src).map_err(|e| ServiceError::Move(format!("cannot access {source}: {e}")))?;
    if metadata.is_dir() {
        copy_dir_recursive(src, &dest)
            .map_err(|e| ServiceError::Move(format!("failed to move directory {source}: {e}")))?;
    } else {
        fs::copy(src, &dest)
            .map_err(|e| ServiceError::Move(format!("failed to move file {source}: {e}")))?;
    }
    fs::remove_dir_all(src)
        .or_else(|_| fs::remove_file(src))
        .map_err(|e| ServiceError::Move(format!("failed to remove {source} after copy: {e}")))?;
    Ok(())
}

impl DirectoryService for LocalFileSystem {
    fn list_directory(&self, path: &str) -> Result<DirectoryContents> {
        let abs = canonical_path(path)?;
        let entries = fs::read_dir(&abs).map_err(|e| ServiceError::from_io(e, &abs))?;

        let mut files = Vec::new();
        let mut dir_count = 0;
        let mut file_count = 0;
        let mut direct_size_bytes = 0u64;

        for entry in entries {
            let entry = entry.map_err(|e| ServiceError::from_io(e, &abs))?;
            let metadata = match entry.metadata() {
                Ok(m) => m,
                // Broken symlinks and vanished entries are skipped, not fatal.
                Err(_) => continue,
            };
            let info = file_info(&entry.path(), &metadata);
            if info.is_dir {
                dir_count += 1;
            } else {
                file_count += 1;
                direct_size_bytes += info.size;
            }
            files.push(info);
        }

        Ok(DirectoryContents {
            path: abs,
            files,
            dir_count,
            file_count,
            direct_size_bytes,
        })
    }

    fn open_with_default_app(&self, path: &str) -> Result<String> {
        let abs = canonical_path(path)?;
        let mut cmd = match self.platform() {
            Platform::Windows => {
                let mut c = Command::new("rundll32");
                c.arg("url.dll,FileProtocolHandler").arg(&abs);
                c
            }
            Platform::MacOs => {
                let mut c = Command::new("open");
                c.arg(&abs);
                c
            }
            _ => {
                let mut c = Command::new("xdg-open");
                c.arg(&abs);
                c
            }
        };
        cmd.spawn()
            .map_err(|e| ServiceError::Open(format!("failed to open {abs}: {e}")))?;
        Ok(format!("Opened {abs}"))
    }

    fn paste_files(&self, target_dir: &str, files: &[String], cut_mode: bool) -> Result<String> {
        let target = canonical_path(target_dir)?;
        let target = Path::new(&target);
        for source in files {
            if cut_mode {
                move_into(source, target)?;
            } else {
                copy_into(source, target)?;
            }
        }
        let verb = if cut_mode { "Moved" } else { "Copied" };
        Ok(format!(
            "{verb} {} item(s) to {}",
            files.len(),
            target.display()
        ))
    }

    fn delete_files(&self, files: &[String]) -> Result<String> {
        for source in files {
            let abs = canonical_path(source)?;
            let path = Path::new(&abs);
            let result = if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            result.map_err(|e| ServiceError::Delete(format!("failed to delete {abs}: {e}")))?;
        }
        Ok(format!("Deleted {} item(s)", files.len()))
    }

    fn shortcuts(&self) -> Result<Vec<Shortcut>> {
        let mut shortcuts = Vec::new();
        let mut add = |name: &str, dir: Option<PathBuf>, kind: ShortcutKind| {
            if let Some(dir) = dir {
                if dir.exists() {
                    shortcuts.push(Shortcut {
                        name: name.to_string(),
                        path: dir.to_string_lossy().into_owned(),
                        kind,
                    });
                }
            }
        };
        add("Home", dirs::home_dir(), ShortcutKind::Home);
        add("Desktop", dirs::desktop_dir(), ShortcutKind::Desktop);
        add("Downloads", dirs::download_dir(), ShortcutKind::Downloads);
        add("Documents", dirs::document_dir(), ShortcutKind::Documents);
        add("Music", dirs::audio_dir(), ShortcutKind::Music);
        add("Pictures", dirs::picture_dir(), ShortcutKind::Pictures);
        add("Videos", dirs::video_dir(), ShortcutKind::Videos);
        Ok(shortcuts)
    }

    fn platform(&self) -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    fn initial_path(&self) -> Result<String> {
        if let Some(home) = dirs::home_dir() {
            return canonical_path(&home.to_string_lossy());
        }
        canonical_path(".")
    }
}

impl PathService for LocalFileSystem {
    fn path_info(&self, path: &str) -> Result<PathInfo> {
        let abs = canonical_path(path)?;
        let p = Path::new(&abs);

        let mut parts = Vec::new();
        let mut root = String::new();
        for component in p.components() {
            match component {
                Component::Prefix(prefix) => {
                    root = prefix.as_os_str().to_string_lossy().into_owned();
                    parts.push(root.clone());
                }
                Component::RootDir => {
                    if root.is_empty() {
                        root = MAIN_SEPARATOR.to_string();
                        parts.push(root.clone());
                    }
                }
                Component::Normal(seg) => parts.push(seg.to_string_lossy().into_owned()),
                _ => {}
            }
        }

        Ok(PathInfo {
            full_path: abs,
            root,
            separator: MAIN_SEPARATOR.to_string(),
            parts,
        })
    }

    fn path_at_index(&self, full_path: &str, index: usize) -> Result<String> {
        let info = self.path_info(full_path)?;
        if index >= info.parts.len() {
            return Err(ServiceError::InvalidPath(format!(
                "segment index {index} out of bounds for {full_path}"
            )));
        }
        // The root must end with a separator so joining works on every
        // platform (`C:` alone would produce a drive-relative path).
        let mut root = info.root.clone();
        if !root.ends_with(&info.separator) {
            root.push_str(&info.separator);
        }
        let mut rebuilt = PathBuf::from(root);
        for seg in info.parts.iter().take(index + 1).skip(1) {
            rebuilt.push(seg);
        }
        Ok(rebuilt.to_string_lossy().into_owned())
    }
}
