//! Per-pane navigation history: a bounded, branch-discarding path stack.

/// Back/forward path stack with a current index.
///
/// Invariants: the stack is never empty, `index` always points at a valid
/// entry, and `current()` is the pane's path at rest. Navigating to a new
/// path discards the forward branch; back/forward only move the index.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
    limit: usize,
}

impl NavigationHistory {
    /// Seed the history with the pane's initial path. `limit` caps the stack
    /// length; a limit of zero is treated as one.
    pub fn new(initial: impl Into<String>, limit: usize) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
            limit: limit.max(1),
        }
    }

    /// The entry at the current index.
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Record a navigation to `path`.
    ///
    /// Truncates the forward branch, then appends, unless `path` equals the
    /// current entry (no consecutive duplicates). When the
    /// stack exceeds the limit the oldest entry is dropped. Returns whether
    /// the stack changed.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path == self.entries[self.index] {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Move back one entry; `None` at the oldest entry.
    pub fn back(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Move forward one entry; `None` at the newest entry.
    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Entries oldest-first, for breadcrumb/debug display.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
