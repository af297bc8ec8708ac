//! Pane/tab state machines and their change-notification mechanism.

pub mod history;
pub mod notify;
pub mod pane;
pub mod tabs;
