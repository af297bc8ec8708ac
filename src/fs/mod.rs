//! File-system collaborator boundary: the contracts the core consumes
//! ([`service`]) and the real filesystem-backed implementation ([`local`]).

pub mod local;
pub mod service;
