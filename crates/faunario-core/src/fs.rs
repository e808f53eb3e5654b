//! Filesystem existence capability.
//!
//! The validator only needs to ask "does this asset exist?", so that query is
//! behind a trait and the real filesystem is injected in production. Tests
//! stub it with a fixed path set instead of touching disk.

use std::path::Path;

/// File-existence capability consumed by the validator.
pub trait FileProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileProbe;

impl FileProbe for OsFileProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
