use std::ffi::OsString;
use std::path::Path;

use crate::entry::EntryInfo;
use crate::error::WalkError;

/// Reports what a path is, without following it.
///
/// Implement this to walk something other than the local filesystem, or to
/// inject failures in tests. The walker asks the inspector about the root
/// and about every child name the [`Lister`] returns.
///
/// # Links
///
/// An inspector must describe a link-like entry itself, never its target.
/// If `inspect` followed links, a link pointing at one of its own ancestors
/// would be reported as an ordinary directory and the walk would loop.
///
/// # Thread Safety
///
/// `Send + Sync` are required: the parallel walker calls `inspect`
/// concurrently for the children of a directory.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use fastwalk::{EntryInfo, Inspector, WalkError};
///
/// // Everything ending in `.d` is a directory, the rest are files.
/// struct ByName;
///
/// impl Inspector for ByName {
///     fn inspect(&self, path: &Path) -> Result<EntryInfo, WalkError> {
///         if path.extension().map(|e| e == "d").unwrap_or(false) {
///             Ok(EntryInfo::dir())
///         } else {
///             Ok(EntryInfo::file())
///         }
///     }
/// }
/// ```
pub trait Inspector: Send + Sync {
    /// Describe `path`. Errors are handed to the visit callback, not
    /// returned from the walk.
    fn inspect(&self, path: &Path) -> Result<EntryInfo, WalkError>;
}

/// Lists the immediate children of a directory.
///
/// Return bare names, not joined paths. Order does not matter: the walker
/// sorts names before visiting them.
pub trait Lister: Send + Sync {
    fn list(&self, dir: &Path) -> Result<Vec<OsString>, WalkError>;
}

impl<F> Inspector for F
where
    F: Fn(&Path) -> Result<EntryInfo, WalkError> + Send + Sync,
{
    fn inspect(&self, path: &Path) -> Result<EntryInfo, WalkError> {
        self(path)
    }
}

impl<F> Lister for F
where
    F: Fn(&Path) -> Result<Vec<OsString>, WalkError> + Send + Sync,
{
    fn list(&self, dir: &Path) -> Result<Vec<OsString>, WalkError> {
        self(dir)
    }
}
