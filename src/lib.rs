//! # fastwalk
//!
//! Pre-order directory walker that never follows links.
//!
//! fastwalk visits the root and everything reachable below it, calling a
//! callback once per entry. Link-like entries (symlinks, junctions, any
//! reparse point) are visited but never descended into, even when they look
//! like directories. Errors from inspecting or listing an entry are handed
//! to the callback, which decides whether the walk carries on.
//!
//! It owns the traversal and its error policy. Where entry information
//! comes from ([`Inspector`], [`Lister`]) and what happens to visited
//! entries belong to the caller.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fastwalk::VisitResult;
//!
//! let mut files = 0;
//! fastwalk::walk("/var/log", |path, info, err| {
//!     match (info, err) {
//!         (_, Some(err)) => eprintln!("skipped {}: {err}", path.display()),
//!         (Some(info), None) if !info.is_dir() => files += 1,
//!         _ => {}
//!     }
//!     VisitResult::Continue
//! })
//! .unwrap();
//! println!("{files} files");
//! ```
//!
//! # Steering the walk
//!
//! The callback answers with a [`VisitResult`]:
//!
//! - `Continue` keeps going, absorbing any error it was handed.
//! - `SkipDir` on a directory prunes its subtree; on anything else it
//!   skips the remaining entries of the containing directory.
//! - `Stop(err)` aborts the walk and makes it return `err`.
//!
//! ```rust
//! use std::path::Path;
//! use fastwalk::{EntryInfo, VisitResult, WalkError};
//!
//! // A tiny in-memory tree: root/{a, b/{c}}
//! let inspector = |p: &Path| -> Result<EntryInfo, WalkError> {
//!     match p.file_name().and_then(|n| n.to_str()) {
//!         Some("root") | Some("b") => Ok(EntryInfo::dir()),
//!         _ => Ok(EntryInfo::file()),
//!     }
//! };
//! let lister = |p: &Path| -> Result<Vec<std::ffi::OsString>, WalkError> {
//!     match p.file_name().and_then(|n| n.to_str()) {
//!         Some("root") => Ok(vec!["b".into(), "a".into()]),
//!         Some("b") => Ok(vec!["c".into()]),
//!         _ => Ok(Vec::new()),
//!     }
//! };
//!
//! let mut seen = Vec::new();
//! fastwalk::walker()
//!     .inspector(inspector)
//!     .lister(lister)
//!     .run("root", |path, _, _| {
//!         seen.push(path.to_path_buf());
//!         if path.ends_with("b") {
//!             VisitResult::SkipDir
//!         } else {
//!             VisitResult::Continue
//!         }
//!     })
//!     .unwrap();
//!
//! let expected: Vec<std::path::PathBuf> = vec!["root".into(), "root/a".into(), "root/b".into()];
//! assert_eq!(seen, expected);
//! ```

#![forbid(unsafe_code)]

mod builder;
mod engine;
mod entry;
mod error;
mod native;
#[cfg(feature = "parallel")]
mod parallel;
mod traits;
mod visit;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::WalkBuilder;
pub use entry::{EntryInfo, EntryKind};
pub use error::WalkError;
pub use native::{FsInspector, FsLister};
pub use traits::{Inspector, Lister};
pub use visit::VisitResult;

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a new [`WalkBuilder`] to swap collaborators or walk in parallel.
pub fn walker() -> WalkBuilder {
    WalkBuilder::default()
}

/// Walk the local filesystem from `root`, sequentially, without following
/// links.
///
/// Equivalent to `fastwalk::walker().run(root, visit)`. If `root` itself
/// cannot be inspected, `visit` is called once with the error and nothing
/// else happens.
///
/// # Errors
///
/// Returns the error of the first [`VisitResult::Stop`] the callback
/// produces, and `Ok(())` otherwise.
pub fn walk<F>(root: impl AsRef<std::path::Path>, visit: F) -> Result<(), WalkError>
where
    F: FnMut(&std::path::Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult,
{
    walker().run(root, visit)
}
