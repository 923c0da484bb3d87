use std::path::Path;

use crate::engine;
use crate::entry::EntryInfo;
use crate::error::WalkError;
use crate::native::{FsInspector, FsLister};
use crate::traits::{Inspector, Lister};
use crate::visit::VisitResult;

// ---------------------------------------------------------------------------
// WalkBuilder
// ---------------------------------------------------------------------------

/// Configures where entry information comes from and how the walk runs.
///
/// Created via [`fastwalk::walker()`](crate::walker). Defaults to the local
/// filesystem ([`FsInspector`], [`FsLister`]).
///
/// # Example
///
/// ```rust,ignore
/// fastwalk::walker()
///     .inspector(my_inspector)
///     .lister(my_lister)
///     .threads(8)
///     .run_parallel("/srv/data", |path, info, err| {
///         /* ... */
///         VisitResult::Continue
///     })?;
/// ```
pub struct WalkBuilder {
    inspector: Box<dyn Inspector>,
    lister:    Box<dyn Lister>,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    threads:   usize,
}

impl Default for WalkBuilder {
    fn default() -> Self {
        Self {
            inspector: Box::new(FsInspector),
            lister:    Box::new(FsLister),
            threads:   num_cpus(),
        }
    }
}

impl WalkBuilder {
    // ── Collaborators ─────────────────────────────────────────────────────

    /// Replace the entry inspector.
    ///
    /// Any type implementing [`Inspector`] is accepted, including a plain
    /// closure `Fn(&Path) -> Result<EntryInfo, WalkError>`. Use it to walk a
    /// non-local tree or to inject inspection failures.
    pub fn inspector(mut self, i: impl Inspector + 'static) -> Self {
        self.inspector = Box::new(i);
        self
    }

    /// Replace the directory lister.
    pub fn lister(mut self, l: impl Lister + 'static) -> Self {
        self.lister = Box::new(l);
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of worker threads used by [`run_parallel`](Self::run_parallel).
    ///
    /// Defaults to the number of logical CPU cores. `0` is rejected with
    /// [`WalkError::InvalidThreadCount`] when the walk starts. Ignored by
    /// [`run`](Self::run).
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Walk `root` sequentially, calling `visit` for every entry in
    /// pre-order with siblings in sorted order.
    ///
    /// `visit` receives the path, the entry information when inspection
    /// succeeded, and the error when inspection or listing failed. See
    /// [`VisitResult`] for how its answer steers the walk.
    ///
    /// # Errors
    ///
    /// Only the error carried by a [`VisitResult::Stop`] is ever returned.
    /// Inspection and listing failures go to `visit` first.
    pub fn run<F>(&self, root: impl AsRef<Path>, mut visit: F) -> Result<(), WalkError>
    where
        F: FnMut(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult,
    {
        engine::run(root.as_ref(), &*self.inspector, &*self.lister, &mut visit)
    }

    /// Walk `root` with siblings fanned out over a pool of
    /// [`threads`](Self::threads) workers.
    ///
    /// Every directory is still visited before its children, and the return
    /// value is the one [`run`](Self::run) would produce for the same tree.
    /// Visits from different branches interleave, and entries after a
    /// stopping one may already have been visited when the stop is seen.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), plus [`WalkError::InvalidThreadCount`] and
    /// [`WalkError::ThreadPool`] if the pool cannot be set up.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<F>(&self, root: impl AsRef<Path>, visit: F) -> Result<(), WalkError>
    where
        F: Fn(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult + Sync,
    {
        crate::parallel::run(
            root.as_ref(),
            &*self.inspector,
            &*self.lister,
            &visit,
            self.threads,
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
