use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::entry::EntryInfo;
use crate::error::WalkError;
use crate::traits::{Inspector, Lister};
use crate::visit::{Flow, VisitResult};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// List `dir` and sort the names so sibling order is reproducible no matter
/// what order the lister produced.
pub(crate) fn read_sorted(lister: &dyn Lister, dir: &Path) -> Result<Vec<OsString>, WalkError> {
    let mut names = lister.list(dir)?;
    names.sort_unstable();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Sequential walk
// ---------------------------------------------------------------------------

/// A directory whose children are still being visited.
struct OpenDir {
    path: PathBuf,
    names: std::vec::IntoIter<OsString>,
}

/// What happened when an inspected entry was visited.
enum Entered {
    /// Nothing to descend into; the flow tells the parent what to do next.
    Leaf(Flow),
    /// A traversable directory that was listed successfully.
    Opened(OpenDir),
    /// The walk was cancelled before the directory could be listed.
    Cancelled,
}

/// Visit one inspected entry and, if it is a directory the callback did not
/// prune, list it.
///
/// A listing failure is reported through a second callback invocation for
/// the same path, this time carrying the error.
fn enter<F, C>(
    path: PathBuf,
    info: &EntryInfo,
    lister: &dyn Lister,
    visit: &mut F,
    cancelled: &C,
) -> Entered
where
    F: FnMut(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult,
    C: Fn() -> bool,
{
    let traversable = info.is_traversable();
    match visit(&path, Some(info), None) {
        VisitResult::Continue if traversable => {}
        VisitResult::SkipDir if traversable => {
            trace!(path = %path.display(), "pruned");
            return Entered::Leaf(Flow::Next);
        }
        other => return Entered::Leaf(Flow::after_visit(other, traversable)),
    }

    if cancelled() {
        return Entered::Cancelled;
    }

    match read_sorted(lister, &path) {
        Ok(names) => Entered::Opened(OpenDir {
            path,
            names: names.into_iter(),
        }),
        Err(err) => {
            trace!(path = %path.display(), error = %err, "listing failed");
            Entered::Leaf(Flow::after_visit(visit(&path, Some(info), Some(err)), true))
        }
    }
}

/// Depth-first, pre-order walk of the subtree rooted at an already
/// inspected entry, driven by an explicit stack of open directories so
/// tree depth is bounded by memory rather than by the call stack.
///
/// The top of the stack is always the parent of the entry being processed.
/// A [`Flow::SkipRest`] from a child therefore just drops the top frame.
///
/// `cancelled` is polled before every listing and inspection; once it
/// reports `true` no new work starts and `None` is returned.
pub(crate) fn walk_subtree<F, C>(
    path: PathBuf,
    info: &EntryInfo,
    inspector: &dyn Inspector,
    lister: &dyn Lister,
    visit: &mut F,
    cancelled: C,
) -> Option<Flow>
where
    F: FnMut(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult,
    C: Fn() -> bool,
{
    let mut stack = match enter(path, info, lister, visit, &cancelled) {
        Entered::Leaf(flow) => return Some(flow),
        Entered::Opened(dir) => vec![dir],
        Entered::Cancelled => return None,
    };

    while let Some(top) = stack.last_mut() {
        let Some(name) = top.names.next() else {
            stack.pop();
            continue;
        };
        if cancelled() {
            return None;
        }
        let child = top.path.join(&name);

        let info = match inspector.inspect(&child) {
            Ok(info) => info,
            Err(err) => {
                if let Flow::Abort(err) = Flow::after_error(visit(&child, None, Some(err))) {
                    return Some(Flow::Abort(err));
                }
                continue;
            }
        };

        match enter(child, &info, lister, visit, &cancelled) {
            Entered::Opened(dir) => stack.push(dir),
            Entered::Leaf(Flow::Next) => {}
            Entered::Leaf(Flow::SkipRest) => {
                stack.pop();
            }
            Entered::Leaf(Flow::Abort(err)) => return Some(Flow::Abort(err)),
            Entered::Cancelled => return None,
        }
    }

    Some(Flow::Next)
}

/// Sequential walk from `root`, the reference behaviour.
pub(crate) fn run<F>(
    root: &Path,
    inspector: &dyn Inspector,
    lister: &dyn Lister,
    visit: &mut F,
) -> Result<(), WalkError>
where
    F: FnMut(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult,
{
    debug!(root = %root.display(), "sequential walk started");

    let info = match inspector.inspect(root) {
        Ok(info) => info,
        Err(err) => return Flow::after_error(visit(root, None, Some(err))).finish(),
    };

    // Nothing cancels a sequential walk.
    let result = walk_subtree(root.to_path_buf(), &info, inspector, lister, visit, || false)
        .map_or(Ok(()), Flow::finish);

    debug!(root = %root.display(), ok = result.is_ok(), "sequential walk finished");
    result
}
