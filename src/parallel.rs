//! Concurrent fan-out over the children of each directory.
//!
//! Siblings are inspected and walked on a rayon pool. Each directory keeps a
//! `cut`: the lowest child index whose outcome ended the directory early
//! (an abort, or a skip on a leaf). Work at a higher index, and everything
//! below it, stops starting new inspections or listings once it sees the
//! cut. Outcomes are folded back in sibling order, so the earliest failing
//! branch decides the result exactly as a sequential walk would.
//!
//! Fan-out recurses on the worker's call stack, so it is limited to the top
//! [`FANOUT_DEPTH`] levels below the root. Deeper subtrees are finished by
//! the stack-driven sequential walker inside the task that reached them,
//! which keeps stack use bounded for any tree depth.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::engine::{read_sorted, walk_subtree};
use crate::entry::EntryInfo;
use crate::error::WalkError;
use crate::traits::{Inspector, Lister};
use crate::visit::{Flow, VisitResult};

/// Levels below the root that are fanned out over the pool.
pub(crate) const FANOUT_DEPTH: usize = 64;

/// Worker stack size. Rayon runs stolen jobs on top of a blocked `join`, so
/// a worker may hold several fan-out chains at once.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Cancellation state of one open directory.
struct Frame<'a> {
    /// The parent frame and this directory's index among its siblings.
    parent: Option<(&'a Frame<'a>, usize)>,
    cut: AtomicUsize,
}

impl<'a> Frame<'a> {
    fn root() -> Self {
        Self {
            parent: None,
            cut: AtomicUsize::new(usize::MAX),
        }
    }

    fn child(&'a self, index: usize) -> Frame<'a> {
        Frame {
            parent: Some((self, index)),
            cut: AtomicUsize::new(usize::MAX),
        }
    }

    /// Whether some ancestor was cut before the branch leading here.
    fn cancelled(&self) -> bool {
        let mut cur = self;
        while let Some((parent, index)) = cur.parent {
            if parent.cut.load(Ordering::Acquire) < index {
                return true;
            }
            cur = parent;
        }
        false
    }

    /// Whether child `index` of this directory must not start.
    fn child_cancelled(&self, index: usize) -> bool {
        self.cut.load(Ordering::Acquire) < index || self.cancelled()
    }
}

enum Branch {
    Done(Flow),
    /// Abandoned after a cut; the fold never reaches it.
    Cancelled,
}

struct Shared<'a, F> {
    inspector: &'a dyn Inspector,
    lister: &'a dyn Lister,
    visit: &'a F,
}

pub(crate) fn run<F>(
    root: &Path,
    inspector: &dyn Inspector,
    lister: &dyn Lister,
    visit: &F,
    threads: usize,
) -> Result<(), WalkError>
where
    F: Fn(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult + Sync,
{
    if threads == 0 {
        return Err(WalkError::InvalidThreadCount(threads));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("fastwalk-{i}"))
        .stack_size(WORKER_STACK_SIZE)
        .build()
        .map_err(|e| WalkError::ThreadPool(e.to_string()))?;

    debug!(root = %root.display(), threads, "parallel walk started");

    let shared = Shared {
        inspector,
        lister,
        visit,
    };

    let result = pool.install(|| {
        let info = match shared.inspector.inspect(root) {
            Ok(info) => info,
            Err(err) => return Flow::after_error(visit(root, None, Some(err))).finish(),
        };
        match walk_entry(&shared, root, &info, &Frame::root(), 0) {
            Branch::Done(flow) => flow.finish(),
            // The root frame has no parent to be cut by.
            Branch::Cancelled => Ok(()),
        }
    });

    debug!(root = %root.display(), ok = result.is_ok(), "parallel walk finished");
    result
}

fn walk_entry<F>(
    shared: &Shared<'_, F>,
    path: &Path,
    info: &EntryInfo,
    frame: &Frame<'_>,
    depth: usize,
) -> Branch
where
    F: Fn(&Path, Option<&EntryInfo>, Option<WalkError>) -> VisitResult + Sync,
{
    let visit = shared.visit;
    if depth >= FANOUT_DEPTH {
        let mut visit = visit;
        return match walk_subtree(
            path.to_path_buf(),
            info,
            shared.inspector,
            shared.lister,
            &mut visit,
            || frame.cancelled(),
        ) {
            Some(flow) => Branch::Done(flow),
            None => Branch::Cancelled,
        };
    }

    let traversable = info.is_traversable();
    match visit(path, Some(info), None) {
        VisitResult::Continue if traversable => {}
        VisitResult::SkipDir if traversable => {
            trace!(path = %path.display(), "pruned");
            return Branch::Done(Flow::Next);
        }
        other => return Branch::Done(Flow::after_visit(other, traversable)),
    }

    if frame.cancelled() {
        return Branch::Cancelled;
    }

    let names = match read_sorted(shared.lister, path) {
        Ok(names) => names,
        Err(err) => {
            trace!(path = %path.display(), error = %err, "listing failed");
            return Branch::Done(Flow::after_visit(visit(path, Some(info), Some(err)), true));
        }
    };

    let outcomes: Vec<Branch> = names
        .par_iter()
        .enumerate()
        .map(|(index, name)| {
            if frame.child_cancelled(index) {
                return Branch::Cancelled;
            }
            let child = path.join(name);
            let branch = match shared.inspector.inspect(&child) {
                Err(err) => Branch::Done(Flow::after_error(visit(&child, None, Some(err)))),
                Ok(child_info) => {
                    match walk_entry(shared, &child, &child_info, &frame.child(index), depth + 1) {
                        // A skip that ended a subdirectory early stays inside it.
                        Branch::Done(Flow::SkipRest) if child_info.is_traversable() => {
                            Branch::Done(Flow::Next)
                        }
                        other => other,
                    }
                }
            };
            if let Branch::Done(Flow::SkipRest | Flow::Abort(_)) = branch {
                let prev = frame.cut.fetch_min(index, Ordering::AcqRel);
                if prev > index {
                    trace!(path = %path.display(), index, "siblings cancelled");
                }
            }
            branch
        })
        .collect();

    for outcome in outcomes {
        match outcome {
            Branch::Done(Flow::Next) => {}
            decided => return decided,
        }
    }
    Branch::Done(Flow::Next)
}
