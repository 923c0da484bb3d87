use crate::error::WalkError;

/// What the visit callback wants the walker to do next.
///
/// Returned once per callback invocation and consumed immediately.
#[derive(Debug)]
pub enum VisitResult {
    /// Keep walking. For a traversable directory this means descending
    /// into it. Returned alongside an error, it absorbs that error.
    Continue,

    /// Prune.
    ///
    /// On a traversable directory the subtree is skipped and the walk
    /// carries on with the directory's siblings. On anything else (a file,
    /// a link-like directory) the rest of the containing directory is
    /// skipped: later siblings are not visited, the containing directory's
    /// own siblings are. Returned alongside an inspection error, it absorbs
    /// the error like `Continue`.
    SkipDir,

    /// Abort the whole walk and return this error to the caller.
    Stop(WalkError),
}

impl VisitResult {
    /// Shorthand for `VisitResult::Stop(WalkError::visit(err))`.
    pub fn stop(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Stop(WalkError::visit(err))
    }
}

/// The outcome of processing one inspected entry, as seen by its parent.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Go on with the next sibling.
    Next,
    /// Skip the remaining siblings in the current directory.
    SkipRest,
    /// Unwind the whole walk.
    Abort(WalkError),
}

impl Flow {
    /// Interpret the callback's answer for an entry whose inspection
    /// succeeded. `traversable` is the entry's own
    /// [`is_traversable`](crate::EntryInfo::is_traversable).
    pub(crate) fn after_visit(result: VisitResult, traversable: bool) -> Self {
        match result {
            VisitResult::Continue => Flow::Next,
            VisitResult::SkipDir if traversable => Flow::Next,
            VisitResult::SkipDir => Flow::SkipRest,
            VisitResult::Stop(err) => Flow::Abort(err),
        }
    }

    /// Interpret the callback's answer for a child that could not be
    /// inspected. Only `Stop` has an effect.
    pub(crate) fn after_error(result: VisitResult) -> Self {
        match result {
            VisitResult::Stop(err) => Flow::Abort(err),
            VisitResult::Continue | VisitResult::SkipDir => Flow::Next,
        }
    }

    /// Collapse the flow that reached the very top of the walk.
    pub(crate) fn finish(self) -> Result<(), WalkError> {
        match self {
            Flow::Next | Flow::SkipRest => Ok(()),
            Flow::Abort(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_dir_prunes_directories_but_ends_the_parent_for_leaves() {
        assert!(matches!(Flow::after_visit(VisitResult::SkipDir, true), Flow::Next));
        assert!(matches!(Flow::after_visit(VisitResult::SkipDir, false), Flow::SkipRest));
        assert!(matches!(Flow::after_visit(VisitResult::Continue, false), Flow::Next));
    }

    #[test]
    fn only_stop_escalates_an_inspection_error() {
        assert!(matches!(Flow::after_error(VisitResult::SkipDir), Flow::Next));
        assert!(matches!(Flow::after_error(VisitResult::Continue), Flow::Next));
        assert!(matches!(
            Flow::after_error(VisitResult::stop("fatal")),
            Flow::Abort(WalkError::Visit(_))
        ));
    }

    #[test]
    fn skip_at_the_top_is_success() {
        assert!(Flow::SkipRest.finish().is_ok());
        assert!(Flow::Abort(WalkError::InvalidThreadCount(0)).finish().is_err());
    }
}
