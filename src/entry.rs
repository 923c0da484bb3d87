/// What the [`Inspector`](crate::traits::Inspector) reported about a path.
///
/// Two flags drive the walk: `is_dir()` and `is_link_like()`. A directory
/// that is also link-like (a junction, a directory symlink on Windows, a
/// mount point reparse tag) is treated as a leaf. Only
/// [`is_traversable`](EntryInfo::is_traversable) entries are ever listed.
///
/// `metadata` carries the native metadata when the inspector had it at hand
/// ([`FsInspector`](crate::FsInspector) always fills it in). Custom
/// inspectors may leave it empty.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    /// What kind of entry this is.
    pub kind: EntryKind,

    /// Whether the entry redirects somewhere else (symlink, junction,
    /// any reparse point).
    pub link_like: bool,

    /// Native metadata, as read without following links.
    pub metadata: Option<std::fs::Metadata>,
}

impl EntryInfo {
    /// Entry info without native metadata.
    pub fn new(kind: EntryKind, link_like: bool) -> Self {
        Self {
            kind,
            link_like,
            metadata: None,
        }
    }

    /// A regular file.
    pub fn file() -> Self {
        Self::new(EntryKind::File, false)
    }

    /// An ordinary, traversable directory.
    pub fn dir() -> Self {
        Self::new(EntryKind::Dir, false)
    }

    /// A link-like entry. `is_dir` marks directory-shaped links such as
    /// junctions; they are still never descended into.
    pub fn link(is_dir: bool) -> Self {
        let kind = if is_dir { EntryKind::Dir } else { EntryKind::Symlink };
        Self::new(kind, true)
    }

    /// Attach the native metadata the inspector read.
    pub fn with_metadata(mut self, metadata: std::fs::Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether the entry is directory-shaped, link-like or not.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Whether the entry redirects elsewhere and must not be followed.
    pub fn is_link_like(&self) -> bool {
        self.link_like
    }

    /// A real directory the walker will list and descend into.
    pub fn is_traversable(&self) -> bool {
        self.is_dir() && !self.link_like
    }
}

/// The kind of an inspected entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory, possibly link-like (see [`EntryInfo::link_like`]).
    Dir,

    /// A symbolic link that is not directory-shaped.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_like_directories_are_not_traversable() {
        let junction = EntryInfo::link(true);
        assert!(junction.is_dir());
        assert!(junction.is_link_like());
        assert!(!junction.is_traversable());

        let symlink = EntryInfo::link(false);
        assert!(!symlink.is_dir());
        assert_eq!(symlink.kind, EntryKind::Symlink);

        assert!(EntryInfo::dir().is_traversable());
        assert!(!EntryInfo::file().is_traversable());
    }
}
