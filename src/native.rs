//! The local-filesystem collaborators used when no custom ones are set.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::entry::{EntryInfo, EntryKind};
use crate::error::WalkError;
use crate::traits::{Inspector, Lister};

/// `lstat`-style inspector backed by [`fs::symlink_metadata`].
///
/// On Windows the directory and reparse-point bits are read straight from
/// the file attributes rather than from the portable file type, so a
/// directory junction comes out as a link-like directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInspector;

impl Inspector for FsInspector {
    fn inspect(&self, path: &Path) -> Result<EntryInfo, WalkError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| WalkError::from_io(path, e))?;
        Ok(classify(&metadata).with_metadata(metadata))
    }
}

#[cfg(windows)]
fn classify(metadata: &fs::Metadata) -> EntryInfo {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;
    const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x400;

    let attrs = metadata.file_attributes();
    let is_dir = attrs & FILE_ATTRIBUTE_DIRECTORY != 0;
    let reparse = attrs & FILE_ATTRIBUTE_REPARSE_POINT != 0;

    let kind = if is_dir {
        EntryKind::Dir
    } else if reparse {
        EntryKind::Symlink
    } else if metadata.file_type().is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    EntryInfo::new(kind, reparse)
}

#[cfg(not(windows))]
fn classify(metadata: &fs::Metadata) -> EntryInfo {
    let ft = metadata.file_type();
    let kind = if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_file() {
        EntryKind::File
    } else if ft.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::Other
    };
    EntryInfo::new(kind, ft.is_symlink())
}

/// Lists a directory with [`fs::read_dir`].
///
/// Any failure, including one on an individual directory entry, fails the
/// whole listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl Lister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<OsString>, WalkError> {
        fs::read_dir(dir)
            .map_err(|e| WalkError::from_io(dir, e))?
            .map(|entry| {
                entry
                    .map(|e| e.file_name())
                    .map_err(|e| WalkError::from_io(dir, e))
            })
            .collect()
    }
}
