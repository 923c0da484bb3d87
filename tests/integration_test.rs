use std::fs;
use std::path::{Path, PathBuf};

use fastwalk::{walk, VisitResult, WalkError};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory tree for testing.
///
/// Structure:
/// ```
/// tmp/
///   a
///   b/
///   c
///   d/
///     x
///     y/
///     z/
///       u
///       v
/// ```
fn setup_test_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("a"), "a").unwrap();
    fs::create_dir(root.join("b")).unwrap();
    fs::write(root.join("c"), "c").unwrap();

    let d = root.join("d");
    fs::create_dir(&d).unwrap();
    fs::write(d.join("x"), "x").unwrap();
    fs::create_dir(d.join("y")).unwrap();
    fs::create_dir(d.join("z")).unwrap();
    fs::write(d.join("z").join("u"), "u").unwrap();
    fs::write(d.join("z").join("v"), "v").unwrap();

    dir
}

/// Visit order of a sequential walk that continues past everything.
fn collect(root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    walk(root, |path, _, err| {
        assert!(err.is_none(), "unexpected error at {}", path.display());
        paths.push(path.to_path_buf());
        VisitResult::Continue
    })
    .unwrap();
    paths
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn matches_walkdir_preorder() {
    let dir = setup_test_dir();
    let expected: Vec<PathBuf> = walkdir::WalkDir::new(dir.path())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap().into_path())
        .collect();

    assert_eq!(collect(dir.path()), expected);
    assert_eq!(expected.len(), 10);
}

#[test]
fn reports_kinds_from_lstat() {
    let dir = setup_test_dir();
    let mut dirs = 0;
    let mut files = 0;
    walk(dir.path(), |_, info, _| {
        let info = info.unwrap();
        assert!(info.metadata.is_some());
        if info.is_dir() {
            dirs += 1;
        } else {
            files += 1;
        }
        VisitResult::Continue
    })
    .unwrap();

    // root, b, d, y, z
    assert_eq!(dirs, 5);
    // a, c, x, u, v
    assert_eq!(files, 5);
}

#[test]
fn missing_root_goes_to_the_callback() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let mut calls = Vec::new();
    let result = walk(&missing, |path, info, err| {
        calls.push((path.to_path_buf(), info.is_some(), err.map(|e| e.is_recoverable())));
        VisitResult::Continue
    });
    assert!(result.is_ok());
    assert_eq!(calls, vec![(missing, false, Some(true))]);
}

#[test]
fn file_root_is_visited_alone() {
    let dir = setup_test_dir();
    let file = dir.path().join("a");
    assert_eq!(collect(&file), vec![file]);
}

#[test]
fn skip_dir_on_file_blocks_later_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("dir");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("foo1"), "").unwrap();
    fs::write(sub.join("foo2"), "").unwrap();

    for root in [dir.path(), sub.as_path()] {
        let mut saw_foo2 = false;
        let result = walk(root, |path, _, _| {
            if path.ends_with("foo2") {
                saw_foo2 = true;
            }
            if path.ends_with("foo1") {
                VisitResult::SkipDir
            } else {
                VisitResult::Continue
            }
        });
        assert!(result.is_ok());
        assert!(!saw_foo2, "SkipDir on file foo1 did not block processing of foo2");
    }
}

#[cfg(unix)]
#[test]
fn symlink_to_own_directory_is_not_followed() {
    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("link")).unwrap();

    let visited: Vec<PathBuf> = collect(dir.path())
        .into_iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(visited, vec![PathBuf::new(), PathBuf::from("link")]);
}

#[cfg(unix)]
#[test]
fn unreadable_directories_are_reported_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = setup_test_dir();
    let locked = [dir.path().join("b"), dir.path().join("d")];
    for path in &locked {
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
    }
    // Permission bits do not stop a privileged user.
    if fs::read_dir(&locked[1]).is_ok() {
        for path in &locked {
            fs::set_permissions(path, fs::Permissions::from_mode(0o770)).unwrap();
        }
        return;
    }

    // Absorb: both directories are visited, then reported once each.
    let mut errors = Vec::new();
    let mut visited = Vec::new();
    let result = walk(dir.path(), |path, _, err| {
        match err {
            Some(err) => errors.push(err),
            None => visited.push(path.to_path_buf()),
        }
        VisitResult::Continue
    });
    assert!(result.is_ok());
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, WalkError::PermissionDenied(_))));
    assert_eq!(visited.len(), 5, "root, a, b, c, d: {visited:?}");

    // Escalate: the first failure ends the walk.
    let mut errors = 0;
    let result = walk(dir.path(), |_, _, err| match err {
        Some(err) => {
            errors += 1;
            VisitResult::Stop(err)
        }
        None => VisitResult::Continue,
    });
    assert!(matches!(result, Err(WalkError::PermissionDenied(ref p)) if p == &locked[0]));
    assert_eq!(errors, 1);

    for path in &locked {
        fs::set_permissions(path, fs::Permissions::from_mode(0o770)).unwrap();
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_walk_visits_the_same_entries() {
    use std::sync::Mutex;

    let dir = setup_test_dir();
    let mut expected = collect(dir.path());
    expected.sort();

    let seen = Mutex::new(Vec::new());
    fastwalk::walker()
        .threads(4)
        .run_parallel(dir.path(), |path, _, err| {
            assert!(err.is_none());
            seen.lock().unwrap().push(path.to_path_buf());
            VisitResult::Continue
        })
        .unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, expected);
}
