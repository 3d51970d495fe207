//! Moving tool outputs into the dataset layout.
//!
//! Both operations check what is already in place first, so running them
//! again after a partial run is a no-op.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Result of [`relocate_first_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The destination file already existed; nothing was moved.
    AlreadyPresent,
    /// `from` was moved onto the destination.
    Moved { from: PathBuf },
    /// No file in the source directory matched.
    NoCandidate,
}

/// Move every name in `candidates` found in `source_dir` into `dest_dir`.
///
/// Missing candidates are skipped silently and a failed move is logged and
/// skipped, so only failing to create `dest_dir` is an error. Returns the
/// names actually moved.
pub fn relocate(candidates: &[&str], source_dir: &Path, dest_dir: &Path) -> Result<Vec<String>> {
    std::fs::create_dir_all(dest_dir)?;

    let mut moved = Vec::new();
    for name in candidates {
        let src = source_dir.join(name);
        if !src.is_file() {
            continue;
        }
        let dst = dest_dir.join(name);
        match move_file(&src, &dst) {
            Ok(()) => moved.push(name.to_string()),
            Err(e) => log::warn!("failed to move {} -> {}: {e}", src.display(), dst.display()),
        }
    }
    Ok(moved)
}

/// Move the lexicographically first `*<suffix>` file of `source_dir` to `dest_file`.
///
/// When several candidates exist the first by file name wins, whatever order
/// the directory lists them in.
pub fn relocate_first_match(suffix: &str, source_dir: &Path, dest_file: &Path) -> Result<Placement> {
    if dest_file.exists() {
        return Ok(Placement::AlreadyPresent);
    }
    if !source_dir.is_dir() {
        return Ok(Placement::NoCandidate);
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        if entry.path().is_file() && entry.file_name().to_string_lossy().ends_with(suffix) {
            candidates.push(entry.path());
        }
    }
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let Some(src) = candidates.into_iter().next() else {
        return Ok(Placement::NoCandidate);
    };
    if let Some(parent) = dest_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    move_file(&src, dest_file)?;
    Ok(Placement::Moved { from: src })
}

/// Rename, falling back to copy + remove when the rename is refused
/// (e.g. source and destination on different filesystems).
fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Err(e) = std::fs::rename(src, dst) {
        log::debug!("rename {} failed ({e}), copying instead", src.display());
        std::fs::copy(src, dst)?;
        std::fs::remove_file(src)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COLMAP_BINS;

    fn touch(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_relocate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("output");
        let dst = dir.path().join("sparse/0");
        std::fs::create_dir_all(&src).unwrap();
        touch(&src.join("cameras.bin"), "cams");
        touch(&src.join("images.bin"), "imgs");
        touch(&src.join("unrelated.txt"), "keep");

        let moved = relocate(&COLMAP_BINS, &src, &dst).unwrap();
        assert_eq!(moved, vec!["cameras.bin", "images.bin"]);
        assert!(src.join("unrelated.txt").exists());
        assert!(!src.join("cameras.bin").exists());

        let moved = relocate(&COLMAP_BINS, &src, &dst).unwrap();
        assert!(moved.is_empty());
        assert_eq!(std::fs::read_to_string(dst.join("cameras.bin")).unwrap(), "cams");
        assert_eq!(std::fs::read_to_string(dst.join("images.bin")).unwrap(), "imgs");
    }

    #[test]
    fn test_relocate_skips_failed_move() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("output");
        let dst = dir.path().join("sparse/0");
        std::fs::create_dir_all(&src).unwrap();
        touch(&src.join("cameras.bin"), "cams");
        touch(&src.join("images.bin"), "imgs");
        // a directory in the way makes the cameras.bin move fail
        std::fs::create_dir_all(dst.join("cameras.bin/blocker")).unwrap();

        let moved = relocate(&COLMAP_BINS, &src, &dst).unwrap();
        assert_eq!(moved, vec!["images.bin"]);
        assert!(src.join("cameras.bin").is_file());
        assert_eq!(std::fs::read_to_string(dst.join("images.bin")).unwrap(), "imgs");
    }

    #[test]
    fn test_relocate_missing_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let moved = relocate(&COLMAP_BINS, &dir.path().join("nope"), &dir.path().join("dst")).unwrap();
        assert!(moved.is_empty());
        assert!(dir.path().join("dst").is_dir());
    }

    #[test]
    fn test_first_match_is_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.ply", "a.ply", "c.ply", "0.txt"] {
            touch(&dir.path().join(name), name);
        }
        let dest = dir.path().join("point_cloud/point_cloud.ply");

        let placement = relocate_first_match(".ply", dir.path(), &dest).unwrap();
        assert_eq!(
            placement,
            Placement::Moved {
                from: dir.path().join("a.ply")
            }
        );
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "a.ply");
        assert!(dir.path().join("b.ply").exists());
        assert!(dir.path().join("c.ply").exists());
    }

    #[test]
    fn test_first_match_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.ply"), "new");
        let dest = dir.path().join("point_cloud.ply.out");
        touch(&dest, "old");

        let placement = relocate_first_match(".ply", dir.path(), &dest).unwrap();
        assert_eq!(placement, Placement::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");
        assert!(dir.path().join("a.ply").exists());
    }

    #[test]
    fn test_first_match_without_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out/point_cloud.ply");
        assert_eq!(
            relocate_first_match(".ply", dir.path(), &dest).unwrap(),
            Placement::NoCandidate
        );
        assert_eq!(
            relocate_first_match(".ply", &dir.path().join("missing"), &dest).unwrap(),
            Placement::NoCandidate
        );
    }
}
