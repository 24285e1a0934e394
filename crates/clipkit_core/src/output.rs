//! Output path allocation.
//!
//! Generated media files are named `{prefix}{NN}{ext}` with a zero-padded
//! sequential index derived by scanning the output directory. Allocation is
//! scan-then-pick: nothing is reserved, so concurrent invocations against
//! the same directory can race (documented known gap).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClipError, OpResult};

/// Allocate the next free numbered path under `dir`.
///
/// Creates `dir` if absent. Existing entries named `{prefix}...{ext}` whose
/// middle part (after trimming `_`) is purely digits contribute their index;
/// the result uses the maximum found plus one, zero-padded to `pad` digits.
/// With no matching entries the index is 1.
pub fn next_numbered_path(dir: &Path, prefix: &str, pad: usize, ext: &str) -> OpResult<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| ClipError::io_error(format!("creating {}", dir.display()), e))?;

    let entries = fs::read_dir(dir)
        .map_err(|e| ClipError::io_error(format!("listing {}", dir.display()), e))?;

    let mut max_idx: u64 = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(middle) = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(ext))
        else {
            continue;
        };

        let digits = middle.trim_matches('_');
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(idx) = digits.parse::<u64>() {
            max_idx = max_idx.max(idx);
        }
    }

    let next = max_idx + 1;
    Ok(dir.join(format!("{prefix}{next:0pad$}{ext}")))
}

/// Find a sibling name that does not exist yet.
///
/// If `path` is free it is returned unchanged; otherwise `_1`, `_2`, ... is
/// appended before the extension until a free name is found. Used for
/// staging files that must not overwrite a previous run's output.
pub fn unique_sibling_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut idx = 1;
    loop {
        let candidate = parent.join(format!("{stem}_{idx}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn allocator_starts_at_one() {
        let dir = tempdir().unwrap();
        let path = next_numbered_path(dir.path(), "cut_", 2, ".mp4").unwrap();
        assert_eq!(path, dir.path().join("cut_01.mp4"));
    }

    #[test]
    fn allocator_increments_past_maximum() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("cut_01.mp4")).unwrap();
        File::create(dir.path().join("cut_07.mp4")).unwrap();
        File::create(dir.path().join("cut_03.mp4")).unwrap();

        let path = next_numbered_path(dir.path(), "cut_", 2, ".mp4").unwrap();
        assert_eq!(path, dir.path().join("cut_08.mp4"));
    }

    #[test]
    fn allocator_skips_non_digit_middles() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("cut_final.mp4")).unwrap();
        File::create(dir.path().join("cut_02b.mp4")).unwrap();
        File::create(dir.path().join("cut_02.mp4")).unwrap();

        let path = next_numbered_path(dir.path(), "cut_", 2, ".mp4").unwrap();
        assert_eq!(path, dir.path().join("cut_03.mp4"));
    }

    #[test]
    fn allocator_ignores_other_prefixes_and_extensions() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("overlay_09.mp4")).unwrap();
        File::create(dir.path().join("cut_05.mov")).unwrap();

        let path = next_numbered_path(dir.path(), "cut_", 2, ".mp4").unwrap();
        assert_eq!(path, dir.path().join("cut_01.mp4"));
    }

    #[test]
    fn allocator_parses_underscore_separated_indices() {
        // Names like "concat__00004.mp4" (prefix "concat_") still count.
        let dir = tempdir().unwrap();
        File::create(dir.path().join("concat__00004.mp4")).unwrap();

        let path = next_numbered_path(dir.path(), "concat_", 5, ".mp4").unwrap();
        assert_eq!(path, dir.path().join("concat_00005.mp4"));
    }

    #[test]
    fn allocator_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("out");
        let path = next_numbered_path(&target, "clip_", 5, ".webm").unwrap();
        assert!(target.is_dir());
        assert_eq!(path, target.join("clip_00001.webm"));
    }

    #[test]
    fn unique_sibling_leaves_free_name_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audio_temp.wav");
        assert_eq!(unique_sibling_path(&path), path);
    }

    #[test]
    fn unique_sibling_appends_counter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audio_temp.wav");
        File::create(&path).unwrap();
        File::create(dir.path().join("audio_temp_1.wav")).unwrap();

        assert_eq!(
            unique_sibling_path(&path),
            dir.path().join("audio_temp_2.wav")
        );
    }
}
