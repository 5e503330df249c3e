use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Longest output path accepted by default.
pub const MAX_PATH: usize = if cfg!(windows) { 260 } else { 4096 };

const SEPARATOR: &str = "/";
const EXTENSION: &str = ".mp4";

fn path_len(p: &Path) -> usize {
    p.to_string_lossy().chars().count()
}

/// Append `.mp4` to a non-empty output name that doesn't mention it.
pub fn output_filename_normalize(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() || name.to_lowercase().contains(EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{EXTENSION}")
    }
}

/// Resolve the video destination next to `first_input`.
///
/// Without `output_filename` the first input's name is reused with an `.mp4`
/// extension, truncating the stem when the path exceeds `max_path`. An
/// explicit name is never truncated: an overlong path is an error.
pub fn resolve_output_path(
    output_filename: &str,
    first_input: &Path,
    max_path: usize,
) -> Result<PathBuf> {
    let dir = first_input.parent().unwrap_or_else(|| Path::new(""));

    if !output_filename.is_empty() {
        let path = dir.join(output_filename);
        let len = path_len(&path);
        if len > max_path {
            return Err(Error::OutputPathTooLong {
                path,
                len,
                max: max_path,
            });
        }
        return Ok(path);
    }

    let path = first_input.with_extension(&EXTENSION[1..]);
    if path_len(&path) <= max_path {
        return Ok(path);
    }

    let used = path_len(dir) + SEPARATOR.len() + EXTENSION.len();
    if used >= max_path {
        return Err(Error::OutputDirTooLong {
            dir: dir.to_path_buf(),
            max: max_path,
        });
    }
    let stem: String = first_input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .chars()
        .take(max_path - used)
        .collect();
    Ok(dir.join(format!("{stem}{EXTENSION}")))
}
