use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Build an absolute glob for the images in `input_dir`.
///
/// `<abs_dir>/[*]<pattern>[*.png|*]`: the leading wildcard is only added for
/// a non-empty pattern and `*.png` is only forced when the pattern doesn't
/// mention `.png` itself. The directory part is glob-escaped, the pattern is not.
pub fn input_glob_pattern(input_dir: &Path, input_pattern: &str) -> Result<String> {
    let prefix = if input_pattern.is_empty() { "" } else { "*" };
    let ext = if input_pattern.contains(".png") { "*" } else { "*.png" };

    let input_dir = if input_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        input_dir
    };
    let root = std::path::absolute(input_dir)?;
    let root = root
        .to_str()
        .ok_or_else(|| Error::NonUtf8Path { path: root.clone() })?
        .replace('\\', "/");
    let root = root.trim_end_matches('/');

    Ok(format!(
        "{}/{prefix}{input_pattern}{ext}",
        glob::Pattern::escape(root)
    ))
}

/// Regular files matching `pattern`, sorted by path.
///
/// Paths end up quoted in a text manifest, so non-UTF-8 ones are rejected.
pub fn input_get_from_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.to_str().is_none() => return Err(Error::NonUtf8Path { path }),
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => debug!("Skipping non-file match {}", path.display()),
            Err(e) => warn!("Error matching pattern: {}", e),
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoInputFiles {
            pattern: pattern.to_string(),
        });
    }
    Ok(files)
}

/// Resolve `input_dir` + `input_pattern` into the glob used and its matches.
pub fn input_discover(input_dir: &Path, input_pattern: &str) -> Result<(String, Vec<PathBuf>)> {
    let pattern = input_glob_pattern(input_dir, input_pattern)?;
    debug!(%pattern, "globbing input files");
    let files = input_get_from_glob(&pattern)?;
    Ok((pattern, files))
}
