//! Directory scanning for the images to show.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;
use crate::natural::sort_paths;

/// Options controlling directory scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional maximum recursion depth. `None` or `Some(0)` means unlimited.
    pub max_depth: Option<usize>,
    /// Allowed extensions (lowercase, without dot).
    pub exts: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: None,
            exts: vec!["jpg".into(), "png".into()],
        }
    }
}

/// Return `true` if `path` has one of the allowed extensions (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Scan `root` for images and return their absolute paths in natural order.
///
/// # Errors
/// Returns [`Error::BadDir`] if `root` is missing or not a directory, and
/// [`Error::Io`] if it cannot be resolved to an absolute path.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn scan_directory(root: &Path, opts: &ScanOptions) -> Result<Vec<PathBuf>, Error> {
    if !root.is_dir() {
        return Err(Error::BadDir(root.to_string_lossy().into_owned()));
    }
    let root = root.canonicalize()?;

    let mut wd = WalkDir::new(&root).follow_links(true);
    if !opts.recursive {
        wd = wd.max_depth(1);
    } else if let Some(d) = opts.max_depth
        && d > 0
    {
        wd = wd.max_depth(d);
    }

    let mut out = Vec::new();
    for entry in wd
        .into_iter()
        // Skip hidden dot-directories *below* the root only.
        .filter_entry(|e| !should_skip_dir(e))
        .filter_map(|res| match res {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
    {
        if entry.file_type().is_file() && is_supported_image(entry.path(), &opts.exts) {
            out.push(entry.into_path());
        }
    }

    sort_paths(&mut out);
    debug!(count = out.len(), "scan complete");
    Ok(out)
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}
