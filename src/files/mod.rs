use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use glob::{glob_with, MatchOptions, Pattern};
use tracing::warn;
use crate::error::{SiteArchiveError, Result};

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// PDFs sitting directly inside `dir` (extension matched case-insensitively), sorted by name.
pub fn loose_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SiteArchiveError::DirectoryNotFound(dir.display().to_string()));
    }

    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.pdf");
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let matches = glob_with(&pattern.to_string_lossy(), options)
        .map_err(|e| SiteArchiveError::Config(format!("bad listing pattern for {}: {}", dir.display(), e)))?;

    let mut pdfs: Vec<PathBuf> = readable_entries(matches)
        .into_iter()
        .filter(|p| p.is_file())
        .collect();

    pdfs.sort();
    Ok(pdfs)
}

/// Entries that could be read. Unreadable ones are logged and dropped.
fn readable_entries<E: Display>(entries: impl IntoIterator<Item = std::result::Result<PathBuf, E>>) -> Vec<PathBuf> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

/// Immediate child directories of `dir`, sorted by name.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SiteArchiveError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Rename, falling back to copy + remove when the target sits on another device.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if to.exists() {
                return Err(rename_err);
            }
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
