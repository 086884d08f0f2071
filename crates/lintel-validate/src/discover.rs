use std::path::{Path, PathBuf};

use crate::parsers;

/// Walk `root` respecting `.gitignore`, returning files with known config extensions.
///
/// Applies `excludes` glob patterns to filter results.
///
/// # Errors
///
/// Returns an error if the directory walk encounters an I/O error.
pub fn discover_files(root: &str, excludes: &[String]) -> Result<Vec<PathBuf>, anyhow::Error> {
    let walker = ignore::WalkBuilder::new(root)
        .hidden(false) // don't skip dotfiles (e.g. .eslintrc.json)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if parsers::detect_format(path).is_none() {
            continue;
        }
        if is_excluded(path, excludes) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path, excludes: &[String]) -> bool {
    let path_str = match path.to_str() {
        Some(s) => s.strip_prefix("./").unwrap_or(s),
        None => return false,
    };
    excludes
        .iter()
        .any(|pattern| glob_match::glob_match(pattern, path_str))
}
