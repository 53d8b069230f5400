//! Local filesystem operations

use crate::domain::DirectoryService;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const WRITE_PROBE_FILE: &str = ".shelfspot-write-test";

/// [`DirectoryService`] over the local disk. Relative paths resolve against
/// `base`.
#[derive(Debug, Clone)]
pub struct LocalDirectoryService {
    base: PathBuf,
}

impl LocalDirectoryService {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn from_current_dir() -> Result<Self> {
        let base = std::env::current_dir().context("failed to read working directory")?;
        Ok(Self::new(base))
    }
}

impl DirectoryService for LocalDirectoryService {
    fn check_write_access(&self, path: &Path) -> bool {
        let probe = path.join(WRITE_PROBE_FILE);
        let result = fs::create_dir_all(path)
            .and_then(|_| fs::write(&probe, b"probe"))
            .and_then(|_| fs::remove_file(&probe));

        if let Err(e) = &result {
            debug!(path = %path.display(), error = %e, "Directory is not writable");
        }
        result.is_ok()
    }

    fn exist_or_create(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create {}", path.display()))
    }

    fn copy_directory_to_directory(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Ok(());
        }

        // A target inside the source must not be walked into
        let walker = WalkDir::new(from)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(to));
        for entry in walker {
            let entry = entry?;
            let relative = entry.path().strip_prefix(from)?;
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if is_same_file(entry.path(), &target) {
                    continue;
                }
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target).with_context(|| {
                    format!("failed to copy {} to {}", entry.path().display(), target.display())
                })?;
            }
        }
        Ok(())
    }

    fn clear_and_delete_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_dir_all(path).with_context(|| format!("failed to delete {}", path.display()))
    }

    fn normalize(&self, path: &str) -> PathBuf {
        let path = path.trim().replace('\\', "/");
        let joined = self.base.join(path);

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }
        normalized
    }
}

/// Whether `target` already holds the same bytes as `source`
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (fs::metadata(source), fs::metadata(target)) {
        (Ok(a), Ok(b)) if a.len() == b.len() => {
            matches!((fs::read(source), fs::read(target)), (Ok(x), Ok(y)) if x == y)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_resolves_relative_and_dot_segments() {
        let dirs = LocalDirectoryService::new("/srv/shelfspot");

        assert_eq!(
            dirs.normalize("config/bookmarks"),
            PathBuf::from("/srv/shelfspot/config/bookmarks")
        );
        assert_eq!(
            dirs.normalize("./config/../data/bookmarks/"),
            PathBuf::from("/srv/shelfspot/data/bookmarks")
        );
        assert_eq!(
            dirs.normalize("/mnt/bookmarks"),
            PathBuf::from("/mnt/bookmarks")
        );
    }
}
