// Atomic "latest" pointer.
//
// On unix the pointer is a relative symlink, replaced by creating the
// new link at a temporary name and renaming over the old one — readers
// never observe a missing or half-written pointer. Elsewhere it is a
// pointer file holding the target's file name, replaced the same way.

use std::fs;
use std::path::{Path, PathBuf};

use super::OutputError;

pub(super) struct LatestPointer<'a> {
    dir: &'a Path,
    link_name: String,
}

impl<'a> LatestPointer<'a> {
    pub(super) fn new(dir: &'a Path, link_name: String) -> Self {
        Self { dir, link_name }
    }

    fn link_path(&self) -> PathBuf {
        self.dir.join(&self.link_name)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.tmp", self.link_name))
    }

    /// The file the pointer currently designates, if it exists.
    pub(super) fn resolve(&self) -> Option<PathBuf> {
        let link = self.link_path();
        #[cfg(unix)]
        {
            let target = fs::read_link(&link).ok()?;
            let resolved =
                if target.is_absolute() { target } else { self.dir.join(target) };
            resolved.is_file().then_some(resolved)
        }
        #[cfg(not(unix))]
        {
            let name = fs::read_to_string(&link).ok()?;
            let resolved = self.dir.join(name.trim());
            resolved.is_file().then_some(resolved)
        }
    }

    /// Repoint atomically at `target_name` (a file name inside the
    /// output directory).
    pub(super) fn set(&self, target_name: &str) -> Result<(), OutputError> {
        let temp = self.temp_path();
        // A leftover temp link from an interrupted run would make
        // symlink creation fail.
        let _ = fs::remove_file(&temp);

        #[cfg(unix)]
        std::os::unix::fs::symlink(target_name, &temp)
            .map_err(|source| OutputError::Io { path: temp.clone(), source })?;
        #[cfg(not(unix))]
        fs::write(&temp, target_name)
            .map_err(|source| OutputError::Io { path: temp.clone(), source })?;

        let link = self.link_path();
        fs::rename(&temp, &link).map_err(|source| OutputError::Io { path: link, source })
    }
}
