use crate::error::resource::ResourceError;
use crate::resource::{ResourceDescriptor, ResourceReader};

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::debug;

#[derive(Debug)]
pub struct LocalDirectory {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl LocalDirectory {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let root = root.as_ref().to_path_buf();
        let canonical_root = fs::canonicalize(&root)
            .map_err(|e| ResourceError::provider_init(&root, format!("cannot resolve directory: {e}")))?;

        if !canonical_root.is_dir() {
            return Err(ResourceError::provider_init(&root, "not a directory"));
        }

        debug!("Local provider rooted at {}", canonical_root.display());
        Ok(Self {
            root,
            canonical_root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn transform_path(&self, logical: &str) -> String {
        self.root
            .join(logical.trim_start_matches('/'))
            .to_string_lossy()
            .into_owned()
    }

    /// Only regular files that stay inside the root after symlink and `..`
    /// resolution exist.
    pub(crate) fn exists(&self, physical: &str) -> bool {
        match fs::canonicalize(physical) {
            Ok(resolved) => resolved.starts_with(&self.canonical_root) && resolved.is_file(),
            Err(_) => false,
        }
    }

    pub(crate) fn stat(&self, physical: &str) -> Result<ResourceDescriptor, ResourceError> {
        let metadata = fs::metadata(physical).map_err(|e| map_io(physical, e))?;
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        Ok(ResourceDescriptor::new(metadata.len(), modified))
    }

    pub(crate) fn read_entry(&self, physical: &str) -> Result<ResourceReader, ResourceError> {
        File::open(physical)
            .map(ResourceReader::File)
            .map_err(|e| map_io(physical, e))
    }
}

#[track_caller]
fn map_io(physical: &str, error: std::io::Error) -> ResourceError {
    if error.kind() == ErrorKind::NotFound {
        ResourceError::not_found(physical)
    } else {
        ResourceError::io(physical, error)
    }
}
