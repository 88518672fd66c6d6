use crate::error::resource::ResourceError;
use crate::resource::{ResourceDescriptor, ResourceReader};

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use zip::ZipArchive;
use zip::result::ZipError;

/// Read-only zip container, opened once at mount time.
///
/// Entry reads need `&mut ZipArchive`, so access is serialized through a mutex;
/// the archive itself is never modified.
#[derive(Debug)]
pub struct ArchiveStore {
    path: PathBuf,
    archive: Mutex<ZipArchive<File>>,
}

impl ArchiveStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|e| ResourceError::provider_init(&path, format!("cannot open archive: {e}")))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| ResourceError::provider_init(&path, format!("corrupt archive: {e}")))?;

        info!(
            "Opened archive {} ({} entries)",
            path.display(),
            archive.len()
        );

        Ok(Self {
            path,
            archive: Mutex::new(archive),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn exists(&self, name: &str) -> bool {
        self.lock().index_for_name(name).is_some()
    }

    pub(crate) fn stat(&self, name: &str) -> Result<ResourceDescriptor, ResourceError> {
        let mut archive = self.lock();
        let entry = archive.by_name(name).map_err(|e| map_zip(name, e))?;
        let modified = entry
            .last_modified()
            .map(zip_time_to_system)
            .unwrap_or(UNIX_EPOCH);
        Ok(ResourceDescriptor::new(entry.size(), modified))
    }

    pub(crate) fn read_entry(&self, name: &str) -> Result<ResourceReader, ResourceError> {
        let mut archive = self.lock();
        let mut entry = archive.by_name(name).map_err(|e| map_zip(name, e))?;
        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ResourceError::io(name, e))?;
        Ok(ResourceReader::Memory(Cursor::new(bytes)))
    }

    fn lock(&self) -> MutexGuard<'_, ZipArchive<File>> {
        self.archive.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Zip timestamps carry no zone; they are read as UTC.
fn zip_time_to_system(time: zip::DateTime) -> SystemTime {
    let stamp = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    );
    humantime::parse_rfc3339(&stamp).unwrap_or(UNIX_EPOCH)
}

#[track_caller]
fn map_zip(name: &str, error: ZipError) -> ResourceError {
    match error {
        ZipError::FileNotFound => ResourceError::not_found(name),
        ZipError::Io(source) => ResourceError::io(name, source),
        other => ResourceError::archive(name, other.to_string()),
    }
}
