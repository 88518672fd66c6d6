//! Backing stores for the assets served to the frontend.
//!
//! A [`ResourceProvider`] answers four questions about a path: how a logical
//! path maps to the provider's own namespace ([`ResourceProvider::transform_path`]),
//! whether something lives there, how big and how old it is, and what its bytes
//! are. Three variants exist:
//!
//! - [`LocalDirectory`] - a plain directory on disk (debug builds)
//! - [`ArchiveStore`] - a zip container, entries looked up by literal name
//! - [`ObfuscatedArchive`] - a zip container whose entry names are salted
//!   BLAKE2b tokens of the logical path (see [`obfuscate`])
//!
//! Providers are layered under URL prefixes by the [`MountRegistry`].

mod archive;
mod local;
pub mod mount;
pub mod obfuscate;

pub use archive::ArchiveStore;
pub use local::LocalDirectory;
pub use mount::{MountRegistry, Resolved};
pub use obfuscate::{ObfuscatedArchive, PathObfuscator};

use crate::error::resource::ResourceError;

use std::fs::File;
use std::io::{Cursor, Read, Result as IoResult, Seek, SeekFrom};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Size and modification time of a resolved resource.
///
/// `modified` is truncated to whole seconds, the resolution HTTP dates carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub size: u64,
    pub modified: SystemTime,
}

impl ResourceDescriptor {
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self {
            size,
            modified: truncate_to_seconds(modified),
        }
    }
}

pub(crate) fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => UNIX_EPOCH + Duration::from_secs(elapsed.as_secs()),
        Err(_) => UNIX_EPOCH,
    }
}

/// Byte stream returned by [`ResourceProvider::open`].
///
/// Directory files are streamed from disk; archive entries are inflated into
/// memory because a zip entry borrows its container.
#[derive(Debug)]
pub enum ResourceReader {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

impl Read for ResourceReader {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        match self {
            ResourceReader::File(file) => file.read(buf),
            ResourceReader::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Seek for ResourceReader {
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        match self {
            ResourceReader::File(file) => file.seek(pos),
            ResourceReader::Memory(cursor) => cursor.seek(pos),
        }
    }
}

/// A backing store mounted under a URL prefix.
#[derive(Debug)]
pub enum ResourceProvider {
    Local(LocalDirectory),
    Archive(ArchiveStore),
    ObfuscatedArchive(ObfuscatedArchive),
}

impl ResourceProvider {
    /// Provider over a directory; fails if `root` is not an existing directory.
    pub fn local(root: impl AsRef<Path>) -> Result<Self, ResourceError> {
        LocalDirectory::open(root).map(ResourceProvider::Local)
    }

    /// Provider over a zip archive with literal entry names.
    pub fn archive(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        ArchiveStore::open(path).map(ResourceProvider::Archive)
    }

    /// Provider over a packaged archive whose entry names are path tokens.
    pub fn obfuscated_archive(path: impl AsRef<Path>, salt: &[u8]) -> Result<Self, ResourceError> {
        ObfuscatedArchive::open(path, salt).map(ResourceProvider::ObfuscatedArchive)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceProvider::Local(_) => "local",
            ResourceProvider::Archive(_) => "archive",
            ResourceProvider::ObfuscatedArchive(_) => "obfuscated-archive",
        }
    }

    /// Map a logical (URL-relative) path into this provider's namespace.
    pub fn transform_path(&self, logical: &str) -> String {
        match self {
            ResourceProvider::Local(local) => local.transform_path(logical),
            ResourceProvider::Archive(_) => logical.trim_start_matches('/').to_string(),
            ResourceProvider::ObfuscatedArchive(obfuscated) => obfuscated.transform_path(logical),
        }
    }

    pub fn exists(&self, physical: &str) -> bool {
        match self {
            ResourceProvider::Local(local) => local.exists(physical),
            ResourceProvider::Archive(archive) => archive.exists(physical),
            ResourceProvider::ObfuscatedArchive(obfuscated) => obfuscated.archive().exists(physical),
        }
    }

    pub fn stat(&self, physical: &str) -> Result<ResourceDescriptor, ResourceError> {
        match self {
            ResourceProvider::Local(local) => local.stat(physical),
            ResourceProvider::Archive(archive) => archive.stat(physical),
            ResourceProvider::ObfuscatedArchive(obfuscated) => obfuscated.archive().stat(physical),
        }
    }

    pub fn open(&self, physical: &str) -> Result<ResourceReader, ResourceError> {
        match self {
            ResourceProvider::Local(local) => local.read_entry(physical),
            ResourceProvider::Archive(archive) => archive.read_entry(physical),
            ResourceProvider::ObfuscatedArchive(obfuscated) => obfuscated.archive().read_entry(physical),
        }
    }
}
