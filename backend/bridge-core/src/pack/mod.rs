//! Offline packager for the obfuscated asset archive.
//!
//! Walks a built frontend tree and writes every file into a zip container
//! under its path token. Entries that would not shrink (already-compressed
//! formats and tiny files) are stored; the rest are deflated at the maximum
//! level. The runtime
//! [`ObfuscatedArchive`](crate::resource::ObfuscatedArchive) provider reads the
//! result with the same salt.

use crate::error::pack::PackError;
use crate::resource::PathObfuscator;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Files smaller than this are stored uncompressed.
pub const MIN_COMPRESS_SIZE: u64 = 256;

/// Deflate level for compressible entries.
pub const DEFLATE_LEVEL: i64 = 9;

/// Extensions of formats that are already compressed.
pub const SKIP_COMPRESS_EXTS: &[&str] = &[
    "3g2", "3gp", "3gpp", "3mf", "7z", "aac", "ace", "amr", "apk", "appx", "appxbundle", "arc",
    "arj", "asf", "avi", "avif", "br", "bz2", "cab", "crypt5", "crypt7", "crypt8", "deb", "dmg",
    "drc", "ear", "gz", "flac", "flv", "gpg", "h264", "h265", "heif", "iso", "jar", "jp2", "jpg",
    "jpeg", "lz", "lz4", "lzma", "lzo", "m4a", "m4p", "m4v", "mkv", "msi", "mov", "mp3", "mp4",
    "mpeg", "mpg", "mpv", "oga", "ogg", "ogv", "opus", "pack", "png", "qt", "rar", "rpm", "rzip",
    "s7z", "sfx", "svgz", "tbz", "tgz", "tlz", "txz", "vob", "webm", "webp", "wim", "wma", "wmv",
    "xz", "z", "zip", "zst",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedEntry {
    pub logical_path: String,
    pub token: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub method: CompressionMethod,
    /// `None` for stored entries.
    pub compression_level: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PackReport {
    pub archive: PathBuf,
    pub entries: Vec<PackedEntry>,
    pub archive_size: u64,
}

impl PackReport {
    pub fn find(&self, logical_path: &str) -> Option<&PackedEntry> {
        self.entries.iter().find(|e| e.logical_path == logical_path)
    }
}

/// Whether a file is written with [`CompressionMethod::Stored`].
pub fn should_store(path: &Path, size: u64) -> bool {
    let skip_ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SKIP_COMPRESS_EXTS.contains(&ext));
    skip_ext || size < MIN_COMPRESS_SIZE
}

/// Pack every file under `source` into `archive`.
///
/// # Arguments
///
/// * `source` - Root of the built frontend; logical paths are relative to it
/// * `archive` - Output path, overwritten if present
/// * `salt` - Token salt; must match the runtime provider's
///
/// # Errors
///
/// Returns [`PackError`] if:
/// - The salt is longer than BLAKE2b allows
/// - `source` cannot be walked or a file cannot be read
/// - The archive cannot be written
pub fn pack_directory(source: &Path, archive: &Path, salt: &[u8]) -> Result<PackReport, PackError> {
    let obfuscator = PathObfuscator::new(salt)?;
    let out = File::create(archive).map_err(|e| PackError::io(archive, e))?;
    let mut writer = ZipWriter::new(out);
    let mut pending = Vec::new();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let logical_path = logical_path(source, path)?;
        let token = obfuscator.token(&logical_path);
        let metadata = entry.metadata()?;
        let (method, level) = if should_store(path, metadata.len()) {
            (CompressionMethod::Stored, None)
        } else {
            (CompressionMethod::Deflated, Some(DEFLATE_LEVEL))
        };

        let mut options = SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level)
            .large_file(metadata.len() >= u64::from(u32::MAX));
        if let Some(stamp) = metadata.modified().ok().and_then(zip_time) {
            options = options.last_modified_time(stamp);
        }

        writer.start_file(token.as_str(), options)?;
        let mut input = File::open(path).map_err(|e| PackError::io(path, e))?;
        io::copy(&mut input, &mut writer).map_err(|e| PackError::io(path, e))?;

        pending.push((logical_path, token, metadata.len(), method, level));
    }

    writer.finish()?;

    let entries = collect_sizes(archive, pending)?;
    let archive_size = fs::metadata(archive).map_err(|e| PackError::io(archive, e))?.len();

    info!("Packed file: {}", archive.display());
    info!("Packed size: {archive_size} bytes ({} entries)", entries.len());

    Ok(PackReport {
        archive: archive.to_path_buf(),
        entries,
        archive_size,
    })
}

fn logical_path(source: &Path, path: &Path) -> Result<String, PackError> {
    let relative = path
        .strip_prefix(source)
        .map_err(|e| PackError::archive(format!("{} is outside {}: {e}", path.display(), source.display())))?;

    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Compressed sizes are only known once the writer has finished each entry.
fn collect_sizes(
    archive: &Path,
    pending: Vec<(String, String, u64, CompressionMethod, Option<i64>)>,
) -> Result<Vec<PackedEntry>, PackError> {
    let file = File::open(archive).map_err(|e| PackError::io(archive, e))?;
    let mut reader = ZipArchive::new(file)?;

    let mut entries = Vec::with_capacity(pending.len());
    for (logical_path, token, original_size, method, compression_level) in pending {
        let compressed_size = reader.by_name(&token)?.compressed_size();
        info!(
            "{logical_path}\t{token}\t{original_size} -> {compressed_size} ({:.2}%)\t{method:?}",
            percentage(compressed_size, original_size)
        );
        entries.push(PackedEntry {
            logical_path,
            token,
            original_size,
            compressed_size,
            method,
            compression_level,
        });
    }
    Ok(entries)
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn zip_time(modified: SystemTime) -> Option<DateTime> {
    // "YYYY-MM-DDTHH:MM:SSZ"
    let stamp = humantime::format_rfc3339_seconds(modified).to_string();
    let field = |range: std::ops::Range<usize>| stamp.get(range)?.parse::<u16>().ok();

    let year = field(0..4)?;
    let month = u8::try_from(field(5..7)?).ok()?;
    let day = u8::try_from(field(8..10)?).ok()?;
    let hour = u8::try_from(field(11..13)?).ok()?;
    let minute = u8::try_from(field(14..16)?).ok()?;
    let second = u8::try_from(field(17..19)?).ok()?;

    DateTime::from_date_and_time(year, month, day, hour, minute, second).ok()
}
