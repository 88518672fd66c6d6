//! Path tokens for packaged archives.
//!
//! A token is the 16-byte BLAKE2b digest of the UTF-8 logical path, salted
//! through BLAKE2b's salt parameter, rendered in base85 with `*` and `?`
//! swapped for `[` and `]`. The packager and the runtime provider must produce
//! identical tokens or nothing resolves.

use crate::error::resource::ResourceError;
use crate::resource::ArchiveStore;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use blake2b_simd::Params;

pub const TOKEN_DIGEST_BYTES: usize = 16;
pub const MAX_SALT_BYTES: usize = blake2b_simd::SALTBYTES;

const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

/// Salted path-to-token function.
#[derive(Clone)]
pub struct PathObfuscator {
    params: Params,
}

impl std::fmt::Debug for PathObfuscator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathObfuscator").finish_non_exhaustive()
    }
}

impl PathObfuscator {
    #[track_caller]
    pub fn new(salt: &[u8]) -> Result<Self, ResourceError> {
        if salt.len() > MAX_SALT_BYTES {
            return Err(ResourceError::InvalidSalt {
                length: salt.len(),
                max: MAX_SALT_BYTES,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut params = Params::new();
        params.hash_length(TOKEN_DIGEST_BYTES).salt(salt);
        Ok(Self { params })
    }

    pub fn token(&self, logical: &str) -> String {
        let digest = self.params.hash(logical.as_bytes());
        url_safe(&encode_base85(digest.as_bytes()))
    }
}

/// RFC 1924 base85 over big-endian 4-byte groups. A trailing partial group is
/// zero-padded and the output trimmed by the pad length.
pub fn encode_base85(bytes: &[u8]) -> String {
    let padding = (4 - bytes.len() % 4) % 4;
    let mut out = Vec::with_capacity((bytes.len() + padding) / 4 * 5);

    for chunk in bytes.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(group);

        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = BASE85_ALPHABET[(value % 85) as usize];
            value /= 85;
        }
        out.extend_from_slice(&digits);
    }

    out.truncate(out.len() - padding);
    out.into_iter().map(char::from).collect()
}

fn url_safe(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| match c {
            '*' => '[',
            '?' => ']',
            other => other,
        })
        .collect()
}

/// Zip archive addressed by path tokens instead of logical names.
#[derive(Debug)]
pub struct ObfuscatedArchive {
    archive: ArchiveStore,
    obfuscator: PathObfuscator,
}

impl ObfuscatedArchive {
    pub fn open(path: impl AsRef<Path>, salt: &[u8]) -> Result<Self, ResourceError> {
        let obfuscator = PathObfuscator::new(salt)?;
        let archive = ArchiveStore::open(path)?;
        Ok(Self {
            archive,
            obfuscator,
        })
    }

    pub fn archive(&self) -> &ArchiveStore {
        &self.archive
    }

    pub(crate) fn transform_path(&self, logical: &str) -> String {
        self.obfuscator.token(logical.trim_start_matches('/'))
    }
}
