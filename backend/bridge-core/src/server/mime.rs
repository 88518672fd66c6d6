//! Content-Type and Content-Encoding guessing from request paths.

use std::borrow::Cow;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Extensions that stand for a compressed variant of another extension.
const SUFFIX_ALIASES: &[(&str, &str)] = &[
    (".svgz", ".svg.gz"),
    (".tgz", ".tar.gz"),
    (".taz", ".tar.gz"),
    (".tz", ".tar.gz"),
    (".tbz2", ".tar.bz2"),
    (".txz", ".tar.xz"),
];

const ENCODINGS: &[(&str, &str)] = &[
    (".gz", "gzip"),
    (".Z", "compress"),
    (".bz2", "bzip2"),
    (".xz", "xz"),
    (".br", "br"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessedType {
    pub mime: String,
    pub encoding: Option<&'static str>,
}

impl GuessedType {
    /// `Content-Type` header value; text types are declared UTF-8.
    pub fn content_type(&self) -> String {
        if self.mime.starts_with("text/") {
            format!("{};charset=utf-8", self.mime)
        } else {
            self.mime.clone()
        }
    }
}

pub fn guess(path: &str) -> GuessedType {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (mut stem, mut ext) = split_extension(name);

    let expanded: String;
    if let Some((_, alias)) = SUFFIX_ALIASES.iter().find(|(from, _)| *from == ext) {
        expanded = format!("{stem}{alias}");
        (stem, ext) = split_extension(&expanded);
    }

    let mut encoding = None;
    if let Some((_, name)) = ENCODINGS.iter().find(|(suffix, _)| *suffix == ext) {
        encoding = Some(*name);
        (_, ext) = split_extension(stem);
    }

    GuessedType {
        mime: mime_for_extension(ext).into_owned(),
        encoding,
    }
}

fn mime_for_extension(ext: &str) -> Cow<'static, str> {
    let bare = ext.trim_start_matches('.');
    if bare.is_empty() {
        return Cow::Borrowed(FALLBACK_MIME);
    }

    match bare.to_ascii_lowercase().as_str() {
        "js" | "mjs" => Cow::Borrowed("text/javascript"),
        "wasm" => Cow::Borrowed("application/wasm"),
        "webmanifest" => Cow::Borrowed("application/manifest+json"),
        other => mime_guess::from_ext(other)
            .first()
            .map(|mime| Cow::Owned(mime.essence_str().to_string()))
            .unwrap_or(Cow::Borrowed(FALLBACK_MIME)),
    }
}

/// Splits at the last dot of a file name; a leading dot is part of the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if name[..index].chars().any(|c| c != '.') => name.split_at(index),
        _ => (name, ""),
    }
}
