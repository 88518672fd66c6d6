//! Static asset responses over the mount registry.

use crate::DEFAULT_DOCUMENT;
use crate::error::asset::AssetError;
use crate::resource::{MountRegistry, ResourceReader};
use crate::server::access::AccessPolicy;
use crate::server::mime;
use crate::server::range::{ByteWindow, parse_range};

use std::io::{Seek, SeekFrom};
use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::http::response::Builder;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::Response;
use log::{trace, warn};
use percent_encoding::percent_decode_str;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

pub struct AssetServer {
    mounts: Arc<MountRegistry>,
    access: AccessPolicy,
}

impl AssetServer {
    pub fn new(mounts: Arc<MountRegistry>, access: AccessPolicy) -> Self {
        Self { mounts, access }
    }

    pub fn mounts(&self) -> &MountRegistry {
        &self.mounts
    }

    /// Answer one GET or HEAD request.
    ///
    /// Performs blocking provider I/O; callers on an async runtime should run
    /// it on a blocking thread.
    ///
    /// # Errors
    ///
    /// - [`AssetError::MethodNotAllowed`] for anything but GET and HEAD
    /// - [`AssetError::Forbidden`] when the user agent is not the client token
    /// - [`AssetError::NotFound`] when no provider has the path
    /// - [`AssetError::RangeNotSatisfiable`] when no requested range fits
    /// - [`AssetError::Internal`] on provider I/O failures
    pub fn respond(
        &self,
        method: &Method,
        uri_path: &str,
        headers: &HeaderMap,
    ) -> Result<Response, AssetError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(AssetError::method_not_allowed(method.as_str()));
        }

        let agent = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
        if !self.access.permits(agent) {
            warn!("Refused asset request for '{uri_path}' from unpaired client");
            return Err(AssetError::forbidden("client token mismatch"));
        }

        let mut path = percent_decode_str(uri_path).decode_utf8_lossy().into_owned();
        if path.ends_with('/') {
            path.push_str(DEFAULT_DOCUMENT);
        }

        let resolved = self.mounts.resolve(&path)?;
        let descriptor = resolved.provider.stat(&resolved.physical_path)?;

        if if_modified_since(headers).is_some_and(|since| since >= descriptor.modified) {
            trace!("'{path}' not modified");
            return build(
                Response::builder()
                    .status(StatusCode::NOT_MODIFIED)
                    .header(header::DATE, httpdate::fmt_http_date(SystemTime::now())),
                Body::empty(),
            );
        }

        let guessed = mime::guess(&path);
        let mut builder = Response::builder()
            .header(header::LAST_MODIFIED, httpdate::fmt_http_date(descriptor.modified))
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_TYPE, guessed.content_type());
        if let Some(encoding) = guessed.encoding {
            builder = builder.header(header::CONTENT_ENCODING, encoding);
        }

        let window = match headers.get(header::RANGE) {
            Some(value) => {
                let raw = value.to_str().unwrap_or_default();
                let window = parse_range(raw, descriptor.size)
                    .ok_or_else(|| AssetError::range_not_satisfiable(raw, descriptor.size))?;
                builder = builder
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_RANGE, window.content_range(descriptor.size));
                window
            }
            None => ByteWindow {
                start: 0,
                end: descriptor.size,
            },
        };
        builder = builder.header(header::CONTENT_LENGTH, window.len());

        let body = if method == Method::HEAD {
            Body::empty()
        } else {
            let reader = resolved.provider.open(&resolved.physical_path)?;
            window_body(reader, window, &path)?
        };

        trace!("Serving '{path}' bytes {}..{}", window.start, window.end);
        build(builder, body)
    }
}

/// `If-Modified-Since` as a timestamp; parameters after `;` and unparseable
/// dates are ignored.
fn if_modified_since(headers: &HeaderMap) -> Option<SystemTime> {
    let raw = headers.get(header::IF_MODIFIED_SINCE)?.to_str().ok()?;
    let date = raw.split(';').next().unwrap_or_default().trim();
    httpdate::parse_http_date(date).ok()
}

/// Files are streamed from disk in chunks; archive entries are already in
/// memory and are sliced.
fn window_body(reader: ResourceReader, window: ByteWindow, path: &str) -> Result<Body, AssetError> {
    match reader {
        ResourceReader::File(mut file) => {
            file.seek(SeekFrom::Start(window.start))
                .map_err(|e| AssetError::internal(format!("seeking '{path}': {e}")))?;
            let bounded = tokio::fs::File::from_std(file).take(window.len());
            Ok(Body::from_stream(ReaderStream::new(bounded)))
        }
        ResourceReader::Memory(cursor) => {
            let mut bytes = cursor.into_inner();
            let start = usize::try_from(window.start).unwrap_or(usize::MAX).min(bytes.len());
            let end = usize::try_from(window.end).unwrap_or(usize::MAX).min(bytes.len());
            bytes.truncate(end);
            bytes.drain(..start);
            Ok(Body::from(bytes))
        }
    }
}

fn build(builder: Builder, body: Body) -> Result<Response, AssetError> {
    builder
        .body(body)
        .map_err(|e| AssetError::internal(format!("building response: {e}")))
}
