//! Single `Range: bytes=` window parsing.

/// Half-open byte window `[start, end)` within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
}

impl ByteWindow {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.start, self.end - 1)
    }
}

/// First satisfiable window of a `bytes=` range list, if any.
///
/// `a-b` is inclusive with `b` clamped to the resource, `a-` runs to the end
/// and `-n` selects the last `n` bytes. Malformed and out-of-bounds ranges
/// are skipped.
pub fn parse_range(header: &str, size: u64) -> Option<ByteWindow> {
    let ranges = header.strip_prefix("bytes=")?;

    ranges
        .split(',')
        .filter_map(|range| range.split_once('-'))
        .filter_map(|(start, end)| window(start.trim(), end.trim(), size))
        .next()
}

fn window(start: &str, end: &str, size: u64) -> Option<ByteWindow> {
    let (start, end) = match (start.is_empty(), end.is_empty()) {
        (true, true) => return None,
        (true, false) => (size.saturating_sub(end.parse::<u64>().ok()?), size),
        (false, true) => (start.parse::<u64>().ok()?, size),
        (false, false) => {
            let last = end.parse::<u64>().ok()?;
            (start.parse::<u64>().ok()?, last.saturating_add(1).min(size))
        }
    };

    (start < end && end <= size).then_some(ByteWindow { start, end })
}
