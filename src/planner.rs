//! Splitting a buffer into line-aligned chunks.

use std::ops::Range;

use tracing::debug;

pub const NEWLINE: u8 = b'\n';

/// Splits `buf` into at most `chunk_count` contiguous ranges, each of which
/// ends right after a `\n` or at the end of the buffer.
///
/// The stride is `buf.len() / chunk_count`; when that rounds down to zero,
/// `min_chunk_bytes` is used instead. An empty buffer yields no chunks.
pub fn plan_chunks(buf: &[u8], chunk_count: usize, min_chunk_bytes: usize) -> Vec<Range<usize>> {
    let len = buf.len();
    let mut stride = len / chunk_count.max(1);
    if stride == 0 {
        stride = min_chunk_bytes.max(1);
    }

    let mut chunks = Vec::with_capacity(chunk_count.min(len / stride + 1));
    let mut start = 0;
    while start < len {
        let tentative = start + stride;
        let end = if tentative >= len {
            len
        } else {
            match memchr::memchr(NEWLINE, &buf[tentative..]) {
                Some(pos) => tentative + pos + 1,
                None => len,
            }
        };
        chunks.push(start..end);
        start = end;
    }

    debug!(bytes = len, stride, chunks = chunks.len(), "planned chunks");
    chunks
}

/// Chunk start offsets, i.e. every range's `start`, followed by the buffer end.
pub fn boundaries(chunks: &[Range<usize>]) -> Vec<usize> {
    let mut out: Vec<usize> = chunks.iter().map(|c| c.start).collect();
    if let Some(last) = chunks.last() {
        out.push(last.end);
    }
    out
}
