//! Whole-block compression for Quicklist Nodes, backed by `zstd` as an
//! opaque whole-block compressor.

/// Default zstd compression level. Low, since Node payloads are small
/// (at most a few tens of KiB) and latency matters more than ratio here.
const COMPRESSION_LEVEL: i32 = 1;

/// Compresses `bytes` on a best-effort basis. Returns `None` if compression
/// did not shrink the payload, in which case the caller keeps it raw.
pub fn compress(bytes: &[u8]) -> Option<Vec<u8>> {
    let compressed = zstd::bulk::compress(bytes, COMPRESSION_LEVEL).ok()?;
    if compressed.len() < bytes.len() {
        Some(compressed)
    } else {
        None
    }
}

/// Decompresses `bytes` back to `original_len` bytes. Fatal on failure —
/// a corrupt compressed Node is a structural invariant breach, not a
/// reported error.
pub fn decompress(
    bytes: &[u8],
    original_len: usize,
) -> Vec<u8> {
    zstd::bulk::decompress(bytes, original_len).expect("quicklist node failed to decompress")
}
