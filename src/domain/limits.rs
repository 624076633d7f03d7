/// Largest serialized size, in characters, of one streamed chunk.
pub const MAX_CHUNK_CHARS: usize = 500_000;

/// Largest serialized job submission accepted by the job API.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Largest audio file the worker downloads for `url` jobs.
pub const MAX_DOWNLOAD_BYTES: u64 = 200 * 1024 * 1024;
