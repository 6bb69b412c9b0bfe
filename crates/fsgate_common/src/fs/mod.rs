//! # FsGateFS
//!
//! The native provider primitives the facade delegates to.
//!
//! FsGateFS wraps tokio's filesystem operations with consistent error context
//! using anyhow::Context. Each method reports failures as
//! "Failed to [operation] [path]" while preserving the original io error, so
//! callers can still inspect its `ErrorKind` through the anyhow chain.

mod dir;
mod digest;
mod meta;
mod read;
mod transfer;
mod write;

/// Size of one read while loading a whole file or digesting it.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// FsGateFS provides the filesystem operations used by the facade with
/// consistent error handling.
#[derive(Debug)]
pub struct FsGateFS;
