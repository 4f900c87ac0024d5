use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TakbinError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not start with the `TAKDATA1` token. Fatal, never
    /// retried.
    #[error("bad magic: {0:02x?}")]
    BadMagic([u8; 8]),
    /// A nonzero but short read inside a record. Distinct from clean
    /// end-of-stream, which only occurs at a record boundary.
    #[error("truncated record: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    /// Raised by concatenation when inputs disagree on channel depth.
    #[error("channel mismatch: {} has {found} channels, expected {expected}", path.display())]
    ChannelMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("tensor error: {0}")]
    Tch(#[from] tch::TchError),
}
