//! Error type shared by every encode and decode path.

use std::io;

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Errors returned while building, writing or reading a `.grin` container.
#[derive(Debug, Error)]
pub enum GrinError {
    /// The first 32 bits are not the container magic number.
    #[error("not a grin container (magic {found:#x})")]
    BadMagic { found: u32 },
    /// The bit stream ended early or holds an impossible tree.
    #[error("malformed stream: {0}")]
    Malformed(&'static str),
    /// A caller broke a construction contract.
    #[error("usage error: {0}")]
    Usage(String),
    /// The priority queue used during construction ran dry.
    #[error("heap error: {0:?}")]
    Heap(HeapErr),
    /// Underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<HeapErr> for GrinError {
    fn from(e: HeapErr) -> Self {
        GrinError::Heap(e)
    }
}

impl GrinError {
    /// Returns true for errors caused by the input bytes rather than the caller.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, GrinError::BadMagic { .. } | GrinError::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, GrinError>;
