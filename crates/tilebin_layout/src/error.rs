use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("write of {need} bytes at {at:#x} overflows a {capacity}-byte buffer")]
    Overflow {
        at: usize,
        need: usize,
        capacity: usize,
    },

    #[error("measured {measured} bytes but wrote {written}")]
    SizeMismatch { measured: usize, written: usize },

    #[error("offset {0:#x} does not fit in 32 bits")]
    OffsetOutOfRange(usize),

    #[error("{count} {queue} offset entries left unresolved")]
    UnresolvedOffsets { queue: &'static str, count: usize },

    #[error("no pending {queue} offset entry to resolve")]
    NoPendingOffset { queue: &'static str },

    #[error("{field} value {value} does not fit its field")]
    ValueOutOfRange { field: &'static str, value: usize },

    #[error("string {0:?} contains an interior null byte")]
    InteriorNul(String),

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("string at offset {offset:#x} is not null-terminated valid UTF-8")]
    InvalidString { offset: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
