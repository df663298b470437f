//! Error types for the parts of the core that can actually fail at the Rust
//! level. Illegal opcodes, bus-open accesses, and malformed GDB packets are
//! modeled as state transitions or wire-level reply codes instead — they
//! never unwind.

use std::fmt;

/// Errors that can occur while loading a program image into the bus.
#[derive(Debug)]
pub enum CoreError {
    /// The image is too large to exist in a 64 KiB address space.
    TooLarge { len: usize, max: usize },
    /// The image could not be read from disk.
    Io(std::io::Error),
    /// An external memory region being mapped overlaps one already installed.
    OverlappingRegion { start: u16, len: u16 },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { len, max } => {
                write!(f, "image is {len} bytes, exceeds the {max}-byte cap")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OverlappingRegion { start, len } => write!(
                f,
                "region at {start:#06X} (len {len}) overlaps an existing mapping"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A bus-open access event: a read or write to an address no region claims.
/// Recorded rather than raised — the read still returns `0xFF` and the
/// write is still dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusEvent {
    pub addr: u16,
    pub write: bool,
}
