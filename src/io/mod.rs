//! IO abstractions for random-access byte reading.

mod byte_source;

pub use byte_source::{ByteSource, FileSource, MemorySource};

use crate::error::{Error, Result};

/// Reads a fixed-size block, mapping a short read to a truncated-header
/// failure and anything else to a read fault.
pub(crate) fn read_block(
    source: &dyn ByteSource,
    offset: u64,
    len: usize,
    what: &'static str,
) -> Result<Vec<u8>> {
    source.read_at(offset, len).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::TruncatedHeader(what),
        _ => Error::ReadFault {
            context: what,
            source: e,
        },
    })
}
