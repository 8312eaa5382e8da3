//! Container index: the outer record directory.
//!
//! The container opens with a fixed prologue, a 16-bit record count, and one
//! fixed-size descriptor per record. Only the descriptor's data offset is
//! meaningful here; record sizes are never stored and must be derived from
//! the next descriptor's offset.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::field::{be_u16, be_u32};
use crate::io::{read_block, ByteSource};

/// Uninterpreted bytes before the record count.
const PROLOGUE_LEN: usize = 76;
/// Prologue plus the 2-byte record count.
const HEADER_LEN: usize = PROLOGUE_LEN + 2;
/// One descriptor: 4-byte data offset plus 4 uninterpreted bytes.
const DESCRIPTOR_LEN: usize = 8;
/// Gap between the last descriptor and the first record payload.
const GAP_LEN: u64 = 2;

/// Ordered record directory mapping record indices to payload offsets.
#[derive(Debug, Clone)]
pub struct PdbIndex {
    offsets: Vec<u32>,
    header_end: u64,
}

impl PdbIndex {
    /// Parses the record directory from the start of the source.
    pub fn read(source: &dyn ByteSource) -> Result<Self> {
        let header = read_block(source, 0, HEADER_LEN, "container header")?;
        let count = be_u16(&header, PROLOGUE_LEN) as usize;

        let table = read_block(
            source,
            HEADER_LEN as u64,
            count * DESCRIPTOR_LEN,
            "record directory",
        )?;
        let offsets = (0..count)
            .map(|i| be_u32(&table, i * DESCRIPTOR_LEN))
            .collect();

        let header_end = (HEADER_LEN + count * DESCRIPTOR_LEN) as u64 + GAP_LEN;
        if header_end > source.len() {
            return Err(Error::TruncatedHeader("record directory"));
        }

        Ok(Self {
            offsets,
            header_end,
        })
    }

    /// Number of records in the directory.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// First byte past the directory, where the metadata headers begin.
    pub fn header_end(&self) -> u64 {
        self.header_end
    }

    /// Byte range of record `index`'s payload.
    ///
    /// A record ends where the next one begins, so the record after the last
    /// bounded one has no derivable size and cannot be read.
    pub fn payload_range(&self, index: usize) -> Result<Range<u64>> {
        let start = *self
            .offsets
            .get(index)
            .ok_or(Error::IndexOutOfRange(index))?;
        let end = *self
            .offsets
            .get(index + 1)
            .ok_or(Error::IndexOutOfRange(index))?;
        if end < start {
            return Err(Error::TruncatedRecord(format!(
                "record {index} directory offsets out of order ({start} > {end})"
            )));
        }
        Ok(start as u64..end as u64)
    }

    /// Reads record `index`'s raw payload.
    pub fn read_record(&self, source: &dyn ByteSource, index: usize) -> Result<Vec<u8>> {
        let range = self.payload_range(index)?;
        let len = (range.end - range.start) as usize;
        source
            .read_at(range.start, len)
            .map_err(|source| Error::ReadFault {
                context: "reading record payload",
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;

    fn directory(offsets: &[u32]) -> MemorySource {
        let mut data = vec![0u8; PROLOGUE_LEN];
        data.extend_from_slice(&(offsets.len() as u16).to_be_bytes());
        for (i, offset) in offsets.iter().enumerate() {
            data.extend_from_slice(&offset.to_be_bytes());
            data.extend_from_slice(&(i as u32).to_be_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        MemorySource::new(data)
    }

    #[test]
    fn test_payload_size_by_subtraction() {
        let index = PdbIndex::read(&directory(&[100, 150, 220])).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.payload_range(0).unwrap(), 100..150);
        assert_eq!(index.payload_range(1).unwrap(), 150..220);
    }

    #[test]
    fn test_last_record_has_no_bounding_descriptor() {
        let index = PdbIndex::read(&directory(&[100, 150, 220])).unwrap();

        assert!(matches!(
            index.payload_range(2),
            Err(Error::IndexOutOfRange(2))
        ));
        assert!(matches!(
            index.payload_range(7),
            Err(Error::IndexOutOfRange(7))
        ));
    }

    #[test]
    fn test_out_of_order_offsets_rejected() {
        let index = PdbIndex::read(&directory(&[200, 100, 300])).unwrap();

        assert!(matches!(
            index.payload_range(0),
            Err(Error::TruncatedRecord(_))
        ));
    }

    #[test]
    fn test_header_end_follows_directory_and_gap() {
        let index = PdbIndex::read(&directory(&[104, 110])).unwrap();
        // 76 + 2 + 2 * 8 + 2
        assert_eq!(index.header_end(), 96);
    }

    #[test]
    fn test_truncated_container() {
        let source = MemorySource::new(vec![0u8; 40]);
        assert!(matches!(
            PdbIndex::read(&source),
            Err(Error::TruncatedHeader("container header"))
        ));

        // Count claims more descriptors than the file holds.
        let mut data = vec![0u8; PROLOGUE_LEN];
        data.extend_from_slice(&200u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            PdbIndex::read(&MemorySource::new(data)),
            Err(Error::TruncatedHeader("record directory"))
        ));
    }
}
