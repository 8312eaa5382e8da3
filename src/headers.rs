//! Metadata header parsers: compression, format, and extended metadata.
//!
//! The three blocks sit immediately after the record directory and must be
//! parsed in order; each parser advances an explicit offset cursor so the
//! next one starts in the right place. The extended metadata block is only
//! present when the format header's flags say so.

use crate::error::{Error, Result};
use crate::field::{be_u16, be_u32};
use crate::io::{read_block, ByteSource};

/// Length of the compression block.
const PALMDOC_LEN: usize = 16;
/// Fixed region of the format block; the declared length may exceed this.
const MOBI_FIXED_LEN: usize = 232;
/// Extended metadata prologue: magic, declared length, record count.
const EXTH_PROLOGUE_LEN: usize = 12;
/// Extended metadata record sub-header: type, total length.
const EXTH_RECORD_HEADER_LEN: usize = 8;

/// Extended metadata record types consumed by this crate.
pub const EXTH_AUTHOR: u32 = 100;
pub const EXTH_COVER_OFFSET: u32 = 201;
pub const EXTH_TITLE: u32 = 503;

/// The compression block. Only the decompressed text length matters here;
/// the rest of the block describes the fixed record size this crate does
/// not need.
#[derive(Debug, Clone, Copy)]
pub struct PalmDocHeader {
    /// Exact byte length of the fully decompressed, concatenated text.
    pub text_length: u32,
}

impl PalmDocHeader {
    pub fn read(source: &dyn ByteSource, pos: &mut u64) -> Result<Self> {
        let block = read_block(source, *pos, PALMDOC_LEN, "compression header")?;
        *pos += PALMDOC_LEN as u64;

        Ok(Self {
            text_length: be_u32(&block, 4),
        })
    }
}

/// The format block: structural record pointers and the extended-metadata
/// presence flag.
#[derive(Debug, Clone, Copy)]
pub struct MobiHeader {
    pub exth_present: bool,
    pub first_content_record: u16,
    pub first_image_record: u32,
    pub first_non_book_record: u32,
}

impl MobiHeader {
    pub fn read(source: &dyn ByteSource, pos: &mut u64) -> Result<Self> {
        let block = read_block(source, *pos, MOBI_FIXED_LEN, "format header")?;

        // The declared length covers the fixed region plus format extensions
        // we skip without interpreting.
        let declared = be_u32(&block, 4) as u64;
        if declared < MOBI_FIXED_LEN as u64 {
            return Err(Error::TruncatedHeader("format header"));
        }
        let end = *pos + declared;
        if end > source.len() {
            return Err(Error::TruncatedHeader("format header"));
        }
        *pos = end;

        Ok(Self {
            exth_present: be_u32(&block, 112) & 0x40 != 0,
            first_content_record: be_u16(&block, 176),
            first_image_record: be_u32(&block, 92),
            first_non_book_record: be_u32(&block, 64),
        })
    }
}

/// One extended metadata record: a type tag and its raw payload.
#[derive(Debug, Clone)]
pub struct ExthRecord {
    pub record_type: u32,
    pub data: Vec<u8>,
}

/// The extended metadata block, records kept in file order.
///
/// A type may repeat, so lookups scan rather than index.
#[derive(Debug, Clone, Default)]
pub struct ExthHeader {
    pub records: Vec<ExthRecord>,
}

impl ExthHeader {
    pub fn read(source: &dyn ByteSource, pos: &mut u64) -> Result<Self> {
        let prologue = read_block(source, *pos, EXTH_PROLOGUE_LEN, "extended metadata header")?;
        *pos += EXTH_PROLOGUE_LEN as u64;

        let declared = be_u32(&prologue, 4);
        let count = be_u32(&prologue, 8);

        let mut records = Vec::new();
        for i in 0..count {
            let truncated = |source: std::io::Error| match source.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    Error::TruncatedRecord(format!("extended metadata record {i}"))
                }
                _ => Error::ReadFault {
                    context: "reading extended metadata",
                    source,
                },
            };

            let header = source
                .read_at(*pos, EXTH_RECORD_HEADER_LEN)
                .map_err(truncated)?;
            let record_type = be_u32(&header, 0);
            let total = be_u32(&header, 4) as usize;
            if total < EXTH_RECORD_HEADER_LEN {
                return Err(Error::TruncatedRecord(format!(
                    "extended metadata record {i} declares length {total}"
                )));
            }

            let data = source
                .read_at(
                    *pos + EXTH_RECORD_HEADER_LEN as u64,
                    total - EXTH_RECORD_HEADER_LEN,
                )
                .map_err(truncated)?;
            *pos += total as u64;
            records.push(ExthRecord { record_type, data });
        }

        // Trailing pad to the next 4-byte boundary of the declared length.
        let pad = u64::from((4 - declared % 4) % 4);
        if *pos + pad > source.len() {
            return Err(Error::TruncatedHeader("extended metadata padding"));
        }
        *pos += pad;

        Ok(Self { records })
    }

    /// First record of the given type, in file order.
    pub fn find(&self, record_type: u32) -> Option<&ExthRecord> {
        self.records.iter().find(|r| r.record_type == record_type)
    }

    /// First record of the given type that holds a big-endian u32.
    /// Records too short for one are skipped.
    pub fn find_u32(&self, record_type: u32) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.record_type == record_type && r.data.len() >= 4)
            .map(|r| be_u32(&r.data, 0))
    }

    /// First record of the given type, decoded as trimmed text.
    pub fn find_string(&self, record_type: u32) -> Option<String> {
        self.find(record_type)
            .map(|r| String::from_utf8_lossy(&r.data).trim().to_string())
    }
}
