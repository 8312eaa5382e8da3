//! The decoded book: container, headers, and the three extraction surfaces.

use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};
use crate::headers::{ExthHeader, MobiHeader, PalmDocHeader, EXTH_COVER_OFFSET};
use crate::io::{ByteSource, FileSource};
use crate::palmdoc;
use crate::pdb::PdbIndex;
use crate::toc;

/// An opened MOBI book.
///
/// All headers are parsed once at open; the extraction methods only read
/// record payloads on demand. Reads are positional, so `&self` methods can
/// run concurrently without a shared cursor getting in the way.
pub struct Book {
    source: Box<dyn ByteSource>,
    index: PdbIndex,
    palmdoc: PalmDocHeader,
    mobi: MobiHeader,
    exth: Option<ExthHeader>,
}

impl Book {
    /// Opens the book at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = File::open(path)
            .and_then(FileSource::new)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_source(Box::new(source))
    }

    /// Decodes a book from any byte source.
    pub fn from_source(source: Box<dyn ByteSource>) -> Result<Self> {
        let index = PdbIndex::read(source.as_ref())?;

        // The metadata headers sit back to back after the record directory,
        // each parser leaving the cursor at the start of the next.
        let mut pos = index.header_end();
        let palmdoc = PalmDocHeader::read(source.as_ref(), &mut pos)?;
        let mobi = MobiHeader::read(source.as_ref(), &mut pos)?;
        let exth = if mobi.exth_present {
            Some(ExthHeader::read(source.as_ref(), &mut pos)?)
        } else {
            None
        };

        Ok(Self {
            source,
            index,
            palmdoc,
            mobi,
            exth,
        })
    }

    /// The extended metadata block, if the book carries one.
    pub fn exth(&self) -> Option<&ExthHeader> {
        self.exth.as_ref()
    }

    /// The cover image bytes, or `None` for books without a cover entry.
    pub fn cover(&self) -> Result<Option<Vec<u8>>> {
        let Some(offset) = self
            .exth
            .as_ref()
            .and_then(|exth| exth.find_u32(EXTH_COVER_OFFSET))
        else {
            return Ok(None);
        };

        // The cover entry is relative to the first image record.
        let record = self.mobi.first_image_record as usize + offset as usize;
        self.index
            .read_record(self.source.as_ref(), record)
            .map(Some)
    }

    /// The full decompressed markup.
    ///
    /// Text records are decompressed in order and concatenated, then cut to
    /// the exact length the compression header declares; the final record is
    /// padded and the padding must not leak into the markup.
    pub fn markup(&self) -> Result<String> {
        let declared = self.palmdoc.text_length as usize;
        let first = self.mobi.first_content_record as usize;
        let end = self.mobi.first_non_book_record as usize;

        let mut text = Vec::with_capacity(declared);
        for record in first..end {
            let payload = self.index.read_record(self.source.as_ref(), record)?;
            text.extend_from_slice(&palmdoc::decompress(&payload)?);
        }

        if text.len() < declared {
            return Err(Error::TruncatedRecord(format!(
                "text records yield {} bytes of a declared {declared}",
                text.len()
            )));
        }
        text.truncate(declared);

        Ok(String::from_utf8(text)?)
    }

    /// The book's plain text: every chapter's paragraphs, in reading order,
    /// separated by blank lines.
    pub fn text(&self) -> Result<String> {
        toc::plain_text(&self.markup()?)
    }
}
