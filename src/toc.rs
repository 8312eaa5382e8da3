//! TOC resolution and chapter text extraction.
//!
//! Chapter structure is not indexed anywhere in the binary headers. The
//! markup carries a self-closing `reference` element whose `filepos`
//! attribute names the byte offset of the table of contents, and the TOC
//! region holds one `a` anchor per chapter, each with a `filepos` pointing
//! back at that chapter's start.

use crate::error::{Error, Result};
use crate::scanner::{MarkupEvent, MarkupScanner};

/// Byte offset of the table of contents within the markup.
///
/// Fails with [`Error::TocNotFound`] when no self-closing `reference`
/// element precedes end of stream, or [`Error::InvalidOffset`] when the
/// first one lacks a numeric `filepos`.
pub fn toc_position(markup: &str) -> Result<usize> {
    let mut scanner = MarkupScanner::new(markup);
    loop {
        match scanner.next_event() {
            MarkupEvent::SelfClosingTag(tag) if tag.name() == "reference" => {
                let value = tag
                    .attribute("filepos")
                    .ok_or_else(|| Error::InvalidOffset("missing filepos".into()))?;
                return parse_filepos(value);
            }
            MarkupEvent::EndOfStream => return Err(Error::TocNotFound),
            _ => {}
        }
    }
}

/// Chapter start offsets collected from the TOC region, in document order.
///
/// Anchors without a `filepos` attribute are plain links, not TOC entries,
/// and are skipped. A non-numeric `filepos` aborts the resolve.
pub fn chapter_boundaries(markup: &str, toc_position: usize) -> Result<Vec<usize>> {
    let mut boundaries = Vec::new();
    let mut scanner = MarkupScanner::new(&markup[toc_position..]);
    loop {
        match scanner.next_event() {
            MarkupEvent::StartTag(tag) if tag.name() == "a" => {
                if let Some(value) = tag.attribute("filepos") {
                    boundaries.push(parse_filepos(value)?);
                }
            }
            MarkupEvent::EndOfStream => return Ok(boundaries),
            _ => {}
        }
    }
}

/// Joins every chapter's paragraphs into the final plain text.
///
/// Chapter `i` spans `[boundary[i], boundary[i + 1])`; the last chapter
/// ends where the TOC begins, so the TOC region itself is never extracted.
/// Paragraphs and chapters alike are separated by blank lines.
pub fn plain_text(markup: &str) -> Result<String> {
    let toc = toc_position(markup)?;
    if !markup.is_char_boundary(toc) {
        return Err(Error::InvalidOffset(toc.to_string()));
    }

    let boundaries = chapter_boundaries(markup, toc)?;

    let mut paragraphs = Vec::new();
    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(toc);
        if start >= end || !markup.is_char_boundary(start) || !markup.is_char_boundary(end) {
            return Err(Error::InvalidOffset(start.to_string()));
        }
        paragraphs.extend(chapter_paragraphs(&markup[start..end]));
    }

    Ok(paragraphs.join("\n\n"))
}

/// Trimmed, non-empty text runs within one chapter region, in document
/// order.
fn chapter_paragraphs(region: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut scanner = MarkupScanner::new(region);
    loop {
        match scanner.next_event() {
            MarkupEvent::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    paragraphs.push(text.to_string());
                }
            }
            MarkupEvent::EndOfStream => return paragraphs,
            _ => {}
        }
    }
}

fn parse_filepos(value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidOffset(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds markup with three chapters followed by a TOC. Offsets are
    /// written zero-padded to a fixed width so they stay stable between the
    /// measuring pass and the final pass.
    fn sample_markup() -> (String, usize, Vec<usize>) {
        let mut toc = 0;
        let mut chapters = [0usize; 3];
        for _ in 0..2 {
            let mut markup = String::new();
            markup.push_str(&format!(
                "<html><body><reference title=\"TOC\" filepos={toc:010} />"
            ));
            for (i, chapter) in chapters.iter_mut().enumerate() {
                *chapter = markup.len();
                markup.push_str(&format!("<p>Chapter {} text.</p>", i + 1));
            }
            toc = markup.len();
            for (i, chapter) in chapters.iter().enumerate() {
                markup.push_str(&format!("<a filepos={chapter:010}>Chapter {}</a>", i + 1));
            }
            markup.push_str("</body></html>");
            if markup.contains(&format!("filepos={toc:010} />")) {
                return (markup, toc, chapters.to_vec());
            }
        }
        unreachable!("offsets did not stabilize");
    }

    #[test]
    fn test_toc_position() {
        let (markup, toc, _) = sample_markup();
        assert_eq!(toc_position(&markup).unwrap(), toc);
    }

    #[test]
    fn test_toc_position_not_found() {
        assert!(matches!(
            toc_position("<html><body><p>No TOC here.</p></body></html>"),
            Err(Error::TocNotFound)
        ));
    }

    #[test]
    fn test_toc_position_missing_filepos() {
        assert!(matches!(
            toc_position("<body><reference type=\"toc\" /></body>"),
            Err(Error::InvalidOffset(_))
        ));
    }

    #[test]
    fn test_toc_position_non_numeric_filepos() {
        assert!(matches!(
            toc_position("<body><reference filepos=\"abc\" /></body>"),
            Err(Error::InvalidOffset(_))
        ));
    }

    #[test]
    fn test_chapter_boundaries_in_document_order() {
        let (markup, toc, chapters) = sample_markup();
        assert_eq!(chapter_boundaries(&markup, toc).unwrap(), chapters);
    }

    #[test]
    fn test_anchor_without_filepos_skipped() {
        let markup = "<a name=\"top\">x</a><a filepos=\"25\">y</a>";
        assert_eq!(chapter_boundaries(markup, 0).unwrap(), vec![25]);
    }

    #[test]
    fn test_non_numeric_boundary_aborts() {
        let markup = "<a filepos=\"10\">x</a><a filepos=\"ten\">y</a>";
        assert!(matches!(
            chapter_boundaries(markup, 0),
            Err(Error::InvalidOffset(_))
        ));
    }

    #[test]
    fn test_plain_text_joins_chapters() {
        let (markup, _, _) = sample_markup();
        assert_eq!(
            plain_text(&markup).unwrap(),
            "Chapter 1 text.\n\nChapter 2 text.\n\nChapter 3 text."
        );
    }

    #[test]
    fn test_last_chapter_ends_at_toc() {
        // The TOC anchors themselves carry text; none of it may leak into
        // the extracted chapters.
        let (markup, _, _) = sample_markup();
        let text = plain_text(&markup).unwrap();
        assert!(!text.contains("Chapter 3</a>"));
        assert_eq!(text.matches("Chapter 3").count(), 1);
    }

    #[test]
    fn test_boundary_past_end_of_markup() {
        let markup = "<reference filepos=\"4000\" /><p>short</p>";
        assert!(matches!(plain_text(markup), Err(Error::InvalidOffset(_))));
    }
}
