//! Markup event scanning over the decompressed text.
//!
//! The embedded markup is HTML-shaped but not well-formed: attribute values
//! are often unquoted (`filepos=0000001234`) and chapter regions are cut at
//! arbitrary byte offsets, so a scan routinely starts or ends mid-element.
//! Tokenizer errors therefore end the stream instead of failing the decode.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

/// One element tag with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A markup event. The variants are exhaustive, so each call site can match
/// on exactly the cases it cares about and ignore the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent {
    StartTag(Tag),
    SelfClosingTag(Tag),
    Text(String),
    EndOfStream,
}

/// Scans a markup buffer into a sequence of [`MarkupEvent`]s.
///
/// Each scanner owns its tokenizer state, so callers are free to scan any
/// sub-slice independently and restart as often as they like.
pub struct MarkupScanner<'a> {
    reader: Reader<&'a [u8]>,
    pending: Option<MarkupEvent>,
}

impl<'a> MarkupScanner<'a> {
    pub fn new(markup: &'a str) -> Self {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().check_end_names = false;
        Self {
            reader,
            pending: None,
        }
    }

    /// Next event, or [`MarkupEvent::EndOfStream`] once the buffer (or the
    /// tokenizable prefix of it) is exhausted.
    ///
    /// Adjacent text and entity references merge into one `Text` event, so
    /// `Dombey &amp; Son` arrives in a single piece.
    pub fn next_event(&mut self) -> MarkupEvent {
        if let Some(event) = self.pending.take() {
            return event;
        }

        let mut text = String::new();
        loop {
            let event = match self.reader.read_event() {
                Ok(Event::Start(e)) => MarkupEvent::StartTag(to_tag(&e)),
                Ok(Event::Empty(e)) => MarkupEvent::SelfClosingTag(to_tag(&e)),
                Ok(Event::Text(t)) => {
                    match t.decode() {
                        Ok(s) => text.push_str(&s),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&t)),
                    }
                    continue;
                }
                Ok(Event::GeneralRef(r)) => {
                    text.push_str(&resolve_ref(&r));
                    continue;
                }
                // An end tag is not surfaced, but it still bounds a text run.
                Ok(Event::End(_)) => {
                    if text.is_empty() {
                        continue;
                    }
                    return MarkupEvent::Text(text);
                }
                Ok(Event::Eof) | Err(_) => MarkupEvent::EndOfStream,
                Ok(_) => continue,
            };

            if text.is_empty() {
                return event;
            }
            self.pending = Some(event);
            return MarkupEvent::Text(text);
        }
    }
}

fn to_tag(e: &BytesStart) -> Tag {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    // html_attributes tolerates the unquoted values MOBI markup uses;
    // individually malformed attributes are dropped, not fatal.
    let attributes = e
        .html_attributes()
        .flatten()
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect();
    Tag { name, attributes }
}

fn resolve_ref(r: &BytesRef) -> String {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(r);
    match resolve_predefined_entity(&name) {
        Some(resolved) => resolved.to_string(),
        // Unknown entity: keep it verbatim rather than losing text.
        None => format!("&{name};"),
    }
}
