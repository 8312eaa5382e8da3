//! # mobitext
//!
//! A lightweight library for reading MOBI ebooks built on the PalmDOC
//! compression scheme.
//!
//! ## Features
//!
//! - Parse the PDB container and MOBI/EXTH metadata headers
//! - Decompress PalmDOC-compressed text records
//! - Extract the cover image, the raw markup, or the plain text with
//!   chapters resolved through the embedded table of contents
//!
//! ## Quick Start
//!
//! ```no_run
//! use mobitext::Book;
//!
//! let book = Book::open("input.mobi").unwrap();
//!
//! // Plain text, chapters separated by blank lines
//! let text = book.text().unwrap();
//!
//! // Cover image bytes, if the book has one
//! if let Some(cover) = book.cover().unwrap() {
//!     std::fs::write("cover.jpg", cover).unwrap();
//! }
//! ```
//!
//! Each [`Book`] method reads from the underlying file positionally, so a
//! shared book can serve cover, markup, and text requests concurrently.

pub mod book;
pub mod error;
pub mod headers;
pub mod io;
pub mod palmdoc;
pub mod pdb;
pub mod scanner;
pub mod toc;

pub(crate) mod field;

pub use book::Book;
pub use error::{Error, Result};
