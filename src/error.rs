//! Error types for MOBI decoding.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors that can occur while opening or decoding a MOBI container.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("truncated {0}")]
    TruncatedHeader(&'static str),

    #[error("truncated record: {0}")]
    TruncatedRecord(String),

    #[error("record {0} has no bounding descriptor")]
    IndexOutOfRange(usize),

    #[error("decompressed text is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),

    #[error("no reference element marks the table of contents")]
    TocNotFound,

    #[error("invalid filepos value: {0:?}")]
    InvalidOffset(String),

    #[error("read failed while {context}: {source}")]
    ReadFault {
        context: &'static str,
        source: io::Error,
    },

    #[error("corrupt compressed record: back-reference past start of output")]
    DecodeFault,
}

pub type Result<T> = std::result::Result<T, Error>;
