//! PalmDOC LZ77 decompression.
//!
//! The byte-code scheme, evaluated left to right over the input:
//! - Bytes 0x00, 0x09-0x7F: literal byte
//! - Bytes 0x01-0x08: copy the next 1-8 input bytes literally
//! - Bytes 0x80-0xBF: back-reference; combined with the next byte into a
//!   14-bit field of 11 distance bits and 3 length bits (length 3-10)
//! - Bytes 0xC0-0xFF: space followed by the byte XOR 0x80

use crate::error::{Error, Result};

/// Maximum decompressed size of a single record.
pub const MAX_RECORD_SIZE: usize = 4096;

/// Decompresses one PalmDOC-compressed record.
///
/// Decoding stops at end of input or once the output reaches
/// [`MAX_RECORD_SIZE`], whichever comes first. A back-reference whose
/// distance reaches past the start of the output is a decode fault; the
/// format leaves that case undefined and we refuse to read garbage.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(MAX_RECORD_SIZE);
    let mut i = 0;

    while i < input.len() && output.len() < MAX_RECORD_SIZE {
        let c = input[i];
        i += 1;

        match c {
            0x00 | 0x09..=0x7F => output.push(c),
            0x01..=0x08 => {
                let count = (c as usize)
                    .min(input.len() - i)
                    .min(MAX_RECORD_SIZE - output.len());
                output.extend_from_slice(&input[i..i + count]);
                i += count;
            }
            0x80..=0xBF => {
                if i >= input.len() {
                    break; // dangling back-reference byte
                }
                let next = input[i];
                i += 1;

                let combined = ((c as u16) << 8) | next as u16;
                let distance = ((combined & 0x3FFF) >> 3) as usize;
                let length = ((combined & 7) + 3) as usize;

                if distance == 0 || distance > output.len() {
                    return Err(Error::DecodeFault);
                }

                // Copy byte by byte: the source region may overlap bytes
                // just written, which is how run-length patterns encode.
                for _ in 0..length {
                    if output.len() >= MAX_RECORD_SIZE {
                        break;
                    }
                    let byte = output[output.len() - distance];
                    output.push(byte);
                }
            }
            0xC0..=0xFF => {
                output.push(b' ');
                if output.len() < MAX_RECORD_SIZE {
                    output.push(c ^ 0x80);
                }
            }
        }
    }

    Ok(output)
}
