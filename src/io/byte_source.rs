use std::fs::File;
use std::io;

/// A random-access source of bytes.
///
/// Every read names an absolute offset, so no seek cursor is threaded
/// through the decode pipeline and overlapping reads from different
/// callers cannot interfere with each other.
pub trait ByteSource: Send + Sync {
    /// Total length of the source in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills `buf` with bytes starting at `offset`.
    ///
    /// Fails with `UnexpectedEof` if fewer than `buf.len()` bytes are
    /// available. Must not depend on or modify any cursor state.
    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Reads exactly `len` bytes starting at `offset`.
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_at_into(offset, &mut buf)?;
        Ok(buf)
    }
}

/// A [`ByteSource`] over a local file.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    pub fn new(file: File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

#[cfg(unix)]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        use std::os::unix::fs::FileExt; // pread
        self.file.read_exact_at(buf, offset)
    }
}

#[cfg(not(unix))]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = self.file.try_clone()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

/// An in-memory [`ByteSource`], mainly for tests.
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let offset = offset as usize;
        let end = offset.checked_add(buf.len()).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                buf.copy_from_slice(&self.data[offset..end]);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "not enough data",
            )),
        }
    }
}
