//! Sequential read cursor over the ROM image.

use crate::address::{self, HAS_HEADER};
use crate::codec;
use crate::{DecodeError, RomError};

/// A read position inside the ROM buffer.
///
/// Integer reads are little-endian and advance the cursor. Reads past the
/// end of the buffer fail instead of wrapping.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Block<'a> {
    pub fn new(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], RomError> {
        let data = self.data;
        let start = self.position;
        let bytes = start
            .checked_add(N)
            .and_then(|end| data.get(start..end))
            .ok_or(RomError::UnexpectedEof {
                offset: start,
                len: N,
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position += N;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, RomError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, RomError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, RomError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    /// Read a 32-bit logical pointer and translate it to a file offset.
    pub fn read_pointer(&mut self) -> Result<usize, RomError> {
        address::to_file_offset(self.read_u32()?, HAS_HEADER)
    }

    /// Read `N` raw bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], RomError> {
        self.take()
    }

    /// Decompress the block starting at the cursor.
    ///
    /// The output size is measured with a dry run first, then the stream is
    /// expanded into an exactly-sized buffer. The cursor does not move.
    pub fn decompress(&self) -> Result<Vec<u8>, DecodeError> {
        codec::decompress(self.data, self.position)
    }
}
