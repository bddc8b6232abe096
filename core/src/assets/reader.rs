//! Little-endian cursor over an asset blob, and the matching writer.

use std::io::{self, Cursor};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::AssetError;

pub(crate) struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn offset(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.offset())
    }

    fn ensure(&self, n: usize) -> Result<(), AssetError> {
        if self.remaining() < n {
            return Err(AssetError::UnexpectedEof {
                offset: self.offset(),
                needed: n - self.remaining(),
            });
        }
        Ok(())
    }

    fn read<T>(
        &mut self,
        n: usize,
        read: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T, AssetError> {
        self.ensure(n)?;
        let offset = self.offset();
        read(&mut self.cursor).map_err(|_| AssetError::UnexpectedEof { offset, needed: n })
    }

    pub fn u8(&mut self) -> Result<u8, AssetError> {
        self.read(1, |c| c.read_u8())
    }

    pub fn u16(&mut self) -> Result<u16, AssetError> {
        self.read(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn i16(&mut self) -> Result<i16, AssetError> {
        self.read(2, |c| c.read_i16::<LittleEndian>())
    }

    pub fn u32(&mut self) -> Result<u32, AssetError> {
        self.read(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn i32(&mut self) -> Result<i32, AssetError> {
        self.read(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), AssetError> {
        self.ensure(n)?;
        self.cursor.set_position((self.offset() + n) as u64);
        Ok(())
    }

    /// Fail unless every byte was consumed.
    pub fn finish(self) -> Result<(), AssetError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(AssetError::TrailingData(n)),
        }
    }
}

#[derive(Default)]
pub(crate) struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    fn put<const N: usize>(&mut self, write: impl FnOnce(&mut [u8])) -> &mut Self {
        let mut buf = [0u8; N];
        write(&mut buf);
        self.bytes.extend_from_slice(&buf);
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.put::<2>(|b| LittleEndian::write_u16(b, v))
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.put::<2>(|b| LittleEndian::write_i16(b, v))
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.put::<4>(|b| LittleEndian::write_u32(b, v))
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.put::<4>(|b| LittleEndian::write_i32(b, v))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
