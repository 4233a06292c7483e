use bytes::Buf;

use crate::utils::{ERErrKind, ERError};

/// Byte order of multi-byte fields, taken from the EI_DATA ident byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Sequential reader over a borrowed buffer. Every read checks the remaining
/// length first and advances only on success, so a failed read never moves
/// the cursor past the end.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, offset: usize) -> Result<(), ERError> {
        if offset > self.data.len() {
            return Err(ERError::new_with_kind(
                &format!("seek to {} past end of {} byte buffer", offset, self.data.len()),
                ERErrKind::OutOfBounds,
            ));
        }
        self.pos = offset;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ERError> {
        let end = match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                return Err(ERError::new_with_kind(
                    &format!(
                        "read of {} bytes at {} past end of {} byte buffer",
                        n,
                        self.pos,
                        self.data.len()
                    ),
                    ERErrKind::OutOfBounds,
                ));
            }
        };
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ERError> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> Result<u8, ERError> {
        let mut buf = self.take(1)?;
        Ok(buf.get_u8())
    }

    pub fn read_u16(&mut self, endian: Endian) -> Result<u16, ERError> {
        let mut buf = self.take(2)?;
        match endian {
            Endian::Little => Ok(buf.get_u16_le()),
            Endian::Big => Ok(buf.get_u16()),
        }
    }

    pub fn read_u32(&mut self, endian: Endian) -> Result<u32, ERError> {
        let mut buf = self.take(4)?;
        match endian {
            Endian::Little => Ok(buf.get_u32_le()),
            Endian::Big => Ok(buf.get_u32()),
        }
    }

    pub fn read_u64(&mut self, endian: Endian) -> Result<u64, ERError> {
        let mut buf = self.take(8)?;
        match endian {
            Endian::Little => Ok(buf.get_u64_le()),
            Endian::Big => Ok(buf.get_u64()),
        }
    }
}
