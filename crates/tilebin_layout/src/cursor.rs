use crate::error::{LayoutError, Result};

/// Read cursor over a compiled buffer. All reads are little-endian.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Create a cursor positioned at an absolute offset into the same data.
    pub fn at(&self, offset: u32) -> Self {
        Self {
            data: self.data,
            pos: offset as usize,
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.read_bytes(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `count` offsets into a table.
    pub fn read_offsets(&mut self, count: usize) -> Result<Vec<u32>> {
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Read the null-terminated string starting at the cursor.
    pub fn read_cstr(&mut self) -> Result<&'a str> {
        let offset = self.pos;
        let rest = self.data.get(offset..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(LayoutError::InvalidString { offset })?;
        let s = std::str::from_utf8(&rest[..len])
            .map_err(|_| LayoutError::InvalidString { offset })?;
        self.pos += len + 1;
        Ok(s)
    }

    /// Read the string an offset field points at, leaving this cursor
    /// just past the field.
    pub fn read_cstr_ref(&mut self) -> Result<&'a str> {
        let offset = self.read_u32()?;
        self.at(offset).read_cstr()
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(LayoutError::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}
