use crate::error::{LayoutError, Result};
use crate::offsets::OffsetQueue;
use tracing::debug;

/// Output cursor shared by both layout passes. All writes are little-endian.
///
/// A measuring layout has no buffer: every write only advances the cursor,
/// so running a record writer against it yields the record's exact size.
/// A writing layout targets a buffer sized from that measurement and fails
/// with [`LayoutError::Overflow`] instead of ever growing it.
#[derive(Debug)]
pub struct Layout<'a> {
    buf: Option<&'a mut [u8]>,
    pos: usize,
    base: u32,
}

impl Layout<'static> {
    /// Pass 1: count bytes without writing any.
    pub fn measure() -> Self {
        Self {
            buf: None,
            pos: 0,
            base: 0,
        }
    }
}

impl<'a> Layout<'a> {
    /// Pass 2: write into `buf`.
    pub fn write(buf: &'a mut [u8]) -> Self {
        Self {
            buf: Some(buf),
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of this layout's first byte in the final output.
    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    pub fn is_measuring(&self) -> bool {
        self.buf.is_none()
    }

    /// Bytes produced so far by this layout.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes produced since `start`, the return value of record writers.
    pub fn since(&self, start: usize) -> usize {
        self.pos - start
    }

    /// Absolute offset of the cursor: base plus position.
    pub fn offset(&self) -> Result<u32> {
        let absolute = self.base as usize + self.pos;
        u32::try_from(absolute).map_err(|_| LayoutError::OffsetOutOfRange(absolute))
    }

    pub fn u8(&mut self, v: u8) -> Result<()> {
        self.put(&[v])
    }

    pub fn u16(&mut self, v: u16) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn i16(&mut self, v: i16) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn u32(&mut self, v: u32) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn i32(&mut self, v: i32) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.put(bytes)
    }

    /// Write a null-terminated string.
    pub fn cstr(&mut self, s: &str) -> Result<()> {
        if s.as_bytes().contains(&0) {
            return Err(LayoutError::InteriorNul(s.to_string()));
        }
        self.put(s.as_bytes())?;
        self.put(&[0])
    }

    /// Write a collection length into a `u8` count field.
    pub fn count_u8(&mut self, field: &'static str, count: usize) -> Result<()> {
        let v = u8::try_from(count)
            .map_err(|_| LayoutError::ValueOutOfRange { field, value: count })?;
        self.u8(v)
    }

    /// Write a collection length into a `u16` count field.
    pub fn count_u16(&mut self, field: &'static str, count: usize) -> Result<()> {
        let v = u16::try_from(count)
            .map_err(|_| LayoutError::ValueOutOfRange { field, value: count })?;
        self.u16(v)
    }

    /// Reserve a 4-byte offset field and queue it for later resolution.
    ///
    /// Entries are recorded in both passes so the FIFO order is exercised
    /// identically whether or not bytes are written.
    pub fn reserve(&mut self, queue: &mut OffsetQueue) -> Result<()> {
        queue.push(self.pos);
        self.put(&[0; 4])
    }

    /// Overwrite a previously reserved `u32` at a position of this layout.
    pub(crate) fn patch_u32(&mut self, at: usize, v: u32) -> Result<()> {
        let Some(buf) = self.buf.as_deref_mut() else {
            return Ok(());
        };
        let capacity = buf.len();
        let slot = buf.get_mut(at..at + 4).ok_or(LayoutError::Overflow {
            at,
            need: 4,
            capacity,
        })?;
        slot.copy_from_slice(&v.to_le_bytes());
        Ok(())
    }

    /// Lay out a nested record whose offsets are absolute in the enclosing
    /// output: the nested layout starts at the cursor with its base set to
    /// the cursor's absolute offset. The cursor advances past everything
    /// the nested layout produced.
    pub fn embed<T>(&mut self, f: impl FnOnce(&mut Layout<'_>) -> Result<T>) -> Result<T> {
        let base = self.offset()?;
        let start = self.pos;
        let capacity = self.buf.as_ref().map(|buf| buf.len());
        let sub_buf = match self.buf.as_deref_mut() {
            Some(buf) => Some(buf.get_mut(start..).ok_or(LayoutError::Overflow {
                at: start,
                need: 0,
                capacity: capacity.unwrap_or(0),
            })?),
            None => None,
        };
        let mut sub = Layout {
            buf: sub_buf,
            pos: 0,
            base,
        };
        let value = f(&mut sub)?;
        let produced = sub.pos;
        self.pos += produced;
        Ok(value)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(buf) = self.buf.as_deref_mut() {
            let capacity = buf.len();
            let end = self.pos + bytes.len();
            let dst = buf.get_mut(self.pos..end).ok_or(LayoutError::Overflow {
                at: self.pos,
                need: bytes.len(),
                capacity,
            })?;
            dst.copy_from_slice(bytes);
        }
        self.pos += bytes.len();
        Ok(())
    }
}

/// Run a layout function twice: once to measure, once to write into a
/// buffer of exactly the measured size.
///
/// The same function drives both passes, so size and content come from one
/// traversal. A writing pass that ends short of the measured size is
/// reported as [`LayoutError::SizeMismatch`].
pub fn two_pass<F>(mut f: F) -> Result<Vec<u8>>
where
    F: FnMut(&mut Layout<'_>) -> Result<()>,
{
    let mut measure = Layout::measure();
    f(&mut measure)?;
    let measured = measure.position();
    debug!(measured, "layout measured");

    let mut buf = vec![0u8; measured];
    let mut out = Layout::write(&mut buf);
    f(&mut out)?;
    let written = out.position();
    if written != measured {
        return Err(LayoutError::SizeMismatch { measured, written });
    }
    Ok(buf)
}
