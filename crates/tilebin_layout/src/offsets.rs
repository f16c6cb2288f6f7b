use crate::error::{LayoutError, Result};
use crate::layout::Layout;
use std::collections::VecDeque;

/// A reserved 4-byte field waiting for the absolute offset of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEntry {
    /// Position of the field within the layout that reserved it
    pub at: usize,
}

/// FIFO of offset entries for one kind of payload.
///
/// Entries are reserved in the order their payloads will be written, then
/// resolved front to back as those payloads are emitted. Each entry is
/// written exactly once; [`OffsetQueue::finish`] rejects leftovers.
#[derive(Debug)]
pub struct OffsetQueue {
    name: &'static str,
    pending: VecDeque<OffsetEntry>,
    produced: usize,
}

impl OffsetQueue {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: VecDeque::new(),
            produced: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total entries reserved over the queue's lifetime
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub(crate) fn push(&mut self, at: usize) {
        self.pending.push_back(OffsetEntry { at });
        self.produced += 1;
    }

    /// Fill the oldest entry with the cursor's current absolute offset and
    /// return that offset.
    pub fn resolve_here(&mut self, out: &mut Layout<'_>) -> Result<u32> {
        let offset = out.offset()?;
        self.resolve_with(out, offset)?;
        Ok(offset)
    }

    /// Fill the oldest entry with an already known offset, used when
    /// several fields point at one shared payload.
    pub fn resolve_with(&mut self, out: &mut Layout<'_>, offset: u32) -> Result<()> {
        let entry = self
            .pending
            .pop_front()
            .ok_or(LayoutError::NoPendingOffset { queue: self.name })?;
        out.patch_u32(entry.at, offset)
    }

    /// Consume the queue, failing if any entry was never resolved.
    /// Returns the number of entries resolved.
    pub fn finish(self) -> Result<usize> {
        if !self.pending.is_empty() {
            return Err(LayoutError::UnresolvedOffsets {
                queue: self.name,
                count: self.pending.len(),
            });
        }
        Ok(self.produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::two_pass;

    #[test]
    fn test_fifo_resolution() {
        let bytes = two_pass(|out| {
            let mut strings = OffsetQueue::new("string");
            out.reserve(&mut strings)?;
            out.reserve(&mut strings)?;
            assert_eq!(strings.len(), 2);
            strings.resolve_here(out)?;
            out.cstr("a")?;
            strings.resolve_here(out)?;
            out.cstr("bc")?;
            assert_eq!(strings.finish()?, 2);
            Ok(())
        })
        .unwrap();
        assert_eq!(bytes, vec![8, 0, 0, 0, 10, 0, 0, 0, b'a', 0, b'b', b'c', 0]);
    }

    #[test]
    fn test_shared_payload() {
        let bytes = two_pass(|out| {
            let mut slots = OffsetQueue::new("tileset");
            out.reserve(&mut slots)?;
            out.reserve(&mut slots)?;
            let shared = slots.resolve_here(out)?;
            slots.resolve_with(out, shared)?;
            out.u8(1)?;
            slots.finish().map(|_| ())
        })
        .unwrap();
        assert_eq!(bytes, vec![8, 0, 0, 0, 8, 0, 0, 0, 1]);
    }

    #[test]
    fn test_unresolved_entries_rejected() {
        let mut out = Layout::measure();
        let mut queue = OffsetQueue::new("tile");
        out.reserve(&mut queue).unwrap();
        assert_eq!(
            queue.finish(),
            Err(LayoutError::UnresolvedOffsets {
                queue: "tile",
                count: 1
            })
        );
    }

    #[test]
    fn test_resolve_without_entry_rejected() {
        let mut out = Layout::measure();
        let mut queue = OffsetQueue::new("tile");
        assert_eq!(
            queue.resolve_here(&mut out),
            Err(LayoutError::NoPendingOffset { queue: "tile" })
        );
    }

    #[test]
    fn test_offsets_include_base() {
        let mut buf = vec![0u8; 4];
        let mut out = Layout::write(&mut buf).with_base(0x100);
        let mut queue = OffsetQueue::new("map");
        out.reserve(&mut queue).unwrap();
        queue.resolve_here(&mut out).unwrap();
        queue.finish().unwrap();
        assert_eq!(buf, vec![0x04, 0x01, 0, 0]);
    }
}
