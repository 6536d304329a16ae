/// Progress cursor over an owned buffer.
///
/// A `Cursor` tracks how far a logical transfer has advanced through
/// its buffer. The unconsumed tail is exposed as a plain slice, and
/// [`advance`](Self::advance) moves the boundary after each partial
/// transfer.
///
/// The cursor owns its buffer; callers install a fresh one per logical
/// operation and recover it once the transfer completes.
#[derive(Debug, Default)]
pub struct Cursor {
    buffer: Vec<u8>,
    pos: usize,
}

impl Cursor {
    /// Creates a cursor at the start of `buffer`.
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Returns the number of bytes still to transfer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// Returns `true` once the whole buffer has been consumed.
    pub fn is_done(&self) -> bool {
        self.pos == self.buffer.len()
    }

    /// Returns the untransferred tail of the buffer.
    pub fn chunk(&self) -> &[u8] {
        &self.buffer[self.pos..]
    }

    /// Returns the untransferred tail of the buffer, mutably.
    pub fn chunk_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.pos..]
    }

    /// Records that `n` bytes have been transferred.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`remaining`](Self::remaining).
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "cursor advanced past its buffer");
        self.pos += n;
    }

    /// Consumes the cursor and returns the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
