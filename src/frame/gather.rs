/// Write cursor over an ordered pair of buffer segments.
///
/// A `GatherCursor` describes one logical message assembled from a
/// header and an optional payload. Partial writes consume leading
/// bytes with [`advance`](Self::advance), which skips fully written
/// segments and trims the one written halfway, so the remaining
/// segments always line up with the next `sendmsg` attempt.
#[derive(Debug)]
pub struct GatherCursor<'a> {
    segments: [&'a [u8]; 2],
    len: usize,
    first: usize,
}

impl<'a> GatherCursor<'a> {
    /// Builds a cursor over `header` followed by `payload`.
    ///
    /// Empty segments are dropped up front, so the segment list never
    /// contains a zero-length entry.
    pub fn new(header: &'a [u8], payload: &'a [u8]) -> Self {
        let mut cursor = Self {
            segments: [&[]; 2],
            len: 0,
            first: 0,
        };

        for segment in [header, payload] {
            if !segment.is_empty() {
                cursor.segments[cursor.len] = segment;
                cursor.len += 1;
            }
        }

        cursor
    }

    /// Returns the segments still to write, in order.
    pub fn segments(&self) -> &[&'a [u8]] {
        &self.segments[self.first..self.len]
    }

    /// Returns the number of bytes still to write.
    pub fn remaining(&self) -> usize {
        self.segments().iter().map(|segment| segment.len()).sum()
    }

    /// Returns `true` once every segment has been written.
    pub fn is_empty(&self) -> bool {
        self.first == self.len
    }

    /// Consumes `n` leading bytes, crossing segment boundaries as
    /// needed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`remaining`](Self::remaining).
    pub fn advance(&mut self, mut n: usize) {
        while self.first < self.len && n >= self.segments[self.first].len() {
            n -= self.segments[self.first].len();
            self.first += 1;
        }

        if n > 0 {
            assert!(
                self.first < self.len,
                "gather cursor advanced past its segments"
            );
            self.segments[self.first] = &self.segments[self.first][n..];
        }
    }
}
