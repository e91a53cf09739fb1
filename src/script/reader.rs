//! Chunk Reader
//!
//! Presents a single in-memory buffer as a pull source: the first pull
//! hands out the whole buffer, every later pull reports end of input.
//! An empty buffer reports end of input on the first pull.

use std::borrow::Cow;

/// Pull reader over one source buffer. Good for exactly one load.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    buffer: &'a [u8],
    consumed: bool,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader over `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            consumed: buffer.is_empty(),
        }
    }

    /// Check whether the buffer has been handed out.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Pull the buffer as one chunk, or an empty one if already consumed.
    pub fn drain(mut self) -> Cow<'a, [u8]> {
        self.next().map_or(Cow::Borrowed(&[][..]), Cow::Borrowed)
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        Some(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pull_then_end() {
        let mut reader = ChunkReader::new(b"return 1");

        assert!(!reader.is_consumed());
        assert_eq!(reader.next(), Some(&b"return 1"[..]));
        assert!(reader.is_consumed());
        assert_eq!(reader.next(), None);
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_empty_buffer_ends_immediately() {
        let mut reader = ChunkReader::new(b"");
        assert!(reader.is_consumed());
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_drain_borrows() {
        let source = b"local x = 1";
        let chunk = ChunkReader::new(source).drain();

        assert!(matches!(chunk, Cow::Borrowed(_)));
        assert_eq!(&*chunk, &source[..]);
    }

    #[test]
    fn test_drain_after_consumed_is_empty() {
        let mut reader = ChunkReader::new(b"return 1");
        reader.next();
        assert!(reader.drain().is_empty());
    }

    #[test]
    fn test_drain_empty() {
        let chunk = ChunkReader::new(b"").drain();
        assert!(chunk.is_empty());
    }
}
