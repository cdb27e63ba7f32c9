//! Partitioning of a flat index range into contiguous blocks

use std::ops::Range;

/// Smallest block handed to a worker
pub const MIN_BLOCK_SIZE: usize = 1000;

/// Target number of blocks for large runs
pub const BLOCKS_PER_RUN: usize = 100;

/// Default block size for `n` items: `max(1000, n / 100)`.
pub fn block_size(n: usize) -> usize {
    (n / BLOCKS_PER_RUN).max(MIN_BLOCK_SIZE)
}

/// A contiguous run of item indices processed by one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Position of this block in the run
    pub index: usize,
    /// First item index
    pub start: usize,
    /// Number of items
    pub len: usize,
}

impl Block {
    /// Create a new block
    pub fn new(index: usize, start: usize, len: usize) -> Self {
        Self { index, start, len }
    }

    /// One past the last item index
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Item indices covered by this block
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Iterator over the blocks covering `0..total`
#[derive(Debug, Clone)]
pub struct BlockIterator {
    total: usize,
    block_size: usize,
    next_start: usize,
    next_index: usize,
}

impl BlockIterator {
    /// Blocks of `block_size` items (the last one may be shorter).
    pub fn new(total: usize, block_size: usize) -> Self {
        Self {
            total,
            block_size: block_size.max(1),
            next_start: 0,
            next_index: 0,
        }
    }

    /// Total number of blocks
    pub fn num_blocks(&self) -> usize {
        self.total.div_ceil(self.block_size)
    }
}

impl Iterator for BlockIterator {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.total {
            return None;
        }

        let len = self.block_size.min(self.total - self.next_start);
        let block = Block::new(self.next_index, self.next_start, len);

        self.next_start += len;
        self.next_index += 1;

        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size() {
        assert_eq!(block_size(0), 1000);
        assert_eq!(block_size(50_000), 1000);
        assert_eq!(block_size(100_000), 1000);
        assert_eq!(block_size(250_000), 2500);
    }

    #[test]
    fn test_blocks_cover_range() {
        let blocks: Vec<Block> = BlockIterator::new(2500, 1000).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::new(0, 0, 1000));
        assert_eq!(blocks[2], Block::new(2, 2000, 500));
        assert_eq!(blocks[2].range(), 2000..2500);
        assert_eq!(BlockIterator::new(2500, 1000).num_blocks(), 3);
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(BlockIterator::new(0, 1000).count(), 0);
        assert_eq!(BlockIterator::new(0, 1000).num_blocks(), 0);
    }

    #[test]
    fn test_zero_block_size_clamped() {
        let blocks: Vec<Block> = BlockIterator::new(3, 0).collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.len == 1));
    }
}
