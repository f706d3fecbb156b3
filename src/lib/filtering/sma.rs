use num_traits::{Num, NumAssignOps, NumCast};

/// Simple moving average over a fixed ring of `SIZE` samples.
///
/// Inserting into a full ring overwrites the oldest sample.
pub struct SmaFilter<ItemT, const SIZE: usize> {
    buff: [ItemT; SIZE],
    idx: usize,
    len: usize,
}
impl<ItemT, const SIZE: usize> SmaFilter<ItemT, SIZE>
where
    ItemT: Num + NumAssignOps + NumCast + core::marker::Copy,
{
    pub fn new() -> SmaFilter<ItemT, SIZE> {
        SmaFilter::default()
    }

    pub fn reset(&mut self) {
        self.buff = [ItemT::zero(); SIZE];
        self.idx = 0;
        self.len = 0;
    }

    pub fn insert(&mut self, data: ItemT) {
        self.buff[self.idx] = data;
        self.idx = (self.idx + 1) % SIZE;
        if self.len < SIZE {
            self.len += 1;
        }
    }

    /// Mean of the samples held, `None` while empty.
    pub fn filtered(&self) -> Option<ItemT> {
        if self.len == 0 {
            return None;
        }
        // summed on read so float rounding cannot accumulate across inserts
        let mut sum = ItemT::zero();
        for value in &self.buff[..self.len] {
            sum += *value;
        }
        Some(sum / ItemT::from(self.len)?)
    }

    /// Most recently inserted sample.
    pub fn latest(&self) -> Option<ItemT> {
        if self.len == 0 {
            None
        } else {
            Some(self.buff[(self.idx + SIZE - 1) % SIZE])
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == SIZE
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }
}

impl<ItemT, const SIZE: usize> Default for SmaFilter<ItemT, SIZE>
where
    ItemT: Num + NumAssignOps + NumCast + core::marker::Copy,
{
    fn default() -> SmaFilter<ItemT, SIZE> {
        SmaFilter {
            buff: [ItemT::zero(); SIZE],
            idx: 0,
            len: 0,
        }
    }
}
