/// Sparse index of the children of an index node.
///
/// Bit `i` is set when a child exists for hash chunk `i`, and children are
/// stored densely in ascending bit order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bitmap(u32);

impl Bitmap {
    pub fn new() -> Self {
        Bitmap(0)
    }

    pub fn get(&self, i: u8) -> bool {
        self.0 & Self::bit(i) != 0
    }

    pub fn set(&self, i: u8) -> Self {
        Bitmap(self.0 | Self::bit(i))
    }

    pub fn unset(&self, i: u8) -> Self {
        Bitmap(self.0 & !Self::bit(i))
    }

    /// Returns a position of a child for a chunk in a dense child array.
    ///
    /// The position is valid for insertion too if the bit is not set yet.
    pub fn index(&self, i: u8) -> usize {
        (self.0 & (Self::bit(i) - 1)).count_ones() as usize
    }

    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }

    fn bit(i: u8) -> u32 {
        debug_assert!(i < 32);

        1 << i
    }
}
