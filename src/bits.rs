//! Bitwise walk over the significant bits of an address.

use crate::{Error, Result};

/// First bit within a byte that is examined.
const START_BIT: u8 = 0x80;

/// Iterator over the significant bits of an address, most significant bit of each byte first.
///
/// Yields `true` if the address bit is set (take the right child), and `false` otherwise. The
/// iterator ends at the first unset bit of the mask, or after the last byte.
#[derive(Debug, Clone)]
pub(crate) struct Bits<'a> {
    address: &'a [u8],
    mask: &'a [u8],
    byte: usize,
    bit: u8,
}

impl<'a> Bits<'a> {
    /// Create a new walk. Both slices must have the same length, either 4 or 16 bytes.
    pub(crate) fn new(address: &'a [u8], mask: &'a [u8]) -> Result<Self> {
        if address.len() != mask.len() || !matches!(address.len(), 4 | 16) {
            return Err(Error::BadAddress);
        }
        Ok(Self {
            address,
            mask,
            byte: 0,
            bit: START_BIT,
        })
    }

    /// Number of bits consumed so far.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.byte * 8 + self.bit.leading_zeros() as usize
    }
}

impl Iterator for Bits<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        let mask = *self.mask.get(self.byte)?;
        if mask & self.bit == 0 {
            return None;
        }
        let right = self.address[self.byte] & self.bit != 0;
        self.bit >>= 1;
        if self.bit == 0 {
            self.bit = START_BIT;
            self.byte += 1;
        }
        Some(right)
    }
}
