/// An appendable sequence of bits (0s and 1s), most significant bit first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer(pub Vec<bool>);

impl BitBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends the low `len` bits of `val`, high bit first.
    ///
    /// `len` must be at most 31 and `val` must fit in `len` bits.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        debug_assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
    }

    /// Packs the bits into bytes, MSB first. A trailing partial byte is zero-filled.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = vec![0u8; (self.0.len() + 7) / 8];
        for (i, &bit) in self.0.iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

impl Extend<bool> for BitBuffer {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b101, 3);
        bb.append_bits(0, 2);
        assert_eq!(bb.0, vec![true, false, true, false, false]);
    }

    #[test]
    fn test_to_bytes_pads_last_byte() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0xEC, 8);
        bb.append_bits(0b1, 1);
        assert_eq!(bb.to_bytes(), vec![0xEC, 0x80]);
    }
}
