//! Reed-Solomon error correction over GF(2^8/0x11D) and block interleaving.

use super::version::{QrCodeEcc, Version};
use crate::error::{InvalidArgument, QrResult};

/// Generator polynomial of a given degree, stored highest to lowest power with the leading
/// coefficient (always 1) dropped.
pub struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Computes the divisor `(x - r^0)(x - r^1)...(x - r^{degree-1})` with `r = 0x02`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::DegreeOutOfRange`] unless `degree` is in [1, 255].
    pub fn new(degree: usize) -> QrResult<Self> {
        if !(1..=255).contains(&degree) {
            return Err(InvalidArgument::DegreeOutOfRange(degree).into());
        }
        // Start with the monomial x^0
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            // Multiply the current product by (x - r^i)
            for j in 0..degree {
                divisor[j] = multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = multiply(root, 0x02);
        }
        Ok(Self { divisor })
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Returns the remainder of `data` (as a polynomial, first byte highest) divided by the
    /// generator. The remainder always has exactly `degree` coefficients.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.rotate_left(1);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= multiply(y, factor);
            }
        }
        result
    }
}

/// Product of two field elements modulo `x^8 + x^4 + x^3 + x^2 + 1`.
pub fn multiply(x: u8, y: u8) -> u8 {
    // Russian peasant multiplication
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

/// Splits `data` into blocks, appends each block's ECC and interleaves the result.
///
/// `data` must hold exactly `version.num_data_codewords(ecl)` bytes.
pub(crate) fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> QrResult<Vec<u8>> {
    let expected = ver.num_data_codewords(ecl);
    if data.len() != expected {
        return Err(InvalidArgument::CodewordCount {
            expected,
            actual: data.len(),
        }
        .into());
    }
    let numblocks: usize = ver.num_ecc_blocks(ecl);
    let blockecclen: usize = ver.ecc_codewords_per_block(ecl);
    let rawcodewords: usize = ver.num_raw_codewords();
    let numshortblocks: usize = numblocks - rawcodewords % numblocks;
    let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

    let rs = ReedSolomonGenerator::new(blockecclen)?;
    let mut datablocks: Vec<&[u8]> = Vec::with_capacity(numblocks);
    let mut eccblocks: Vec<Vec<u8>> = Vec::with_capacity(numblocks);
    let mut rest: &[u8] = data;
    for i in 0..numblocks {
        let datlen = shortblockdatalen + usize::from(i >= numshortblocks);
        let (dat, tail) = rest.split_at(datlen);
        eccblocks.push(rs.compute_remainder(dat));
        datablocks.push(dat);
        rest = tail;
    }
    debug_assert!(rest.is_empty());

    let mut result = Vec::with_capacity(rawcodewords);
    // Short blocks have nothing at index shortblockdatalen
    for i in 0..=shortblockdatalen {
        result.extend(datablocks.iter().filter_map(|block| block.get(i)));
    }
    for i in 0..blockecclen {
        result.extend(eccblocks.iter().map(|block| block[i]));
    }
    debug_assert_eq!(result.len(), rawcodewords);
    Ok(result)
}
