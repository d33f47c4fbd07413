//! `BitVector(N)`: a fixed-length, LSB-first packed bitmap.

use alloc::vec;
use alloc::vec::Vec;
use alloy_primitives::B256;

use crate::error::SszError;
use crate::merkleization::{TreeHash, merkleize, pack};
use crate::ssz::{Decode, Encode, SszTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector<const N: usize> {
    bits: Vec<bool>,
}

impl<const N: usize> Default for BitVector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BitVector<N> {
    pub fn new() -> Self {
        Self { bits: vec![false; N] }
    }

    pub fn from_bools(bits: &[bool]) -> Result<Self, SszError> {
        if bits.len() != N {
            return Err(SszError::InvalidEncoding {
                detail: alloc::format!("BitVector<{N}> needs exactly {N} bits, got {}", bits.len()),
            });
        }
        Ok(Self { bits: bits.to_vec() })
    }

    pub fn get(&self, index: usize) -> Result<bool, SszError> {
        self.bits.get(index).copied().ok_or(SszError::OutOfBounds {
            offset: index,
            len: N,
        })
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), SszError> {
        if index >= N {
            return Err(SszError::OutOfBounds { offset: index, len: N });
        }
        self.bits[index] = value;
        Ok(())
    }

    fn pack_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; N.div_ceil(8)];
        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bytes
    }
}

impl<const N: usize> SszTypeInfo for BitVector<N> {
    fn is_fixed_size() -> bool {
        true
    }

    fn fixed_size() -> Option<usize> {
        Some(N.div_ceil(8))
    }
}

impl<const N: usize> Encode for BitVector<N> {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        buf.extend_from_slice(&self.pack_bytes());
        Ok(())
    }

    fn ssz_bytes_len(&self) -> usize {
        N.div_ceil(8)
    }
}

impl<const N: usize> Decode for BitVector<N> {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        let expected = N.div_ceil(8);
        if bytes.len() != expected {
            return Err(SszError::Truncated {
                expected,
                got: bytes.len(),
            });
        }

        let mut bv = Self::new();
        for i in 0..N {
            bv.bits[i] = (bytes[i / 8] >> (i % 8)) & 1 == 1;
        }

        let tail_bits_zero = (N..expected * 8).all(|i| (bytes[i / 8] >> (i % 8)) & 1 == 0);
        if !tail_bits_zero {
            return Err(SszError::InvalidEncoding {
                detail: "BitVector tail bits past N must be zero".into(),
            });
        }

        Ok(bv)
    }
}

impl<const N: usize> TreeHash for BitVector<N> {
    fn chunk_count() -> usize {
        N.div_ceil(256)
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        let chunks = pack(&self.pack_bytes());
        merkleize(&chunks, Some(Self::chunk_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lsb_first() {
        let mut bv = BitVector::<8>::new();
        bv.set(3, true).unwrap();
        bv.set(4, true).unwrap();
        assert_eq!(bv.as_ssz_bytes().unwrap(), alloc::vec![24u8]);
    }

    #[test]
    fn deserializes_lsb_first() {
        let bv = BitVector::<12>::from_ssz_bytes(&[24u8, 1u8]).unwrap();
        assert_eq!(bv.get(3).unwrap(), true);
        assert_eq!(bv.get(4).unwrap(), true);
        assert_eq!(bv.get(8).unwrap(), true);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(BitVector::<8>::from_ssz_bytes(&[0, 0]).is_err());
    }

    #[test]
    fn rejects_nonzero_tail_bits() {
        // N=4 leaves 4 unused high bits in the single data byte; set one.
        assert!(BitVector::<4>::from_ssz_bytes(&[0b0001_0000]).is_err());
    }

    #[test]
    fn set_out_of_range_is_rejected() {
        let mut bv = BitVector::<8>::new();
        assert!(bv.set(8, true).is_err());
    }

    #[test]
    fn round_trips() {
        let input = alloc::vec![24u8, 1u8];
        let bv = BitVector::<16>::from_ssz_bytes(&input).unwrap();
        assert_eq!(bv.as_ssz_bytes().unwrap(), input);
    }

    #[test]
    fn chunk_count_matches_spec_scenario() {
        assert_eq!(BitVector::<256>::chunk_count(), 1);
        assert_eq!(BitVector::<257>::chunk_count(), 2);
    }

    #[test]
    fn hash_tree_root_known_vector() {
        let mut bv = BitVector::<7>::new();
        for (i, &bit) in [true, false, true, true, false, false, false].iter().enumerate() {
            bv.set(i, bit).unwrap();
        }
        assert_eq!(bv.as_ssz_bytes().unwrap(), alloc::vec![0x0D]);

        let mut expected = [0u8; 32];
        expected[0] = 0x0D;
        assert_eq!(bv.hash_tree_root().unwrap(), B256::from(expected));
    }

    #[test]
    fn hash_tree_root_twelve_bits_known_vector() {
        let mut bv = BitVector::<12>::new();
        for (i, &bit) in [true, false, true, true, false, false, false, true, false, true, false, true]
            .iter()
            .enumerate()
        {
            bv.set(i, bit).unwrap();
        }
        assert_eq!(bv.as_ssz_bytes().unwrap(), alloc::vec![0x8D, 0x0A]);
    }
}
