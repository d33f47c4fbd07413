//! `Bitlist(N_max)`: a variable-length, LSB-first packed bitmap with a
//! sentinel bit marking the logical end of data.

use alloc::vec;
use alloc::vec::Vec;
use alloy_primitives::B256;

use crate::error::SszError;
use crate::merkleization::{TreeHash, merkleize, mix_in_length, pack};
use crate::ssz::{Decode, Encode, SszTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitlist<const N: usize> {
    bits: Vec<bool>,
}

impl<const N: usize> Default for Bitlist<N> {
    fn default() -> Self {
        Self { bits: Vec::new() }
    }
}

impl<const N: usize> TryFrom<&[bool]> for Bitlist<N> {
    type Error = SszError;

    fn try_from(slice: &[bool]) -> Result<Self, Self::Error> {
        Bitlist::from_vec(slice.to_vec())
    }
}

impl<const N: usize> Bitlist<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(bits: Vec<bool>) -> Result<Self, SszError> {
        if bits.len() > N {
            return Err(SszError::ChunkLimitExceeded {
                count: bits.len(),
                limit: N,
            });
        }
        Ok(Self { bits })
    }

    pub fn push(&mut self, bit: bool) -> Result<(), SszError> {
        if self.bits.len() >= N {
            return Err(SszError::ChunkLimitExceeded {
                count: self.bits.len() + 1,
                limit: N,
            });
        }
        self.bits.push(bit);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn pack_data_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.bits.len().div_ceil(8)];
        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bytes
    }
}

impl<const N: usize> SszTypeInfo for Bitlist<N> {
    fn is_fixed_size() -> bool {
        false
    }

    fn fixed_size() -> Option<usize> {
        None
    }
}

impl<const N: usize> Encode for Bitlist<N> {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        let len = self.bits.len();
        // byte_len = ceil((len + 1) / 8): the sentinel bit may fit in the
        // last data byte, so it is not always an extra byte.
        let byte_len = (len + 1).div_ceil(8);
        let mut bytes = vec![0u8; byte_len];

        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bytes[len / 8] |= 1 << (len % 8);

        buf.extend_from_slice(&bytes);
        Ok(())
    }

    fn ssz_bytes_len(&self) -> usize {
        (self.bits.len() + 1).div_ceil(8)
    }
}

impl<const N: usize> Decode for Bitlist<N> {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        if bytes.is_empty() {
            return Err(SszError::Truncated { expected: 1, got: 0 });
        }

        let last = bytes[bytes.len() - 1];
        if last == 0 {
            return Err(SszError::InvalidEncoding {
                detail: "Bitlist last byte must carry the sentinel bit".into(),
            });
        }

        let sentinel_pos = 7 - last.leading_zeros() as usize;
        let len = 8 * (bytes.len() - 1) + sentinel_pos;

        if len > N {
            return Err(SszError::ChunkLimitExceeded { count: len, limit: N });
        }

        let mut bits = Vec::with_capacity(len);
        for i in 0..len {
            bits.push((bytes[i / 8] >> (i % 8)) & 1 == 1);
        }

        Ok(Self { bits })
    }
}

impl<const N: usize> TreeHash for Bitlist<N> {
    fn chunk_count() -> usize {
        N.div_ceil(256)
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        let chunks = pack(&self.pack_data_bytes());
        let root = merkleize(&chunks, Some(Self::chunk_count()))?;
        Ok(mix_in_length(root, self.bits.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bitlist_encodes_to_lone_sentinel() {
        let empty: Bitlist<32> = Bitlist::default();
        assert_eq!(empty.as_ssz_bytes().unwrap(), alloc::vec![1]);
        assert_eq!(Bitlist::<32>::from_ssz_bytes(&[1]).unwrap(), empty);
    }

    #[test]
    fn sentinel_reuses_the_last_data_byte_when_it_has_room() {
        // 7 data bits leave exactly one free high bit for the sentinel: no
        // extra byte should be allocated.
        let mut list = Bitlist::<7>::default();
        for _ in 0..7 {
            list.push(true).unwrap();
        }
        assert_eq!(list.ssz_bytes_len(), 1);
        assert_eq!(list.as_ssz_bytes().unwrap(), alloc::vec![0xFF]);
    }

    #[test]
    fn sentinel_spills_into_new_byte_when_data_fills_one_exactly() {
        let mut list = Bitlist::<8>::default();
        for _ in 0..8 {
            list.push(true).unwrap();
        }
        assert_eq!(list.ssz_bytes_len(), 2);
        assert_eq!(list.as_ssz_bytes().unwrap(), alloc::vec![0xFF, 1]);
    }

    #[test]
    fn push_beyond_capacity_fails() {
        let mut list = Bitlist::<3>::default();
        list.push(true).unwrap();
        list.push(false).unwrap();
        list.push(true).unwrap();
        assert!(list.push(true).is_err());
    }

    #[test]
    fn from_vec_beyond_capacity_fails() {
        assert!(Bitlist::<3>::from_vec(alloc::vec![true; 4]).is_err());
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(matches!(
            Bitlist::<32>::from_ssz_bytes(&[]),
            Err(SszError::Truncated { .. })
        ));
    }

    #[test]
    fn decode_rejects_zero_terminal_byte() {
        assert!(matches!(
            Bitlist::<32>::from_ssz_bytes(&[0]),
            Err(SszError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn decode_known_vectors() {
        let decoded = Bitlist::<32>::from_ssz_bytes(&[24u8, 1u8]).unwrap();
        let expected =
            Bitlist::try_from([false, false, false, true, true, false, false, false].as_ref()).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn round_trips() {
        let bits: Vec<bool> = (0..32).map(|i| i % 5 == 0).collect();
        let input = Bitlist::<32>::try_from(bits.as_ref()).unwrap();
        let encoded = input.as_ssz_bytes().unwrap();
        let recovered = Bitlist::<32>::from_ssz_bytes(&encoded).unwrap();
        assert_eq!(input, recovered);
    }

    #[test]
    fn chunk_count_matches_capacity() {
        assert_eq!(Bitlist::<256>::chunk_count(), 1);
        assert_eq!(Bitlist::<257>::chunk_count(), 2);
        assert_eq!(Bitlist::<512>::chunk_count(), 2);
        assert_eq!(Bitlist::<513>::chunk_count(), 3);
    }

    #[test]
    fn hash_tree_root_distinguishes_length_and_content() {
        let empty: Bitlist<32> = Bitlist::default();
        let root_empty = empty.hash_tree_root().unwrap();

        let mut single = Bitlist::<32>::default();
        single.push(true).unwrap();
        let root_single = single.hash_tree_root().unwrap();
        assert_ne!(root_single, root_empty);

        let mut multi = Bitlist::<32>::default();
        multi.push(true).unwrap();
        multi.push(false).unwrap();
        multi.push(true).unwrap();
        let root_multi = multi.hash_tree_root().unwrap();
        assert_ne!(root_multi, root_single);
    }
}
