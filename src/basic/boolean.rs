//! Encoding, decoding, and hash-tree-root for `bool`.

use alloc::vec::Vec;
use alloy_primitives::B256;

use crate::error::SszError;
use crate::merkleization::TreeHash;
use crate::ssz::{Decode, Encode, SszTypeInfo};

impl SszTypeInfo for bool {
    fn is_fixed_size() -> bool {
        true
    }

    fn fixed_size() -> Option<usize> {
        Some(1)
    }

    fn is_basic_type() -> bool {
        true
    }
}

impl Encode for bool {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        buf.push(if *self { 1 } else { 0 });
        Ok(())
    }

    fn ssz_bytes_len(&self) -> usize {
        1
    }
}

impl Decode for bool {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        if bytes.len() != 1 {
            return Err(SszError::Truncated {
                expected: 1,
                got: bytes.len(),
            });
        }
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SszError::InvalidEncoding {
                detail: alloc::format!("boolean byte must be 0 or 1, got {other}"),
            }),
        }
    }
}

impl TreeHash for bool {
    fn chunk_count() -> usize {
        1
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        let mut chunk = [0u8; 32];
        if *self {
            chunk[0] = 1;
        }
        Ok(B256::from(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_single_byte() {
        assert_eq!(true.as_ssz_bytes().unwrap(), alloc::vec![1]);
        assert_eq!(false.as_ssz_bytes().unwrap(), alloc::vec![0]);
    }

    #[test]
    fn rejects_non_boolean_byte() {
        assert!(matches!(
            bool::from_ssz_bytes(&[2]),
            Err(SszError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            bool::from_ssz_bytes(&[]),
            Err(SszError::Truncated { .. })
        ));
        assert!(matches!(
            bool::from_ssz_bytes(&[1, 0]),
            Err(SszError::Truncated { .. })
        ));
    }

    #[test]
    fn round_trips() {
        for value in [true, false] {
            let bytes = value.as_ssz_bytes().unwrap();
            assert_eq!(bool::from_ssz_bytes(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn hash_tree_root_is_single_bit_chunk() {
        assert_eq!(true.hash_tree_root().unwrap().0[0], 1);
        assert_eq!(false.hash_tree_root().unwrap(), B256::ZERO);
    }
}
