//! Encoding, decoding, and hash-tree-root for fixed-width unsigned integers.

use crate::constants::BYTES;
use crate::error::SszError;
use crate::merkleization::TreeHash;
use crate::ssz::{Decode, Encode, SszTypeInfo};
use alloc::vec::Vec;
use alloy_primitives::{B256, U256};

macro_rules! impl_uint {
    ($type:ty, $bytes:expr) => {
        impl SszTypeInfo for $type {
            fn is_fixed_size() -> bool {
                true
            }

            fn fixed_size() -> Option<usize> {
                Some($bytes)
            }

            fn is_basic_type() -> bool {
                true
            }
        }

        impl Encode for $type {
            fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
                buf.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }

            fn ssz_bytes_len(&self) -> usize {
                $bytes
            }
        }

        impl Decode for $type {
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
                if bytes.len() != $bytes {
                    return Err(SszError::Truncated {
                        expected: $bytes,
                        got: bytes.len(),
                    });
                }
                let mut buf = [0u8; $bytes];
                buf.copy_from_slice(bytes);
                Ok(Self::from_le_bytes(buf))
            }
        }

        impl TreeHash for $type {
            fn chunk_count() -> usize {
                1
            }

            fn hash_tree_root(&self) -> Result<B256, SszError> {
                let mut chunk = [0u8; 32];
                chunk[..$bytes].copy_from_slice(&self.to_le_bytes());
                Ok(B256::from(chunk))
            }
        }
    };
}

impl_uint!(u8, 1);
impl_uint!(u16, 2);
impl_uint!(u32, 4);
impl_uint!(u64, 8);
impl_uint!(u128, 16);

impl SszTypeInfo for U256 {
    fn is_fixed_size() -> bool {
        true
    }

    fn fixed_size() -> Option<usize> {
        Some(BYTES)
    }

    fn is_basic_type() -> bool {
        true
    }
}

impl Encode for U256 {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        buf.extend_from_slice(&self.to_le_bytes::<BYTES>());
        Ok(())
    }

    fn ssz_bytes_len(&self) -> usize {
        BYTES
    }
}

impl Decode for U256 {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        if bytes.len() != BYTES {
            return Err(SszError::Truncated {
                expected: BYTES,
                got: bytes.len(),
            });
        }
        let mut buf = [0u8; BYTES];
        buf.copy_from_slice(bytes);
        Ok(U256::from_le_bytes(buf))
    }
}

impl TreeHash for U256 {
    fn chunk_count() -> usize {
        1
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        Ok(B256::from(self.to_le_bytes::<BYTES>()))
    }
}
