//! `Optional(T)`: either absent (`0x00`) or present (`0x01` then `T`).

use alloc::vec::Vec;
use alloy_primitives::B256;

use crate::error::SszError;
use crate::merkleization::{TreeHash, mix_in_selector};
use crate::ssz::{Decode, Encode, SszTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optional<T>(pub Option<T>);

impl<T> Optional<T> {
    pub fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> SszTypeInfo for Optional<T> {
    fn is_fixed_size() -> bool {
        false
    }

    fn fixed_size() -> Option<usize> {
        None
    }
}

impl<T: Encode> Encode for Optional<T> {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        match &self.0 {
            None => {
                buf.push(0);
                Ok(())
            }
            Some(value) => {
                buf.push(1);
                value.ssz_append(buf)
            }
        }
    }

    fn ssz_bytes_len(&self) -> usize {
        match &self.0 {
            None => 1,
            Some(value) => 1 + value.ssz_bytes_len(),
        }
    }
}

impl<T: Decode> Decode for Optional<T> {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        let (selector, payload) = bytes.split_first().ok_or(SszError::Truncated {
            expected: 1,
            got: 0,
        })?;
        match selector {
            0 => {
                if !payload.is_empty() {
                    return Err(SszError::InvalidEncoding {
                        detail: "Optional(None) carries no payload bytes".into(),
                    });
                }
                Ok(Self(None))
            }
            1 => Ok(Self(Some(T::from_ssz_bytes(payload)?))),
            other => Err(SszError::InvalidEncoding {
                detail: alloc::format!("Optional selector byte must be 0 or 1, got {other}"),
            }),
        }
    }
}

impl<T: TreeHash> TreeHash for Optional<T> {
    fn chunk_count() -> usize {
        1
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        match &self.0 {
            None => Ok(mix_in_selector(B256::ZERO, 0)),
            Some(value) => Ok(mix_in_selector(value.hash_tree_root()?, 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_encodes_to_lone_zero_byte() {
        let value: Optional<u32> = Optional::none();
        assert_eq!(value.as_ssz_bytes().unwrap(), alloc::vec![0]);
    }

    #[test]
    fn some_encodes_selector_then_payload() {
        let value = Optional::some(7u32);
        assert_eq!(value.as_ssz_bytes().unwrap(), alloc::vec![1, 7, 0, 0, 0]);
    }

    #[test]
    fn rejects_unknown_selector() {
        assert!(matches!(
            Optional::<u32>::from_ssz_bytes(&[2]),
            Err(SszError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn rejects_none_with_trailing_bytes() {
        assert!(Optional::<u32>::from_ssz_bytes(&[0, 1]).is_err());
    }

    #[test]
    fn round_trips() {
        for value in [Optional::some(42u32), Optional::none()] {
            let bytes = value.as_ssz_bytes().unwrap();
            assert_eq!(Optional::<u32>::from_ssz_bytes(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn hash_tree_root_distinguishes_none_from_some() {
        let none: Optional<u32> = Optional::none();
        let some = Optional::some(0u32);
        assert_ne!(none.hash_tree_root().unwrap(), some.hash_tree_root().unwrap());
    }
}
