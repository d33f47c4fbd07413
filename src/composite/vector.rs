//! `Vector(T, N)`: a fixed-length sequence of exactly `N` elements of `T`.

use alloc::vec::Vec;
use alloy_primitives::B256;
use core::convert::TryInto;

use crate::constants::BYTES_PER_LENGTH_OFFSET;
use crate::error::SszError;
use crate::merkleization::{TreeHash, merkleize, pack};
use crate::ssz::{Decode, Encode, SszTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector<T, const N: usize> {
    elements: Vec<T>,
}

impl<T, const N: usize> Vector<T, N> {
    pub fn new(elements: Vec<T>) -> Result<Self, SszError> {
        if elements.len() != N {
            return Err(SszError::InvalidEncoding {
                detail: alloc::format!("Vector<_, {N}> needs exactly {N} elements, got {}", elements.len()),
            });
        }
        Ok(Self { elements })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<T, const N: usize> SszTypeInfo for Vector<T, N>
where
    T: SszTypeInfo,
{
    fn is_fixed_size() -> bool {
        T::is_fixed_size()
    }

    fn fixed_size() -> Option<usize> {
        T::fixed_size().map(|size| size * N)
    }
}

impl<T, const N: usize> Encode for Vector<T, N>
where
    T: Encode,
{
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        if T::is_fixed_size() {
            for item in &self.elements {
                item.ssz_append(buf)?;
            }
            return Ok(());
        }

        let offset_bytes_len = N * BYTES_PER_LENGTH_OFFSET;
        let mut parts = Vec::with_capacity(N);
        for item in &self.elements {
            parts.push(item.as_ssz_bytes()?);
        }

        let mut offset = offset_bytes_len;
        for part in &parts {
            buf.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += part.len();
        }
        for part in parts {
            buf.extend_from_slice(&part);
        }
        Ok(())
    }

    fn ssz_bytes_len(&self) -> usize {
        if T::is_fixed_size() {
            T::fixed_size().unwrap_or(0) * N
        } else {
            N * BYTES_PER_LENGTH_OFFSET + self.elements.iter().map(|e| e.ssz_bytes_len()).sum::<usize>()
        }
    }
}

impl<T, const N: usize> Decode for Vector<T, N>
where
    T: Decode,
{
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        if T::is_fixed_size() {
            let size = T::fixed_size().expect("fixed type has a fixed size");
            let total = size * N;
            if bytes.len() != total {
                return Err(SszError::Truncated {
                    expected: total,
                    got: bytes.len(),
                });
            }
            let mut elements = Vec::with_capacity(N);
            for chunk in bytes.chunks(size.max(1)).take(N) {
                elements.push(T::from_ssz_bytes(chunk)?);
            }
            return Ok(Self { elements });
        }

        let offset_bytes_len = BYTES_PER_LENGTH_OFFSET * N;
        if bytes.len() < offset_bytes_len {
            return Err(SszError::Truncated {
                expected: offset_bytes_len,
                got: bytes.len(),
            });
        }

        let mut offsets = Vec::with_capacity(N + 1);
        for i in 0..N {
            let start = i * BYTES_PER_LENGTH_OFFSET;
            let raw: [u8; BYTES_PER_LENGTH_OFFSET] = bytes[start..start + BYTES_PER_LENGTH_OFFSET]
                .try_into()
                .expect("slice has exact offset width");
            let offset = u32::from_le_bytes(raw) as usize;
            if offset > bytes.len() {
                return Err(SszError::OutOfBounds {
                    offset,
                    len: bytes.len(),
                });
            }
            offsets.push(offset);
        }
        offsets.push(bytes.len());

        let mut elements = Vec::with_capacity(N);
        for i in 0..N {
            let (start, end) = (offsets[i], offsets[i + 1]);
            if start > end {
                return Err(SszError::InvalidOffset {
                    detail: alloc::format!("offset {start} exceeds following offset {end}"),
                });
            }
            elements.push(T::from_ssz_bytes(&bytes[start..end])?);
        }

        Ok(Self { elements })
    }
}

impl<T, const N: usize> TreeHash for Vector<T, N>
where
    T: Encode + TreeHash,
{
    fn chunk_count() -> usize {
        if T::is_basic_type() {
            let elem_size = T::fixed_size().expect("basic types are fixed-size");
            (N * elem_size).div_ceil(32)
        } else {
            N
        }
    }

    fn hash_tree_root(&self) -> Result<B256, SszError> {
        let chunks = if T::is_basic_type() {
            let mut serialized = Vec::new();
            for item in &self.elements {
                item.ssz_append(&mut serialized)?;
            }
            pack(&serialized)
        } else {
            let mut chunks = Vec::with_capacity(self.elements.len());
            for item in &self.elements {
                chunks.push(item.hash_tree_root()?.0);
            }
            chunks
        };
        merkleize(&chunks, Some(Self::chunk_count()))
    }
}
