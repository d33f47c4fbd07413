//! `List(T, N_max)`: a growable sequence bounded by a compile-time capacity.

use alloc::vec::Vec;
use alloy_primitives::B256;
use core::convert::TryInto;

use crate::constants::BYTES_PER_LENGTH_OFFSET;
use crate::error::SszError;
use crate::merkleization::{TreeHash, merkleize, mix_in_length, pack};
use crate::ssz::{Decode, Encode, SszTypeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T, const N_MAX: usize> {
    elements: Vec<T>,
}

impl<T, const N_MAX: usize> Default for List<T, N_MAX> {
    fn default() -> Self {
        Self { elements: Vec::new() }
    }
}

impl<T, const N_MAX: usize> List<T, N_MAX> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(elements: Vec<T>) -> Result<Self, SszError> {
        if elements.len() > N_MAX {
            return Err(SszError::ChunkLimitExceeded {
                count: elements.len(),
                limit: N_MAX,
            });
        }
        Ok(Self { elements })
    }

    pub fn push(&mut self, value: T) -> Result<(), SszError> {
        if self.elements.len() >= N_MAX {
            return Err(SszError::ChunkLimitExceeded {
                count: self.elements.len() + 1,
                limit: N_MAX,
            });
        }
        self.elements.push(value);
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<T, const N_MAX: usize> SszTypeInfo for List<T, N_MAX> {
    fn is_fixed_size() -> bool {
        false
    }

    fn fixed_size() -> Option<usize> {
        None
    }
}

impl<T: Encode, const N_MAX: usize> Encode for List<T, N_MAX> {
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError> {
        encode_variable_sequence(&self.elements, buf)
    }

    fn ssz_bytes_len(&self) -> usize {
        if T::is_fixed_size() {
            T::fixed_size().unwrap_or(0) * self.elements.len()
        } else {
            self.elements.len() * BYTES_PER_LENGTH_OFFSET
                + self.elements.iter().map(|e| e.ssz_bytes_len()).sum::<usize>()
        }
    }
}

impl<T: Decode, const N_MAX: usize> Decode for List<T, N_MAX> {
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError> {
        Ok(Self {
            elements: decode_variable_sequence(bytes, N_MAX)?,
        })
    }
}

impl<T: Encode + TreeHash, const N_MAX: usize> TreeHash for List<T, N_MAX> {
    fn chunk_count() -> usize {
        if T::is_basic_type() {
            let elem_size = T::fixed_size().expect("basic types are fixed-size");
            (N_MAX * elem_size).div_ceil(32)
        } else {
            N_MAX
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
        let root = merkleize(&chunks, Some(Self::chunk_count()))?;
        Ok(mix_in_length(root, self.elements.len()))
    }
}

/// Shared variable-sequence layout: fixed-size elements are packed
/// back-to-back; anything else gets an offset table followed by bodies.
pub fn encode_variable_sequence<T: Encode>(elements: &[T], buf: &mut Vec<u8>) -> Result<(), SszError> {
    if T::is_fixed_size() {
        for item in elements {
            item.ssz_append(buf)?;
        }
        return Ok(());
    }

    let n = elements.len();
    let offset_bytes_len = n * BYTES_PER_LENGTH_OFFSET;
    let mut parts = Vec::with_capacity(n);
    for item in elements {
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

/// Inverse of [`encode_variable_sequence`], rejecting more than `limit`
/// elements and any header/offset that doesn't satisfy the monotonic,
/// header-relative invariants from the wire format.
pub fn decode_variable_sequence<T: Decode>(bytes: &[u8], limit: usize) -> Result<Vec<T>, SszError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    if T::is_fixed_size() {
        let size = T::fixed_size().expect("fixed type has a fixed size");
        if size == 0 || bytes.len() % size != 0 {
            return Err(SszError::InvalidEncoding {
                detail: alloc::format!(
                    "list body length {} is not a multiple of element size {size}",
                    bytes.len()
                ),
            });
        }
        let count = bytes.len() / size;
        if count > limit {
            return Err(SszError::ChunkLimitExceeded { count, limit });
        }
        let mut out = Vec::with_capacity(count);
        for chunk in bytes.chunks(size) {
            out.push(T::from_ssz_bytes(chunk)?);
        }
        return Ok(out);
    }

    let first_raw: [u8; BYTES_PER_LENGTH_OFFSET] = bytes
        .get(..BYTES_PER_LENGTH_OFFSET)
        .ok_or(SszError::Truncated {
            expected: BYTES_PER_LENGTH_OFFSET,
            got: bytes.len(),
        })?
        .try_into()
        .expect("slice has exact offset width");
    let first = u32::from_le_bytes(first_raw) as usize;
    if first % BYTES_PER_LENGTH_OFFSET != 0 {
        return Err(SszError::InvalidOffset {
            detail: alloc::format!("first offset {first} is not a multiple of {BYTES_PER_LENGTH_OFFSET}"),
        });
    }
    let n = first / BYTES_PER_LENGTH_OFFSET;
    if n > limit {
        return Err(SszError::ChunkLimitExceeded { count: n, limit });
    }

    let mut offsets = Vec::with_capacity(n + 1);
    for i in 0..n {
        let start = i * BYTES_PER_LENGTH_OFFSET;
        let raw: [u8; BYTES_PER_LENGTH_OFFSET] = bytes
            .get(start..start + BYTES_PER_LENGTH_OFFSET)
            .ok_or(SszError::Truncated {
                expected: start + BYTES_PER_LENGTH_OFFSET,
                got: bytes.len(),
            })?
            .try_into()
            .expect("slice has exact offset width");
        let offset = u32::from_le_bytes(raw) as usize;
        if offset > bytes.len() {
            return Err(SszError::OutOfBounds {
                offset,
                len: bytes.len(),
            });
        }
        if let Some(&prev) = offsets.last()
            && offset < prev
        {
            return Err(SszError::InvalidOffset {
                detail: alloc::format!("offset {offset} is less than preceding offset {prev}"),
            });
        }
        offsets.push(offset);
    }
    offsets.push(bytes.len());

    if offsets[0] != first {
        return Err(SszError::InvalidOffset {
            detail: "first offset does not equal header length".into(),
        });
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(T::from_ssz_bytes(&bytes[offsets[i]..offsets[i + 1]])?);
    }
    Ok(out)
}
