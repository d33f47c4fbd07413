//! Hash-tree-root: chunking, packing, and recursive Merkleization.
//!
//! Chunks are padded up to the next power of two implied by either the
//! declared capacity (for lists/bitlists) or the actual chunk count (for
//! vectors/structs), then folded pairwise with SHA-256 bottom-up. The
//! padding never actually allocates zero chunks, it substitutes the
//! precomputed root of an all-zero subtrie of the right depth, via
//! [`zero_hash`].

use crate::SszError;
use crate::constants::{BYTES_PER_CHUNK, MAX_ZERO_HASH_DEPTH};
use alloc::vec::Vec;
use alloy_primitives::B256;
use once_cell::race::OnceBox;
use sha2::{Digest, Sha256};

/// Process-wide cache of `zero[d]` = root of an all-zero Merkle subtrie of
/// depth `d`. `zero[0]` is the all-zero chunk; `zero[d] = sha256(zero[d-1]
/// || zero[d-1])`. Built once, lazily, behind an atomic pointer so it can be
/// shared across threads without requiring `std`, the only process-wide
/// state this crate carries.
static ZERO_HASHES: OnceBox<[[u8; BYTES_PER_CHUNK]; MAX_ZERO_HASH_DEPTH]> = OnceBox::new();

fn zero_hash_table() -> &'static [[u8; BYTES_PER_CHUNK]; MAX_ZERO_HASH_DEPTH] {
    ZERO_HASHES.get_or_init(|| {
        let mut table = [[0u8; BYTES_PER_CHUNK]; MAX_ZERO_HASH_DEPTH];
        for d in 1..MAX_ZERO_HASH_DEPTH {
            let prev = table[d - 1];
            table[d] = hash_pair(&prev, &prev);
        }
        alloc::boxed::Box::new(table)
    })
}

/// Root of an all-zero Merkle subtrie of depth `depth` (2^depth leaves).
pub fn zero_hash(depth: usize) -> [u8; BYTES_PER_CHUNK] {
    if depth >= MAX_ZERO_HASH_DEPTH {
        // No real SSZ type has a depth this large; fall back to direct
        // computation rather than panicking on an out-of-range index.
        let prev = zero_hash(depth - 1);
        return hash_pair(&prev, &prev);
    }
    zero_hash_table()[depth]
}

fn hash_pair(left: &[u8; BYTES_PER_CHUNK], right: &[u8; BYTES_PER_CHUNK]) -> [u8; BYTES_PER_CHUNK] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Smallest power of two `>= i`. By SSZ convention `next_pow_of_two(0) == 1`
/// (an empty sequence still merkleizes to a single, zero, leaf).
pub fn next_pow_of_two(i: usize) -> usize {
    if i == 0 {
        1
    } else {
        1usize << (usize::BITS - (i - 1).leading_zeros())
    }
}

/// Describes the chunk-count rule for each schema shape.
pub enum ChunkShape {
    Basic,
    BitVector { len: usize },
    Bitlist { limit: usize },
    VectorBasic { elem_size: usize, count: usize },
    VectorComposite { count: usize },
    ListBasic { elem_size: usize, limit: usize },
    ListComposite { limit: usize },
    Struct { field_count: usize },
}

/// Number of 32-byte chunks a value of this shape occupies before padding.
pub fn chunk_count(shape: ChunkShape) -> usize {
    match shape {
        ChunkShape::Basic => 1,
        ChunkShape::BitVector { len } => len.div_ceil(BYTES_PER_CHUNK * 8),
        ChunkShape::Bitlist { limit } => limit.div_ceil(BYTES_PER_CHUNK * 8),
        ChunkShape::VectorBasic { elem_size, count } => (count * elem_size).div_ceil(BYTES_PER_CHUNK),
        ChunkShape::VectorComposite { count } => count,
        ChunkShape::ListBasic { elem_size, limit } => (limit * elem_size).div_ceil(BYTES_PER_CHUNK),
        ChunkShape::ListComposite { limit } => limit,
        ChunkShape::Struct { field_count } => field_count,
    }
}

/// Packs the serialization of basic values into 32-byte chunks, right-padding
/// the final chunk with zero bytes. An empty input packs to zero chunks;
/// [`merkleize`] maps that to the single all-zero leaf.
pub fn pack(bytes: &[u8]) -> Vec<[u8; BYTES_PER_CHUNK]> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(bytes.len().div_ceil(BYTES_PER_CHUNK));
    for chunk in bytes.chunks(BYTES_PER_CHUNK) {
        let mut buf = [0u8; BYTES_PER_CHUNK];
        buf[..chunk.len()].copy_from_slice(chunk);
        out.push(buf);
    }
    out
}

/// Merkleizes a list of chunks, treating `limit` (if given) as the declared
/// capacity the tree shape must be built against (e.g. a `List`'s `N_max`).
/// Chunks beyond `limit` are a caller bug, rejected as
/// [`SszError::ChunkLimitExceeded`].
pub fn merkleize(chunks: &[[u8; BYTES_PER_CHUNK]], limit: Option<usize>) -> Result<B256, SszError> {
    if let Some(limit) = limit
        && chunks.len() > limit
    {
        return Err(SszError::ChunkLimitExceeded {
            count: chunks.len(),
            limit,
        });
    }

    let size = next_pow_of_two(limit.unwrap_or(chunks.len()));
    let depth = size.trailing_zeros() as usize;
    Ok(B256::from(merkleize_at_depth(chunks, depth)))
}

fn merkleize_at_depth(chunks: &[[u8; BYTES_PER_CHUNK]], depth: usize) -> [u8; BYTES_PER_CHUNK] {
    if depth == 0 {
        return chunks.first().copied().unwrap_or_else(|| zero_hash(0));
    }

    let half = 1usize << (depth - 1);
    let left = if chunks.len() <= half {
        merkleize_at_depth(chunks, depth - 1)
    } else {
        merkleize_at_depth(&chunks[..half], depth - 1)
    };
    let right = if chunks.len() > half {
        merkleize_at_depth(&chunks[half..], depth - 1)
    } else {
        zero_hash(depth - 1)
    };
    hash_pair(&left, &right)
}

/// Merkleizes the packed serialization of a basic-typed sequence (vector or
/// list) against an optional declared chunk-count limit.
pub fn merkleize_packed(serialized: &[u8], chunk_limit: Option<usize>) -> Result<B256, SszError> {
    merkleize(&pack(serialized), chunk_limit)
}

/// Merkleizes already-computed element roots of a composite-typed sequence.
pub fn merkleize_roots(roots: &[[u8; BYTES_PER_CHUNK]], chunk_limit: Option<usize>) -> Result<B256, SszError> {
    merkleize(roots, chunk_limit)
}

/// `mix_in_length(root, length) = sha256(root || length_as_u256_le)`, applied
/// after merkleizing a `List`/`Bitlist` body, binding the root to its length.
pub fn mix_in_length(root: B256, len: usize) -> B256 {
    mix_in_u256_le(root, len as u64)
}

/// `mix_in_selector(root, selector) = sha256(root || selector_as_u256_le)`,
/// applied to an `Optional`/`Union` payload root, binding it to which
/// variant was active.
pub fn mix_in_selector(root: B256, selector: usize) -> B256 {
    mix_in_u256_le(root, selector as u64)
}

fn mix_in_u256_le(root: B256, value: u64) -> B256 {
    let mut aux = [0u8; BYTES_PER_CHUNK];
    aux[..8].copy_from_slice(&value.to_le_bytes());
    B256::from(hash_pair(root.as_ref(), &aux))
}

/// `mix_in_aux(data_root, aux_root) = sha256(data_root || aux_root)`, the
/// EIP-7495 stable-container mix-in that binds a struct's field-tree root to
/// the Merkle root of its presence bitvector.
pub fn mix_in_aux(data_root: B256, aux_root: B256) -> B256 {
    B256::from(hash_pair(data_root.as_ref(), aux_root.as_ref()))
}

/// Merkleization entry point, parallel to [`crate::Encode`]/[`crate::Decode`].
pub trait TreeHash: crate::SszTypeInfo {
    /// Number of 32-byte chunks this type's unpadded tree occupies; used by
    /// callers composing this type into a larger vector/list/struct.
    fn chunk_count() -> usize;

    /// The 32-byte Merkle root of `self`.
    fn hash_tree_root(&self) -> Result<B256, SszError>;
}
