//! Constants required by the SSZ wire format and Merkle tree shape.

/// Number of bytes in a Merkle tree leaf.
pub const BYTES_PER_CHUNK: usize = 32;
/// Number of bytes used to represent a variable-field offset.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;
/// Number of bits packed into a single byte.
pub const BITS_PER_BYTE: usize = 8;
/// Bytes in a 256-bit integer.
pub const BYTES: usize = 32;

/// Number of bytes used to represent a union/optional selector on the wire.
pub const BYTES_PER_UNION_SELECTOR: usize = 1;
/// Highest selector value a union may use; values above this are reserved
/// for forward-compatible extensions and always rejected.
pub const MAX_UNION_SELECTOR: u8 = 127;

/// The largest value `BYTES_PER_LENGTH_OFFSET` bytes can represent.
pub const MAX_LENGTH_VALUE: u64 = (1u64 << (8 * BYTES_PER_LENGTH_OFFSET as u32)) - 1;

/// Depth of the precomputed zero-hash cache (supports trees up to 2^256 leaves).
pub const MAX_ZERO_HASH_DEPTH: usize = 256;
