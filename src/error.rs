//! Error variants produced by encoding, decoding, and merkleization.

use alloc::string::String;
use thiserror::Error;

/// Everything that can go wrong applying a schema to bytes or a value.
///
/// Every variant here corresponds to one of the error kinds the
/// specification calls out; the fields carry enough structure for a caller
/// to decide policy (reject, log, fall back) without re-parsing a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SszError {
    /// An integer width outside `{8,16,32,64,128,256}` was requested.
    #[error("unsupported integer width: {width} bits")]
    UnsupportedWidth { width: usize },

    /// A length or offset computed during encode/decode does not fit in a
    /// `usize` on this platform.
    #[error("value {value} overflows usize")]
    OverflowsUsize { value: u64 },

    /// An offset or index pointed past the end of the available bytes.
    #[error("offset {offset} out of bounds for {len} available bytes")]
    OutOfBounds { offset: usize, len: usize },

    /// An offset table entry violated the monotonic/header-relative
    /// invariants from the wire format (non-decreasing, first offset equals
    /// header length, etc).
    #[error("invalid offset: {detail}")]
    InvalidOffset { detail: String },

    /// Too few bytes remained to decode a fixed-size value.
    #[error("truncated input: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    /// A union or optional selector byte named a variant that does not
    /// exist for the schema in hand.
    #[error("unknown selector {selector} (valid range is 0..={max})")]
    UnknownSelector { selector: u8, max: u8 },

    /// A union encode was attempted with no discriminant available.
    #[error("union has no tagged variant to encode")]
    UntaggedUnion,

    /// Bytes were structurally well-formed but violated a type-specific
    /// encoding rule (e.g. a non-zero tail bit, a non-{0,1} boolean byte, a
    /// `Bitlist` with no sentinel bit).
    #[error("invalid encoding: {detail}")]
    InvalidEncoding { detail: String },

    /// A schema descriptor did not match any variant in the closed schema
    /// algebra.
    #[error("unknown schema variant: {detail}")]
    UnknownVariant { detail: String },

    /// A byte-sequence decode was asked to alias the input but the caller
    /// did not provide a pointer/allocator capable of it.
    #[error("decode requires an allocator or borrow the caller did not provide")]
    UnsupportedPointer,

    /// Reached a code path intentionally left unimplemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A list/bitlist/vector produced more chunks than its declared
    /// capacity allows.
    #[error("chunk count {count} exceeds limit {limit}")]
    ChunkLimitExceeded { count: usize, limit: usize },
}
