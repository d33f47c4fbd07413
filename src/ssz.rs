//! Core traits that make encoding, decoding, and merkleization schema-directed.
//!
//! A Rust type stands in for a schema node: `SszTypeInfo` answers the
//! fixed/variable question and the fixed width, `Encode`/`Decode` do the
//! byte-level work, and [`crate::merkleization::TreeHash`] does the
//! Merkleization. All three are implemented per-type rather than dispatched
//! off a runtime descriptor, so the "schema" lives entirely in the type
//! system.

use crate::error::SszError;
use alloc::vec::Vec;

/// Schema introspection: is this type fixed-size, and if so how wide.
///
/// `encode`, `decode`, and `hash_tree_root` all consult this to decide
/// whether they are looking at an inline value or an offset/length-prefixed
/// one. Encoder and decoder MUST agree with this byte-for-byte; there is
/// exactly one implementation of it per type, so that agreement is
/// structural rather than something tests have to maintain.
pub trait SszTypeInfo {
    /// Whether every value of this type serializes to the same number of
    /// bytes.
    fn is_fixed_size() -> bool;

    /// The fixed width in bytes, or `None` if the type is variable-size.
    fn fixed_size() -> Option<usize>;

    /// Whether this type is a "basic" type for Merkleization purposes:
    /// `Uint`, `Bool`, or a fixed composite made entirely of those. Basic
    /// elements get packed multiple-per-chunk; composite elements get one
    /// root per chunk. Defaults to `false`; primitive impls override it.
    fn is_basic_type() -> bool {
        false
    }
}

/// Appends the SSZ encoding of a value to a byte sink.
///
/// This is the "escape hatch" for types that need a bespoke wire format: a
/// capability check on `ssz_encode`/`ssz_decode`. In Rust, providing a
/// bespoke `Encode` impl instead of relying on a blanket one over a standard
/// container *is* the opt-out, and the compiler's coherence rules make sure
/// only one impl is ever in play for a given type.
pub trait Encode: SszTypeInfo {
    /// Serializes `self` by appending bytes to `buf`.
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), SszError>;

    /// The number of bytes `ssz_append` would write, computed in
    /// `O(structure)` time by inspecting lengths rather than serializing.
    /// Encoder and decoder call this to size offset headers; it MUST agree
    /// with the actual encoded length.
    fn ssz_bytes_len(&self) -> usize;

    /// Convenience: serialize into a freshly allocated buffer.
    fn as_ssz_bytes(&self) -> Result<Vec<u8>, SszError> {
        let mut buf = Vec::with_capacity(self.ssz_bytes_len());
        self.ssz_append(&mut buf)?;
        Ok(buf)
    }
}

/// Reconstructs a value of `Self` from its SSZ encoding.
pub trait Decode: SszTypeInfo + Sized {
    /// Parses `bytes` as the encoding of `Self`, validating offsets and
    /// bounds along the way.
    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszError>;
}

#[cfg(test)]
mod tests {
    use crate::composite::bitlist::Bitlist;
    use crate::composite::bitvector::BitVector;
    use crate::composite::container::Fork;
    use crate::composite::list::List;
    use crate::composite::union::Choice;
    use crate::ssz::{Encode, SszTypeInfo};

    // `ssz_bytes_len` is consulted to size offset headers before encoding
    // ever runs; if it disagreed with the actual output length every
    // variable-size container's offset table would be silently wrong.
    #[test]
    fn bytes_len_agrees_with_actual_encoding_for_fixed_schemas() {
        let fork = Fork {
            previous_version: 1,
            current_version: 2,
            epoch: 3,
        };
        assert!(Fork::is_fixed_size());
        assert_eq!(fork.ssz_bytes_len(), fork.as_ssz_bytes().unwrap().len());

        let bits = BitVector::<20>::from_bools(&[true; 20]).unwrap();
        assert!(BitVector::<20>::is_fixed_size());
        assert_eq!(bits.ssz_bytes_len(), bits.as_ssz_bytes().unwrap().len());
    }

    #[test]
    fn bytes_len_agrees_with_actual_encoding_for_variable_schemas() {
        let mut list: List<u32, 8> = List::default();
        for value in [1u32, 2, 3, 4] {
            list.push(value).unwrap();
        }
        assert!(!List::<u32, 8>::is_fixed_size());
        assert_eq!(list.ssz_bytes_len(), list.as_ssz_bytes().unwrap().len());

        let bitlist: Bitlist<16> = Bitlist::from_vec(alloc::vec![true, false, true]).unwrap();
        assert_eq!(
            bitlist.ssz_bytes_len(),
            bitlist.as_ssz_bytes().unwrap().len()
        );

        let choice = Choice::Number(99);
        assert_eq!(choice.ssz_bytes_len(), choice.as_ssz_bytes().unwrap().len());
    }
}
