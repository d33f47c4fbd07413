//! `union!`: generates a tagged-union (`Union(tag, T0, …, Tk)`) type.
//!
//! A union value is one leading selector byte followed by the active
//! variant's encoding. The macro pins each variant to an explicit selector
//! so field reordering in source never changes the wire format.

/// Declares an enum whose variants are SSZ union members.
///
/// ```ignore
/// simple_ssz::union! {
///     pub enum Choice {
///         0 => Number(u64),
///         1 => Flag(bool),
///     }
/// }
/// ```
#[macro_export]
macro_rules! union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($sel:literal => $variant:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $($variant($ty)),+
        }

        impl $crate::ssz::SszTypeInfo for $name {
            fn is_fixed_size() -> bool {
                false
            }

            fn fixed_size() -> Option<usize> {
                None
            }
        }

        impl $crate::ssz::Encode for $name {
            fn ssz_append(&self, buf: &mut alloc::vec::Vec<u8>) -> Result<(), $crate::error::SszError> {
                match self {
                    $(
                        $name::$variant(value) => {
                            buf.push($sel as u8);
                            $crate::ssz::Encode::ssz_append(value, buf)
                        }
                    )+
                }
            }

            fn ssz_bytes_len(&self) -> usize {
                match self {
                    $(
                        $name::$variant(value) => {
                            1 + $crate::ssz::Encode::ssz_bytes_len(value)
                        }
                    )+
                }
            }
        }

        impl $crate::ssz::Decode for $name {
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, $crate::error::SszError> {
                let (selector, payload) = bytes.split_first().ok_or($crate::error::SszError::Truncated {
                    expected: 1,
                    got: 0,
                })?;
                if *selector > $crate::constants::MAX_UNION_SELECTOR {
                    return Err($crate::error::SszError::UnknownSelector {
                        selector: *selector,
                        max: $crate::constants::MAX_UNION_SELECTOR,
                    });
                }
                match *selector {
                    $(
                        $sel => Ok($name::$variant(<$ty as $crate::ssz::Decode>::from_ssz_bytes(payload)?)),
                    )+
                    other => Err($crate::error::SszError::UnknownSelector {
                        selector: other,
                        max: $crate::constants::MAX_UNION_SELECTOR,
                    }),
                }
            }
        }

        impl $crate::merkleization::TreeHash for $name {
            fn chunk_count() -> usize {
                1
            }

            fn hash_tree_root(&self) -> Result<alloy_primitives::B256, $crate::error::SszError> {
                match self {
                    $(
                        $name::$variant(value) => {
                            let inner = $crate::merkleization::TreeHash::hash_tree_root(value)?;
                            Ok($crate::merkleization::mix_in_selector(inner, $sel as usize))
                        }
                    )+
                }
            }
        }
    };
}

crate::union! {
    /// Worked example: a tagged union of an integer and a boolean, matching
    /// the layout used in the concrete encoding scenarios.
    #[derive(Eq)]
    pub enum Choice {
        0 => Number(u64),
        1 => Flag(bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::{Decode, Encode};

    #[test]
    fn encodes_known_number_scenario() {
        let value = Choice::Number(1234);
        assert_eq!(
            value.as_ssz_bytes().unwrap(),
            alloc::vec![0x00, 0xD2, 0x04, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn encodes_known_flag_scenario() {
        let value = Choice::Flag(true);
        assert_eq!(value.as_ssz_bytes().unwrap(), alloc::vec![0x01, 0x01]);
    }

    #[test]
    fn round_trips_every_variant() {
        for value in [Choice::Number(1234), Choice::Flag(true), Choice::Flag(false)] {
            let bytes = value.as_ssz_bytes().unwrap();
            assert_eq!(Choice::from_ssz_bytes(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn rejects_selector_past_arity() {
        assert!(matches!(
            Choice::from_ssz_bytes(&[2, 0]),
            Err(crate::error::SszError::UnknownSelector { selector: 2, .. })
        ));
    }

    #[test]
    fn rejects_reserved_forward_compatibility_selector() {
        // A selector above 127 is rejected even before arity is checked.
        assert!(matches!(
            Choice::from_ssz_bytes(&[200, 0]),
            Err(crate::error::SszError::UnknownSelector { selector: 200, .. })
        ));
    }

    #[test]
    fn hash_tree_root_differs_by_selector_even_for_equal_payload() {
        crate::union! {
            #[derive(Eq)]
            enum SameByte {
                0 => A(u8),
                1 => B(u8),
            }
        }
        let a = SameByte::A(5).hash_tree_root().unwrap();
        let b = SameByte::B(5).hash_tree_root().unwrap();
        assert_ne!(a, b);
    }
}
