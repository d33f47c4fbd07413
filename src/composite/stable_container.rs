//! `stable_container!`: EIP-7495 `StableContainer(N)`, a struct whose
//! fields are all optional, whose wire layout only carries the present
//! fields, and whose Merkle shape is pinned to a fixed capacity `N` so that
//! future field additions never change already-computed roots.
//!
//! Encode: a `BitVector<N>` presence bitmap (padded with `false` past the
//! declared field count) followed by the present fields serialized as an
//! ordinary struct, fixed/variable separation applied only to the present
//! subset. Decode is the inverse, rejecting a bitmap with any reserved bit
//! (index >= declared field count) set. Hash-tree-root merkleizes the
//! N-slot theoretical struct, treating absent fields as zero leaves, and
//! mixes in the bitmap's own root via `mix_in_aux`.

/// Declares a stable container and its `SszTypeInfo`/`Encode`/`Decode`/
/// `TreeHash` impls.
///
/// ```ignore
/// simple_ssz::stable_container! {
///     pub struct Shape[8] {
///         pub side: u16,
///         pub color: u8,
///         pub radius: u16,
///     }
/// }
/// ```
/// generates a struct whose fields are `Option<u16>`/`Option<u8>`/
/// `Option<u16>`, merkleized against capacity 8.
#[macro_export]
macro_rules! stable_container {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident [$cap:expr] {
            $($field_vis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $($field_vis $field: Option<$ty>),+
        }

        impl $name {
            pub const CAPACITY: usize = $cap;
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
                let mut presence: alloc::vec::Vec<bool> = alloc::vec::Vec::new();
                $( presence.push(self.$field.is_some()); )+
                presence.resize($cap, false);
                let bitmap = $crate::composite::bitvector::BitVector::<$cap>::from_bools(&presence)?;
                $crate::ssz::Encode::ssz_append(&bitmap, buf)?;

                let mut header_len = 0usize;
                $(
                    if self.$field.is_some() {
                        header_len += if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                            <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size")
                        } else {
                            $crate::constants::BYTES_PER_LENGTH_OFFSET
                        };
                    }
                )+
                let mut var_acc = header_len;

                $(
                    if let Some(value) = &self.$field {
                        if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                            $crate::ssz::Encode::ssz_append(value, buf)?;
                        } else {
                            buf.extend_from_slice(&(var_acc as u32).to_le_bytes());
                            var_acc += $crate::ssz::Encode::ssz_bytes_len(value);
                        }
                    }
                )+

                $(
                    if let Some(value) = &self.$field {
                        if !<$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                            $crate::ssz::Encode::ssz_append(value, buf)?;
                        }
                    }
                )+

                Ok(())
            }

            fn ssz_bytes_len(&self) -> usize {
                let bitmap_len = ($cap as usize).div_ceil($crate::constants::BITS_PER_BYTE);
                let mut total = bitmap_len;
                $(
                    if let Some(value) = &self.$field {
                        total += if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                            <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size")
                        } else {
                            $crate::constants::BYTES_PER_LENGTH_OFFSET + $crate::ssz::Encode::ssz_bytes_len(value)
                        };
                    }
                )+
                total
            }
        }

        impl $crate::ssz::Decode for $name {
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, $crate::error::SszError> {
                let bitmap_len = ($cap as usize).div_ceil($crate::constants::BITS_PER_BYTE);
                let bitmap_bytes = bytes.get(..bitmap_len).ok_or($crate::error::SszError::Truncated {
                    expected: bitmap_len,
                    got: bytes.len(),
                })?;
                let bitmap = <$crate::composite::bitvector::BitVector<$cap> as $crate::ssz::Decode>::from_ssz_bytes(bitmap_bytes)?;

                let field_count = 0usize $(+ { let _ = stringify!($field); 1usize })+;
                for i in field_count..$cap {
                    if bitmap.get(i).unwrap_or(false) {
                        return Err($crate::error::SszError::InvalidEncoding {
                            detail: alloc::format!("reserved presence bit {i} is set"),
                        });
                    }
                }

                let mut cursor = bitmap_len;
                let mut offsets: alloc::vec::Vec<usize> = alloc::vec::Vec::new();
                let mut field_idx = 0usize;

                $(
                    #[allow(non_snake_case)]
                    let $field: Option<Option<$ty>> = if bitmap.get(field_idx).unwrap_or(false) {
                        if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                            let size = <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size");
                            let end = cursor + size;
                            let slice = bytes.get(cursor..end).ok_or($crate::error::SszError::Truncated {
                                expected: end,
                                got: bytes.len(),
                            })?;
                            cursor = end;
                            Some(Some(<$ty as $crate::ssz::Decode>::from_ssz_bytes(slice)?))
                        } else {
                            let end = cursor + $crate::constants::BYTES_PER_LENGTH_OFFSET;
                            let raw = bytes.get(cursor..end).ok_or($crate::error::SszError::Truncated {
                                expected: end,
                                got: bytes.len(),
                            })?;
                            let offset = u32::from_le_bytes(raw.try_into().expect("slice has offset width")) as usize;
                            offsets.push(offset);
                            cursor = end;
                            None
                        }
                    } else {
                        Some(None)
                    };
                    field_idx += 1;
                )+

                let header_len = cursor;
                if let Some(&first) = offsets.first()
                    && first != header_len
                {
                    return Err($crate::error::SszError::InvalidOffset {
                        detail: alloc::format!("first offset {first} does not equal header length {header_len}"),
                    });
                }
                offsets.push(bytes.len());
                for pair in offsets.windows(2) {
                    if pair[0] > pair[1] || pair[1] > bytes.len() {
                        return Err($crate::error::SszError::InvalidOffset {
                            detail: alloc::format!("offset {} is not within [prev, {}]", pair[0], bytes.len()),
                        });
                    }
                }

                let mut var_idx = 0usize;
                $(
                    #[allow(non_snake_case)]
                    let $field: Option<$ty> = match $field {
                        Some(value) => value,
                        None => {
                            let start = offsets[var_idx];
                            let end = offsets[var_idx + 1];
                            var_idx += 1;
                            Some(<$ty as $crate::ssz::Decode>::from_ssz_bytes(&bytes[start..end])?)
                        }
                    };
                )+

                Ok($name { $($field),+ })
            }
        }

        impl $crate::merkleization::TreeHash for $name {
            fn chunk_count() -> usize {
                $cap
            }

            fn hash_tree_root(&self) -> Result<alloy_primitives::B256, $crate::error::SszError> {
                let mut chunks: alloc::vec::Vec<[u8; 32]> = alloc::vec::Vec::new();
                $(
                    chunks.push(match &self.$field {
                        Some(value) => $crate::merkleization::TreeHash::hash_tree_root(value)?.0,
                        None => [0u8; 32],
                    });
                )+
                for _ in chunks.len()..$cap {
                    chunks.push([0u8; 32]);
                }
                let data_root = $crate::merkleization::merkleize(&chunks, None)?;

                let mut presence: alloc::vec::Vec<bool> = alloc::vec::Vec::new();
                $( presence.push(self.$field.is_some()); )+
                presence.resize($cap, false);
                let bitmap = $crate::composite::bitvector::BitVector::<$cap>::from_bools(&presence)?;
                let bits_root = $crate::merkleization::TreeHash::hash_tree_root(&bitmap)?;

                Ok($crate::merkleization::mix_in_aux(data_root, bits_root))
            }
        }
    };
}

/// Declares a "Profile" view over a stable container: a required-field
/// subset that serializes like an ordinary struct (no presence bitmap of
/// its own) but whose hash-tree-root is merkleized against the *parent*
/// stable container's capacity and a presence bitmap with every profiled
/// field forced to `true`. This is what lets a profile's root be directly
/// comparable to a root computed over the full stable container.
#[macro_export]
macro_rules! profile {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident of $parent_cap:expr ; slots [$($slot:expr),+ $(,)?] {
            $($field_vis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $($field_vis $field: $ty),+
        }

        impl $crate::ssz::SszTypeInfo for $name {
            fn is_fixed_size() -> bool {
                true $(&& <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size())+
            }

            fn fixed_size() -> Option<usize> {
                if <Self as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                    let mut total = 0usize;
                    $(total += <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size");)+
                    Some(total)
                } else {
                    None
                }
            }
        }

        impl $crate::ssz::Encode for $name {
            fn ssz_append(&self, buf: &mut alloc::vec::Vec<u8>) -> Result<(), $crate::error::SszError> {
                let fixed_len: usize = 0usize $(+ if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                    <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size")
                } else {
                    $crate::constants::BYTES_PER_LENGTH_OFFSET
                })+;
                let mut var_acc = fixed_len;

                $(
                    if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                        $crate::ssz::Encode::ssz_append(&self.$field, buf)?;
                    } else {
                        buf.extend_from_slice(&(var_acc as u32).to_le_bytes());
                        var_acc += $crate::ssz::Encode::ssz_bytes_len(&self.$field);
                    }
                )+

                $(
                    if !<$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                        $crate::ssz::Encode::ssz_append(&self.$field, buf)?;
                    }
                )+

                Ok(())
            }

            fn ssz_bytes_len(&self) -> usize {
                let mut total = 0usize;
                $(
                    total += if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                        <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size")
                    } else {
                        $crate::constants::BYTES_PER_LENGTH_OFFSET + $crate::ssz::Encode::ssz_bytes_len(&self.$field)
                    };
                )+
                total
            }
        }

        impl $crate::ssz::Decode for $name {
            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, $crate::error::SszError> {
                let mut cursor = 0usize;
                let mut offsets: alloc::vec::Vec<usize> = alloc::vec::Vec::new();

                $(
                    #[allow(non_snake_case)]
                    let $field = if <$ty as $crate::ssz::SszTypeInfo>::is_fixed_size() {
                        let size = <$ty as $crate::ssz::SszTypeInfo>::fixed_size().expect("fixed field has a fixed size");
                        let end = cursor + size;
                        let slice = bytes.get(cursor..end).ok_or($crate::error::SszError::Truncated {
                            expected: end,
                            got: bytes.len(),
                        })?;
                        cursor = end;
                        Some(<$ty as $crate::ssz::Decode>::from_ssz_bytes(slice)?)
                    } else {
                        let end = cursor + $crate::constants::BYTES_PER_LENGTH_OFFSET;
                        let raw = bytes.get(cursor..end).ok_or($crate::error::SszError::Truncated {
                            expected: end,
                            got: bytes.len(),
                        })?;
                        let offset = u32::from_le_bytes(raw.try_into().expect("slice has offset width")) as usize;
                        offsets.push(offset);
                        cursor = end;
                        None
                    };
                )+

                let header_len = cursor;
                if let Some(&first) = offsets.first()
                    && first != header_len
                {
                    return Err($crate::error::SszError::InvalidOffset {
                        detail: alloc::format!("first offset {first} does not equal header length {header_len}"),
                    });
                }
                offsets.push(bytes.len());
                for pair in offsets.windows(2) {
                    if pair[0] > pair[1] || pair[1] > bytes.len() {
                        return Err($crate::error::SszError::InvalidOffset {
                            detail: alloc::format!("offset {} is not within [prev, {}]", pair[0], bytes.len()),
                        });
                    }
                }

                let mut var_idx = 0usize;
                $(
                    #[allow(non_snake_case)]
                    let $field = match $field {
                        Some(value) => value,
                        None => {
                            let start = offsets[var_idx];
                            let end = offsets[var_idx + 1];
                            var_idx += 1;
                            <$ty as $crate::ssz::Decode>::from_ssz_bytes(&bytes[start..end])?
                        }
                    };
                )+

                Ok($name { $($field),+ })
            }
        }

        impl $crate::merkleization::TreeHash for $name {
            fn chunk_count() -> usize {
                $parent_cap
            }

            fn hash_tree_root(&self) -> Result<alloy_primitives::B256, $crate::error::SszError> {
                let mut chunks: alloc::vec::Vec<[u8; 32]> = alloc::vec::Vec::new();
                for _ in 0..$parent_cap {
                    chunks.push([0u8; 32]);
                }
                let slots = [$($slot),+];
                let mut i = 0usize;
                $(
                    chunks[slots[i]] = $crate::merkleization::TreeHash::hash_tree_root(&self.$field)?.0;
                    i += 1;
                )+
                let data_root = $crate::merkleization::merkleize(&chunks, None)?;

                let mut presence = alloc::vec![false; $parent_cap];
                for &slot in slots.iter() {
                    presence[slot] = true;
                }
                let bitmap = $crate::composite::bitvector::BitVector::<$parent_cap>::from_bools(&presence)?;
                let bits_root = $crate::merkleization::TreeHash::hash_tree_root(&bitmap)?;

                Ok($crate::merkleization::mix_in_aux(data_root, bits_root))
            }
        }
    };
}

crate::stable_container! {
    /// A shape whose fields are all optional and whose Merkle shape is
    /// pinned to a capacity of 4 slots, matching EIP-7495's worked example.
    pub struct Shape1 [4] {
        pub side: u16,
        pub color: u8,
        pub radius: u16,
    }
}

crate::stable_container! {
    /// Same fields as [`Shape1`] at a larger capacity, to demonstrate that
    /// capacity, not field count, drives both the bitmap width and the
    /// Merkle tree shape.
    pub struct Shape2 [8] {
        pub side: u16,
        pub color: u8,
        pub radius: u16,
    }
}

crate::profile! {
    /// A profile over [`Shape1`]/[`Shape2`]-shaped containers requiring
    /// exactly `side` and `color`, at slots 0 and 1 of a 4-slot parent.
    pub struct Square of 4; slots [0, 1] {
        pub side: u16,
        pub color: u8,
    }
}

crate::profile! {
    /// A profile requiring exactly `color` and `radius`, at slots 1 and 2
    /// of a 4-slot parent.
    pub struct Circle of 4; slots [1, 2] {
        pub color: u8,
        pub radius: u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::{Decode, Encode};
    use crate::merkleization::TreeHash;
    use alloy_primitives::{B256, hex};

    fn hash(hex_str: &str) -> B256 {
        B256::from_slice(&hex::decode(hex_str).expect("valid hex"))
    }

    #[test]
    fn shape1_known_scenarios() {
        let cases = [
            (
                Shape1 {
                    side: Some(0x42),
                    color: Some(1),
                    radius: Some(0x42),
                },
                "074200014200",
                hash("37b28eab19bc3e246e55d2e2b2027479454c27ee006d92d4847c84893a162e6d"),
            ),
            (
                Shape1 {
                    side: Some(0x42),
                    color: Some(1),
                    radius: None,
                },
                "03420001",
                hash("bfdb6fda9d02805e640c0f5767b8d1bb9ff4211498a5e2d7c0f36e1b88ce57ff"),
            ),
            (
                Shape1 {
                    side: None,
                    color: Some(1),
                    radius: None,
                },
                "0201",
                hash("522edd7309c0041b8eb6a218d756af558e9cf4c816441ec7e6eef42dfa47bb98"),
            ),
            (
                Shape1 {
                    side: None,
                    color: Some(1),
                    radius: Some(0x42),
                },
                "06014200",
                hash("f66d2c38c8d2afbd409e86c529dff728e9a4208215ca20ee44e49c3d11e145d8"),
            ),
        ];

        for (value, expected_hex, expected_root) in cases {
            let bytes = value.as_ssz_bytes().unwrap();
            assert_eq!(hex::encode(&bytes), expected_hex);
            assert_eq!(value.hash_tree_root().unwrap(), expected_root);
            assert_eq!(Shape1::from_ssz_bytes(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn shape2_known_scenarios() {
        let cases = [
            (
                Shape2 {
                    side: Some(0x42),
                    color: Some(1),
                    radius: Some(0x42),
                },
                "074200014200",
                hash("0792fb509377ee2ff3b953dd9a88eee11ac7566a8df41c6c67a85bc0b53efa4e"),
            ),
            (
                Shape2 {
                    side: Some(0x42),
                    color: Some(1),
                    radius: None,
                },
                "03420001",
                hash("ddc7acd38ae9d6d6788c14bd7635aeb1d7694768d7e00e1795bb6d328ec14f28"),
            ),
            (
                Shape2 {
                    side: None,
                    color: Some(1),
                    radius: None,
                },
                "0201",
                hash("9893ecf9b68030ff23c667a5f2e4a76538a8e2ab48fd060a524888a66fb938c9"),
            ),
            (
                Shape2 {
                    side: None,
                    color: Some(1),
                    radius: Some(0x42),
                },
                "06014200",
                hash("e823471310312d52aa1135d971a3ed72ba041ade3ec5b5077c17a39d73ab17c5"),
            ),
        ];

        for (value, expected_hex, expected_root) in cases {
            let bytes = value.as_ssz_bytes().unwrap();
            assert_eq!(hex::encode(&bytes), expected_hex);
            assert_eq!(value.hash_tree_root().unwrap(), expected_root);
            assert_eq!(Shape2::from_ssz_bytes(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn rejects_reserved_bit_set_past_field_count() {
        // Bitmap byte 0b0000_1000 sets bit 3, which Shape1 (3 declared
        // fields) treats as reserved.
        assert!(Shape1::from_ssz_bytes(&[0b0000_1000]).is_err());
    }

    #[test]
    fn square_profile_round_trips_and_matches_scenario() {
        let square = Square { side: 0x42, color: 1 };
        let bytes = square.as_ssz_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "420001");
        assert_eq!(Square::from_ssz_bytes(&bytes).unwrap(), square);
    }

    #[test]
    fn circle_profile_round_trips_and_matches_scenario() {
        let circle = Circle { color: 1, radius: 0x42 };
        let bytes = circle.as_ssz_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "014200");
        assert_eq!(Circle::from_ssz_bytes(&bytes).unwrap(), circle);
    }

    #[test]
    fn profile_root_is_independent_of_other_slots() {
        // A Square profile only ever touches slots 0/1; its root must not
        // depend on whichever value the parent's radius slot would carry.
        let a = Square { side: 1, color: 2 };
        let b = Square { side: 1, color: 2 };
        assert_eq!(a.hash_tree_root().unwrap(), b.hash_tree_root().unwrap());
    }
}
