//! `container!`: generates an ordinary SSZ struct (`Struct{field: T, …}`).
//!
//! Fixed fields serialize inline; variable fields serialize as a 4-byte
//! offset in the header followed by their body in declaration order, per
//! the struct layout algorithm. Hash-tree-root roots each field
//! independently and merkleizes the resulting list, with no length or
//! selector mix-in, since a struct's shape is static.

/// Declares a struct and its `SszTypeInfo`/`Encode`/`Decode`/`TreeHash` impls.
///
/// ```ignore
/// simple_ssz::container! {
///     pub struct Fork {
///         pub previous_version: u32,
///         pub current_version: u32,
///         pub epoch: u64,
///     }
/// }
/// ```
#[macro_export]
macro_rules! container {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
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
                0usize $(+ { let _ = stringify!($field); 1usize })+
            }

            fn hash_tree_root(&self) -> Result<alloy_primitives::B256, $crate::error::SszError> {
                let mut chunks: alloc::vec::Vec<[u8; 32]> = alloc::vec::Vec::new();
                $(
                    chunks.push($crate::merkleization::TreeHash::hash_tree_root(&self.$field)?.0);
                )+
                $crate::merkleization::merkleize(&chunks, None)
            }
        }
    };
}

crate::container! {
    /// The beacon-chain fork-version marker: two 4-byte version tags and the
    /// epoch the switch activates at.
    pub struct Fork {
        pub previous_version: u32,
        pub current_version: u32,
        pub epoch: u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::list::List;
    use crate::ssz::{Decode, Encode};
    use crate::merkleization::TreeHash;
    use alloy_primitives::{B256, hex};

    #[test]
    fn fork_round_trips() {
        let fork = Fork {
            previous_version: u32::from_le_bytes([0x9C, 0xE2, 0x5D, 0x26]),
            current_version: u32::from_le_bytes([0x36, 0x90, 0x55, 0x93]),
            epoch: 3,
        };
        let bytes = fork.as_ssz_bytes().unwrap();
        assert_eq!(Fork::from_ssz_bytes(&bytes).unwrap(), fork);
    }

    #[test]
    fn fork_known_hash_tree_root() {
        let fork = Fork {
            previous_version: u32::from_le_bytes([0x9C, 0xE2, 0x5D, 0x26]),
            current_version: u32::from_le_bytes([0x36, 0x90, 0x55, 0x93]),
            epoch: 3,
        };
        let root = fork.hash_tree_root().unwrap();
        assert_eq!(
            root,
            B256::from(hex!("58316a908701d3660123f0b8cb7839abdd961f71d92993d34e4f480fbec687d9"))
        );
    }

    crate::container! {
        struct Person {
            name: List<u8, 64>,
            age: u8,
            company: List<u8, 64>,
        }
    }

    #[test]
    fn struct_with_mixed_fixed_and_variable_fields_matches_known_scenario() {
        let mut name = List::<u8, 64>::new();
        for b in b"James" {
            name.push(*b).unwrap();
        }
        let mut company = List::<u8, 64>::new();
        for b in b"DEV Inc." {
            company.push(*b).unwrap();
        }
        let person = Person { name, age: 32, company };

        let bytes = person.as_ssz_bytes().unwrap();
        let mut expected = alloc::vec![0x09, 0x00, 0x00, 0x00, 0x20, 0x0E, 0x00, 0x00, 0x00];
        expected.extend_from_slice(b"James");
        expected.extend_from_slice(b"DEV Inc.");
        assert_eq!(bytes, expected);

        let decoded = Person::from_ssz_bytes(&bytes).unwrap();
        assert_eq!(decoded, person);
    }

    #[test]
    fn struct_with_no_variable_fields_emits_only_its_fixed_header() {
        crate::container! {
            struct Pair {
                a: u32,
                b: u8,
            }
        }
        let pair = Pair { a: 12, b: 6 };
        assert_eq!(pair.ssz_bytes_len(), 5);
        assert_eq!(pair.as_ssz_bytes().unwrap().len(), 5);
    }
}
