//! Schema-directed SSZ: an encoder, a decoder, and a hash-tree-root
//! merkleizer over a closed algebra of basic and composite types, plus
//! EIP-7495 stable containers.
//!
//! Every schema node is a Rust type rather than a runtime descriptor:
//! [`ssz::SszTypeInfo`] answers the fixed/variable question,
//! [`ssz::Encode`]/[`ssz::Decode`] do the byte-level work, and
//! [`merkleization::TreeHash`] computes the Merkle root. The `union!`,
//! `container!`, `stable_container!`, and `profile!` macros generate these
//! four impls together for a declared enum or struct so that encoder,
//! decoder, and merkleizer can never drift out of agreement with each
//! other's notion of a type's shape.
#![no_std]
extern crate alloc;

pub mod basic;
pub use basic::*;

pub mod composite;
pub use composite::*;

pub mod ssz;
pub use ssz::{Decode, Encode, SszTypeInfo};

pub mod error;
pub use error::SszError;

pub mod constants;
pub use constants::*;

pub mod merkleization;
pub use merkleization::TreeHash;
