//! Basic types: `Uint` (`u8`/`u16`/`u32`/`u64`/`u128`/`U256`) and `Bool`.

pub mod boolean;
pub mod uint;
