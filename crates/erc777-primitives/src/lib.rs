//! # erc777-primitives
//!
//! Primitive types shared by the operator conformance kit: account addresses,
//! transaction hashes, Keccak-256, and fixed-point unit conversion for token amounts.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
pub mod units;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{keccak256, HashError, H256};
pub use units::{format_units, parse_units, to_wei, UnitsError, ETHER_DECIMALS};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Block number type
pub type BlockNumber = u64;

/// Gas type
pub type Gas = u64;
