//! Proof objects and their wire codec
//!
//! - Types: G1 / G2 curve points, Proof, ProofResult
//! - Codec: lossless encode/decode against the nested wire map

pub mod codec;
mod types;

pub use codec::{decode, decode_with, encode, DecodePolicy, FormatError};
pub use types::{Proof, ProofResult, G1, G2};
