// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all consensus-critical state.
//!
//! This module provides simple wrappers around `parity-scale-codec` (SCALE), chosen
//! for its compact and deterministic properties. Every service writes its records
//! and every call encodes its parameters and return values through these two
//! functions, so a record written by one component is always readable by another.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into a deterministic, canonical byte representation using SCALE codec.
///
/// This function should be used for all data that is written to state or is
/// returned from a service call.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from a canonical byte representation using SCALE codec.
///
/// Fails fast on any decoding error, including trailing bytes, returning a
/// descriptive string.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
