//! The document codec.
//!
//! Converts between service record collections and the external compose
//! document: [`encode`] renders records to YAML text (strict for final
//! generation, lenient for live preview), [`decode`] recovers records
//! from a parsed or raw document, tolerating every recognized input
//! shape and reporting unmodeled features as warnings.
//!
//! For any collection that only uses modeled fields,
//! `decode(encode(records))` yields the collection back (after default
//! normalization), and encoding the same collection twice produces
//! byte-identical output.

pub mod decode;
pub mod document;
pub mod encode;
pub mod probe;
pub mod units;

#[cfg(test)]
mod proptests;

pub use decode::{decode, decode_value, DecodeResult};
pub use encode::{encode, encode_preview, encode_with_mode, EncodeMode, EncodeResult};
