//! Decoder and Encoder Options
//!
//! This module exposes the structs through which callers
//! configure the decoders and encoders in the `rpk` family
//! of crates.
//!
//! All supported options live in one `_Options` struct per
//! direction so the same value can be reused across images.
pub use decoder::{DecoderFlags, DecoderOptions};
pub use encoder::EncoderOptions;

mod decoder;
mod encoder;
