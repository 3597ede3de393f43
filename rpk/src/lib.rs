//! A decoder and encoder for the `rpk` lossless image format.
//!
//! The format keeps a 128 entry color cache plus a run state
//! machine with four run kinds, trading a little compression
//! for straight line decode speed.
//!
//! The entry points are [`RpkDecoder`] for decoding,
//! [`RpkEncoder`] for buffer at a time encoding and
//! [`RpkRowEncoder`] for scanline at a time encoding.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;

mod constants;
mod decoder;
mod encoder;
mod errors;
