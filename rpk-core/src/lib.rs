/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core utilities shared by the `rpk` family of image crates.
//!
//! This crate carries the pieces that are useful to both the
//! decoder and the encoder but are not tied to the wire format:
//!
//! - A byte oriented reader and writer ([`bytestream`])
//! - Colorspace information ([`colorspace`])
//! - Image bit depth ([`bit_depth`])
//! - Decoder and encoder options ([`options`])
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bit_depth;
pub mod bytestream;
pub mod colorspace;
pub mod options;
