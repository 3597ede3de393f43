/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
/// Errors possible during decoding and encoding.
use core::fmt::{Debug, Display, Formatter};

use rpk_core::bit_depth::BitDepth;
use rpk_core::colorspace::ColorSpace;

/// Possible errors that may occur during decoding
pub enum RpkErrors
{
    /// The image does not start with the magic bytes `rpk`
    ///
    /// Indicates that the input is not an rpk file
    WrongMagicBytes,
    /// The input buffer doesn't have enough bytes to fully
    /// reconstruct the image
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually left
    InsufficientData(usize, usize),
    /// The header contains an invalid channel number
    ///
    /// The only supported values are `3` and `4`
    UnknownChannels(u8),
    /// The header contains an invalid colorspace value
    ///
    /// This should be `0` or `1` but can be ignored if
    /// strict mode is set to false
    UnknownColorspace(u8),
    /// A repeat run length field decoded to a value above the
    /// format maximum of 526352
    ///
    /// Cannot be produced by a conforming encoder, implies a
    /// corrupt stream
    OversizeRun(usize),
    /// The caller supplied row sink reported a failure,
    /// decoding stopped at that row
    SinkFailure(&'static str),
    /// Generic message
    Generic(String),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str)
}

impl Debug for RpkErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            RpkErrors::WrongMagicBytes =>
            {
                writeln!(f, "Wrong magic bytes, expected `rpk` as image start")
            }
            RpkErrors::InsufficientData(expected, found) =>
            {
                writeln!(
                    f,
                    "Insufficient data, required {expected} but remaining stream has {found}"
                )
            }
            RpkErrors::UnknownChannels(channel) =>
            {
                writeln!(f, "Unknown channel number {channel}, expected either 3 or 4")
            }
            RpkErrors::UnknownColorspace(colorspace) =>
            {
                writeln!(
                    f,
                    "Unknown colorspace number {colorspace}, expected either 0 or 1"
                )
            }
            RpkErrors::OversizeRun(length) =>
            {
                writeln!(f, "Repeat run length {length} exceeds the format maximum")
            }
            RpkErrors::SinkFailure(reason) =>
            {
                writeln!(f, "Row sink reported failure: {reason}")
            }
            RpkErrors::Generic(val) =>
            {
                writeln!(f, "{val}")
            }
            RpkErrors::GenericStatic(val) =>
            {
                writeln!(f, "{val}")
            }
        }
    }
}

impl From<&'static str> for RpkErrors
{
    fn from(r: &'static str) -> Self
    {
        Self::GenericStatic(r)
    }
}

/// Errors encountered during encoding
pub enum RpkEncodeErrors
{
    /// Unsupported colorspace
    ///
    /// The first argument is the colorspace encountered,
    /// the second argument is the list of supported colorspaces
    UnsupportedColorspace(ColorSpace, &'static [ColorSpace]),
    /// Unsupported bit depth, the format carries eight
    /// bits per component only
    UnsupportedDepth(BitDepth),
    /// Too large dimensions
    ///
    /// The dimension cannot be encoded into a four byte field
    TooLargeDimensions(usize),
    /// The pixel buffer length does not match the one implied
    /// by the declared width, height and colorspace
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    TooShortInput(usize, usize),
    /// A pushed scanline does not have the expected length
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    WrongRowSize(usize, usize),
    /// The number of scanlines pushed does not match the
    /// declared image height
    ///
    /// # Arguments
    /// - 1st argument is the declared height
    /// - 2nd argument is the number of rows seen
    WrongRowCount(usize, usize),

    Generic(&'static str)
}

impl Debug for RpkEncodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            RpkEncodeErrors::UnsupportedColorspace(found, supported) =>
            {
                writeln!(f, "Cannot encode image with colorspace {found:?} into rpk, supported ones are {supported:?}")
            }
            RpkEncodeErrors::UnsupportedDepth(depth) =>
            {
                writeln!(
                    f,
                    "Cannot encode image with depth {depth:?} into rpk, only eight bit images are supported"
                )
            }
            RpkEncodeErrors::TooLargeDimensions(found) =>
            {
                writeln!(
                    f,
                    "Too large image dimension {found}, rpk can only encode images less than {}",
                    u32::MAX
                )
            }
            RpkEncodeErrors::TooShortInput(expected, found) =>
            {
                writeln!(
                    f,
                    "Too short input, expected a pixel buffer of {expected} bytes but found {found}"
                )
            }
            RpkEncodeErrors::WrongRowSize(expected, found) =>
            {
                writeln!(
                    f,
                    "Wrong scanline length, expected {expected} bytes but found {found}"
                )
            }
            RpkEncodeErrors::WrongRowCount(expected, found) =>
            {
                writeln!(
                    f,
                    "Wrong number of scanlines, the header declared {expected} but {found} were pushed"
                )
            }
            RpkEncodeErrors::Generic(val) =>
            {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for RpkErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        writeln!(f, "{self:?}")
    }
}

impl Display for RpkEncodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        writeln!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RpkErrors {}

#[cfg(feature = "std")]
impl std::error::Error for RpkEncodeErrors {}
