//! Image colorspace information and manipulation utilities.

/// All image colorspaces the `rpk` crates understand
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace
{
    RGB,
    RGBA,
    Unknown
}

impl ColorSpace
{
    /// Return the number of color components
    /// a pixel in this colorspace carries
    pub const fn num_components(&self) -> usize
    {
        match self
        {
            Self::RGB => 3,
            Self::RGBA => 4,
            Self::Unknown => 0
        }
    }

    /// Return true if the colorspace carries an alpha component
    pub const fn has_alpha(&self) -> bool
    {
        matches!(self, Self::RGBA)
    }
}

/// The transfer characteristics of the color channels.
///
/// Stored verbatim in an image header, never interpreted
/// by the codec itself.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorCharacteristics
{
    /// Channels are sRGB with linear alpha
    sRGB,
    /// All channels are linear
    Linear
}
