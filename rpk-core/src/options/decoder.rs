use bitflags::bitflags;

fn decoder_strict_mode() -> DecoderFlags
{
    let mut flags = DecoderFlags::empty();

    flags.set(DecoderFlags::ERROR_ON_UNKNOWN_COLORSPACE, true);
    flags.set(DecoderFlags::CONFIRM_END_MARKER, true);

    flags
}

bitflags! {
    /// Decoder options that are flags
    ///
    /// NOTE: When you extend this, add true or false to
    /// all options above that return a `DecoderFlags`
    #[derive(Copy, Clone, Debug)]
    pub struct DecoderFlags: u32 {
        /// Whether the decoder should reject headers whose
        /// colorspace byte is not a value it knows about
        const ERROR_ON_UNKNOWN_COLORSPACE = 0b0000_0001;
        /// Whether the decoder should verify the eight byte
        /// end of stream marker after producing the last pixel
        const CONFIRM_END_MARKER          = 0b0000_0010;
    }
}

/// Decoder options
///
/// Each option specifies the decoders that respect it
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions
{
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:  usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height: usize,

    flags: DecoderFlags
}

impl DecoderOptions
{
    /// Get maximum width configured for the decoder
    pub const fn get_max_width(&self) -> usize
    {
        self.max_width
    }

    /// Get maximum height configured for the decoder
    pub const fn get_max_height(&self) -> usize
    {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// and reject most errors
    pub fn get_strict_mode(&self) -> bool
    {
        let flags = DecoderFlags::ERROR_ON_UNKNOWN_COLORSPACE | DecoderFlags::CONFIRM_END_MARKER;

        self.flags.contains(flags)
    }

    /// Return true if the decoder should verify the end of
    /// stream marker after the final pixel
    pub const fn get_confirm_end_marker(&self) -> bool
    {
        self.flags.contains(DecoderFlags::CONFIRM_END_MARKER)
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self
    {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self
    {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be in strict mode
    pub fn set_strict_mode(mut self, yes: bool) -> Self
    {
        let flags = DecoderFlags::ERROR_ON_UNKNOWN_COLORSPACE | DecoderFlags::CONFIRM_END_MARKER;

        self.flags.set(flags, yes);
        self
    }

    /// Set whether the decoder should verify the end of
    /// stream marker after the final pixel
    pub fn set_confirm_end_marker(mut self, yes: bool) -> Self
    {
        self.flags.set(DecoderFlags::CONFIRM_END_MARKER, yes);
        self
    }
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        Self {
            max_width:  1 << 14,
            max_height: 1 << 14,
            flags:      decoder_strict_mode()
        }
    }
}
