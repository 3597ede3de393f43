/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use rpk_core::bit_depth::BitDepth;
use rpk_core::bytestream::ZByteWriter;
use rpk_core::colorspace::{ColorCharacteristics, ColorSpace};
use rpk_core::options::EncoderOptions;

use crate::constants::{
    fits_diff2, fits_diff565, pack_diff2, pack_diff565, pack_run, pixel_diff, rpk_hash,
    RPK_HEADER_SIZE, RPK_MAGIC, RPK_MAX_REPEAT_RUN, RPK_MAX_TYPED_RUN, RPK_PADDING,
    RPK_RUN_DIFF2, RPK_RUN_DIFF565, RPK_RUN_LITERAL, RPK_RUN_REPEAT
};
use crate::errors::RpkEncodeErrors;

const SUPPORTED_COLORSPACES: [ColorSpace; 2] = [ColorSpace::RGB, ColorSpace::RGBA];

/// A scanline at a time rpk encoder.
///
/// Rows are pushed in raster order as RGBA8 regardless of the
/// declared colorspace; three channel images simply never have
/// their alpha transmitted. [`finish`](Self::finish) flushes the
/// pending run, closes the stream and returns the file bytes.
///
/// # Example
/// ```
/// use rpk_core::colorspace::ColorSpace;
/// use rpk_core::options::EncoderOptions;
/// use rpk::RpkRowEncoder;
///
/// let options = EncoderOptions::default()
///     .set_width(2)
///     .set_height(1)
///     .set_colorspace(ColorSpace::RGBA);
///
/// let mut encoder = RpkRowEncoder::new(options).unwrap();
/// encoder.push_row(&[0, 0, 0, 255, 10, 20, 30, 255]).unwrap();
/// let bytes = encoder.finish().unwrap();
/// ```
pub struct RpkRowEncoder
{
    options:               EncoderOptions,
    color_characteristics: ColorCharacteristics,
    stream:                ZByteWriter,
    cache:                 [[u8; 4]; 128],
    px_prev:               [u8; 4],
    run:                   usize,
    run_type:              u8,
    args:                  [u8; 128],
    args_len:              usize,
    rows_pushed:           usize,
    headers_written:       bool
}

impl RpkRowEncoder
{
    /// Create a new scanline encoder for an image described
    /// by `options`
    ///
    /// # Returns
    /// - On success: An encoder ready to accept rows
    /// - On error: Why the image cannot be encoded, e.g an
    ///   unsupported colorspace or depth
    pub fn new(options: EncoderOptions) -> Result<RpkRowEncoder, RpkEncodeErrors>
    {
        if options.get_depth() != BitDepth::Eight
        {
            return Err(RpkEncodeErrors::UnsupportedDepth(options.get_depth()));
        }
        if !SUPPORTED_COLORSPACES.contains(&options.get_colorspace())
        {
            return Err(RpkEncodeErrors::UnsupportedColorspace(
                options.get_colorspace(),
                &SUPPORTED_COLORSPACES
            ));
        }
        if (options.get_width() as u64) > u64::from(u32::MAX)
        {
            return Err(RpkEncodeErrors::TooLargeDimensions(options.get_width()));
        }
        if (options.get_height() as u64) > u64::from(u32::MAX)
        {
            return Err(RpkEncodeErrors::TooLargeDimensions(options.get_height()));
        }
        if options.get_width() == 0 || options.get_height() == 0
        {
            return Err(RpkEncodeErrors::Generic("cannot encode a zero sized image"));
        }

        let mut encoder = RpkRowEncoder {
            options,
            color_characteristics: ColorCharacteristics::sRGB,
            stream: ZByteWriter::new(),
            cache: [[0; 4]; 128],
            // starting pixel, intentionally not the cache seed
            px_prev: [0, 0, 0, 255],
            run: 0,
            run_type: RPK_RUN_REPEAT,
            args: [0; 128],
            args_len: 0,
            rows_pushed: 0,
            headers_written: false
        };
        encoder.stream.reserve(encoder.max_size());

        Ok(encoder)
    }
    /// Set the transfer characteristics recorded in the file header.
    ///
    /// Must be called before the first row is pushed, the header is
    /// written at that point
    pub fn set_color_characteristics(&mut self, characteristics: ColorCharacteristics)
    {
        self.color_characteristics = characteristics;
    }

    /// Return the maximum size for which the encoder can safely
    /// encode the image without fearing for an out of space error
    fn max_size(&self) -> usize
    {
        self.options.get_width()
            * self.options.get_height()
            * (self.options.get_colorspace().num_components() + 1)
            + RPK_HEADER_SIZE
            + RPK_PADDING
    }

    fn encode_headers(&mut self)
    {
        self.stream.write_all(&RPK_MAGIC);
        // width
        self.stream.write_u32_be(self.options.get_width() as u32);
        // height
        self.stream.write_u32_be(self.options.get_height() as u32);
        // channels
        self.stream
            .write_u8(self.options.get_colorspace().num_components() as u8);
        // colorspace
        let xtic = u8::from(self.color_characteristics == ColorCharacteristics::Linear);
        self.stream.write_u8(xtic);
    }

    /// Consume one scanline of `width * 4` RGBA8 bytes.
    ///
    /// For a three channel image the alpha byte of every pixel is
    /// ignored and treated as 255, which a PNG producer handing out
    /// RGBA8 rows will have set already.
    pub fn push_row(&mut self, row: &[u8]) -> Result<(), RpkEncodeErrors>
    {
        let expected = self.options.get_width() * 4;

        if row.len() != expected
        {
            return Err(RpkEncodeErrors::WrongRowSize(expected, row.len()));
        }
        if self.rows_pushed == self.options.get_height()
        {
            return Err(RpkEncodeErrors::WrongRowCount(
                self.options.get_height(),
                self.rows_pushed + 1
            ));
        }
        if !self.headers_written
        {
            self.encode_headers();
            self.headers_written = true;
        }

        let has_alpha = self.options.get_colorspace().has_alpha();

        for chunk in row.chunks_exact(4)
        {
            let mut px = [chunk[0], chunk[1], chunk[2], chunk[3]];

            if !has_alpha
            {
                // alpha is implicit for three channel images and
                // never reaches the wire
                px[3] = 255;
            }
            self.push_pixel(px);
        }
        self.rows_pushed += 1;

        Ok(())
    }

    /// Flush the pending run, append the end of stream marker and
    /// return the encoded file bytes
    pub fn finish(mut self) -> Result<Vec<u8>, RpkEncodeErrors>
    {
        if self.rows_pushed != self.options.get_height()
        {
            return Err(RpkEncodeErrors::WrongRowCount(
                self.options.get_height(),
                self.rows_pushed
            ));
        }
        self.flush_run();
        // write trailing bytes, seven zeroes and the terminator
        self.stream.write_u64_be(0x01);

        Ok(self.stream.into_inner())
    }

    /// Advance the run state machine by one pixel.
    ///
    /// The dispatch order is fixed: identical pixel, then extending
    /// a short diff run, then a cache hit, then starting whichever
    /// of the three diff encodings the delta fits. Reordering any of
    /// these changes the emitted bytes.
    fn push_pixel(&mut self, px: [u8; 4])
    {
        if px == self.px_prev
        {
            if self.run > 0 && self.run_type == RPK_RUN_REPEAT && self.run < RPK_MAX_REPEAT_RUN
            {
                self.run += 1;
            }
            else
            {
                self.flush_run();
                self.run_type = RPK_RUN_REPEAT;
                self.run = 1;
            }
            // a repeated pixel never touches the cache
            return;
        }

        let diff = pixel_diff(px, self.px_prev);
        let slot = rpk_hash(px);

        // short diff runs are cheap, breaking one for a cache index
        // usually costs more bytes than it saves
        if fits_diff2(diff)
            && self.run > 0
            && self.run_type == RPK_RUN_DIFF2
            && self.run < RPK_MAX_TYPED_RUN
        {
            self.args[self.args_len] = pack_diff2(diff);
            self.args_len += 1;
            self.run += 1;

            self.cache[slot] = px;
            self.px_prev = px;
            return;
        }

        if self.cache[slot] == px
        {
            self.flush_run();
            self.stream.write_u8(slot as u8);
            // the slot already holds this pixel, no rewrite
            self.px_prev = px;
            return;
        }

        if fits_diff2(diff) && !(self.run > 0 && self.run_type == RPK_RUN_DIFF565)
        {
            if self.run > 0 && (self.run_type != RPK_RUN_DIFF2 || self.run == RPK_MAX_TYPED_RUN)
            {
                self.flush_run();
            }
            self.args[self.args_len] = pack_diff2(diff);
            self.args_len += 1;
            self.run += 1;
            self.run_type = RPK_RUN_DIFF2;
        }
        else if fits_diff565(diff)
        {
            if self.run > 0 && (self.run_type != RPK_RUN_DIFF565 || self.run == RPK_MAX_TYPED_RUN)
            {
                self.flush_run();
            }
            let packed = pack_diff565(diff);

            self.args[self.args_len] = packed[0];
            self.args_len += 1;
            self.args[self.args_len] = packed[1];
            self.args_len += 1;
            self.run += 1;
            self.run_type = RPK_RUN_DIFF565;
        }
        else
        {
            let channels = self.options.get_colorspace().num_components();

            if self.run > 0 && (self.run_type != RPK_RUN_LITERAL || self.run == RPK_MAX_TYPED_RUN)
            {
                self.flush_run();
            }
            self.args[self.args_len..self.args_len + channels].copy_from_slice(&px[0..channels]);
            self.args_len += channels;
            self.run += 1;
            self.run_type = RPK_RUN_LITERAL;
        }
        self.cache[slot] = px;
        self.px_prev = px;
    }

    /// Emit the pending run as an opcode byte plus its buffered
    /// arguments and reset the pending state
    fn flush_run(&mut self)
    {
        if self.run == 0
        {
            return;
        }

        if self.run_type == RPK_RUN_REPEAT
        {
            let mut length = self.run;

            if length <= 16
            {
                self.stream
                    .write_u8(pack_run(RPK_RUN_REPEAT, (length - 1) as u8));
            }
            else
            {
                length -= 17;

                if length < (1 << 11)
                {
                    self.stream
                        .write_u8(pack_run(RPK_RUN_REPEAT, (16 + (length >> 8)) as u8));
                    self.stream.write_u8((length & 0xFF) as u8);
                }
                else
                {
                    length -= 1 << 11;

                    self.stream
                        .write_u8(pack_run(RPK_RUN_REPEAT, (24 + (length >> 16)) as u8));
                    self.stream.write_u8(((length >> 8) & 0xFF) as u8);
                    self.stream.write_u8((length & 0xFF) as u8);
                }
            }
        }
        else
        {
            self.stream
                .write_u8(pack_run(self.run_type, (self.run - 1) as u8));
            self.stream.write_all(&self.args[..self.args_len]);
        }
        self.run = 0;
        self.args_len = 0;
    }
}

/// An rpk encoder over a complete pixel buffer
///
/// The input is expected to be tightly packed rows of three or
/// four channel eight bit pixels matching the colorspace in the
/// options
///
/// # Example
/// - Encode a 10 by 4 RGB image
/// ```
/// use rpk_core::colorspace::ColorSpace;
/// use rpk_core::options::EncoderOptions;
/// use rpk::RpkEncoder;
///
/// let pixels = [0_u8; 10 * 4 * 3];
///
/// let options = EncoderOptions::default()
///     .set_width(10)
///     .set_height(4)
///     .set_colorspace(ColorSpace::RGB);
///
/// let bytes = RpkEncoder::new(&pixels, options).encode().unwrap();
/// ```
pub struct RpkEncoder<'a>
{
    // raw pixels, in RGB or RGBA
    pixel_data:            &'a [u8],
    options:               EncoderOptions,
    color_characteristics: ColorCharacteristics
}

impl<'a> RpkEncoder<'a>
{
    /// Create a new encoder which will encode the pixels
    #[allow(clippy::redundant_field_names)]
    pub const fn new(data: &'a [u8], options: EncoderOptions) -> RpkEncoder<'a>
    {
        RpkEncoder {
            pixel_data:            data,
            options:               options,
            color_characteristics: ColorCharacteristics::sRGB
        }
    }
    /// Set the transfer characteristics recorded in the
    /// file header
    pub fn set_color_characteristics(&mut self, characteristics: ColorCharacteristics)
    {
        self.color_characteristics = characteristics;
    }

    /// Encode the contents returning a vector containing the
    /// encoded file or an error if anything occurred
    pub fn encode(&self) -> Result<Vec<u8>, RpkEncodeErrors>
    {
        let width = self.options.get_width();
        let height = self.options.get_height();
        let channels = self.options.get_colorspace().num_components();

        let mut row_encoder = RpkRowEncoder::new(self.options)?;

        row_encoder.set_color_characteristics(self.color_characteristics);

        let expected = width * height * channels;
        let found = self.pixel_data.len();

        if expected != found
        {
            return Err(RpkEncodeErrors::TooShortInput(expected, found));
        }

        if self.options.get_colorspace().has_alpha()
        {
            for row in self.pixel_data.chunks_exact(width * 4)
            {
                row_encoder.push_row(row)?;
            }
        }
        else
        {
            // widen to the RGBA8 layout the row encoder consumes
            let mut rgba_row = vec![0_u8; width * 4];

            for row in self.pixel_data.chunks_exact(width * 3)
            {
                for (dst, src) in rgba_row.chunks_exact_mut(4).zip(row.chunks_exact(3))
                {
                    dst[0..3].copy_from_slice(src);
                    dst[3] = 255;
                }
                row_encoder.push_row(&rgba_row)?;
            }
        }

        row_encoder.finish()
    }
}
