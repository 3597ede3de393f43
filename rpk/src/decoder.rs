use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, error, info};
use rpk_core::bit_depth::BitDepth;
use rpk_core::bytestream::ZByteReader;
use rpk_core::colorspace::{ColorCharacteristics, ColorSpace};
use rpk_core::options::DecoderOptions;

use crate::constants::{
    rpk_hash, RPK_END, RPK_HEADER_SIZE, RPK_MAGIC, RPK_MAX_REPEAT_RUN, RPK_OP_RUN, RPK_RUN_DIFF2,
    RPK_RUN_DIFF565, RPK_RUN_LITERAL, RPK_RUN_REPEAT
};
use crate::errors::RpkErrors;

/// An rpk format decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers,
/// [`decode`] to return the uncompressed pixels or
/// [`decode_rows`] to stream scanlines into a caller
/// supplied sink.
///
/// Additional methods are provided that give more
/// details of the compressed image, like width and height
/// are accessible after decoding headers
///
/// [`decode_headers`]:RpkDecoder::decode_headers
/// [`decode`]:RpkDecoder::decode
/// [`decode_rows`]:RpkDecoder::decode_rows
pub struct RpkDecoder<'a>
{
    width:                 usize,
    height:                usize,
    colorspace:            ColorSpace,
    color_characteristics: ColorCharacteristics,
    decoded_headers:       bool,
    stream:                ZByteReader<'a>,
    options:               DecoderOptions
}

impl<'a> RpkDecoder<'a>
{
    /// Create a new rpk format decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The compressed rpk data
    ///
    /// # Example
    ///
    /// ```no_run
    /// let mut decoder = rpk::RpkDecoder::new(&[]);
    /// // additional code
    /// ```
    pub fn new(data: &'a [u8]) -> RpkDecoder<'a>
    {
        RpkDecoder::new_with_options(DecoderOptions::default(), data)
    }
    /// Create a new rpk format decoder that obeys specified restrictions
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Arguments
    /// - `options`: Decoder options that the decoder should respect
    /// - `data`: The compressed rpk data
    ///
    /// # Example
    /// ```
    /// use rpk_core::options::DecoderOptions;
    /// use rpk::RpkDecoder;
    /// // only decode images less than 10 in both width and height
    ///
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = RpkDecoder::new_with_options(options, &[]);
    /// ```
    #[allow(clippy::redundant_field_names)]
    pub fn new_with_options(options: DecoderOptions, data: &'a [u8]) -> RpkDecoder<'a>
    {
        RpkDecoder {
            width:                 0,
            height:                0,
            colorspace:            ColorSpace::RGB,
            color_characteristics: ColorCharacteristics::sRGB,
            decoded_headers:       false,
            stream:                ZByteReader::new(data),
            options:               options
        }
    }
    /// Decode an rpk header storing needed information into
    /// the decoder instance
    ///
    /// # Returns
    ///
    /// - On success: Nothing
    /// - On error: The error encountered when decoding headers,
    ///     error type will be an instance of [RpkErrors]
    ///
    /// [RpkErrors]:crate::errors::RpkErrors
    pub fn decode_headers(&mut self) -> Result<(), RpkErrors>
    {
        if self.decoded_headers
        {
            return Ok(());
        }

        if !self.stream.has(RPK_HEADER_SIZE)
        {
            return Err(RpkErrors::InsufficientData(
                RPK_HEADER_SIZE,
                self.stream.remaining()
            ));
        }
        // match magic bytes.
        let magic = self.stream.get(3).unwrap();

        if magic != RPK_MAGIC
        {
            return Err(RpkErrors::WrongMagicBytes);
        }

        // these were confirmed to be in bounds by has so use the non
        // failing routines
        let width = self.stream.get_u32_be() as usize;
        let height = self.stream.get_u32_be() as usize;
        let channels = self.stream.get_u8();
        let colorspace = self.stream.get_u8();

        if width > self.options.get_max_width()
        {
            let msg = format!(
                "Width {} greater than max configured width {}",
                width,
                self.options.get_max_width()
            );
            return Err(RpkErrors::Generic(msg));
        }

        if height > self.options.get_max_height()
        {
            let msg = format!(
                "Height {} greater than max configured height {}",
                height,
                self.options.get_max_height()
            );
            return Err(RpkErrors::Generic(msg));
        }

        self.colorspace = match channels
        {
            3 => ColorSpace::RGB,
            4 => ColorSpace::RGBA,
            _ => return Err(RpkErrors::UnknownChannels(channels))
        };
        self.color_characteristics = match colorspace
        {
            0 => ColorCharacteristics::sRGB,
            1 => ColorCharacteristics::Linear,
            _ =>
            {
                if self.options.get_strict_mode()
                {
                    return Err(RpkErrors::UnknownColorspace(colorspace));
                }
                error!("Unknown/invalid colorspace value {colorspace}, expected 0 or 1");
                ColorCharacteristics::sRGB
            }
        };
        self.width = width;
        self.height = height;

        info!("Image width: {:?}", self.width);
        info!("Image height: {:?}", self.height);
        info!("Image colorspace: {:?}", self.colorspace);
        self.decoded_headers = true;

        Ok(())
    }
    /// Decode the bytes of rpk image data, returning the
    /// uncompressed bytes or the error encountered during decoding
    ///
    /// Additional details about the encoded image can be found after
    /// calling this/[`decode_headers`], i.e the width and height can
    /// be accessed by the [`dimensions`] method.
    ///
    /// # Returns
    /// - On success: The decoded bytes, `width * height * channels`
    ///   of them in row major order
    /// - On error: An instance of [RpkErrors] which gives a reason why
    ///   the image could not be decoded
    ///
    /// [`decode_headers`]:Self::decode_headers
    /// [`dimensions`]:Self::dimensions
    /// [RpkErrors]:crate::errors::RpkErrors
    pub fn decode(&mut self) -> Result<Vec<u8>, RpkErrors>
    {
        self.decode_headers()?;

        let row_length = self.width * self.colorspace.num_components();
        let size = row_length * self.height;

        let mut pixels = vec![0; size];

        if row_length == 0
        {
            // degenerate zero sized image, the pixel loop never
            // runs but the trailer is still verified
            self.decode_rows(|_| Ok(()))?;
            return Ok(pixels);
        }

        let mut rows = pixels.chunks_exact_mut(row_length);

        self.decode_rows(|row| match rows.next()
        {
            Some(chunk) =>
            {
                chunk.copy_from_slice(row);
                Ok(())
            }
            None => Err("more rows produced than the header declared")
        })?;

        Ok(pixels)
    }
    /// Decode rpk image data one scanline at a time, handing each
    /// fully reconstructed row to `sink`
    ///
    /// Each row is `width * channels` bytes. A sink error stops
    /// decoding immediately and surfaces as [`SinkFailure`]; the
    /// decoder should be discarded afterwards.
    ///
    /// # Arguments
    /// - `sink`: called once per scanline, in raster order
    ///
    /// [`SinkFailure`]:crate::errors::RpkErrors::SinkFailure
    pub fn decode_rows<F>(&mut self, mut sink: F) -> Result<(), RpkErrors>
    where
        F: FnMut(&[u8]) -> Result<(), &'static str>
    {
        self.decode_headers()?;

        match self.colorspace.num_components()
        {
            3 => self.decode_rows_generic::<3, F>(&mut sink),
            4 => self.decode_rows_generic::<4, F>(&mut sink),
            _ => unreachable!()
        }
    }
    fn decode_rows_generic<const SIZE: usize, F>(&mut self, sink: &mut F) -> Result<(), RpkErrors>
    where
        F: FnMut(&[u8]) -> Result<(), &'static str>
    {
        let mut cache = [[0_u8; 4]; 128];
        // starting pixel, note the alpha asymmetry with the all
        // zero cache seed
        let mut px = [0, 0, 0, 255];

        let mut run = 0_usize;
        let mut run_type = RPK_RUN_REPEAT;

        let mut row = vec![0_u8; self.width * SIZE];

        for _ in 0..self.height
        {
            for pix_chunk in row.chunks_exact_mut(SIZE)
            {
                if run == 0
                {
                    if !self.stream.has(1)
                    {
                        return Err(RpkErrors::InsufficientData(1, self.stream.remaining()));
                    }
                    let op = self.stream.get_u8();

                    if op < RPK_OP_RUN
                    {
                        // cache index, the slot is handed out verbatim
                        // and stays as it is
                        px = cache[usize::from(op)];

                        pix_chunk.copy_from_slice(&px[0..SIZE]);
                        continue;
                    }
                    run_type = (op >> 5) & 3;
                    let length_lo = usize::from(op & 0x1F);

                    if run_type == RPK_RUN_REPEAT
                    {
                        run = self.read_repeat_length(length_lo)?;
                    }
                    else
                    {
                        run = length_lo + 1;
                    }
                }
                run -= 1;

                if run_type == RPK_RUN_DIFF2
                {
                    if !self.stream.has(1)
                    {
                        return Err(RpkErrors::InsufficientData(1, self.stream.remaining()));
                    }
                    let b = self.stream.get_u8();

                    px[0] ^= (b >> 6) & 3;
                    px[1] ^= (b >> 4) & 3;
                    px[2] ^= (b >> 2) & 3;
                    if SIZE > 3
                    {
                        px[3] ^= b & 3;
                    }
                    cache[rpk_hash(px)] = px;
                }
                else if run_type == RPK_RUN_DIFF565
                {
                    if !self.stream.has(2)
                    {
                        return Err(RpkErrors::InsufficientData(2, self.stream.remaining()));
                    }
                    let [b0, b1] = self.stream.get_fixed_bytes_or_zero::<2>();

                    px[0] ^= b0 >> 3;
                    px[1] ^= ((b0 & 7) << 3) | (b1 >> 5);
                    px[2] ^= b1 & 0x1F;

                    cache[rpk_hash(px)] = px;
                }
                else if run_type == RPK_RUN_LITERAL
                {
                    if !self.stream.has(SIZE)
                    {
                        return Err(RpkErrors::InsufficientData(SIZE, self.stream.remaining()));
                    }
                    let bytes = self.stream.get(SIZE).unwrap();

                    px[0..SIZE].copy_from_slice(bytes);

                    cache[rpk_hash(px)] = px;
                }
                // a repeat run re-emits the previous pixel and leaves
                // the cache alone

                pix_chunk.copy_from_slice(&px[0..SIZE]);
            }
            sink(&row).map_err(RpkErrors::SinkFailure)?;
        }

        if self.options.get_confirm_end_marker()
        {
            let remaining = self.stream.remaining_bytes();

            if remaining != RPK_END
            {
                return Err(RpkErrors::GenericStatic(
                    "End of stream marker does not close the image"
                ));
            }
        }

        debug!("Finished decoding image");

        Ok(())
    }
    /// Decode the extended length field of a repeat run.
    ///
    /// Bits 3 and 4 of the low opcode bits select how many extra
    /// bytes follow; those accumulate big endian below the bits kept
    /// from the opcode, and a cumulative bias per form restores the
    /// actual pixel count.
    fn read_repeat_length(&mut self, length_lo: usize) -> Result<usize, RpkErrors>
    {
        let length = if length_lo < 16
        {
            length_lo + 1
        }
        else if length_lo < 24
        {
            if !self.stream.has(1)
            {
                return Err(RpkErrors::InsufficientData(1, self.stream.remaining()));
            }
            let b1 = usize::from(self.stream.get_u8());

            (((length_lo & 7) << 8) | b1) + 17
        }
        else
        {
            if !self.stream.has(2)
            {
                return Err(RpkErrors::InsufficientData(2, self.stream.remaining()));
            }
            let b1 = usize::from(self.stream.get_u8());
            let b2 = usize::from(self.stream.get_u8());

            (((length_lo & 7) << 16) | (b1 << 8) | b2) + 2065
        };

        if length > RPK_MAX_REPEAT_RUN
        {
            return Err(RpkErrors::OversizeRun(length));
        }
        Ok(length)
    }

    /// Returns the colorspace the pixels are in, or none if the
    /// headers haven't been decoded
    ///
    /// The colorspace returned can either be [RGB] or [RGBA]
    /// depending on the channel count in the header
    ///
    /// [RGB]: rpk_core::colorspace::ColorSpace::RGB
    /// [RGBA]: rpk_core::colorspace::ColorSpace::RGBA
    pub const fn colorspace(&self) -> Option<ColorSpace>
    {
        if self.decoded_headers
        {
            Some(self.colorspace)
        }
        else
        {
            None
        }
    }
    /// Return the transfer characteristics stored in the header,
    /// or none if the headers haven't been decoded
    ///
    /// The value is carried through the file verbatim, the codec
    /// itself never interprets it
    pub const fn color_characteristics(&self) -> Option<ColorCharacteristics>
    {
        if self.decoded_headers
        {
            Some(self.color_characteristics)
        }
        else
        {
            None
        }
    }
    /// Return the rpk default bit depth
    ///
    /// This is always 8
    ///
    /// # Example
    ///
    /// ```
    /// use rpk_core::bit_depth::BitDepth;
    /// use rpk::RpkDecoder;
    /// let decoder = RpkDecoder::new(&[]);
    /// assert_eq!(decoder.bit_depth(), BitDepth::Eight)
    /// ```
    pub const fn bit_depth(&self) -> BitDepth
    {
        BitDepth::Eight
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rpk::RpkDecoder;
    /// let mut decoder = RpkDecoder::new(&[]);
    ///
    /// decoder.decode_headers().unwrap();
    /// // get dimensions now.
    /// let (w, h) = decoder.dimensions().unwrap();
    /// ```
    pub const fn dimensions(&self) -> Option<(usize, usize)>
    {
        if self.decoded_headers
        {
            return Some((self.width, self.height));
        }
        None
    }
}
