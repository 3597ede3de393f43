use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use clap::ArgMatches;
use log::{debug, info};
use rpk::{RpkDecoder, RpkEncodeErrors, RpkErrors, RpkRowEncoder};
use rpk_core::colorspace::ColorSpace;
use rpk_core::options::EncoderOptions;

/// Anything that can go wrong between reading the input
/// file and writing the converted one
pub enum ConvertErrors
{
    /// The input or output filename does not carry the
    /// suffix the direction of conversion requires
    BadSuffix(&'static str),
    /// The png producer could not hand us pixels
    Source(String),
    /// The png consumer could not take our pixels
    Sink(String),
    /// The rpk decoder failed
    Decode(RpkErrors),
    /// The rpk encoder failed
    Encode(RpkEncodeErrors),
    /// Reading or writing a file failed
    Io(std::io::Error)
}

impl Debug for ConvertErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            ConvertErrors::BadSuffix(msg) => writeln!(f, "{msg}"),
            ConvertErrors::Source(msg) => writeln!(f, "Could not read source image: {msg}"),
            ConvertErrors::Sink(msg) => writeln!(f, "Could not write output image: {msg}"),
            ConvertErrors::Decode(err) => writeln!(f, "Could not decode rpk file: {err:?}"),
            ConvertErrors::Encode(err) => writeln!(f, "Could not encode rpk file: {err:?}"),
            ConvertErrors::Io(err) => writeln!(f, "I/O error: {err}")
        }
    }
}

impl From<std::io::Error> for ConvertErrors
{
    fn from(err: std::io::Error) -> Self
    {
        ConvertErrors::Io(err)
    }
}

impl From<RpkErrors> for ConvertErrors
{
    fn from(err: RpkErrors) -> Self
    {
        ConvertErrors::Decode(err)
    }
}

impl From<RpkEncodeErrors> for ConvertErrors
{
    fn from(err: RpkEncodeErrors) -> Self
    {
        ConvertErrors::Encode(err)
    }
}

/// Dispatch on the input suffix, png files are encoded into
/// rpk and everything else is treated as rpk and decoded
pub fn run(options: &ArgMatches) -> Result<(), ConvertErrors>
{
    let input = options.get_one::<String>("input").unwrap();
    let output = options.get_one::<String>("output").unwrap();

    if input.ends_with(".png")
    {
        if !output.ends_with(".rpk")
        {
            return Err(ConvertErrors::BadSuffix(
                "At least one filename must end with .rpk"
            ));
        }
        png_to_rpk(input, output)
    }
    else
    {
        if !output.ends_with(".png")
        {
            return Err(ConvertErrors::BadSuffix(
                "At least one filename must end with .png"
            ));
        }
        rpk_to_png(input, output)
    }
}

/// Widen one png scanline to the RGBA8 layout the rpk row
/// encoder consumes
fn expand_row_to_rgba(src: &[u8], color: png::ColorType, dst: &mut [u8])
{
    match color
    {
        png::ColorType::Rgba => dst.copy_from_slice(src),
        png::ColorType::Rgb =>
        {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(3))
            {
                d[0..3].copy_from_slice(s);
                d[3] = 255;
            }
        }
        png::ColorType::GrayscaleAlpha =>
        {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(2))
            {
                d[0] = s[0];
                d[1] = s[0];
                d[2] = s[0];
                d[3] = s[1];
            }
        }
        png::ColorType::Grayscale =>
        {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.iter())
            {
                d[0] = *s;
                d[1] = *s;
                d[2] = *s;
                d[3] = 255;
            }
        }
        // palettes were expanded when the reader was set up
        _ => unreachable!()
    }
}

fn png_to_rpk(input: &str, output: &str) -> Result<(), ConvertErrors>
{
    let file = File::open(input)?;

    let mut decoder = png::Decoder::new(BufReader::new(file));
    // we always want eight bit channels, palettes and packed
    // grayscale expanded
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| ConvertErrors::Source(e.to_string()))?;

    let (color, _) = reader.output_color_type();
    let row_bytes = reader.output_line_size(reader.info().width);

    let (width, height) = (
        reader.info().width as usize,
        reader.info().height as usize
    );

    let mut pixels = vec![0_u8; reader.output_buffer_size()];

    reader
        .next_frame(&mut pixels)
        .map_err(|e| ConvertErrors::Source(e.to_string()))?;

    info!("Read png image {input}, {width}x{height}, {color:?}");

    // alpha-less pngs become three channel rpk files
    let colorspace = match color
    {
        png::ColorType::Rgba | png::ColorType::GrayscaleAlpha => ColorSpace::RGBA,
        _ => ColorSpace::RGB
    };

    let options = EncoderOptions::default()
        .set_width(width)
        .set_height(height)
        .set_colorspace(colorspace);

    let mut encoder = RpkRowEncoder::new(options)?;
    let mut rgba_row = vec![0_u8; width * 4];

    for row in pixels.chunks_exact(row_bytes)
    {
        expand_row_to_rgba(row, color, &mut rgba_row);
        encoder.push_row(&rgba_row)?;
    }

    let encoded = encoder.finish()?;

    debug!("Encoded {} bytes of rpk data", encoded.len());

    std::fs::write(output, encoded)?;

    Ok(())
}

fn rpk_to_png(input: &str, output: &str) -> Result<(), ConvertErrors>
{
    let contents = std::fs::read(input)?;

    let mut decoder = RpkDecoder::new(&contents);

    decoder.decode_headers()?;

    // present after decode_headers succeeded
    let (width, height) = decoder.dimensions().unwrap();
    let colorspace = decoder.colorspace().unwrap();

    info!("Read rpk image {input}, {width}x{height}, {colorspace:?}");

    let file = File::create(output)?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);

    encoder.set_color(match colorspace
    {
        ColorSpace::RGBA => png::ColorType::Rgba,
        _ => png::ColorType::Rgb
    });
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| ConvertErrors::Sink(e.to_string()))?;

    let mut stream_writer = writer
        .stream_writer()
        .map_err(|e| ConvertErrors::Sink(e.to_string()))?;

    decoder.decode_rows(|row| {
        stream_writer
            .write_all(row)
            .map_err(|_| "png row write failed")
    })?;

    stream_writer
        .finish()
        .map_err(|e| ConvertErrors::Sink(e.to_string()))?;

    Ok(())
}
