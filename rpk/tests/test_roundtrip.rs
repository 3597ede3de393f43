//! Round trip coverage over random and structured images for
//! both channel counts.

use nanorand::{Rng, WyRand};
use rpk::{RpkDecoder, RpkEncoder};
use rpk_core::colorspace::ColorSpace;
use rpk_core::options::{DecoderOptions, EncoderOptions};

fn encode_decode(pixels: &[u8], width: usize, height: usize, colorspace: ColorSpace)
{
    let options = EncoderOptions::default()
        .set_width(width)
        .set_height(height)
        .set_colorspace(colorspace);

    let encoded = RpkEncoder::new(pixels, options).encode().unwrap();

    let decoder_options = DecoderOptions::default()
        .set_max_width(1 << 20)
        .set_max_height(1 << 20);

    let mut decoder = RpkDecoder::new_with_options(decoder_options, &encoded);
    let decoded = decoder.decode().unwrap();

    assert_eq!(decoder.dimensions(), Some((width, height)));
    assert_eq!(decoder.colorspace(), Some(colorspace));
    assert_eq!(
        pixels,
        &decoded[..],
        "round trip mismatch for a {width}x{height} {colorspace:?} image"
    );
}

#[test]
fn test_random_rgba_images()
{
    let mut rand = WyRand::new_seed(42);

    for (width, height) in [(1, 1), (3, 1), (1, 7), (7, 3), (33, 17), (64, 64)]
    {
        let mut pixels = vec![0_u8; width * height * 4];

        rand.fill(&mut pixels);
        encode_decode(&pixels, width, height, ColorSpace::RGBA);
    }
}

#[test]
fn test_random_rgb_images()
{
    let mut rand = WyRand::new_seed(43);

    for (width, height) in [(1, 1), (2, 2), (5, 1), (17, 33), (64, 64)]
    {
        let mut pixels = vec![0_u8; width * height * 3];

        rand.fill(&mut pixels);
        encode_decode(&pixels, width, height, ColorSpace::RGB);
    }
}

#[test]
fn test_limited_palette_hits_the_cache()
{
    let palette = [
        [255_u8, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [128, 128, 128, 64],
    ];

    let mut rand = WyRand::new_seed(44);
    let mut pixels = Vec::new();

    for _ in 0..48 * 48
    {
        let color = palette[rand.generate_range(0_usize..palette.len())];
        pixels.extend_from_slice(&color);
    }
    encode_decode(&pixels, 48, 48, ColorSpace::RGBA);
}

#[test]
fn test_small_delta_walk()
{
    // every pixel is a two bit xor step off the previous one,
    // long stretches of this must still reconstruct exactly
    let mut rand = WyRand::new_seed(45);
    let mut pixels = Vec::new();
    let mut px = [0_u8, 0, 0, 255];

    for _ in 0..1000
    {
        for component in px.iter_mut()
        {
            *component ^= rand.generate_range(0_u8..4);
        }
        pixels.extend_from_slice(&px);
    }
    encode_decode(&pixels, 10, 100, ColorSpace::RGBA);
}

#[test]
fn test_medium_delta_walk()
{
    // color deltas within 5/6/5 bits, alpha untouched
    let mut rand = WyRand::new_seed(46);
    let mut pixels = Vec::new();
    let mut px = [17_u8, 170, 3, 255];

    for _ in 0..500
    {
        px[0] ^= rand.generate_range(0_u8..32);
        px[1] ^= rand.generate_range(0_u8..64);
        px[2] ^= rand.generate_range(0_u8..32);
        pixels.extend_from_slice(&px);
    }
    encode_decode(&pixels, 500, 1, ColorSpace::RGBA);
}

#[test]
fn test_alpha_changes_force_literals()
{
    let mut rand = WyRand::new_seed(47);
    let mut pixels = Vec::new();

    for _ in 0..300
    {
        pixels.extend_from_slice(&[
            rand.generate::<u8>(),
            rand.generate::<u8>(),
            rand.generate::<u8>(),
            rand.generate::<u8>(),
        ]);
    }
    encode_decode(&pixels, 300, 1, ColorSpace::RGBA);
}

#[test]
fn test_three_channel_alpha_is_opaque_after_roundtrip()
{
    // decoding straight to four channels is not a thing, but the
    // internal alpha of a three channel image must behave as a
    // constant 255, a gray ramp with repeats exercises that
    let mut pixels = Vec::new();

    for i in 0..64_usize
    {
        let v = (i * 4) as u8;
        pixels.extend_from_slice(&[v, v, v]);
        pixels.extend_from_slice(&[v, v, v]);
    }
    encode_decode(&pixels, 128, 1, ColorSpace::RGB);
}

#[test]
fn test_solid_color_image()
{
    let pixels: Vec<u8> = core::iter::repeat([9_u8, 8, 7, 255])
        .take(100 * 100)
        .flatten()
        .collect();

    encode_decode(&pixels, 100, 100, ColorSpace::RGBA);
}

#[test]
fn test_tall_and_wide_images()
{
    let mut rand = WyRand::new_seed(48);

    let mut pixels = vec![0_u8; 1 * 777 * 3];
    rand.fill(&mut pixels);
    encode_decode(&pixels, 1, 777, ColorSpace::RGB);

    let mut pixels = vec![0_u8; 777 * 1 * 4];
    rand.fill(&mut pixels);
    encode_decode(&pixels, 777, 1, ColorSpace::RGBA);
}
