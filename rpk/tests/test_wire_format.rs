//! Byte exact checks of the emitted stream against hand
//! computed expectations.

use rpk::{RpkDecoder, RpkEncoder};
use rpk_core::colorspace::ColorSpace;
use rpk_core::options::{DecoderOptions, EncoderOptions};

const END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

fn rpk_header(width: u32, height: u32, channels: u8) -> Vec<u8>
{
    let mut header = b"rpk".to_vec();

    header.extend_from_slice(&width.to_be_bytes());
    header.extend_from_slice(&height.to_be_bytes());
    header.push(channels);
    // srgb
    header.push(0);
    header
}

fn encode(pixels: &[u8], width: usize, height: usize, colorspace: ColorSpace) -> Vec<u8>
{
    let options = EncoderOptions::default()
        .set_width(width)
        .set_height(height)
        .set_colorspace(colorspace);

    RpkEncoder::new(pixels, options).encode().unwrap()
}

fn decode_unlimited(data: &[u8]) -> Vec<u8>
{
    let options = DecoderOptions::default()
        .set_max_width(1 << 20)
        .set_max_height(1 << 20);

    RpkDecoder::new_with_options(options, data).decode().unwrap()
}

fn expected_file(width: u32, height: u32, channels: u8, payload: &[u8]) -> Vec<u8>
{
    let mut file = rpk_header(width, height, channels);

    file.extend_from_slice(payload);
    file.extend_from_slice(&END_MARKER);
    file
}

#[test]
fn test_single_black_pixel_three_channel()
{
    // equal to the starting pixel, not to the all zero cache
    // seed whose alpha is zero, so this must come out as a
    // repeat run and not a cache index
    let pixels = [0, 0, 0];

    let encoded = encode(&pixels, 1, 1, ColorSpace::RGB);

    assert_eq!(encoded, expected_file(1, 1, 3, &[0x80]));
    assert_eq!(decode_unlimited(&encoded), pixels);
}

#[test]
fn test_repeat_run_with_extended_length()
{
    // first pixel is a literal, the remaining nineteen repeat it
    let pixels: Vec<u8> = core::iter::repeat([10, 20, 30, 40])
        .take(20)
        .flatten()
        .collect();

    let encoded = encode(&pixels, 20, 1, ColorSpace::RGBA);

    assert_eq!(
        encoded,
        expected_file(20, 1, 4, &[0xE0, 0x0A, 0x14, 0x1E, 0x28, 0x90, 0x02])
    );
    assert_eq!(decode_unlimited(&encoded), pixels);
}

#[test]
fn test_cache_hit_after_diff_runs()
{
    // A is a short diff off the starting pixel, B a 5/6/5 diff
    // off A, and the second A lands on its cache slot
    let pixels = [1, 2, 3, 9, 9, 9, 1, 2, 3];

    let encoded = encode(&pixels, 3, 1, ColorSpace::RGB);

    assert_eq!(
        encoded,
        expected_file(3, 1, 3, &[0xA0, 0x6C, 0xC0, 0x41, 0x6A, 0x07])
    );
    assert_eq!(decode_unlimited(&encoded), pixels);
}

#[test]
fn test_diff_run_after_leading_repeat()
{
    // opaque black equals the starting pixel, the second pixel
    // moves every component by at most three
    let pixels = [0, 0, 0, 255, 1, 2, 3, 254];

    let encoded = encode(&pixels, 2, 1, ColorSpace::RGBA);

    assert_eq!(encoded, expected_file(2, 1, 4, &[0x80, 0xA0, 0x6D]));
    assert_eq!(decode_unlimited(&encoded), pixels);
}

fn repeat_payload(length: usize) -> Vec<u8>
{
    // the opcode forms a repeat run flush may take
    if length <= 16
    {
        vec![0x80 | (length - 1) as u8]
    }
    else if length <= 2064
    {
        let rest = length - 17;
        vec![0x90 | (rest >> 8) as u8, (rest & 0xFF) as u8]
    }
    else
    {
        let rest = length - 2065;
        vec![
            0x98 | (rest >> 16) as u8,
            ((rest >> 8) & 0xFF) as u8,
            (rest & 0xFF) as u8,
        ]
    }
}

#[test]
fn test_repeat_length_boundaries()
{
    // each boundary of the one, two and three byte length forms,
    // plus the split above the format maximum
    let cases: [(usize, Vec<u8>); 8] = [
        (1, repeat_payload(1)),
        (16, vec![0x8F]),
        (17, vec![0x90, 0x00]),
        (2064, vec![0x97, 0xFF]),
        (2065, vec![0x98, 0x00, 0x00]),
        (526_351, vec![0x9F, 0xFF, 0xFE]),
        (526_352, vec![0x9F, 0xFF, 0xFF]),
        (526_353, vec![0x9F, 0xFF, 0xFF, 0x80]),
    ];

    for (length, payload) in cases
    {
        let pixels = vec![0_u8; length * 3];
        let encoded = encode(&pixels, length, 1, ColorSpace::RGB);

        assert_eq!(
            encoded,
            expected_file(length as u32, 1, 3, &payload),
            "wrong stream for a repeat run of {length}"
        );
        assert_eq!(decode_unlimited(&encoded), pixels);
    }
}

#[test]
fn test_diff_run_caps_at_thirty_two()
{
    // red toggles between zero and one, every delta fits in two
    // bits. the first thirty two pixels must stay one run with no
    // cache index inside it, from there on every pixel is a hit
    let mut pixels = Vec::new();

    for i in 0..40_usize
    {
        pixels.extend_from_slice(&[(1 - (i & 1)) as u8, 0, 0]);
    }

    let encoded = encode(&pixels, 40, 1, ColorSpace::RGB);

    let mut payload = vec![0xBF];
    payload.extend_from_slice(&[0x40; 32]);
    // h(1,0,0,255) = 50, h(0,0,0,255) = 71
    payload.extend_from_slice(&[50, 71, 50, 71, 50, 71, 50, 71]);

    assert_eq!(encoded, expected_file(40, 1, 3, &payload));
    assert_eq!(decode_unlimited(&encoded), pixels);
}

#[test]
fn test_identical_pixel_beats_cache_hit()
{
    // the second A is in the cache but equals the previous pixel,
    // the repeat run must win
    let pixels = [50, 60, 70, 50, 60, 70];

    let encoded = encode(&pixels, 2, 1, ColorSpace::RGB);

    assert_eq!(
        encoded,
        expected_file(2, 1, 3, &[0xE0, 0x32, 0x3C, 0x46, 0x80])
    );
    assert_eq!(decode_unlimited(&encoded), pixels);
}

#[test]
fn test_decode_index_of_seeded_slot()
{
    // hand written stream hitting the all zero seed entry at its
    // own slot, then repeating it once
    let mut file = rpk_header(2, 1, 3);

    file.extend_from_slice(&[56, 0x80]);
    file.extend_from_slice(&END_MARKER);

    assert_eq!(decode_unlimited(&file), [0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_output_size_bounds()
{
    // worst case input, every pixel far from the previous one and
    // never twice in the cache
    let mut pixels = Vec::new();

    for i in 0..256_usize
    {
        let v = (i & 0xFF) as u8;
        pixels.extend_from_slice(&[v, v.wrapping_add(91), v.wrapping_mul(17), 255]);
    }

    let encoded = encode(&pixels, 256, 1, ColorSpace::RGBA);

    let header_and_marker = 13 + 8;
    // N * (channels + 1) plus framing upper bounds any stream
    assert!(encoded.len() <= 256 * 5 + header_and_marker);
    // three bytes per run of up to 526352 pixels lower bounds it
    assert!(encoded.len() > header_and_marker);

    assert_eq!(decode_unlimited(&encoded), pixels);
}
