/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Run length block stream used for container payloads
//!
//! A payload is a sequence of 4 byte blocks, each one a run length
//! followed by the pixel that is repeated, in `(count, r, g, b)` order.
//!
//! Pixels are laid out in row-major order, so concatenating every
//! expanded block gives back the raw 24 bit image.
use log::trace;

use crate::constants::{RLE_BLOCK_SIZE, RLE_MAX_RUN};
use crate::errors::LogoErrors;

/// A single `(count, pixel)` unit of the payload
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunLengthBlock {
    /// Number of times `pixel` repeats, in the range `1..=255`
    pub length: u8,
    pub pixel:  [u8; 3]
}

impl RunLengthBlock {
    pub const fn new(length: u8, pixel: [u8; 3]) -> RunLengthBlock {
        RunLengthBlock { length, pixel }
    }

    /// Parse a block from exactly four bytes
    pub const fn from_bytes(bytes: [u8; RLE_BLOCK_SIZE]) -> RunLengthBlock {
        RunLengthBlock {
            length: bytes[0],
            pixel:  [bytes[1], bytes[2], bytes[3]]
        }
    }

    /// Wire layout, count first then the pixel in r, g, b order
    pub const fn to_bytes(self) -> [u8; RLE_BLOCK_SIZE] {
        [self.length, self.pixel[0], self.pixel[1], self.pixel[2]]
    }
}

/// Iterate over every complete block in `data`
///
/// A trailing partial block is ignored.
pub fn rle_blocks(data: &[u8]) -> impl Iterator<Item = RunLengthBlock> + '_ {
    data.chunks_exact(RLE_BLOCK_SIZE)
        .map(|chunk| RunLengthBlock::from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

/// Number of raw bytes `data` expands to
pub fn decoded_size(data: &[u8]) -> usize {
    rle_blocks(data)
        .map(|block| usize::from(block.length) * 3)
        .sum()
}

/// Expand a run length payload into raw RGB pixels
///
/// The output length is three times the sum of all block lengths.
/// If `data` is not a multiple of four bytes the trailing bytes
/// are dropped.
pub fn decode_rle(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(decoded_size(data));

    for block in rle_blocks(data) {
        for _ in 0..block.length {
            output.extend_from_slice(&block.pixel);
        }
    }
    if data.len() % RLE_BLOCK_SIZE != 0 {
        trace!(
            "Dropping {} trailing bytes of a partial block",
            data.len() % RLE_BLOCK_SIZE
        );
    }
    output
}

/// Compress raw RGB pixels of a `width` by `height` image into
/// run length blocks
///
/// Runs are capped at 255 pixels, a longer run of the same colour
/// is split into several blocks.
///
/// # Errors
/// If `pixels` is not exactly `width*height*3` bytes long
pub fn encode_rle(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, LogoErrors> {
    let expected_len = width
        .checked_mul(height)
        .and_then(|x| x.checked_mul(3))
        .ok_or(LogoErrors::GenericStatic("Image dimensions overflow"))?;

    if pixels.len() != expected_len {
        return Err(LogoErrors::Generic(format!(
            "Expected {expected_len} bytes for a {width}x{height} image but found {}",
            pixels.len()
        )));
    }

    let mut output = Vec::new();
    let mut chunks = pixels.chunks_exact(3);

    let Some(first) = chunks.next() else {
        return Ok(output);
    };

    let mut current = RunLengthBlock::new(1, [first[0], first[1], first[2]]);

    for pixel in chunks {
        if pixel == &current.pixel[..] && current.length < RLE_MAX_RUN {
            current.length += 1;
            continue;
        }
        output.extend_from_slice(&current.to_bytes());
        current = RunLengthBlock::new(1, [pixel[0], pixel[1], pixel[2]]);
    }
    output.extend_from_slice(&current.to_bytes());

    Ok(output)
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use super::*;

    fn lengths(data: &[u8]) -> Vec<u8> {
        rle_blocks(data).map(|x| x.length).collect()
    }

    #[test]
    fn test_long_run_is_split() {
        let pixels = [10_u8, 20, 30].repeat(600);
        let encoded = encode_rle(&pixels, 600, 1).unwrap();

        assert_eq!(lengths(&encoded), [255, 255, 90]);
        assert!(rle_blocks(&encoded).all(|x| x.pixel == [10, 20, 30]));
        assert_eq!(decode_rle(&encoded), pixels);
    }

    #[test]
    fn test_run_of_exactly_255() {
        let pixels = [1_u8, 1, 1].repeat(255);
        let encoded = encode_rle(&pixels, 15, 17).unwrap();

        assert_eq!(lengths(&encoded), [255]);
    }

    #[test]
    fn test_empty() {
        assert!(encode_rle(&[], 0, 0).unwrap().is_empty());
        assert!(decode_rle(&[]).is_empty());
    }

    #[test]
    fn test_single_pixel() {
        let encoded = encode_rle(&[7, 8, 9], 1, 1).unwrap();
        assert_eq!(encoded, [1, 7, 8, 9]);
    }

    #[test]
    fn test_runs_follow_row_major_order() {
        // 3x2, first row red, second row alternating
        let pixels = [
            255, 0, 0, 255, 0, 0, 255, 0, 0, //
            0, 0, 255, 255, 0, 0, 255, 0, 0
        ];
        let encoded = encode_rle(&pixels, 3, 2).unwrap();

        assert_eq!(
            encoded,
            [3, 255, 0, 0, 1, 0, 0, 255, 2, 255, 0, 0]
        );
    }

    #[test]
    fn test_partial_trailing_block_is_dropped() {
        let decoded = decode_rle(&[2, 1, 2, 3, 9, 9]);
        assert_eq!(decoded, [1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_zero_length_block_expands_to_nothing() {
        let decoded = decode_rle(&[0, 1, 2, 3, 1, 4, 5, 6]);
        assert_eq!(decoded, [4, 5, 6]);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(encode_rle(&[0; 9], 2, 2).is_err());
    }

    #[test]
    fn test_random_round_trip() {
        let mut rand = nanorand::WyRand::new_seed(37);

        for (w, h) in [(1, 1), (17, 3), (64, 64), (301, 7)] {
            // few distinct values so runs actually form
            let mut pixels = vec![0_u8; w * h * 3];
            for pix in pixels.chunks_exact_mut(3) {
                let v = rand.generate_range(0_u8..3);
                pix.copy_from_slice(&[v, v, 255 - v]);
            }
            let encoded = encode_rle(&pixels, w, h).unwrap();

            assert_eq!(encoded.len() % RLE_BLOCK_SIZE, 0);
            assert!(rle_blocks(&encoded).all(|x| x.length > 0));
            assert_eq!(decode_rle(&encoded), pixels);
        }
    }

    #[test]
    fn test_noise_round_trip() {
        let (w, h) = (100, 40);
        let mut pixels = vec![0_u8; w * h * 3];
        nanorand::WyRand::new_seed(12).fill_bytes(&mut pixels);

        let encoded = encode_rle(&pixels, w, h).unwrap();
        assert_eq!(decoded_size(&encoded), pixels.len());
        assert_eq!(decode_rle(&encoded), pixels);
    }
}
