/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Payload alignment and background padding
use crate::constants::ALIGNMENT;

/// Round `offset` up to the next multiple of 4096
///
/// Already aligned offsets are returned unchanged
pub const fn align_up(offset: u64) -> u64 {
    offset.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Number of background rows to append below an image before it
/// is run length encoded
///
/// Some devices draw an image placed at `x = 0` with a non zero `y`
/// from the top of the screen, so an image with a black background
/// is extended downwards by `y_offset` rows to cover the gap.
///
/// Returns zero when padding is disabled or the image does not
/// qualify.
pub fn background_rows(enabled: bool, x_offset: u32, y_offset: u32, first_pixel: &[u8]) -> usize {
    if !enabled || x_offset != 0 || y_offset == 0 {
        return 0;
    }
    if first_pixel.len() < 3 || first_pixel[..3] != [0, 0, 0] {
        return 0;
    }
    y_offset as usize
}

/// Append `rows` rows of `background` to a raw RGB image `width` pixels wide
pub fn extend_rows(pixels: &mut Vec<u8>, width: usize, rows: usize, background: [u8; 3]) {
    pixels.reserve(width * rows * 3);

    for _ in 0..width * rows {
        pixels.extend_from_slice(&background);
    }
}
