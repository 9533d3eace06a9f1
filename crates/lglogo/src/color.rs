/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Red and blue channel exchange
//!
//! Container payloads keep red and blue in the opposite order of
//! what image viewers expect, so the exchange runs once on the way
//! out of a container and once on the way back in.
use crate::image::LogoImage;

/// Swap the first and third channel of every pixel in place
///
/// Any channel past the third (alpha) is left alone.
pub fn swap_red_blue_in_place(pixels: &mut [u8], components: usize) {
    if components < 3 {
        return;
    }
    for pix in pixels.chunks_exact_mut(components) {
        pix.swap(0, 2);
    }
}

/// Return a copy of `image` with red and blue exchanged
pub fn swap_red_blue(image: &LogoImage) -> LogoImage {
    let mut output = image.clone();
    let components = output.components();
    swap_red_blue_in_place(output.pixels_mut(), components);
    output
}
