/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! In memory images and the png interchange format
use std::fs;
use std::path::Path;

use log::trace;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_core::result::DecodingResult;
use zune_png::{PngDecoder, PngEncoder};

use crate::errors::LogoErrors;

/// An interleaved 8 bit image, either RGB or RGBA
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogoImage {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    pixels:     Vec<u8>
}

impl LogoImage {
    /// Create an image from interleaved pixels
    ///
    /// # Errors
    /// - The colorspace is not RGB or RGBA
    /// - `pixels` is not `width*height*components` long
    pub fn new(
        pixels: Vec<u8>, width: usize, height: usize, colorspace: ColorSpace
    ) -> Result<LogoImage, LogoErrors> {
        if !matches!(colorspace, ColorSpace::RGB | ColorSpace::RGBA) {
            return Err(LogoErrors::ImageFormat(format!(
                "Unsupported colorspace {colorspace:?}, expected RGB or RGBA"
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(colorspace.num_components()))
            .ok_or(LogoErrors::GenericStatic("Image dimensions overflow"))?;

        if pixels.len() != expected {
            return Err(LogoErrors::ImageFormat(format!(
                "Expected {expected} bytes for a {width}x{height} {colorspace:?} image but found {}",
                pixels.len()
            )));
        }
        Ok(LogoImage {
            width,
            height,
            colorspace,
            pixels
        })
    }

    pub fn from_rgb(pixels: Vec<u8>, width: usize, height: usize) -> Result<LogoImage, LogoErrors> {
        LogoImage::new(pixels, width, height, ColorSpace::RGB)
    }

    /// An image where every pixel has the value `pixel`
    pub fn fill(pixel: [u8; 3], width: usize, height: usize) -> LogoImage {
        LogoImage {
            width,
            height,
            colorspace: ColorSpace::RGB,
            pixels: pixel.repeat(width * height)
        }
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub fn components(&self) -> usize {
        self.colorspace.num_components()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Channels of the pixel at `(x,y)` or `None` when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let components = self.components();
        let start = (y * self.width + x) * components;
        Some(&self.pixels[start..start + components])
    }

    /// Raw 24 bit pixels in row-major order
    ///
    /// Alpha is removed by compositing over black, fully opaque
    /// pixels keep their value.
    pub fn to_rgb(&self) -> Vec<u8> {
        if self.colorspace == ColorSpace::RGB {
            return self.pixels.clone();
        }
        let mut output = Vec::with_capacity(self.width * self.height * 3);

        for pix in self.pixels.chunks_exact(4) {
            let alpha = pix[3];
            output.extend_from_slice(&[
                premultiply(pix[0], alpha),
                premultiply(pix[1], alpha),
                premultiply(pix[2], alpha)
            ]);
        }
        output
    }

    /// Decode a png file from memory
    ///
    /// Grayscale images are expanded to RGB, 16 bit images keep
    /// their most significant byte.
    pub fn decode_png(data: &[u8]) -> Result<LogoImage, LogoErrors> {
        let mut decoder = PngDecoder::new(data);

        let result = decoder
            .decode()
            .map_err(|e| LogoErrors::ImageFormat(format!("{e:?}")))?;

        let (width, height) = decoder
            .get_dimensions()
            .ok_or(LogoErrors::GenericStatic("Png headers were not decoded"))?;
        let colorspace = decoder
            .get_colorspace()
            .ok_or(LogoErrors::GenericStatic("Png headers were not decoded"))?;

        let samples = match result {
            DecodingResult::U8(data) => data,
            DecodingResult::U16(data) => data.iter().map(|x| (x >> 8) as u8).collect(),
            _ => {
                return Err(LogoErrors::GenericStatic(
                    "Unsupported png sample type, expected 8 or 16 bits"
                ))
            }
        };
        trace!("Png image {width}x{height} {colorspace:?}");

        let (pixels, colorspace) = match colorspace {
            ColorSpace::RGB | ColorSpace::RGBA => (samples, colorspace),
            ColorSpace::Luma => (
                samples.iter().flat_map(|&l| [l, l, l]).collect(),
                ColorSpace::RGB
            ),
            ColorSpace::LumaA => (
                samples
                    .chunks_exact(2)
                    .flat_map(|x| [x[0], x[0], x[0], x[1]])
                    .collect(),
                ColorSpace::RGBA
            ),
            other => {
                return Err(LogoErrors::ImageFormat(format!(
                    "Unsupported png colorspace {other:?}"
                )))
            }
        };
        LogoImage::new(pixels, width, height, colorspace)
    }

    /// Read and decode a png file
    pub fn open_png<P: AsRef<Path>>(path: P) -> Result<LogoImage, LogoErrors> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            LogoErrors::IoErrors(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display())
            ))
        })?;
        LogoImage::decode_png(&data)
    }

    /// Encode the image as an 8 bit png
    pub fn encode_png(&self) -> Result<Vec<u8>, LogoErrors> {
        if self.width == 0 || self.height == 0 {
            return Err(LogoErrors::ImageFormat(format!(
                "Cannot store a {}x{} image as png",
                self.width, self.height
            )));
        }
        let options = EncoderOptions::new(
            self.width,
            self.height,
            self.colorspace,
            BitDepth::Eight
        );
        let mut encoder = PngEncoder::new(&self.pixels, options);

        Ok(encoder.encode())
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), LogoErrors> {
        let bytes = self.encode_png()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Scale a channel by alpha the way 16 bit premultiplied colour
/// is computed, keeping the high byte
fn premultiply(channel: u8, alpha: u8) -> u8 {
    let c = u32::from(channel) * 0x101;
    let a = u32::from(alpha) * 0x101;
    ((u64::from(c) * u64::from(a) / 0xffff) >> 8) as u8
}
