/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image directory to container
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info, trace};

use crate::align::{background_rows, extend_rows};
use crate::color::swap_red_blue_in_place;
use crate::encoder::{ImagePlacement, LogoEncoder};
use crate::errors::LogoErrors;
use crate::header::ContainerHeader;
use crate::image::LogoImage;
use crate::manifest::{image_file_name, Manifest, ManifestEntry, MANIFEST_FILE};
use crate::options::PackOptions;
use crate::rle::encode_rle;

/// A run length payload ready to be placed in a container
#[derive(Clone, Debug)]
pub struct EncodedImage {
    pub payload: Vec<u8>,
    /// Dimensions of the source image, before padding
    pub width:   u32,
    pub height:  u32
}

fn to_u32(value: usize, what: &str) -> Result<u32, LogoErrors> {
    u32::try_from(value)
        .map_err(|_| LogoErrors::ManifestError(format!("{what} {value} does not fit in 32 bits")))
}

/// Turn a displayable image into the payload stored for `entry`
///
/// Red and blue are exchanged, background rows are appended when
/// `padding` is set and the image qualifies, and the result is run
/// length encoded. The returned dimensions are those of `image`.
pub fn encode_image(
    image: &LogoImage, entry: &ManifestEntry, padding: bool
) -> Result<EncodedImage, LogoErrors> {
    let (width, height) = image.dimensions();

    let mut raw = image.to_rgb();
    swap_red_blue_in_place(&mut raw, 3);

    let first_pixel = raw.get(..3).unwrap_or_default();
    let extra_rows = background_rows(padding, entry.x_offset, entry.y_offset, first_pixel);

    if extra_rows > 0 {
        debug!(
            "Padding {} with {extra_rows} background rows below its {height} rows",
            entry.name
        );
        extend_rows(&mut raw, width, extra_rows, [0, 0, 0]);
    }
    let payload = encode_rle(&raw, width, height + extra_rows)?;

    Ok(EncodedImage {
        payload,
        width: to_u32(width, "Width")?,
        height: to_u32(height, "Height")?
    })
}

/// Build a container from `manifest`, loading every image from `in_dir`
///
/// Images are placed in manifest order, this is sequential since
/// every offset depends on where the previous payload ended.
pub fn repack_to_writer<W: Write + Seek>(
    manifest: &Manifest, in_dir: &Path, sink: W, options: &PackOptions
) -> Result<(ContainerHeader, W), LogoErrors> {
    manifest.validate()?;

    let mut encoder = LogoEncoder::new(
        sink,
        &manifest.header.magic,
        manifest.header.unknown,
        &manifest.header.metadata
    );
    let count = manifest.images.len();

    for (i, entry) in manifest.images.iter().enumerate() {
        info!("[{:02}/{:02}] Write [{}]...", i + 1, count, entry.name);

        let file_name = image_file_name(&entry.name).ok_or_else(|| {
            LogoErrors::ManifestError(format!(
                "Image name {:?} cannot be used as a file name",
                entry.name
            ))
        })?;
        let image = LogoImage::open_png(in_dir.join(file_name))?;
        let encoded = encode_image(&image, entry, options.padding())?;

        let placement = ImagePlacement {
            name:     &entry.name,
            width:    encoded.width,
            height:   encoded.height,
            x_offset: entry.x_offset,
            y_offset: entry.y_offset
        };
        let record = encoder.add_image(placement, &encoded.payload)?;

        trace!(
            "{} placed at {:#x}, {} bytes",
            entry.name,
            record.offset,
            record.size
        );
    }
    encoder.finish()
}

/// Build a new container at `out_path` from an unpacked image directory
///
/// `in_dir` must contain `info.toml` and a `<name>.png` for every
/// image it lists.
///
/// # Returns
/// The header that was written
pub fn repack<P: AsRef<Path>, Q: AsRef<Path>>(
    in_dir: P, out_path: Q, options: &PackOptions
) -> Result<ContainerHeader, LogoErrors> {
    let in_dir = in_dir.as_ref();
    let out_path = out_path.as_ref();
    let start = Instant::now();

    info!("Repacking {}", in_dir.display());

    let manifest = Manifest::read(in_dir.join(MANIFEST_FILE))?;
    let sink = BufWriter::new(File::create(out_path)?);

    let (header, _) = repack_to_writer(&manifest, in_dir, sink, options)?;

    info!("Done, new file saved into {}", out_path.display());
    trace!("Repacking took {:?}", start.elapsed());

    Ok(header)
}
