/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::{debug, trace};

use crate::color::swap_red_blue_in_place;
use crate::constants::{HEADER_OFFSET, HEADER_SIZE, MAX_IMAGES, METADATA_OFFSET, METADATA_SIZE};
use crate::errors::LogoErrors;
use crate::header::{ContainerHeader, ImageMetadata};
use crate::image::LogoImage;
use crate::rle::decode_rle;

/// A boot logo container decoder
///
/// The decoder works on the whole container held in memory, every
/// access is addressed by absolute offset so a single decoder can
/// be shared between threads decoding different images.
///
/// The decoder is initialized by calling `new` followed by
/// [`decode_headers`] which reads the header and metadata table.
///
/// [`decode_headers`]:LogoDecoder::decode_headers
pub struct LogoDecoder<'a> {
    data:            &'a [u8],
    header:          ContainerHeader,
    metadata:        Vec<ImageMetadata>,
    decoded_headers: bool
}

impl<'a> LogoDecoder<'a> {
    /// Create a new decoder over the bytes of a container
    pub fn new(data: &'a [u8]) -> LogoDecoder<'a> {
        LogoDecoder {
            data,
            header: ContainerHeader::default(),
            metadata: vec![],
            decoded_headers: false
        }
    }

    fn read_fixed<const N: usize>(&self, position: u64, what: &str) -> Result<[u8; N], LogoErrors> {
        let start = usize::try_from(position)
            .map_err(|_| LogoErrors::CorruptContainer(format!("{what} offset out of range")))?;

        let bytes = self
            .data
            .get(start..)
            .and_then(|x| x.get(..N))
            .ok_or_else(|| {
                LogoErrors::CorruptContainer(format!(
                    "Could not read {what}, expected {N} bytes at offset {position:#x} but file is {} bytes",
                    self.data.len()
                ))
            })?;

        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read the header and every metadata record
    ///
    /// # Errors
    /// - [`CorruptContainer`] if the header or any record is truncated, or the
    ///   header claims more images than the metadata table can hold
    ///
    /// [`CorruptContainer`]:LogoErrors::CorruptContainer
    pub fn decode_headers(&mut self) -> Result<(), LogoErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let header_bytes = self.read_fixed::<HEADER_SIZE>(HEADER_OFFSET, "container header")?;
        let header = ContainerHeader::from_bytes(&header_bytes);

        trace!("Container magic: {:?}", header.magic);
        trace!("Container metadata tag: {:?}", header.metadata_tag);
        trace!("Image count: {}", header.image_count);
        trace!("File size: {}", header.file_size);

        let count = header.image_count as usize;

        if count > MAX_IMAGES {
            return Err(LogoErrors::CorruptContainer(format!(
                "Header claims {count} images but the metadata table holds at most {MAX_IMAGES}"
            )));
        }
        let mut metadata = Vec::with_capacity(count);

        for i in 0..count {
            let position = METADATA_OFFSET + (i * METADATA_SIZE) as u64;
            let record = self.read_fixed::<METADATA_SIZE>(position, "metadata record")?;

            metadata.push(ImageMetadata::from_bytes(&record));
        }
        if (header.file_size as usize) != self.data.len() {
            debug!(
                "Header file size {} differs from container length {}",
                header.file_size,
                self.data.len()
            );
        }

        self.header = header;
        self.metadata = metadata;
        self.decoded_headers = true;

        Ok(())
    }

    /// The container header or `None` if headers weren't decoded
    pub const fn header(&self) -> Option<&ContainerHeader> {
        if self.decoded_headers {
            Some(&self.header)
        } else {
            None
        }
    }

    /// Metadata records in table order
    ///
    /// Empty if the headers weren't decoded
    pub fn metadata(&self) -> &[ImageMetadata] {
        &self.metadata
    }

    fn record(&self, index: usize) -> Result<&ImageMetadata, LogoErrors> {
        self.metadata.get(index).ok_or_else(|| {
            LogoErrors::Generic(format!(
                "No image at index {index}, container has {} images",
                self.metadata.len()
            ))
        })
    }

    /// The run length payload of the image at `index`
    ///
    /// The payload is exactly `size` bytes from `offset`, it is not
    /// terminated by any sentinel.
    pub fn payload(&self, index: usize) -> Result<&'a [u8], LogoErrors> {
        let record = self.record(index)?;

        let start = record.offset as usize;
        let end = start + record.size as usize;

        self.data.get(start..end).ok_or_else(|| {
            LogoErrors::CorruptContainer(format!(
                "Payload of {:?} spans {start:#x}..{end:#x} but file is {} bytes",
                record.name,
                self.data.len()
            ))
        })
    }

    /// Decode the image at `index` into displayable RGB pixels
    ///
    /// The payload is expanded, cropped to the recorded dimensions
    /// and has its red and blue channels exchanged.
    pub fn decode_image(&self, index: usize) -> Result<LogoImage, LogoErrors> {
        let record = self.record(index)?;
        let payload = self.payload(index)?;

        let expected = record.raw_size().ok_or_else(|| {
            LogoErrors::CorruptContainer(format!(
                "Image {:?} has impossible dimensions {}x{}",
                record.name, record.width, record.height
            ))
        })?;
        let mut raw = decode_rle(payload);

        if raw.len() < expected {
            return Err(LogoErrors::CorruptContainer(format!(
                "Payload of {:?} expands to {} bytes, a {}x{} image needs {expected}",
                record.name,
                raw.len(),
                record.width,
                record.height
            )));
        }
        if raw.len() > expected {
            trace!(
                "Cropping {} extra bytes of {:?}",
                raw.len() - expected,
                record.name
            );
            raw.truncate(expected);
        }
        swap_red_blue_in_place(&mut raw, 3);

        LogoImage::from_rgb(raw, record.width as usize, record.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::FixedBytes;

    fn container(records: &[(ImageMetadata, &[u8])]) -> Vec<u8> {
        let header = ContainerHeader {
            magic:        FixedBytes::from_text("MAGIC"),
            image_count:  records.len() as u32,
            unknown:      7,
            metadata_tag: FixedBytes::from_text("TAG"),
            file_size:    0
        };
        let end = records.iter().map(|x| x.0.end()).max().unwrap_or(0x2000);
        let mut data = vec![0; end as usize];

        data[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
        for (i, (record, payload)) in records.iter().enumerate() {
            let pos = 0x1000 + i * METADATA_SIZE;
            data[pos..pos + METADATA_SIZE].copy_from_slice(&record.to_bytes());
            data[record.offset as usize..record.end() as usize].copy_from_slice(payload);
        }
        data
    }

    fn record(name: &str, offset: u32, payload: &[u8], w: u32, h: u32) -> ImageMetadata {
        ImageMetadata {
            name: FixedBytes::from_text(name),
            offset,
            size: payload.len() as u32,
            width: w,
            height: h,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_swaps_channels() {
        let payload = [4, 0, 0, 255];
        let data = container(&[(record("red", 0x2000, &payload, 2, 2), &payload)]);

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        assert_eq!(decoder.header().unwrap().unknown, 7);
        assert_eq!(decoder.metadata()[0].name.to_text(), "red");

        let image = decoder.decode_image(0).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.pixels(), [255_u8, 0, 0].repeat(4));
    }

    #[test]
    fn test_padded_payload_is_cropped() {
        // 1x1 image stored with two extra background rows
        let payload = [1, 1, 2, 3, 2, 0, 0, 0];
        let data = container(&[(record("pad", 0x2000, &payload, 1, 1), &payload)]);

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        assert_eq!(decoder.decode_image(0).unwrap().pixels(), [3, 2, 1]);
    }

    #[test]
    fn test_truncated_header() {
        let mut decoder = LogoDecoder::new(&[0; 20]);
        assert!(matches!(
            decoder.decode_headers(),
            Err(LogoErrors::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_truncated_metadata_table() {
        let payload = [1, 0, 0, 0];
        let mut data = container(&[(record("a", 0x2000, &payload, 1, 1), &payload)]);
        // claim a second record that is cut short
        data[0x10] = 2;
        data.truncate(0x1000 + METADATA_SIZE + 10);

        let mut decoder = LogoDecoder::new(&data);
        assert!(matches!(
            decoder.decode_headers(),
            Err(LogoErrors::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_payload_outside_file() {
        let payload = [1, 0, 0, 0];
        let mut data = container(&[(record("a", 0x2000, &payload, 1, 1), &payload)]);
        data.truncate(0x2002);

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        assert!(matches!(
            decoder.decode_image(0),
            Err(LogoErrors::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_short_payload_is_corrupt() {
        let payload = [1, 0, 0, 0];
        let data = container(&[(record("a", 0x2000, &payload, 2, 2), &payload)]);

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        assert!(decoder.decode_image(0).is_err());
    }

    #[test]
    fn test_huge_dimensions_are_corrupt() {
        let payload = [1, 0, 0, 0];
        let data = container(&[(record("huge", 0x2000, &payload, u32::MAX, u32::MAX), &payload)]);

        let mut decoder = LogoDecoder::new(&data);
        decoder.decode_headers().unwrap();

        assert!(matches!(
            decoder.decode_image(0),
            Err(LogoErrors::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_too_many_images() {
        let mut data = container(&[]);
        data[0x10] = 65;

        let mut decoder = LogoDecoder::new(&data);
        assert!(decoder.decode_headers().is_err());
    }
}
