/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Human editable description of an unpacked container
//!
//! The manifest holds the header fields that have to survive a
//! round trip and, in table order, the name and placement of every
//! image. It knows nothing about payload offsets, those are
//! recomputed on repack.
//!
//! It is stored as toml next to the images:
//! ```toml
//! [Header]
//! magic = 'BOOT_IMAGE_RLE'
//! unknow = 1
//! metadata = 'META'
//!
//! [[imagedata]]
//! name = 'boot'
//! xoffset = 0
//! yoffset = 0
//! ```
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_IMAGES, NAME_SIZE};
use crate::errors::LogoErrors;
use crate::header::{ContainerHeader, FixedBytes, ImageMetadata};

/// File name of the manifest inside an image directory
pub const MANIFEST_FILE: &str = "info.toml";

#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct ManifestHeader {
    pub magic:    String,
    #[serde(rename = "unknow", alias = "unknown")]
    pub unknown:  u32,
    pub metadata: String
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct ManifestEntry {
    pub name:     String,
    #[serde(rename = "xoffset")]
    pub x_offset: u32,
    #[serde(rename = "yoffset")]
    pub y_offset: u32
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct Manifest {
    #[serde(rename = "Header", alias = "header")]
    pub header: ManifestHeader,
    #[serde(rename = "imagedata", default)]
    pub images: Vec<ManifestEntry>
}

/// File an image named `name` is stored in, `None` if the name
/// could escape its directory
pub fn image_file_name(name: &str) -> Option<String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(&['/', '\\', '\0'][..])
    {
        return None;
    }
    Some(format!("{name}.png"))
}

fn fixed_text<const N: usize>(field: &FixedBytes<N>, what: &str) -> Result<String, LogoErrors> {
    field.to_str().map(str::to_string).map_err(|_| {
        LogoErrors::CorruptContainer(format!("{what} {field:?} is not valid utf-8"))
    })
}

impl Manifest {
    /// Describe a decoded container
    ///
    /// # Errors
    /// [`CorruptContainer`] if a text field is not valid utf-8, it
    /// could not be written back with the same bytes.
    ///
    /// [`CorruptContainer`]:LogoErrors::CorruptContainer
    pub fn from_container(
        header: &ContainerHeader, records: &[ImageMetadata]
    ) -> Result<Manifest, LogoErrors> {
        let images = records
            .iter()
            .map(|record| {
                Ok(ManifestEntry {
                    name:     fixed_text(&record.name, "Image name")?,
                    x_offset: record.x_offset,
                    y_offset: record.y_offset
                })
            })
            .collect::<Result<Vec<_>, LogoErrors>>()?;

        Ok(Manifest {
            header: ManifestHeader {
                magic:    fixed_text(&header.magic, "Magic")?,
                unknown:  header.unknown,
                metadata: fixed_text(&header.metadata_tag, "Metadata tag")?
            },
            images
        })
    }

    /// Parse and validate a manifest from its toml text
    pub fn parse(text: &str) -> Result<Manifest, LogoErrors> {
        let manifest: Manifest = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and validate the manifest stored at `path`
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Manifest, LogoErrors> {
        let path = path.as_ref();

        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                LogoErrors::ManifestError(format!("Missing manifest {}", path.display()))
            }
            _ => LogoErrors::IoErrors(e)
        })?;
        let manifest: Manifest = toml::from_str(&text)
            .map_err(|e| LogoErrors::ManifestError(format!("{}: {e}", path.display())))?;
        manifest.validate()?;

        Ok(manifest)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), LogoErrors> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Check the manifest describes something a container can hold
    ///
    /// There can be at most 64 images. Names must be usable as file
    /// names and stay unique once cut to the 40 byte name field.
    pub fn validate(&self) -> Result<(), LogoErrors> {
        if self.images.len() > MAX_IMAGES {
            return Err(LogoErrors::ManifestError(format!(
                "{} images listed, a container holds at most {MAX_IMAGES}",
                self.images.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.images.len());

        for entry in &self.images {
            if image_file_name(&entry.name).is_none() {
                return Err(LogoErrors::ManifestError(format!(
                    "Image name {:?} cannot be used as a file name",
                    entry.name
                )));
            }
            if !seen.insert(FixedBytes::<NAME_SIZE>::from_text(&entry.name)) {
                return Err(LogoErrors::ManifestError(format!(
                    "Image {:?} is listed more than once, names are compared on their first {NAME_SIZE} bytes",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[Header]
magic = "LOGO"
unknow = 3
metadata = "META"

[[imagedata]]
name = "boot"
xoffset = 0
yoffset = 10

[[imagedata]]
name = "charge"
xoffset = 5
yoffset = 6
"#;

    #[test]
    fn test_parse() {
        let manifest = Manifest::parse(SAMPLE).unwrap();

        assert_eq!(manifest.header.magic, "LOGO");
        assert_eq!(manifest.header.unknown, 3);
        assert_eq!(manifest.images.len(), 2);
        assert_eq!(manifest.images[0].y_offset, 10);
        assert_eq!(manifest.images[1].name, "charge");
    }

    #[test]
    fn test_lowercase_keys() {
        let text = SAMPLE
            .replace("[Header]", "[header]")
            .replace("unknow =", "unknown =");
        let manifest = Manifest::parse(&text).unwrap();

        assert_eq!(manifest.header.unknown, 3);
        assert_eq!(manifest.header.metadata, "META");
    }

    #[test]
    fn test_saved_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        Manifest::parse(SAMPLE).unwrap().save_to(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("[Header]"));
        assert!(text.contains("unknow = 3"));
        assert!(text.contains("[[imagedata]]"));
        assert!(text.contains("xoffset = 5"));
    }

    #[test]
    fn test_save_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        let manifest = Manifest::parse(SAMPLE).unwrap();
        manifest.save_to(&path).unwrap();

        assert_eq!(Manifest::read(&path).unwrap(), manifest);
    }

    #[test]
    fn test_missing_is_manifest_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::read(dir.path().join(MANIFEST_FILE));

        assert!(matches!(result, Err(LogoErrors::ManifestError(_))));
    }

    #[test]
    fn test_malformed() {
        assert!(Manifest::parse("Header = 1").is_err());

        let negative = SAMPLE.replace("xoffset = 5", "xoffset = -5");
        assert!(matches!(
            Manifest::parse(&negative),
            Err(LogoErrors::ManifestError(_))
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let duplicated = SAMPLE.replace("charge", "boot");
        assert!(Manifest::parse(&duplicated).is_err());
    }

    #[test]
    fn test_names_equal_after_truncation() {
        let long = "n".repeat(NAME_SIZE);
        let text = SAMPLE
            .replace("\"boot\"", &format!("\"{long}A\""))
            .replace("\"charge\"", &format!("\"{long}B\""));

        assert!(matches!(
            Manifest::parse(&text),
            Err(LogoErrors::ManifestError(_))
        ));
    }

    #[test]
    fn test_path_names_are_rejected() {
        for name in ["../boot", "a/b", "a\\\\b", "..", ""] {
            let text = SAMPLE.replace("\"boot\"", &format!("\"{name}\""));
            assert!(Manifest::parse(&text).is_err(), "{name}");
        }
    }

    #[test]
    fn test_too_many_images() {
        let manifest = Manifest {
            images: (0..65)
                .map(|i| ManifestEntry {
                    name: format!("image{i}"),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_non_utf8_names_are_corrupt() {
        let record = ImageMetadata {
            name: FixedBytes::new({
                let mut name = [0; NAME_SIZE];
                name[..3].copy_from_slice(&[b'a', 0xc3, b'b']);
                name
            }),
            ..Default::default()
        };
        let result = Manifest::from_container(&ContainerHeader::default(), &[record]);

        assert!(matches!(result, Err(LogoErrors::CorruptContainer(_))));
    }
}
