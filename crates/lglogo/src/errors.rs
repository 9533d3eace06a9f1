/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible when unpacking or repacking a container
use std::fmt::{Debug, Display, Formatter};

/// Possible errors that may occur while reading or writing
/// a logo container
pub enum LogoErrors {
    /// A file could not be opened, read or written
    IoErrors(std::io::Error),
    /// The container is structurally broken
    ///
    /// E.g. the header or a metadata record is shorter than
    /// its fixed size, or a payload points outside the file
    CorruptContainer(String),
    /// The sidecar manifest is missing, malformed or describes
    /// something the container cannot hold
    ManifestError(String),
    /// The interchange image could not be decoded or encoded
    ImageFormat(String),
    /// Generic message
    Generic(String),
    /// Generic message does not need heap allocation
    GenericStatic(&'static str)
}

impl Debug for LogoErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogoErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err}")
            }
            LogoErrors::CorruptContainer(reason) => {
                writeln!(f, "Corrupt container: {reason}")
            }
            LogoErrors::ManifestError(reason) => {
                writeln!(f, "Manifest error: {reason}")
            }
            LogoErrors::ImageFormat(reason) => {
                writeln!(f, "Image format error: {reason}")
            }
            LogoErrors::Generic(val) => {
                writeln!(f, "{val}")
            }
            LogoErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for LogoErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for LogoErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogoErrors::IoErrors(err) => Some(err),
            _ => None
        }
    }
}

impl From<std::io::Error> for LogoErrors {
    fn from(value: std::io::Error) -> Self {
        LogoErrors::IoErrors(value)
    }
}

impl From<&'static str> for LogoErrors {
    fn from(value: &'static str) -> Self {
        LogoErrors::GenericStatic(value)
    }
}

impl From<toml::de::Error> for LogoErrors {
    fn from(value: toml::de::Error) -> Self {
        LogoErrors::ManifestError(value.to_string())
    }
}

impl From<toml::ser::Error> for LogoErrors {
    fn from(value: toml::ser::Error) -> Self {
        LogoErrors::ManifestError(value.to_string())
    }
}
