/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use clap::ArgMatches;
use lglogo::{repack, unpack, LogoErrors, PackOptions};
use log::{debug, info};

use crate::probe_files::probe_input_file;

fn input_image(args: &ArgMatches) -> Result<&Path, LogoErrors> {
    args.get_one::<String>("image")
        .map(Path::new)
        .ok_or(LogoErrors::GenericStatic(
            "No container given, pass one with --image or use --repack"
        ))
}

fn arg_path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a Path, LogoErrors> {
    args.get_one::<String>(id)
        .map(Path::new)
        .ok_or_else(|| LogoErrors::Generic(format!("Missing value for --{id}")))
}

pub(crate) fn create_and_exec_workflow_from_cmd(
    args: &ArgMatches, options: &PackOptions
) -> Result<(), LogoErrors> {
    let pic_dir = arg_path(args, "picdir")?;

    if args.get_flag("probe") {
        debug!("Probing container");
        return probe_input_file(input_image(args)?);
    }
    if args.get_flag("repack") {
        let out_image = arg_path(args, "outimg")?;
        info!("Repack mode, reading {}", pic_dir.display());

        let header = repack(pic_dir, out_image, options)?;
        debug!("Wrote {} images, {} bytes", header.image_count, header.file_size);
    } else {
        let image = input_image(args)?;
        info!("Unpack mode, writing {}", pic_dir.display());

        let manifest = unpack(image, pic_dir, options)?;
        debug!("Extracted {} images", manifest.images.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd_args::create_cmd_args;

    #[test]
    fn test_unpack_needs_image() {
        let matches = create_cmd_args().get_matches_from(["lglogo"]);
        let result = create_and_exec_workflow_from_cmd(&matches, &PackOptions::default());

        assert!(matches!(result, Err(LogoErrors::GenericStatic(_))));
    }
}
